use crate::ast::{CompilationUnit, Item, Stmt};

/// One declared function, borrowed from the tree.
#[derive(Debug, Clone, Copy)]
pub struct FunctionInfo<'a> {
    pub name: &'a str,
    pub params: &'a [String],
    pub body: &'a [Stmt],
}

/// Top-level shape of a compilation unit, in declaration order.
#[derive(Debug, Default)]
pub struct Metadata<'a> {
    pub functions: Vec<FunctionInfo<'a>>,
    /// Every top-level statement. Lowering decides which have a global form.
    pub globals: Vec<&'a Stmt>,
}

impl Metadata<'_> {
    pub fn has_main(&self) -> bool {
        self.functions.iter().any(|f| f.name == "main")
    }
}

pub fn collect(unit: &CompilationUnit) -> Metadata<'_> {
    let mut meta = Metadata::default();
    for item in &unit.items {
        match item {
            Item::Function(decl) => meta.functions.push(FunctionInfo {
                name: &decl.name,
                params: &decl.params,
                body: &decl.body,
            }),
            Item::Statement(stmt) => meta.globals.push(stmt),
        }
    }
    tracing::debug!(
        functions = meta.functions.len(),
        globals = meta.globals.len(),
        "collected metadata"
    );
    meta
}
