//! Statement lowering: turns statements into bash text.
//!
//! Locals are tracked per scope so a name is declared with `local` exactly
//! once per function. Branch bodies get a fork of the enclosing scope and all
//! forks are merged back afterwards, so a name declared in any branch counts as
//! declared for later siblings.

use crate::ast::{ElseBranch, Expr, ExprKind, IfStmt, Stmt, StmtKind};
use crate::collect::FunctionInfo;
use crate::ir::Value;
use crate::names::{collapse_whitespace, to_shell_identifier, truncate};
use crate::render::{render_call_command, render_condition, render_value, try_call, unwrap_identifier};
use crate::span::{SourceMap, Span};
use std::collections::HashSet;

pub const OUT_PARAM: &str = "__gnash_out";
pub const RETURN_VAR: &str = "__gnash_ret";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Top level: assignments are plain globals.
    Global,
    Function,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    locals: HashSet<String>,
    kind: ScopeKind,
}

impl Scope {
    pub fn global() -> Self {
        Scope {
            locals: HashSet::new(),
            kind: ScopeKind::Global,
        }
    }

    pub fn function() -> Self {
        Scope {
            locals: HashSet::new(),
            kind: ScopeKind::Function,
        }
    }

    pub fn is_function(&self) -> bool {
        self.kind == ScopeKind::Function
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        self.locals.contains(name)
    }

    pub fn fork(&self) -> Scope {
        self.clone()
    }

    pub fn merge(&mut self, child: Scope) {
        self.locals.extend(child.locals);
    }

    /// Records `name`; true when the caller must emit a `local` declaration.
    pub fn declare(&mut self, name: &str) -> bool {
        self.is_function() && self.locals.insert(name.to_string())
    }
}

/// Generator state for one compilation run.
pub struct Lowerer<'a> {
    sm: &'a SourceMap,
    snippet_width: usize,
    temp_counter: usize,
    out: String,
}

impl<'a> Lowerer<'a> {
    pub fn new(sm: &'a SourceMap, snippet_width: usize) -> Self {
        Lowerer {
            sm,
            snippet_width,
            temp_counter: 0,
            out: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    /// Appends raw text, no indentation or newline handling.
    pub fn push_raw(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn line(&mut self, level: usize, text: &str) {
        let pad = "  ".repeat(level);
        self.out.push_str(&pad);
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn next_temp(&mut self, prefix: &str) -> String {
        self.temp_counter += 1;
        format!("{}{}", prefix, self.temp_counter)
    }

    fn snippet(&self, span: Span) -> String {
        truncate(&collapse_whitespace(self.sm.text(span)), self.snippet_width)
    }

    fn unsupported(&mut self, level: usize, span: Span) {
        let snippet = self.snippet(span);
        tracing::warn!(construct = %snippet, "unsupported construct");
        self.line(level, &format!("# TODO: unsupported construct: {}", snippet));
    }

    /// Lowers one top-level statement. Only expression statements have a
    /// global form; anything else becomes a placeholder.
    pub fn lower_global(&mut self, stmt: &Stmt) {
        let mut scope = Scope::global();
        let lowered = match &stmt.node {
            StmtKind::Expr(expr) => self.lower_expr_stmt(expr, 0, &mut scope),
            _ => false,
        };
        if !lowered {
            self.unsupported(0, stmt.span);
        }
    }

    pub fn lower_function(&mut self, func: &FunctionInfo<'_>) {
        self.line(0, &format!("gnash_fn_{}() {{", func.name));
        let mut scope = Scope::function();
        scope.declare(OUT_PARAM);
        self.line(1, &format!("local {}=\"${{1:-}}\"", OUT_PARAM));
        scope.declare(RETURN_VAR);
        self.line(1, &format!("local {}=\"\"", RETURN_VAR));
        for (index, param) in func.params.iter().enumerate() {
            let name = to_shell_identifier(param);
            scope.declare(&name);
            self.line(1, &format!("local {}=\"${{{}:-}}\"", name, index + 2));
        }
        self.lower_block(func.body, 1, &mut scope);
        self.out.push_str("}\n\n");
    }

    pub fn lower_block(&mut self, stmts: &[Stmt], level: usize, scope: &mut Scope) {
        for stmt in stmts {
            self.lower_stmt(stmt, level, scope);
        }
    }

    /// A compound-statement body; bash rejects empty ones, so emit `:` if nothing was lowered.
    fn lower_body(&mut self, stmts: &[Stmt], level: usize, scope: &mut Scope) {
        let before = self.out.len();
        self.lower_block(stmts, level, scope);
        if self.out.len() == before {
            self.line(level, ":");
        }
    }

    pub fn lower_stmt(&mut self, stmt: &Stmt, level: usize, scope: &mut Scope) {
        match &stmt.node {
            StmtKind::Expr(expr) => {
                if !self.lower_expr_stmt(expr, level, scope) {
                    self.unsupported(level, stmt.span);
                }
            }
            StmtKind::If(if_stmt) => self.lower_if(if_stmt, level, scope),
            StmtKind::For {
                var,
                iterable,
                body,
            } => self.lower_for(stmt.span, var, iterable, body, level, scope),
            StmtKind::Return(None) => self.line(level, "return"),
            StmtKind::Return(Some(expr)) => match render_value(expr) {
                Some(value) => {
                    let value = unwrap_identifier(&value.operand());
                    if is_exit_code(&value) {
                        self.line(level, &format!("return {}", value));
                    } else {
                        self.string_result(level, &value, 0);
                    }
                }
                None => self.unsupported(level, stmt.span),
            },
            StmtKind::Throw(expr) => match expr.as_ref().and_then(render_value) {
                Some(value) => self.string_result(level, &unwrap_identifier(&value.operand()), 1),
                None => self.unsupported(level, stmt.span),
            },
            StmtKind::Continue => self.line(level, "continue"),
            StmtKind::Try {
                body,
                catches,
                finally,
            } => {
                let rc = self.next_temp("__gnash_try_rc");
                let block = self.next_temp("__gnash_try_block");

                self.line(level, &format!("{}() {{", block));
                let mut body_scope = scope.fork();
                self.lower_body(body, level + 1, &mut body_scope);
                self.line(level, "}");

                if scope.declare(&rc) {
                    self.line(level, &format!("local {}=0", rc));
                } else {
                    self.line(level, &format!("{}=0", rc));
                }
                self.line(level, &format!("{} || {}=$?", block, rc));

                if let Some((first, rest)) = catches.split_first() {
                    let var = to_shell_identifier(&first.var);
                    let mut catch_scope = scope.fork();
                    self.line(level, &format!("if [ \"${}\" -ne 0 ]; then", rc));
                    if catch_scope.declare(&var) {
                        self.line(level + 1, &format!("local {}=${}", var, rc));
                    } else {
                        self.line(level + 1, &format!("{}=${}", var, rc));
                    }
                    self.lower_block(&first.body, level + 1, &mut catch_scope);
                    self.line(level, "fi");
                    scope.merge(catch_scope);
                    for extra in rest {
                        self.unsupported(level, extra.span);
                    }
                }

                if let Some(finally) = finally {
                    self.lower_block(finally, level, scope);
                }
            }
        }
    }

    /// Returns false when the expression has no statement form.
    fn lower_expr_stmt(&mut self, expr: &Expr, level: usize, scope: &mut Scope) -> bool {
        if let ExprKind::Assign { targets, value } = &expr.node {
            return self.lower_assignment(targets, value, level, scope);
        }
        match try_call(expr) {
            Some(call) => {
                self.line(level, &render_call_command(&call));
                true
            }
            None => false,
        }
    }

    fn lower_assignment(&mut self, targets: &[String], value: &Expr, level: usize, scope: &mut Scope) -> bool {
        match targets {
            [target] => self.lower_single_assignment(&to_shell_identifier(target), value, level, scope),
            [first, second] => {
                let Some(rendered) = render_value(value) else {
                    return false;
                };
                let first = to_shell_identifier(first);
                let second = to_shell_identifier(second);
                self.declare_local(level, scope, &first);
                self.declare_local(level, scope, &second);
                self.line(level, &format!("{}=0", second));
                self.line(level, &format!("{}={} || {}=$?", first, rendered.operand(), second));
                true
            }
            _ => false,
        }
    }

    fn lower_single_assignment(&mut self, name: &str, value: &Expr, level: usize, scope: &mut Scope) -> bool {
        match render_value(value) {
            Some(Value::EmptyMap) => {
                if !scope.is_function() {
                    self.line(level, &format!("declare -A {}=()", name));
                } else if scope.declare(name) {
                    self.line(level, &format!("local -A {}=()", name));
                } else {
                    self.line(level, &format!("{}=()", name));
                }
                true
            }
            Some(Value::StructField { receiver, key }) => {
                // Written through printf -v so trailing newlines survive.
                self.declare_local(level, scope, name);
                self.line(
                    level,
                    &format!("__gnash_struct_get_into {} \"${{{}:-}}\" {}", name, receiver, key),
                );
                true
            }
            Some(rendered) => {
                self.assign(level, scope, name, &rendered.operand());
                true
            }
            None => {
                // Boolean-valued expression: only its test form is known.
                let Some(cond) = render_condition(value) else {
                    return false;
                };
                self.assign(level, scope, name, "\"\"");
                self.line(level, &format!("if {}; then", cond.text()));
                self.assign(level + 1, scope, name, "\"true\"");
                self.line(level, "fi");
                true
            }
        }
    }

    fn declare_local(&mut self, level: usize, scope: &mut Scope, name: &str) {
        if scope.declare(name) {
            self.line(level, &format!("local {}", name));
        }
    }

    fn assign(&mut self, level: usize, scope: &mut Scope, name: &str, value: &str) {
        self.declare_local(level, scope, name);
        self.line(level, &format!("{}={}", name, value));
    }

    fn lower_if(&mut self, stmt: &IfStmt, level: usize, scope: &mut Scope) {
        let base = scope.fork();
        let mut current = stmt;
        let mut keyword = "if";
        loop {
            match render_condition(&current.cond) {
                Some(cond) => self.line(level, &format!("{} {}; then", keyword, cond.text())),
                None => {
                    let snippet = self.snippet(current.cond.span);
                    tracing::warn!(condition = %snippet, "condition replaced by placeholder");
                    self.line(level, &format!("{} :; then", keyword));
                    self.line(level + 1, &format!("# TODO condition: {}", snippet));
                }
            }
            let mut branch = base.fork();
            self.lower_body(&current.then_body, level + 1, &mut branch);
            scope.merge(branch);

            match &current.else_branch {
                Some(ElseBranch::If(next)) => {
                    current = next;
                    keyword = "elif";
                }
                Some(ElseBranch::Else(body)) => {
                    self.line(level, "else");
                    let mut branch = base.fork();
                    self.lower_body(body, level + 1, &mut branch);
                    scope.merge(branch);
                    break;
                }
                None => break,
            }
        }
        self.line(level, "fi");
    }

    fn lower_for(&mut self, span: Span, var: &str, iterable: &Expr, body: &[Stmt], level: usize, scope: &mut Scope) {
        let Some(items) = render_value(iterable).filter(Value::is_iterable) else {
            self.unsupported(level, span);
            return;
        };
        let array = self.next_temp("__gnash_items");
        if scope.is_function() {
            self.line(level, &format!("local -a {}=()", array));
        } else {
            self.line(level, &format!("{}=()", array));
        }
        self.line(level, &format!("__gnash_list_to_array \"{}\" {}", array, items.operand()));

        let var = to_shell_identifier(var);
        self.declare_local(level, scope, &var);
        self.line(level, &format!("for {} in \"${{{}[@]}}\"; do", var, array));
        let mut body_scope = scope.fork();
        self.lower_body(body, level + 1, &mut body_scope);
        scope.merge(body_scope);
        self.line(level, "done");
    }

    /// Stores a string result, copies it to the caller's output variable if one was named, then returns `code`.
    fn string_result(&mut self, level: usize, value: &str, code: i32) {
        self.line(level, &format!("{}={}", RETURN_VAR, value));
        self.line(level, &format!("if [[ -n ${{{}:-}} ]]; then", OUT_PARAM));
        self.line(
            level + 1,
            &format!("printf -v \"${{{}}}\" '%s' \"${{{}}}\"", OUT_PARAM, RETURN_VAR),
        );
        self.line(level, "fi");
        self.line(level, &format!("return {}", code));
    }
}

/// A bare integer or `$?` is a status code rather than a string result.
fn is_exit_code(value: &str) -> bool {
    if value == "$?" {
        return true;
    }
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
