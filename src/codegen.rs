mod runtime;
pub use runtime::{DISPATCH_STUBS, RUNTIME_LIBRARY};

use crate::ast::CompilationUnit;
use crate::collect::collect;
use crate::lower::Lowerer;
use crate::span::SourceMap;

#[derive(Clone, Debug)]
pub struct CodegenOptions {
    /// File name quoted in the provenance comment.
    pub source_name: String,
    /// Maximum length of source snippets in placeholder comments.
    pub snippet_width: usize,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            source_name: "main.gnash".to_string(),
            snippet_width: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptMode {
    /// Has `main`: full preamble, runtime, and a trailing `main` invocation.
    Runnable,
    /// No `main`: definitions only, meant to be sourced.
    Library,
}

/// Lowers a whole compilation unit into script text. Never fails; constructs
/// without a lowering come out as `# TODO` comments.
pub fn generate(unit: &CompilationUnit, sm: &SourceMap, opts: &CodegenOptions) -> String {
    let meta = collect(unit);
    let mode = if meta.has_main() {
        ScriptMode::Runnable
    } else {
        ScriptMode::Library
    };
    tracing::debug!(?mode, source = %opts.source_name, "assembling script");

    let mut lowerer = Lowerer::new(sm, opts.snippet_width);
    match mode {
        ScriptMode::Runnable => lowerer.push_raw(&prelude(&opts.source_name)),
        ScriptMode::Library => lowerer.push_raw(&format!(
            "# Library generated from Gnash source {} - requires runtime helpers to be sourced from a runnable script.\n\n",
            opts.source_name
        )),
    }

    for global in &meta.globals {
        lowerer.lower_global(global);
    }
    if !meta.globals.is_empty() {
        lowerer.push_raw("\n");
    }

    for func in &meta.functions {
        lowerer.lower_function(func);
    }

    if mode == ScriptMode::Runnable {
        lowerer.push_raw("gnash_fn_main \"\" \"$@\"\n");
    }
    lowerer.finish()
}

fn prelude(source_name: &str) -> String {
    let mut s = String::new();
    s.push_str("#!/usr/bin/env bash\n");
    s.push_str(&format!("# Generated from Gnash source {} - DO NOT EDIT.\n", source_name));
    s.push_str("set -euo pipefail\n");
    s.push_str("set -E\n");
    s.push_str("IFS=$'\\n\\t'\n");
    s.push('\n');
    s.push_str(RUNTIME_LIBRARY);
    s.push('\n');
    s.push_str("__gnash_list_init\n");
    s.push('\n');
    s.push_str(DISPATCH_STUBS);
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::parse;

    fn gen_src(src: &str) -> String {
        let sm = SourceMap::new(src.to_string());
        let tokens = lex(&sm, "demo.gnash").expect("lex failed");
        let unit = parse(&tokens, &sm, "demo.gnash").expect("parse failed");
        let opts = CodegenOptions {
            source_name: "demo.gnash".to_string(),
            ..CodegenOptions::default()
        };
        generate(&unit, &sm, &opts)
    }

    #[test]
    fn runnable_prelude_order() {
        let out = gen_src("fn main() {}");
        let header = "#!/usr/bin/env bash\n# Generated from Gnash source demo.gnash - DO NOT EDIT.\nset -euo pipefail\nset -E\nIFS=$'\\n\\t'\n\n__gnash_die() {\n";
        assert!(out.starts_with(header), "unexpected header:\n{}", out);
        let init = out.find("\n__gnash_list_init\n").expect("list init");
        let stubs = out.find("if ! command -v __gnash_invoke").expect("stubs");
        let main = out.find("gnash_fn_main() {").expect("main");
        assert!(init < stubs && stubs < main);
        assert!(out.ends_with("}\n\ngnash_fn_main \"\" \"$@\"\n"));
    }

    #[test]
    fn library_mode_has_no_preamble() {
        let out = gen_src("fn helper() { return 0 }");
        assert!(out.starts_with("# Library generated from Gnash source demo.gnash"));
        assert!(!out.contains("set -euo pipefail"));
        assert!(!out.contains("__gnash_die()"));
        assert!(!out.contains("gnash_fn_main"));
    }

    #[test]
    fn globals_precede_functions() {
        let out = gen_src("fn helper() {}\nversion = \"1\"\n");
        let global = out.find("version=\"1\"\n\n").expect("global");
        let func = out.find("gnash_fn_helper() {").expect("function");
        assert!(global < func);
    }
}
