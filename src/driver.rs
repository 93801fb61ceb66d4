use crate::codegen::{self, CodegenOptions};
use crate::error::DriverError;
use crate::lexer::lex;
use crate::parser::parse;
use crate::span::SourceMap;
use std::fs;
use std::path::Path;

/// Compiles Gnash source text to a bash script. `source_name` appears in
/// diagnostics and in the generated provenance comment.
pub fn compile_source(src: &str, source_name: &str) -> Result<String, DriverError> {
    tracing::debug!(source = source_name, bytes = src.len(), "compiling");
    let sm = SourceMap::new(src.to_string());
    let tokens = lex(&sm, source_name).map_err(|d| DriverError::Syntax(d.format()))?;
    tracing::debug!(tokens = tokens.len(), "lexed");
    let unit = parse(&tokens, &sm, source_name).map_err(|d| DriverError::Syntax(d.format()))?;
    tracing::debug!(items = unit.items.len(), "parsed");
    let opts = CodegenOptions {
        source_name: source_name.to_string(),
        ..CodegenOptions::default()
    };
    Ok(codegen::generate(&unit, &sm, &opts))
}

/// Reads `input`, compiles it, and writes the script to `output`, creating
/// missing parent directories.
pub fn compile_file(input: &Path, output: &Path) -> Result<(), DriverError> {
    let src = fs::read_to_string(input).map_err(|source| DriverError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let source_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());

    let script = compile_source(&src, &source_name)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| DriverError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(output, &script).map_err(|source| DriverError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    tracing::info!(input = %input.display(), output = %output.display(), bytes = script.len(), "wrote script");
    Ok(())
}
