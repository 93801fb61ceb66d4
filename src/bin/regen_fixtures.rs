//! Rewrites every `tests/fixtures/*.sh.expected` from its `.gnash` source.
use std::fs;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut files: Vec<PathBuf> = fs::read_dir("tests/fixtures")?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "gnash"))
        .collect();
    files.sort();

    for path in files {
        println!("Processing {}", path.display());
        let src = fs::read_to_string(&path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match gnashc::compile_source(&src, &name) {
            Ok(script) => fs::write(path.with_extension("sh.expected"), script)?,
            Err(e) => println!("Skipping {}:\n{}", path.display(), e),
        }
    }
    Ok(())
}
