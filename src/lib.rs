//! Compiler from Gnash source to self-contained bash scripts.
//!
//! The pipeline is lex, parse, collect, lower, assemble. Lowering never
//! fails: anything without a translation becomes a `# TODO` comment in the
//! output so the rest of the script still runs.

pub mod ast;
pub mod codegen;
pub mod collect;
pub mod driver;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod literal;
pub mod lower;
pub mod names;
pub mod parser;
pub mod render;
pub mod span;

pub use driver::{compile_file, compile_source};
pub use error::DriverError;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs a stderr `tracing` subscriber when `RUST_LOG` is set. Safe to call
/// more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .with(EnvFilter::from_default_env())
            .init();
    });
}
