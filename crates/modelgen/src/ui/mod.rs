pub mod cli;
pub mod commands;

use std::sync::Arc;

use modelgen::diagnostics::{self, TracingDiagnostics};
use tracing_subscriber::EnvFilter;

pub use cli::{Cli, Commands, GenerateCommand};

/// Routes pipeline diagnostics to stderr when `verbose` is set. `RUST_LOG` overrides the level.
pub fn init_logging(verbose: bool) {
  if !verbose {
    return;
  }
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("modelgen=debug"));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
  diagnostics::install(Arc::new(TracingDiagnostics));
}
