#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
use clap::Parser;

use crate::ui::{Cli, Commands};

mod ui;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  match cli.command {
    Commands::Generate(command) => {
      let config = ui::commands::GenerateConfig::from_command(command)?;
      ui::init_logging(config.verbose);
      ui::commands::generate_code(config).await?;
    }
    Commands::Inspect { input } => ui::commands::inspect_models(&input).await?,
  }

  Ok(())
}
