mod application;
mod cli;
mod data;
mod domain;
mod error;
mod infra;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use error::NdaError;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nda_docgen=info".parse()?),
        )
        .init();

    let cli    = Cli::parse();
    let result = cli.run();
    if let Err(e) = &result {
        if e.downcast_ref::<NdaError>().is_some_and(NdaError::is_retryable) {
            tracing::warn!("Storage failure; the command can be retried");
        }
    }
    result
}
