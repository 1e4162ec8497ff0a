//! tilerc binary entry point

use clap::Parser;
use tilerc::{
    cli::{run_cli, TileRcCli},
    logging::{init_logging, LogConfig},
    Result, TileRcError,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = TileRcCli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose().with_env()
    } else {
        LogConfig::from_env()
    };
    init_logging(&log_config).map_err(|e| {
        TileRcError::ConfigurationError(format!("Failed to initialize logging: {}", e))
    })?;

    let json = cli.json;
    if let Err(e) = run_cli(cli).await {
        if !json {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
    Ok(())
}
