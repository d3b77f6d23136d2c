use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;

use qboxctl::cli::ControlCommand;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let code = ControlCommand::parse().run().await?;
    // statuses that do not fit an exit code are reported as 1
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
