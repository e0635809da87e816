use clap::Parser;
use vehicle_console_app_lib::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vehicle_console_app_lib::run(Cli::parse()).await
}
