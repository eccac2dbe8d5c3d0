use anyhow::Result;
use clap::Parser;
use std::process;
use steam_debloat_lib::commands;
use steam_debloat_lib::modules::common::logging;

#[derive(Parser, Debug)]
#[command(name = "steam-debloat")]
#[command(about = "Steam 客户端降级与精简工具", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// 详细输出模式
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.verbose);

    let verbose = cli.verbose;
    if let Err(e) = commands::execute(cli.command).await {
        if verbose {
            tracing::error!("错误: {:#}", e);
        } else {
            eprintln!("错误: {:#}", e);
        }
        process::exit(1);
    }

    Ok(())
}
