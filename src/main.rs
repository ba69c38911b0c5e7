use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;

use regwizard_lib::bootstrap::{init_tracing_subscriber, resolve_config, wire_wizard};
use regwizard_lib::terminal::{run_dialog, ConsoleView, TerminalDialogHost};
use rw_core::DialogId;

#[derive(Parser)]
#[command(name = "regwizard")]
#[command(about = "Register a new account step by step", long_about = None)]
struct Cli {
    /// Path of the TOML config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Registration server, overrides `api.base_url`
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing_subscriber()?;

    let config = resolve_config(cli.config, cli.base_url)?;
    let host = Arc::new(TerminalDialogHost::new(config.password_form.clone()));
    let view = Arc::new(ConsoleView::new(std::io::stdout()));
    let wizard = wire_wizard(&config, view, host.clone())?;

    let dialog_id = DialogId::new();
    let input = BufReader::new(tokio::io::stdin());
    run_dialog(&wizard, &host, &dialog_id, input, std::io::stdout()).await
}
