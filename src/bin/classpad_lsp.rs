//! ClassPad Language Server
//!
//! Run with: classpad-lsp
//!
//! Speaks LSP over stdin/stdout. Logs go to stderr, filtered by
//! `--log-level` or `CLASSPAD_LOG`.

use clap::Parser;
use classpad_lsp::cli::LspArgs;
use classpad_lsp::lsp::run_lsp_server;

#[derive(Parser, Debug)]
#[command(name = "classpad-lsp")]
#[command(version)]
#[command(about = "Language server for ClassPad Basic programs")]
struct Args {
    #[command(flatten)]
    lsp: LspArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    run_lsp_server(args.lsp.into_config()).await?;
    Ok(())
}
