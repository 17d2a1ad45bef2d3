//! Qrseal CLI - seal short messages with RSA and carry them as QR codes
//!
//! This is the command-line interface for Qrseal. It provides a user-friendly
//! interface to the core library functionality.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod ui;

use clap::Parser;
use qrseal_core::VERSION;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{decrypt, encrypt, init, keys, misc, scan};
use crate::errors::classify;
use crate::ui::print_error;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let (code, hint) = classify(&e);
        tracing::debug!(error = ?e, code, "command failed");
        print_error(ctx.ui(), &format!("{:#}", e), hint.as_deref());
        std::process::exit(code);
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init) => {
            init::handle_init(ctx)?;
        }
        Some(Commands::Keys(args)) => {
            keys::handle_keys(ctx, args)?;
        }
        Some(Commands::Encrypt(args)) => {
            encrypt::handle_encrypt(ctx, args)?;
        }
        Some(Commands::Decrypt(args)) => {
            decrypt::handle_decrypt(ctx, args)?;
        }
        Some(Commands::Scan(args)) => {
            scan::handle_scan(ctx, args)?;
        }
        Some(Commands::Watch(args)) => {
            scan::handle_watch(ctx, args)?;
        }
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        None => {
            println!("Qrseal v{}", VERSION);
            println!("\nQuickstart:");
            println!("  qrseal init");
            println!("  qrseal encrypt \"meet at noon\" --out message.png");
            println!("  qrseal scan message.png");
            println!("  qrseal watch ~/Pictures/Screenshots");
            println!("\nRun `qrseal --help` for full usage.");
        }
    }

    Ok(())
}
