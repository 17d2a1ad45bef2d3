//! `scan` (single image) and `watch` (snapshot directory) commands.

use std::time::Duration;

use qrseal_core::capture::{ScanEvent, SnapshotDirCamera, SystemClock};

use crate::app::AppContext;
use crate::cli::{ScanArgs, WatchArgs};
use crate::errors::CliError;
use crate::ui::prompt::print_cancelled;
use crate::ui::{notice, AttemptBar, Badge};

pub fn handle_scan(ctx: &AppContext, args: &ScanArgs) -> anyhow::Result<()> {
    if !args.image.exists() {
        return Err(CliError::not_found(
            format!("Image not found: {}", args.image.display()),
            "Check the path and try again.",
        )
        .into());
    }

    let mut workflow = ctx.workflow()?;
    let plaintext = workflow.open_upload(&args.image)?;
    println!("{}", plaintext);
    Ok(())
}

pub fn handle_watch(ctx: &AppContext, args: &WatchArgs) -> anyhow::Result<()> {
    let ui = ctx.ui();
    let mut settings = ctx.settings()?;
    match args.attempts {
        Some(0) => return Err(CliError::invalid_input("--attempts must be at least 1").into()),
        Some(attempts) => settings.scan.max_attempts = attempts,
        None if settings.scan.max_attempts == 0 => {
            return Err(CliError::invalid_input(
                "`[scan] attempts` in the config file must be at least 1",
            )
            .into())
        }
        None => {}
    }
    if let Some(delay_ms) = args.delay_ms {
        settings.scan.delay = Duration::from_millis(delay_ms);
    }
    if let Some(timeout) = args.timeout_secs {
        settings.scan.deadline = Some(Duration::from_secs(timeout));
    }

    let mut workflow = ctx.workflow_with(settings)?;
    let mut scanner = workflow.scanner(SystemClock);
    let mut camera = SnapshotDirCamera::new(&args.dir);

    notice(
        ui,
        Badge::Info,
        &format!("Watching {} for a QR code", args.dir.display()),
        Some("Save a photo or screenshot of the code into that directory."),
    );
    let bar = AttemptBar::new(ui, settings.scan.max_attempts, "Scanning");
    let result = workflow.open_live(&mut scanner, &mut camera, &mut |event: &ScanEvent| match event {
        ScanEvent::Attempt { attempt, .. } => bar.attempt(*attempt),
        ScanEvent::FrameNotReady { .. } => bar.set_message("Waiting for a snapshot"),
        ScanEvent::NoSymbol { .. } => bar.set_message("No QR code yet"),
        ScanEvent::State(state) => tracing::trace!(?state, "scanner state"),
    });
    bar.finish();

    match result? {
        Some(plaintext) => println!("{}", plaintext),
        None => print_cancelled(ui, "Scan"),
    }
    Ok(())
}
