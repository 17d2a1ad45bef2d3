use qrseal_core::keys::InitOutcome;
use qrseal_core::QrsealError;

use crate::app::{resolve_config_path, AppContext};
use crate::config::{write_config, QrsealConfig};
use crate::ui::{blank_line, header, print, receipt, Spinner};

/// Load the key pair, generating and saving one on first run, then print the
/// public key.
pub fn handle_init(ctx: &AppContext) -> anyhow::Result<()> {
    let ui = ctx.ui();
    let key_dir = ctx.key_dir()?;
    let mut keys = ctx.key_manager()?;

    if ui.mode.is_pretty() {
        print(ui, &header(ui, "init", None));
    }

    let spinner = Spinner::new(ui, "Preparing key pair");
    spinner.start();
    let outcome = keys.initialize();
    spinner.clear();
    let outcome = outcome?;

    let config_path = resolve_config_path()?;
    let wrote_config = if config_path.exists() {
        false
    } else {
        write_config(&config_path, &QrsealConfig::new(key_dir.clone()))?;
        tracing::info!(path = %config_path.display(), "wrote default config");
        true
    };

    let pair = keys.pair().ok_or(QrsealError::NoKeyAvailable)?;
    let title = match outcome {
        InitOutcome::Loaded => "Loaded existing key pair",
        InitOutcome::Generated => "Generated new key pair",
    };
    let key_dir_display = key_dir.display().to_string();
    let fingerprint = pair.fingerprint();
    let config_display = config_path.display().to_string();
    let mut items = vec![
        ("Key dir", key_dir_display.as_str()),
        ("Fingerprint", fingerprint.as_str()),
    ];
    if wrote_config {
        items.push(("Config", config_display.as_str()));
    }

    if ui.mode.is_pretty() {
        print(ui, &receipt(ui, title, &items));
        blank_line(ui);
    }
    print!("{}", pair.public_pem());
    Ok(())
}
