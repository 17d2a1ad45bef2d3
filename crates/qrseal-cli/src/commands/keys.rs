use std::path::PathBuf;

use qrseal_core::fs::write_atomic;
use qrseal_core::keys::{ClearOutcome, Confirmation, FileKeyStore, KeyManager, KeyPair};
use qrseal_core::QrsealError;

use crate::app::AppContext;
use crate::cli::{ConfirmArgs, KeysArgs, KeysExportArgs, KeysImportArgs, KeysShowArgs, KeysSubcommand};
use crate::constants::DEFAULT_EXPORT_FILE;
use crate::errors::CliError;
use crate::helpers::confirm_destructive;
use crate::ui::prompt::print_cancelled;
use crate::ui::{blank_line, header, notice, print, property_table, receipt, Badge, Spinner};

pub fn handle_keys(ctx: &AppContext, args: &KeysArgs) -> anyhow::Result<()> {
    match &args.command {
        KeysSubcommand::Show(show_args) => handle_show(ctx, show_args),
        KeysSubcommand::Generate(confirm_args) => handle_generate(ctx, confirm_args),
        KeysSubcommand::Clear(confirm_args) => handle_clear(ctx, confirm_args),
        KeysSubcommand::Export(export_args) => handle_export(ctx, export_args),
        KeysSubcommand::Import(import_args) => handle_import(ctx, import_args),
    }
}

/// Key manager with the persisted pair loaded, or a not-found error.
fn loaded_keys(ctx: &AppContext) -> anyhow::Result<KeyManager<FileKeyStore>> {
    let mut keys = ctx.key_manager()?;
    if !keys.load()? {
        return Err(CliError::not_found(
            format!("No key pair found in {}", keys.store().dir().display()),
            "Run `qrseal init` or `qrseal keys import <file>`.",
        )
        .into());
    }
    Ok(keys)
}

/// What the key directory holds before a command replaces or erases it.
enum StoredPair {
    Missing,
    Loaded { fingerprint: String },
    /// Slot files exist but do not form a usable pair
    Unreadable { reason: String },
}

/// Inspect the key directory without failing on broken slot files, so the
/// commands that overwrite or erase them still work.
fn stored_pair(keys: &mut KeyManager<FileKeyStore>) -> anyhow::Result<StoredPair> {
    match keys.load() {
        Ok(true) => Ok(StoredPair::Loaded {
            fingerprint: current_pair(keys)?.fingerprint(),
        }),
        Ok(false) => {
            let store = keys.store();
            if store.public_path().exists() || store.private_path().exists() {
                Ok(StoredPair::Unreadable {
                    reason: "only one of the two key files is present".to_string(),
                })
            } else {
                Ok(StoredPair::Missing)
            }
        }
        Err(QrsealError::InvalidKey(reason)) => {
            tracing::debug!(%reason, "stored key pair is unreadable");
            Ok(StoredPair::Unreadable { reason })
        }
        Err(err) => Err(err.into()),
    }
}

fn warn_unreadable(ctx: &AppContext, keys: &KeyManager<FileKeyStore>, reason: &str) {
    notice(
        ctx.ui(),
        Badge::Warn,
        &format!(
            "The key files in {} are unreadable ({})",
            keys.store().dir().display(),
            reason
        ),
        None,
    );
}

fn current_pair<'k>(keys: &'k KeyManager<FileKeyStore>) -> anyhow::Result<&'k KeyPair> {
    Ok(keys.pair().ok_or(QrsealError::NoKeyAvailable)?)
}

fn handle_show(ctx: &AppContext, args: &KeysShowArgs) -> anyhow::Result<()> {
    let ui = ctx.ui();
    let keys = loaded_keys(ctx)?;
    let pair = current_pair(&keys)?;

    if ui.mode.is_pretty() {
        print(ui, &header(ui, "keys show", None));
        let store = keys.store();
        print(
            ui,
            &property_table(
                ui,
                &[
                    ("Fingerprint", pair.fingerprint()),
                    ("Public key", store.public_path().display().to_string()),
                    ("Private key", store.private_path().display().to_string()),
                ],
            ),
        );
        blank_line(ui);
    }

    print!("{}", pair.public_pem());
    if args.private {
        notice(
            ui,
            Badge::Warn,
            "Printing the private key. Anyone holding it can read your messages.",
            None,
        );
        print!("{}", pair.private_pem());
    }
    Ok(())
}

fn handle_generate(ctx: &AppContext, args: &ConfirmArgs) -> anyhow::Result<()> {
    let ui = ctx.ui();
    let mut keys = ctx.key_manager()?;

    let prompt = match stored_pair(&mut keys)? {
        StoredPair::Missing => None,
        StoredPair::Loaded { .. } => {
            Some("Replace the current key pair? Messages sealed for it can no longer be opened")
        }
        StoredPair::Unreadable { reason } => {
            warn_unreadable(ctx, &keys, &reason);
            Some("Overwrite the unreadable key files with a new key pair?")
        }
    };
    if let Some(prompt) = prompt {
        let confirmation = confirm_destructive(ui, args.yes, ctx.no_input(), prompt)?;
        if confirmation == Confirmation::Declined {
            print_cancelled(ui, "Key generation");
            return Ok(());
        }
    }

    let spinner = Spinner::new(ui, "Generating RSA key pair");
    spinner.start();
    let generated = keys.generate().map(|pair| pair.fingerprint());
    spinner.clear();
    let fingerprint = generated?;

    let key_dir = keys.store().dir().display().to_string();
    print(
        ui,
        &receipt(
            ui,
            "Generated new key pair",
            &[("Key dir", key_dir.as_str()), ("Fingerprint", fingerprint.as_str())],
        ),
    );
    Ok(())
}

fn handle_clear(ctx: &AppContext, args: &ConfirmArgs) -> anyhow::Result<()> {
    let ui = ctx.ui();
    let mut keys = ctx.key_manager()?;

    let prompt = match stored_pair(&mut keys)? {
        StoredPair::Missing => {
            notice(ui, Badge::Info, "No key pair to clear", None);
            return Ok(());
        }
        StoredPair::Loaded { .. } => "Erase the key pair? This cannot be undone",
        StoredPair::Unreadable { reason } => {
            warn_unreadable(ctx, &keys, &reason);
            "Erase the unreadable key files? This cannot be undone"
        }
    };

    let confirmation = confirm_destructive(ui, args.yes, ctx.no_input(), prompt)?;
    match keys.clear(confirmation)? {
        ClearOutcome::Cleared => {
            let key_dir = keys.store().dir().display().to_string();
            print(
                ui,
                &receipt(ui, "Cleared key pair", &[("Key dir", key_dir.as_str())]),
            );
        }
        ClearOutcome::Declined => print_cancelled(ui, "Clear"),
    }
    Ok(())
}

fn handle_export(ctx: &AppContext, args: &KeysExportArgs) -> anyhow::Result<()> {
    let ui = ctx.ui();
    let keys = loaded_keys(ctx)?;
    let path = args
        .path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));

    let text = keys.export_text()?;
    write_atomic(&path, text.as_bytes(), true).map_err(|e| {
        QrsealError::StorageUnavailable(format!("Failed to write {}: {}", path.display(), e))
    })?;

    let path_display = path.display().to_string();
    let fingerprint = current_pair(&keys)?.fingerprint();
    print(
        ui,
        &receipt(
            ui,
            "Exported key pair",
            &[("Path", path_display.as_str()), ("Fingerprint", fingerprint.as_str())],
        ),
    );
    notice(
        ui,
        Badge::Warn,
        "The export contains your private key. Store it somewhere safe.",
        None,
    );
    Ok(())
}

fn handle_import(ctx: &AppContext, args: &KeysImportArgs) -> anyhow::Result<()> {
    let ui = ctx.ui();
    if !args.path.exists() {
        return Err(CliError::not_found(
            format!("Key file not found: {}", args.path.display()),
            "Pass the file written by `qrseal keys export`.",
        )
        .into());
    }
    let text = std::fs::read_to_string(&args.path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", args.path.display(), e))?;

    let mut keys = ctx.key_manager()?;
    let previous = stored_pair(&mut keys)?;

    let fingerprint = keys.import(&text)?.fingerprint();
    match previous {
        StoredPair::Loaded { fingerprint: old } if old != fingerprint => notice(
            ui,
            Badge::Warn,
            "Replaced the previous key pair",
            Some("Messages sealed for the old public key can no longer be opened."),
        ),
        StoredPair::Unreadable { reason } => notice(
            ui,
            Badge::Warn,
            &format!("Replaced unreadable key files ({})", reason),
            None,
        ),
        _ => {}
    }

    let key_dir = keys.store().dir().display().to_string();
    print(
        ui,
        &receipt(
            ui,
            "Imported key pair",
            &[("Key dir", key_dir.as_str()), ("Fingerprint", fingerprint.as_str())],
        ),
    );
    Ok(())
}
