use qrseal_core::keys::KeyOrigin;
use qrseal_core::qr::{render_terminal, save_png};

use crate::app::AppContext;
use crate::cli::EncryptArgs;
use crate::helpers::read_text_input;
use crate::ui::{blank_line, header, notice, print, Badge};

pub fn handle_encrypt(ctx: &AppContext, args: &EncryptArgs) -> anyhow::Result<()> {
    let ui = ctx.ui();
    let message = read_text_input(ui, args.message.clone(), "message", ctx.no_input())?;

    let mut settings = ctx.settings()?;
    if let Some(size) = args.size {
        settings.qr_size = size;
    }
    let mut workflow = ctx.workflow_with(settings)?;
    let sealed = workflow.seal(&message, None)?;

    if sealed.key_origin == KeyOrigin::AutoGenerated {
        let key_dir = workflow.keys().store().dir().display().to_string();
        notice(
            ui,
            Badge::Warn,
            &format!("No key pair was loaded; generated a new one in {}", key_dir),
            Some("Share `qrseal keys show` output with senders, and back up with `qrseal keys export`."),
        );
    }

    if let Some(path) = &args.out {
        save_png(&sealed.qr, path)?;
        notice(
            ui,
            Badge::Ok,
            &format!("Saved QR code to {}", path.display()),
            None,
        );
    }

    if ui.mode.is_pretty() && !args.no_qr && !ui.quiet {
        print(ui, &header(ui, "encrypt", None));
        blank_line(ui);
        print(ui, &render_terminal(sealed.payload.as_str())?);
        blank_line(ui);
    }

    println!("{}", sealed.payload);
    Ok(())
}
