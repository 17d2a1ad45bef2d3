//! Interactive prompts.

use std::io::IsTerminal;

use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use super::context::UiContext;
use super::render::badge;
use super::theme::Badge;

/// Prompt for text input with styled formatting.
pub fn prompt_input(_ctx: &UiContext, prompt: &str) -> anyhow::Result<String> {
    if !std::io::stdin().is_terminal() {
        return Err(anyhow::anyhow!(
            "Interactive input required. Use arguments or run on a TTY."
        ));
    }

    let theme = ColorfulTheme::default();
    let result = Input::<String>::with_theme(&theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;

    Ok(result)
}

/// Prompt for confirmation.
pub fn prompt_confirm(_ctx: &UiContext, prompt: &str, default: bool) -> anyhow::Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Err(anyhow::anyhow!(
            "Interactive confirmation required. Use --yes or run on a TTY."
        ));
    }

    let theme = ColorfulTheme::default();
    let result = Confirm::with_theme(&theme)
        .with_prompt(prompt)
        .default(default)
        .interact()?;

    Ok(result)
}

/// Print a cancellation message.
pub fn print_cancelled(ctx: &UiContext, action: &str) {
    if ctx.quiet {
        return;
    }
    if ctx.mode.is_pretty() {
        println!("{}", badge(ctx, Badge::Warn, &format!("{} cancelled", action)));
    } else {
        println!("status=cancelled");
    }
}
