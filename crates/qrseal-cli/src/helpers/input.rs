//! Reading command input from arguments, stdin, or a prompt.

use std::io::{self, IsTerminal, Read};

use qrseal_core::keys::Confirmation;

use crate::errors::CliError;
use crate::ui::prompt::{prompt_confirm, prompt_input};
use crate::ui::UiContext;

/// Resolve command input: the argument if given, else piped stdin, else a prompt.
///
/// A single trailing line break from stdin is dropped; other whitespace is kept.
pub fn read_text_input(
    ctx: &UiContext,
    value: Option<String>,
    label: &str,
    no_input: bool,
) -> anyhow::Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }

    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        return Ok(strip_line_break(&buffer).to_string());
    }

    if no_input {
        return Err(CliError::needs_input(
            format!("No {} provided", label),
            format!("Pass the {} as an argument or pipe it via stdin.", label),
        )
        .into());
    }

    prompt_input(ctx, &capitalize(label))
}

/// Ask before an irreversible key operation.
///
/// `--yes` skips the prompt. Without it, `--no-input` or a missing TTY is an
/// error rather than an implicit yes.
pub fn confirm_destructive(
    ctx: &UiContext,
    yes: bool,
    no_input: bool,
    prompt: &str,
) -> anyhow::Result<Confirmation> {
    if yes {
        return Ok(Confirmation::Confirmed);
    }
    if no_input || !ctx.is_interactive() {
        return Err(CliError::needs_input(
            "Confirmation required for this destructive action",
            "Re-run with --yes to confirm.",
        )
        .into());
    }
    Ok(prompt_confirm(ctx, prompt, false)?.into())
}

fn strip_line_break(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
