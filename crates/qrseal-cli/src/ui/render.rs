//! Rendering primitives for CLI output.
//!
//! Primary results (payloads, plaintext, PEM text) go to stdout unadorned so
//! they can be piped. Everything else goes through these helpers.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table as ComfyTable};

use super::context::UiContext;
use super::theme::{styled, styles, Badge};

/// Render a header line for a command.
///
/// Pretty mode: "Qrseal · command" with optional context in parentheses
/// Plain mode: "qrseal command"
pub fn header(ctx: &UiContext, command: &str, context: Option<&str>) -> String {
    if ctx.mode.is_pretty() {
        let title = styled("Qrseal", styles::bold(), ctx.color);
        match context {
            Some(c) => format!("{} \u{00B7} {} ({})", title, command, c),
            None => format!("{} \u{00B7} {}", title, command),
        }
    } else {
        format!("qrseal {}", command)
    }
}

/// Render a badge with optional message.
pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let badge_text = kind.display(ctx.unicode);
    let colored_badge = styled(badge_text, kind.style(), ctx.color);

    if message.is_empty() {
        colored_badge
    } else {
        format!("{} {}", colored_badge, message)
    }
}

/// Render a key-value pair.
///
/// Pretty mode: "Key: value" with dim key
/// Plain mode: "key=value"
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if ctx.mode.is_pretty() {
        let styled_key = styled(&format!("{}:", key), styles::dim(), ctx.color);
        format!("{} {}", styled_key, value)
    } else {
        format!("{}={}", key.to_lowercase().replace(' ', "_"), value)
    }
}

/// Render a hint line.
///
/// Pretty mode: "Hint: text" with dim styling
/// Plain mode: "hint=text"
pub fn hint(ctx: &UiContext, text: &str) -> String {
    if ctx.mode.is_pretty() {
        let label = styled("Hint:", styles::dim(), ctx.color);
        format!("{} {}", label, text)
    } else {
        format!("hint={}", text)
    }
}

/// Render a receipt (summary block after an action).
///
/// Pretty mode: Badge + indented key-value pairs
/// Plain mode: status=ok + key=value lines
pub fn receipt(ctx: &UiContext, title: &str, items: &[(&str, &str)]) -> String {
    let mut lines = Vec::new();

    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Ok, title));
        for (key, value) in items {
            lines.push(format!("  {}", kv(ctx, key, value)));
        }
    } else {
        lines.push("status=ok".to_string());
        for (key, value) in items {
            lines.push(kv(ctx, key, value));
        }
    }

    lines.join("\n")
}

/// Render a two-column property table.
///
/// Pretty mode: bordered table
/// Plain mode: key=value lines
pub fn property_table(ctx: &UiContext, rows: &[(&str, String)]) -> String {
    if ctx.mode.is_pretty() {
        let mut table = ComfyTable::new();
        if ctx.unicode {
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS);
        } else {
            table.load_preset(comfy_table::presets::ASCII_MARKDOWN);
        }
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_width(ctx.width.min(u16::MAX as usize) as u16);
        for (key, value) in rows {
            table.add_row(vec![key.to_string(), value.clone()]);
        }
        table.to_string()
    } else {
        rows.iter()
            .map(|(key, value)| kv(ctx, key, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Print a receipt or informational line to stdout, unless quiet.
pub fn print(ctx: &UiContext, message: &str) {
    if !ctx.quiet {
        println!("{}", message);
    }
}

/// Print an empty line (only in pretty mode).
pub fn blank_line(ctx: &UiContext) {
    if ctx.mode.is_pretty() && !ctx.quiet {
        println!();
    }
}

/// Print a badge notice to stderr, unless quiet.
///
/// Used for notices that must not mix with piped stdout results.
pub fn notice(ctx: &UiContext, kind: Badge, message: &str, notice_hint: Option<&str>) {
    if ctx.quiet {
        return;
    }
    eprintln!("{}", badge(ctx, kind, message));
    if let Some(h) = notice_hint {
        eprintln!("{}", hint(ctx, h));
    }
}

/// Format an error message with optional hint.
///
/// Pretty mode: "[ERR] message" with optional "Hint: ..." on next line
/// Plain mode: "error=message" with optional "hint=suggestion"
pub fn error_message(ctx: &UiContext, message: &str, error_hint: Option<&str>) -> String {
    let mut lines = Vec::new();

    if ctx.mode.is_pretty() {
        lines.push(badge(ctx, Badge::Err, message));
        if let Some(h) = error_hint {
            lines.push(hint(ctx, h));
        }
    } else {
        lines.push(format!("error={}", message));
        if let Some(h) = error_hint {
            lines.push(format!("hint={}", h));
        }
    }

    lines.join("\n")
}

/// Print an error message to stderr with optional hint.
pub fn print_error(ctx: &UiContext, message: &str, error_hint: Option<&str>) {
    eprintln!("{}", error_message(ctx, message, error_hint));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::mode::OutputMode;

    fn plain_ctx() -> UiContext {
        UiContext {
            is_tty: false,
            stderr_tty: false,
            color: false,
            unicode: false,
            width: 80,
            mode: OutputMode::Plain,
            quiet: false,
        }
    }

    fn pretty_ctx() -> UiContext {
        UiContext {
            is_tty: true,
            stderr_tty: true,
            color: false,
            unicode: true,
            width: 80,
            mode: OutputMode::Pretty,
            quiet: false,
        }
    }

    #[test]
    fn test_header_pretty() {
        let h = header(&pretty_ctx(), "encrypt", Some("auto key"));
        assert!(h.contains("Qrseal"));
        assert!(h.contains("encrypt (auto key)"));
    }

    #[test]
    fn test_header_plain() {
        assert_eq!(header(&plain_ctx(), "scan", None), "qrseal scan");
    }

    #[test]
    fn test_kv_plain_normalizes_key() {
        assert_eq!(kv(&plain_ctx(), "Key dir", "/k"), "key_dir=/k");
    }

    #[test]
    fn test_kv_pretty() {
        assert_eq!(kv(&pretty_ctx(), "Key dir", "/k"), "Key dir: /k");
    }

    #[test]
    fn test_receipt_plain() {
        let out = receipt(&plain_ctx(), "Saved", &[("Path", "/tmp/a.png")]);
        assert_eq!(out, "status=ok\npath=/tmp/a.png");
    }

    #[test]
    fn test_receipt_pretty() {
        let out = receipt(&pretty_ctx(), "Saved", &[("Path", "/tmp/a.png")]);
        assert!(out.starts_with("[\u{2713}] Saved"));
        assert!(out.contains("  Path: /tmp/a.png"));
    }

    #[test]
    fn test_error_message_modes() {
        assert_eq!(
            error_message(&plain_ctx(), "boom", Some("retry")),
            "error=boom\nhint=retry"
        );
        let pretty = error_message(&pretty_ctx(), "boom", Some("retry"));
        assert!(pretty.contains("[\u{2717}] boom"));
        assert!(pretty.contains("Hint: retry"));
    }

    #[test]
    fn test_property_table_plain() {
        let out = property_table(
            &plain_ctx(),
            &[("Fingerprint", "ab:cd".to_string()), ("Bits", "2048".to_string())],
        );
        assert_eq!(out, "fingerprint=ab:cd\nbits=2048");
    }

    #[test]
    fn test_property_table_pretty_has_values() {
        let out = property_table(&pretty_ctx(), &[("Fingerprint", "ab:cd".to_string())]);
        assert!(out.contains("Fingerprint"));
        assert!(out.contains("ab:cd"));
    }
}
