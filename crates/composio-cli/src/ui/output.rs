//! Formatted output utilities.
//!
//! Status lines go to stderr so stdout stays clean JSON.

use console::style;

/// Print a success message with checkmark.
pub fn success(msg: &str) {
    eprintln!("{} {}", style("✓").green().bold(), msg);
}

/// Print a warning message.
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message.
pub fn info(msg: &str) {
    eprintln!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a key-value pair.
pub fn kv(key: &str, value: &str) {
    eprintln!("  {}: {}", style(key).bold(), value);
}

/// Print a value as pretty JSON on stdout.
pub fn json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
