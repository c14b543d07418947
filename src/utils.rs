use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::models::IndicatorStatus;

/// Format CPF digits as `000.000.000-00`
pub fn format_cpf(cpf: &str) -> String {
    let digits: String = cpf.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 11 {
        return cpf.to_string();
    }
    format!("{}.{}.{}-{}", &digits[..3], &digits[3..6], &digits[6..9], &digits[9..])
}

/// `YYYY-MM-DD` to `DD/MM/YYYY`, anything else unchanged
pub fn format_date(date: &str) -> String {
    match crate::eligibility::parse_birth_date(date) {
        Some(d) => d.format("%d/%m/%Y").to_string(),
        None => date.to_string(),
    }
}

/// Format timestamp in human-readable format
pub fn format_timestamp(timestamp: &chrono::DateTime<chrono::Utc>) -> String {
    timestamp.format("%d/%m/%Y %H:%M UTC").to_string()
}

pub fn format_status(status: IndicatorStatus) -> String {
    match status {
        IndicatorStatus::Green => "● VERDE".green().to_string(),
        IndicatorStatus::Yellow => "● AMARELO".yellow().to_string(),
        IndicatorStatus::Red => "● VERMELHO".red().to_string(),
    }
}

/// Cut `text` to at most `width` terminal columns, marking the cut with `…`
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Pad to a display width, accounting for accented and wide characters
fn pad(text: &str, width: usize) -> String {
    let cut = truncate(text, width);
    let fill = width.saturating_sub(cut.width());
    format!("{}{}", cut, " ".repeat(fill))
}

/// Prompt user for yes/no confirmation
pub fn confirm_action(prompt: &str) -> bool {
    use std::io::{self, Write};

    print!("{} (s/N): ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }

    matches!(input.trim().to_lowercase().as_str(), "s" | "sim" | "y" | "yes")
}

/// Spinner shown while a request is in flight
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Print a formatted table border
pub fn print_table_border(width: usize) {
    println!("{}", "=".repeat(width));
}

/// Print a table row with columns
pub fn print_table_row(columns: &[&str], widths: &[usize]) {
    let row: Vec<String> = columns
        .iter()
        .zip(widths)
        .map(|(col, width)| pad(col, *width))
        .collect();
    println!("{}", row.join("  ").trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cpf() {
        assert_eq!(format_cpf("52998224725"), "529.982.247-25");
        assert_eq!(format_cpf("123"), "123");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("1990-05-01"), "01/05/1990");
        assert_eq!(format_date("n/a"), "n/a");
    }

    #[test]
    fn test_truncate_respects_display_width() {
        assert_eq!(truncate("Conceição", 20), "Conceição");
        assert_eq!(truncate("Maria Aparecida dos Santos", 10), "Maria Apa…");
        assert_eq!(pad("Zé", 4), "Zé  ");
    }
}
