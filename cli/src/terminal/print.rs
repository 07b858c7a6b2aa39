use std::cell::Cell;

use colored::*;
use unicode_width::UnicodeWidthStr;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;

thread_local! {
    static KEY_WIDTH: Cell<usize> = const { Cell::new(8) }
}

/// Sets the key column width for subsequent [`aligned_line`] calls.
pub fn set_key_width(keys: &[&str]) {
    KEY_WIDTH.set(keys.iter().map(|k| k.len()).max().unwrap_or(0));
}

pub fn banner() {
    let text_content: String = format!("⟦ CROSSNET v{} ⟧", env!("CARGO_PKG_VERSION"));
    let text_width: usize = UnicodeWidthStr::width(text_content.as_str());
    let text: ColoredString = text_content.bright_green().bold();
    let sep: ColoredString = "═"
        .repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2)
        .bright_black();

    println!("{}{}{}", sep, text, sep);
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    println!(
        "{}",
        format!(
            "{}{}{}",
            "─".repeat(left),
            formatted.to_uppercase().bright_green(),
            "─".repeat(right)
        )
        .bright_black()
    );
}

pub fn fat_separator() {
    println!("{}", "═".repeat(TOTAL_WIDTH).bright_black());
}

pub fn blank() {
    println!();
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    println!("{} {}", prefix, msg.as_ref().color(colors::TEXT_DEFAULT));
}

pub fn aligned_line(key: &str, value: ColoredString) {
    let dots: String = ".".repeat((KEY_WIDTH.get() + 1).saturating_sub(key.len()));
    let colon: String = format!(
        "{}{}",
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR)
    );
    print_status(format!("{}{} {}", key.color(colors::PRIMARY), colon, value));
}

pub fn tree_head(idx: usize, name: &str) {
    let idx_str: String = format!("[{}]", idx.to_string().color(colors::ACCENT));
    println!(
        "{} {}",
        idx_str.color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    );
}

pub fn as_tree_one_level(key_value_pairs: Vec<(String, ColoredString)>) {
    let key_width: usize = key_value_pairs
        .iter()
        .map(|(key, _)| key.len())
        .max()
        .unwrap_or(0);

    for (i, (key, value)) in key_value_pairs.iter().enumerate() {
        let last: bool = i + 1 == key_value_pairs.len();
        let branch: ColoredString = if !last {
            "├─".bright_black()
        } else {
            "└─".bright_black()
        };
        println!(
            " {} {}{}{} {}",
            branch,
            key.color(colors::TEXT_DEFAULT),
            ".".repeat((key_width + 1).saturating_sub(key.len()))
                .color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value
        );
    }
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    println!("{}{}", space, msg);
}

const NO_RESULTS: &str = r#"
         _ __   ___     | |__   ___  ___| |_ ___
        | '_ \ / _ \    | '_ \ / _ \/ __| __/ __|
        | | | | (_) |   | | | | (_) \__ \ |_\__ \
        |_| |_|\___/    |_| |_|\___/|___/\__|___/
"#;

pub fn no_results() {
    println!("{}", NO_RESULTS.red().bold());
}
