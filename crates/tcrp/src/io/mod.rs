//! Reading run inputs and writing run outputs
//!
//! All inputs are small comma-delimited text files or YAML documents, read
//! whole into memory before parsing.

pub mod locations;
pub mod tables;
pub mod tracks;

pub use locations::read_locations;
pub use tables::{RunSummary, read_table, write_location, write_run_summary};
pub use tracks::read_ensemble;

/// Split one comma-delimited record into trimmed fields. Double quotes
/// group a field that contains commas; `""` inside quotes is a literal quote.
pub(crate) fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut field).trim().to_string()),
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

/// Non-empty lines that are not `#` comments, with 1-based line numbers
pub(crate) fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}
