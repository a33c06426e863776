//! Output formatters for markdown-merge runs.
//!
//! Plain output is streamed while the driver runs ([`PlainReporter`]) and
//! closed with a summary block; JSON output is a single document rendered
//! from the finished [`ConsolidateOutcome`](markdown_merge_ops::ConsolidateOutcome).

mod json;
mod plain;

pub use json::{render_json, render_json_at};
pub use plain::{render_header, render_summary, PlainReporter};

/// Report formats understood by the CLI.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ReportFormat {
    #[default]
    Plain,
    Json,
}

/// `1234567` → `1,234,567`.
pub fn thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::thousands;

    #[test]
    fn groups_digits_in_threes() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(123456), "123,456");
        assert_eq!(thousands(1234567), "1,234,567");
    }
}
