//! Cross-reference normalisation for merged documents.
//!
//! Source documents link to each other with `[[REF]]` and `[[REF|LABEL]]`.
//! Once several sources share one output file those links dangle, so they are
//! collapsed to plain text before concatenation.

use std::borrow::Cow;

use markdown_merge_config::LinkStyle;
use regex::{Captures, Regex};

/// `[[` + reference (no `]` or `|`) + optional `|label` + `]]`.
const REFERENCE_PATTERN: &str = r"\[\[([^\]|]+)(?:\|([^\]]+))?\]\]";

/// Compiled link normaliser. Construct once per run and reuse across sources.
#[derive(Clone, Debug)]
pub struct LinkNormalizer {
    pattern: Regex,
    style: LinkStyle,
}

impl LinkNormalizer {
    pub fn new(style: LinkStyle) -> Self {
        Self {
            pattern: Regex::new(REFERENCE_PATTERN).expect("reference pattern is valid"),
            style,
        }
    }

    /// Replace every reference in `text`, scanning left to right. Text outside
    /// a complete `[[...]]` pair, including an unterminated `[[`, is untouched.
    pub fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(text, |caps: &Captures<'_>| {
            match (self.style, caps.get(2)) {
                (LinkStyle::Label, Some(label)) => label.as_str().to_owned(),
                _ => caps[1].to_owned(),
            }
        })
    }
}

impl Default for LinkNormalizer {
    fn default() -> Self {
        LinkNormalizer::new(LinkStyle::default())
    }
}
