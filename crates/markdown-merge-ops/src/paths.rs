//! Human-readable renderings of table paths and the merged document layout.

use markdown_merge_config::OutputSettings;

/// Formats headings and provenance separators for merged documents.
#[derive(Clone, Debug)]
pub struct DocumentLayout {
    source_label: String,
    separator: String,
}

impl DocumentLayout {
    pub fn from_settings(settings: &OutputSettings) -> Self {
        Self {
            source_label: settings.source_label.clone(),
            separator: settings.hierarchy_separator.clone(),
        }
    }

    /// `Core/API/Device.md` → `Core > API > Device.md`.
    pub fn display_path(&self, path: &str) -> String {
        path.split('/').collect::<Vec<_>>().join(&self.separator)
    }

    /// `Core/API/Core-API-Basics.md` → `Core > API > Core-API-Basics`.
    pub fn heading(&self, target: &str) -> String {
        self.display_path(strip_extension(target))
    }

    /// Append the separator block that precedes `source`'s content.
    ///
    /// Blocks are always separated by exactly one blank line, even when the
    /// previous source did not end with a newline.
    pub fn push_provenance(&self, body: &mut String, source: &str) {
        if !body.is_empty() {
            if !body.ends_with('\n') {
                body.push('\n');
            }
            body.push('\n');
        }
        body.push_str("---\n\n## ");
        body.push_str(&self.source_label);
        body.push_str(": ");
        body.push_str(&self.display_path(source));
        body.push_str("\n\n");
    }

    /// Full output document: synthesized heading followed by the merged body.
    pub fn assemble(&self, target: &str, body: &str) -> String {
        format!("# {}\n\n{}", self.heading(target), body)
    }
}

impl Default for DocumentLayout {
    fn default() -> Self {
        DocumentLayout::from_settings(&OutputSettings::default())
    }
}

/// Drop the extension of the final path segment. Dotfiles keep their name.
pub fn strip_extension(path: &str) -> &str {
    let file_start = path.rfind('/').map(|idx| idx + 1).unwrap_or(0);
    match path[file_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..file_start + dot],
        _ => path,
    }
}
