//! Diffs between a target on disk and the document a run would write.

use similar::TextDiff;

const CONTEXT_LINES: usize = 2;

/// Unified diff turning `on_disk` into `merged`, or `None` when nothing would
/// change. A target that was never written diffs against `/dev/null`.
pub fn stale_target_diff(on_disk: Option<&str>, merged: &str, target: &str) -> Option<String> {
    if on_disk == Some(merged) {
        return None;
    }

    let old_header = match on_disk {
        Some(_) => format!("a/{target}"),
        None => "/dev/null".to_owned(),
    };
    let new_header = format!("b/{target}");

    let rendered = TextDiff::from_lines(on_disk.unwrap_or(""), merged)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(&old_header, &new_header)
        .to_string();
    Some(rendered)
}
