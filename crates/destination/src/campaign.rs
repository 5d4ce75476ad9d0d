//! Campaign matching for page views.

use std::collections::HashMap;

/// Resolve the campaign tags enrolled for `path`.
///
/// Only exact path matches count. Tags are trimmed and empty tags dropped;
/// a path whose tag list ends up empty is treated as not enrolled.
pub fn match_campaign(path: &str, campaigns: &HashMap<String, String>) -> Option<Vec<String>> {
    let tags: Vec<String> = campaigns
        .get(path)?
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect();

    (!tags.is_empty()).then_some(tags)
}
