//! Parser for the store's packed `labels` tag.
//!
//! The tag looks like `app:nginx,tier:frontend`. Parsing is all-or-nothing:
//! one entry without a `:` discards every label for that definition.

use crate::types::ParsedLabels;

/// Parse a comma-separated `key:value` list into ordered pairs.
///
/// Returns an empty list when `raw` is absent, empty, or contains any
/// entry without a `:` separator. Values keep any further `:` characters.
pub fn parse_labels(raw: Option<&str>) -> ParsedLabels {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return ParsedLabels::new();
    };

    raw.split(',')
        .map(|entry| {
            entry
                .split_once(':')
                .map(|(k, v)| (k.to_string(), v.to_string()))
        })
        .collect::<Option<ParsedLabels>>()
        .unwrap_or_default()
}
