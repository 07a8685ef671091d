// StreamSelector - pick the single direct stream URL from an engine record
//
// Rules:
// - A non-empty top-level `url` wins unconditionally
// - Otherwise scan `formats` from last to first (engines sort ascending by
//   quality) and take the first entry that carries a non-empty URL
// - Otherwise there is nothing to play

use super::models::{ExtractionRecord, FormatEntry};

fn non_empty(url: &Option<String>) -> Option<&str> {
    url.as_deref().filter(|u| !u.trim().is_empty())
}

/// Stream URL selection over heterogeneous engine records
pub struct StreamSelector;

impl StreamSelector {
    /// Select the stream URL, or `None` when the record has no playable URL
    pub fn select(record: &ExtractionRecord) -> Option<&str> {
        if let Some(direct) = non_empty(&record.url) {
            return Some(direct);
        }

        record
            .formats
            .as_deref()
            .and_then(Self::best_format)
            .and_then(|f| non_empty(&f.url))
    }

    /// Highest-index format entry that has a URL
    pub fn best_format(formats: &[FormatEntry]) -> Option<&FormatEntry> {
        formats.iter().rev().find(|f| non_empty(&f.url).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(url: Option<&str>) -> FormatEntry {
        FormatEntry {
            format_id: None,
            url: url.map(str::to_string),
        }
    }

    fn record(url: Option<&str>, formats: Option<Vec<FormatEntry>>) -> ExtractionRecord {
        ExtractionRecord {
            url: url.map(str::to_string),
            formats,
            ..Default::default()
        }
    }

    #[test]
    fn test_direct_url_wins_over_formats() {
        let rec = record(
            Some("https://cdn/x.mp4"),
            Some(vec![fmt(Some("https://cdn/high.mp4"))]),
        );
        assert_eq!(StreamSelector::select(&rec), Some("https://cdn/x.mp4"));
    }

    #[test]
    fn test_reverse_scan_picks_last_with_url() {
        let rec = record(
            None,
            Some(vec![
                fmt(None),
                fmt(Some("https://cdn/low.mp4")),
                fmt(Some("https://cdn/high.mp4")),
            ]),
        );
        assert_eq!(StreamSelector::select(&rec), Some("https://cdn/high.mp4"));
    }

    #[test]
    fn test_reverse_scan_skips_trailing_entries_without_url() {
        let rec = record(
            None,
            Some(vec![
                fmt(Some("https://cdn/low.mp4")),
                fmt(Some("https://cdn/mid.mp4")),
                fmt(None),
                fmt(Some("")),
            ]),
        );
        assert_eq!(StreamSelector::select(&rec), Some("https://cdn/mid.mp4"));
    }

    #[test]
    fn test_empty_direct_url_falls_back_to_formats() {
        let rec = record(Some(""), Some(vec![fmt(Some("https://cdn/a.mp4"))]));
        assert_eq!(StreamSelector::select(&rec), Some("https://cdn/a.mp4"));
    }

    #[test]
    fn test_nothing_resolvable() {
        assert_eq!(StreamSelector::select(&record(None, None)), None);
        assert_eq!(StreamSelector::select(&record(None, Some(vec![]))), None);
        assert_eq!(
            StreamSelector::select(&record(None, Some(vec![fmt(None), fmt(None)]))),
            None
        );
    }
}
