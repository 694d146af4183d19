//! View-model for the guestbook list.
//!
//! [`render`] is a pure function from the sequence and the filter text to a
//! [`GuestbookView`]; a [`Surface`](crate::surface::Surface) decides how to
//! display it.

use chrono::{FixedOffset, Local, Locale};
use serde::Serialize;

use crate::filter;
use crate::record::{GuestRecord, RecordId};

/// Placeholder shown when no record matches.
pub const EMPTY_PLACEHOLDER: &str = "No visitors found";

/// Default strftime format for row timestamps.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%-d %B %Y %H:%M";

/// How row timestamps are presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    /// strftime format string.
    pub timestamp_format: String,
    /// Fixed display offset; `None` uses the local time zone.
    pub utc_offset: Option<FixedOffset>,
    /// Locale for month and day names; `None` keeps chrono's English names.
    pub locale: Option<Locale>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            utc_offset: None,
            locale: None,
        }
    }
}

impl ViewOptions {
    fn format_timestamp(&self, record: &GuestRecord) -> String {
        let format = self.timestamp_format.as_str();
        match (self.utc_offset, self.locale) {
            (Some(offset), Some(locale)) => record
                .timestamp
                .with_timezone(&offset)
                .format_localized(format, locale)
                .to_string(),
            (Some(offset), None) => record.timestamp.with_timezone(&offset).format(format).to_string(),
            (None, Some(locale)) => record
                .timestamp
                .with_timezone(&Local)
                .format_localized(format, locale)
                .to_string(),
            (None, None) => record.timestamp.with_timezone(&Local).format(format).to_string(),
        }
    }
}

/// A control on a row, addressed by record id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Control {
    /// Record this control acts on.
    pub target: RecordId,
    /// Short label.
    pub label: &'static str,
    /// Tooltip text.
    pub title: &'static str,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestRow {
    /// Record id.
    pub id: RecordId,
    /// Visitor name.
    pub name: String,
    /// Visitor message.
    pub message: String,
    /// Attendance flag.
    pub attended: bool,
    /// Timestamp formatted for display.
    pub display_time: String,
    /// Attendance toggle.
    pub toggle: Control,
    /// Delete control.
    pub delete: Control,
}

impl GuestRow {
    fn from_record(record: &GuestRecord, options: &ViewOptions) -> Self {
        let (label, title) = if record.attended {
            ("✓", "Mark as not visited")
        } else {
            ("✗", "Mark as visited")
        };
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            message: record.message.clone(),
            attended: record.attended,
            display_time: options.format_timestamp(record),
            toggle: Control {
                target: record.id.clone(),
                label,
                title,
            },
            delete: Control {
                target: record.id.clone(),
                label: "✕",
                title: "Remove visitor",
            },
        }
    }
}

/// What the list shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuestbookView {
    /// Nothing matched.
    Empty {
        /// Placeholder text.
        placeholder: &'static str,
    },
    /// Matching rows in sequence order.
    Rows {
        /// The rows.
        rows: Vec<GuestRow>,
    },
}

impl GuestbookView {
    /// The rendered rows; empty for the placeholder view.
    #[must_use]
    pub fn rows(&self) -> &[GuestRow] {
        match self {
            Self::Empty { .. } => &[],
            Self::Rows { rows } => rows,
        }
    }

    /// Whether the placeholder is shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

/// Build the view for `records` under `filter`.
#[must_use]
pub fn render(records: &[GuestRecord], filter: &str, options: &ViewOptions) -> GuestbookView {
    let selected = filter::select(records, filter);
    if selected.is_empty() {
        return GuestbookView::Empty {
            placeholder: EMPTY_PLACEHOLDER,
        };
    }
    GuestbookView::Rows {
        rows: selected
            .into_iter()
            .map(|record| GuestRow::from_record(record, options))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn utc_options() -> ViewOptions {
        ViewOptions {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            utc_offset: FixedOffset::east_opt(0),
            locale: None,
        }
    }

    fn record(name: &str, message: &str, attended: bool) -> GuestRecord {
        let timestamp = Utc.with_ymd_and_hms(2026, 10, 19, 8, 5, 0).unwrap();
        GuestRecord::with_timestamp(name, message, attended, timestamp)
    }

    #[test]
    fn test_render_empty_sequence() {
        let view = render(&[], "", &utc_options());
        assert_eq!(
            view,
            GuestbookView::Empty {
                placeholder: EMPTY_PLACEHOLDER
            }
        );
        assert!(view.rows().is_empty());
    }

    #[test]
    fn test_render_no_match_shows_placeholder() {
        let records = vec![record("Ana", "Hi", false)];
        assert!(render(&records, "zzz", &utc_options()).is_empty());
    }

    #[test]
    fn test_render_rows_in_order_with_ids() {
        let records = vec![record("Ana", "Hi", false), record("Budi", "Halo", true)];
        let view = render(&records, "", &utc_options());

        let rows = view.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Ana");
        assert_eq!(rows[1].name, "Budi");
        for (row, record) in rows.iter().zip(&records) {
            assert_eq!(row.id, record.id);
            assert_eq!(row.toggle.target, record.id);
            assert_eq!(row.delete.target, record.id);
        }
    }

    #[test]
    fn test_filtered_rows_keep_their_record_ids() {
        let records = vec![
            record("Ana", "Hi", false),
            record("Budi", "Halo", false),
            record("Citra", "Hey", false),
        ];
        let view = render(&records, "citra", &utc_options());

        assert_eq!(view.rows().len(), 1);
        assert_eq!(view.rows()[0].delete.target, records[2].id);
    }

    #[test]
    fn test_toggle_control_reflects_attendance() {
        let records = vec![record("Ana", "Hi", true), record("Budi", "Halo", false)];
        let view = render(&records, "", &utc_options());

        assert_eq!(view.rows()[0].toggle.label, "✓");
        assert_eq!(view.rows()[0].toggle.title, "Mark as not visited");
        assert_eq!(view.rows()[1].toggle.label, "✗");
        assert_eq!(view.rows()[1].toggle.title, "Mark as visited");
        assert_eq!(view.rows()[1].delete.title, "Remove visitor");
    }

    #[test]
    fn test_display_time_uses_format_and_offset() {
        let records = vec![record("Ana", "Hi", false)];
        assert_eq!(
            render(&records, "", &utc_options()).rows()[0].display_time,
            "19 October 2026 08:05"
        );

        let jakarta = ViewOptions {
            timestamp_format: "%Y-%m-%d %H:%M".to_string(),
            utc_offset: FixedOffset::east_opt(7 * 3600),
            locale: None,
        };
        assert_eq!(
            render(&records, "", &jakarta).rows()[0].display_time,
            "2026-10-19 15:05"
        );
    }

    #[test]
    fn test_display_time_uses_locale_names() {
        let records = vec![record("Ana", "Hi", false)];
        let indonesian = ViewOptions {
            locale: Some(Locale::id_ID),
            ..utc_options()
        };
        assert_eq!(
            render(&records, "", &indonesian).rows()[0].display_time,
            "19 Oktober 2026 08:05"
        );
    }

    #[test]
    fn test_view_serializes_with_kind_tag() {
        let empty = serde_json::to_value(render(&[], "", &utc_options())).unwrap();
        assert_eq!(empty["kind"], "empty");
        assert_eq!(empty["placeholder"], EMPTY_PLACEHOLDER);

        let records = vec![record("Ana", "Hi", false)];
        let rows = serde_json::to_value(render(&records, "", &utc_options())).unwrap();
        assert_eq!(rows["kind"], "rows");
        assert_eq!(rows["rows"][0]["name"], "Ana");
        assert_eq!(rows["rows"][0]["id"], records[0].id.as_str());
    }
}
