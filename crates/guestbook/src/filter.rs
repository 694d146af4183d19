//! Case-insensitive filtering of guest records.

use crate::record::GuestRecord;

/// Check whether a record's name or message contains `filter`, ignoring case.
///
/// An empty filter matches every record.
#[must_use]
pub fn matches(record: &GuestRecord, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    let needle = filter.to_lowercase();
    record.name.to_lowercase().contains(&needle) || record.message.to_lowercase().contains(&needle)
}

/// Select the records matching `filter`, keeping sequence order.
#[must_use]
pub fn select<'a>(records: &'a [GuestRecord], filter: &str) -> Vec<&'a GuestRecord> {
    records
        .iter()
        .filter(|record| matches(record, filter))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<GuestRecord> {
        vec![
            GuestRecord::new("Ana", "Hi there", false),
            GuestRecord::new("Budi", "Selamat menempuh hidup baru", true),
            GuestRecord::new("Citra", "Congrats, ANA and Budi!", false),
        ]
    }

    fn names(selected: &[&GuestRecord]) -> Vec<String> {
        selected.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_empty_filter_selects_all() {
        let records = sample();
        assert_eq!(select(&records, "").len(), records.len());
    }

    #[test]
    fn test_filter_matches_name_case_insensitively() {
        let records = sample();
        assert_eq!(names(&select(&records, "an")), vec!["Ana", "Citra"]);
        assert_eq!(names(&select(&records, "BUDI")), vec!["Budi", "Citra"]);
    }

    #[test]
    fn test_filter_matches_message() {
        let records = sample();
        assert_eq!(names(&select(&records, "selamat")), vec!["Budi"]);
    }

    #[test]
    fn test_filter_no_match() {
        let records = sample();
        assert!(select(&records, "zebra").is_empty());
    }

    #[test]
    fn test_filter_keeps_whitespace() {
        let records = sample();
        assert_eq!(names(&select(&records, "hi ")), vec!["Ana"]);
        assert!(select(&records, "  ana").is_empty());
    }

    #[test]
    fn test_matches_is_membership_of_name_or_message() {
        let records = sample();
        for filter in ["", "a", "AN", "hi", "!", "baru", "x"] {
            let needle = filter.to_lowercase();
            for record in &records {
                let expected = record.name.to_lowercase().contains(&needle)
                    || record.message.to_lowercase().contains(&needle);
                assert_eq!(matches(record, filter), expected, "filter {filter:?}");
            }
        }
    }

    #[test]
    fn test_matches_unicode_case() {
        let record = GuestRecord::new("Ägnes", "Grüße", false);
        assert!(matches(&record, "äg"));
        assert!(matches(&record, "GRÜ"));
    }
}
