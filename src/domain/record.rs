use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

const DATE_LABEL_FORMAT: &str = "%Y-%m-%d";

/// One spreadsheet row: the day it was recorded and the activity summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub date_label: String,
    pub summary: String,
}

impl Record {
    pub fn new(date: NaiveDate, summary: impl Into<String>) -> Self {
        Self {
            date_label: date.format(DATE_LABEL_FORMAT).to_string(),
            summary: summary.into(),
        }
    }

    /// Builds a record from raw cells; missing cells become empty strings and
    /// cells past the second are dropped.
    pub fn from_cells(cells: Vec<String>) -> Self {
        let mut cells = cells.into_iter();
        Self {
            date_label: cells.next().unwrap_or_default(),
            summary: cells.next().unwrap_or_default(),
        }
    }

    pub fn into_cells(self) -> Vec<String> {
        vec![self.date_label, self.summary]
    }
}

/// Serialized as a `[date, summary]` pair, matching the row layout.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.date_label, &self.summary).serialize(serializer)
    }
}

/// A range in A1 notation, e.g. `Sheet1!A2:B`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    sheet: String,
    cells: String,
}

impl SheetRange {
    pub fn parse(value: &str) -> Option<Self> {
        let (sheet, cells) = value.trim().rsplit_once('!')?;
        let sheet = sheet.trim();
        let cells = cells.trim();
        let unquoted = sheet.trim_matches('\'');
        if unquoted.is_empty() || cells.is_empty() {
            return None;
        }
        if !cells
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ':' || c == '$')
        {
            return None;
        }
        Some(Self {
            sheet: sheet.to_string(),
            cells: cells.to_ascii_uppercase(),
        })
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn cells(&self) -> &str {
        &self.cells
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.sheet, self.cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_date_label() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 26).unwrap();
        let record = Record::new(date, "Fixed a startup crash.");
        assert_eq!(record.date_label, "2024-01-26");
        assert_eq!(
            record.into_cells(),
            vec!["2024-01-26".to_string(), "Fixed a startup crash.".to_string()]
        );
    }

    #[test]
    fn pads_short_rows() {
        let record = Record::from_cells(vec!["2024-01-26".to_string()]);
        assert_eq!(record.date_label, "2024-01-26");
        assert_eq!(record.summary, "");
    }

    #[test]
    fn truncates_wide_rows() {
        let record = Record::from_cells(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(record.into_cells(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn serializes_as_pair() {
        let record = Record::from_cells(vec!["2024-01-26".into(), "Summary".into()]);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!(["2024-01-26", "Summary"])
        );
    }

    #[test]
    fn parses_ranges() {
        let read = SheetRange::parse("Sheet1!A2:B").unwrap();
        assert_eq!(read.sheet(), "Sheet1");
        assert_eq!(read.cells(), "A2:B");

        let quoted = SheetRange::parse("'Team Log'!a1:b1").unwrap();
        assert_eq!(quoted.to_string(), "'Team Log'!A1:B1");
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert!(SheetRange::parse("A1:B1").is_none());
        assert!(SheetRange::parse("Sheet1!").is_none());
        assert!(SheetRange::parse("!A1").is_none());
        assert!(SheetRange::parse("Sheet1!A1/B1").is_none());
    }
}
