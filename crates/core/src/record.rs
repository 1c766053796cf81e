use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single cell. `None` is a null cell (empty field in the source table).
pub type FieldValue = Option<String>;

/// One row of a table: an ordered column → value map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(column, value)` pairs, keeping their order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, Option<V>)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    /// Non-null value of a column. Missing columns and null cells both give `None`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).and_then(|v| v.as_deref())
    }

    /// Value with null coerced to the empty string.
    pub fn text(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    /// Set (or append) a column value.
    pub fn set(&mut self, column: impl Into<String>, value: FieldValue) {
        self.fields.insert(column.into(), value);
    }

    /// Key used for duplicate detection and lookups: trimmed, `None` when
    /// the cell is null, absent or blank.
    pub fn key(&self, column: &str) -> Option<&str> {
        self.get(column).map(str::trim).filter(|k| !k.is_empty())
    }
}

/// An ordered collection of records sharing one column layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl RowSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    pub fn with_records(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// An empty row set with the same columns as `self`.
    pub fn empty_like(&self) -> Self {
        Self::new(self.columns.clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Split into `(matched, unmatched)` using a per-row mask.
    ///
    /// Both halves keep the input's relative order and column layout.
    /// Rows beyond the end of a short mask count as unmatched.
    pub fn split_by_mask(self, mask: &[bool]) -> (RowSet, RowSet) {
        let mut matched = RowSet::new(self.columns.clone());
        let mut unmatched = RowSet::new(self.columns);
        for (i, record) in self.records.into_iter().enumerate() {
            if mask.get(i).copied().unwrap_or(false) {
                matched.records.push(record);
            } else {
                unmatched.records.push(record);
            }
        }
        (matched, unmatched)
    }

    /// Split into `(matched, unmatched)` with a row predicate.
    pub fn partition<F>(self, mut pred: F) -> (RowSet, RowSet)
    where
        F: FnMut(&Record) -> bool,
    {
        let mask: Vec<bool> = self.records.iter().map(&mut pred).collect();
        self.split_by_mask(&mask)
    }

    /// Append a column to the layout if not already present.
    pub fn add_column(&mut self, column: impl Into<String>) {
        let column = column.into();
        if !self.has_column(&column) {
            self.columns.push(column);
        }
    }
}

impl IntoIterator for RowSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RowSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(name: Option<&str>, status: &str) -> Record {
        Record::from_pairs([("Hostname", name), ("Status", Some(status))])
    }

    fn columns() -> Vec<String> {
        vec!["Hostname".to_string(), "Status".to_string()]
    }

    #[test]
    fn key_is_trimmed_and_blank_is_none() {
        assert_eq!(host(Some("  a.test.com "), "active").key("Hostname"), Some("a.test.com"));
        assert_eq!(host(Some("   "), "active").key("Hostname"), None);
        assert_eq!(host(None, "active").key("Hostname"), None);
        assert_eq!(host(Some("x"), "active").key("Missing"), None);
    }

    #[test]
    fn text_coerces_null_to_empty() {
        let r = host(None, "paused");
        assert_eq!(r.text("Hostname"), "");
        assert_eq!(r.text("Status"), "paused");
        assert!(r.has_column("Hostname"));
        assert!(!r.has_column("Tags"));
    }

    #[test]
    fn split_by_mask_keeps_order() {
        let rows = RowSet::with_records(
            columns(),
            vec![
                host(Some("a"), "1"),
                host(Some("b"), "2"),
                host(Some("c"), "3"),
                host(Some("d"), "4"),
            ],
        );
        let (matched, unmatched) = rows.split_by_mask(&[true, false, true]);
        let names = |rs: &RowSet| rs.iter().map(|r| r.text("Hostname").to_string()).collect::<Vec<_>>();
        assert_eq!(names(&matched), vec!["a", "c"]);
        assert_eq!(names(&unmatched), vec!["b", "d"]);
        assert_eq!(matched.columns, columns());
        assert_eq!(unmatched.columns, columns());
    }

    #[test]
    fn add_column_is_idempotent() {
        let mut rows = RowSet::new(columns());
        rows.add_column("CNAME");
        rows.add_column("CNAME");
        assert_eq!(rows.columns, vec!["Hostname", "Status", "CNAME"]);
    }
}
