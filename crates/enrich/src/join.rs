//! Join enrichment results back onto a row set.

use tracing::{info, warn};

use checksift_core::RowSet;

use super::types::Enrichment;

/// Append one column per entry of `output_columns` to every row.
///
/// Each column takes the values resolved for that record type, joined with
/// `separator`. Rows whose key is null, blank or absent from `enrichment`
/// get the empty string. Row count and order are unchanged.
pub fn join(
    rows: RowSet,
    enrichment: &Enrichment,
    key_column: &str,
    output_columns: &[String],
    separator: &str,
) -> RowSet {
    let mut out = RowSet::new(rows.columns.clone());
    for column in output_columns {
        if out.has_column(column) {
            warn!(column = %column, "enrichment column already present, values are replaced");
        }
        out.add_column(column.clone());
    }

    let mut unmatched = 0usize;
    for mut record in rows {
        let records = record.key(key_column).and_then(|k| enrichment.get(k));
        if records.is_none() {
            unmatched += 1;
        }
        for column in output_columns {
            let value = records
                .and_then(|r| r.get(column))
                .map(|values| values.join(separator))
                .unwrap_or_default();
            record.set(column.clone(), Some(value));
        }
        out.push(record);
    }

    info!(rows = out.len(), without_enrichment = unmatched, "joined enrichment");
    out
}

/// Unique non-blank keys of `rows`, in first-appearance order.
pub fn lookup_keys<'a>(rows: &'a RowSet, key_column: &str) -> Vec<&'a str> {
    let mut seen = std::collections::HashSet::new();
    rows.iter()
        .filter_map(|r| r.key(key_column))
        .filter(|k| seen.insert(*k))
        .collect()
}

#[cfg(test)]
mod tests {
    use checksift_core::Record;

    use super::*;
    use crate::types::KeyRecords;

    fn rows() -> RowSet {
        RowSet::with_records(
            vec!["Hostname".into(), "Status".into()],
            vec![
                Record::from_pairs([("Hostname", Some("a.com")), ("Status", Some("up"))]),
                Record::from_pairs([("Hostname", None::<&str>), ("Status", Some("up"))]),
                Record::from_pairs([("Hostname", Some(" b.com ")), ("Status", Some("down"))]),
                Record::from_pairs([("Hostname", Some("c.com")), ("Status", Some("up"))]),
            ],
        )
    }

    fn enrichment() -> Enrichment {
        let mut a = KeyRecords::new();
        a.insert("CNAME".into(), vec!["a.dxcloud.net.".into()]);
        a.insert("A".into(), vec!["104.1.1.1".into(), "104.1.1.2".into()]);
        let mut b = KeyRecords::new();
        b.insert("CNAME".into(), vec![]);
        b.insert("A".into(), vec!["93.184.216.34".into()]);
        Enrichment::from([("a.com".to_string(), a), ("b.com".to_string(), b)])
    }

    fn columns() -> Vec<String> {
        vec!["CNAME".into(), "A".into()]
    }

    #[test]
    fn appends_columns_keeping_order() {
        let out = join(rows(), &enrichment(), "Hostname", &columns(), ";");

        assert_eq!(out.columns, vec!["Hostname", "Status", "CNAME", "A"]);
        assert_eq!(out.len(), 4);

        let hosts: Vec<Option<&str>> = out.iter().map(|r| r.get("Hostname")).collect();
        assert_eq!(hosts, vec![Some("a.com"), None, Some(" b.com "), Some("c.com")]);

        let a = &out.records[0];
        assert_eq!(a.text("CNAME"), "a.dxcloud.net.");
        assert_eq!(a.text("A"), "104.1.1.1;104.1.1.2");
    }

    #[test]
    fn trimmed_key_matches() {
        let out = join(rows(), &enrichment(), "Hostname", &columns(), ";");
        let b = &out.records[2];
        assert_eq!(b.text("CNAME"), "");
        assert_eq!(b.text("A"), "93.184.216.34");
    }

    #[test]
    fn missing_and_null_keys_get_empty_values() {
        let out = join(rows(), &enrichment(), "Hostname", &columns(), ";");
        for idx in [1, 3] {
            let r = &out.records[idx];
            assert_eq!(r.fields.get("CNAME"), Some(&Some(String::new())));
            assert_eq!(r.fields.get("A"), Some(&Some(String::new())));
        }
    }

    #[test]
    fn lookup_keys_are_unique_and_trimmed() {
        let mut rows = rows();
        rows.push(Record::from_pairs([("Hostname", Some("a.com")), ("Status", Some("up"))]));
        assert_eq!(lookup_keys(&rows, "Hostname"), vec!["a.com", "b.com", "c.com"]);
    }
}
