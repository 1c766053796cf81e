//! Sequential partition engine.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

use checksift_core::RowSet;

use crate::schema::PartitionRule;

use super::{split_duplicates, ConditionGroup};

/// Applies condition groups in order to a shrinking pool of rows.
#[derive(Debug, Clone)]
pub struct PartitionEngine {
    pub key_column: String,
    pub groups: Vec<ConditionGroup>,
}

/// Everything a run produces. Every input row lands in exactly one of
/// `duplicates`, one partition, or `remainder`.
#[derive(Debug, Clone, Default)]
pub struct PartitionOutcome {
    pub duplicates: RowSet,
    pub partitions: IndexMap<String, RowSet>,
    pub remainder: RowSet,
}

/// Row counts of a [`PartitionOutcome`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartitionCounts {
    pub duplicates: usize,
    pub partitions: IndexMap<String, usize>,
    pub remainder: usize,
}

impl PartitionEngine {
    pub fn new(key_column: impl Into<String>, groups: Vec<ConditionGroup>) -> Self {
        Self {
            key_column: key_column.into(),
            groups,
        }
    }

    /// Build an engine from a partition rule, compiling every group.
    pub fn from_rule(rule: &PartitionRule) -> Self {
        let groups = rule
            .spec
            .groups
            .iter()
            .map(|(name, specs)| ConditionGroup::compile(name.clone(), specs))
            .collect();
        Self::new(rule.spec.key_column.clone(), groups)
    }

    /// Run the full split: duplicates first, then each group in order.
    ///
    /// The pool is threaded through the groups as a fold accumulator; a group
    /// only ever sees the rows no earlier group claimed.
    pub fn run(&self, rows: RowSet) -> PartitionOutcome {
        let (unique, duplicates) = split_duplicates(rows, &self.key_column);
        info!(
            unique = unique.len(),
            duplicates = duplicates.len(),
            key_column = %self.key_column,
            "split duplicates"
        );

        let (partitions, remainder) = self.groups.iter().fold(
            (IndexMap::<String, RowSet>::new(), unique),
            |(mut partitions, pool), group| {
                let (matched, rest) = group.apply(pool);
                info!(group = %group.name, rows = matched.len(), remaining = rest.len(), "partition emitted");
                match partitions.get_mut(&group.name) {
                    // A repeated group name accumulates into the first partition.
                    Some(existing) => existing.records.extend(matched.records),
                    None => {
                        partitions.insert(group.name.clone(), matched);
                    }
                }
                (partitions, rest)
            },
        );

        PartitionOutcome {
            duplicates,
            partitions,
            remainder,
        }
    }
}

impl PartitionOutcome {
    pub fn counts(&self) -> PartitionCounts {
        PartitionCounts {
            duplicates: self.duplicates.len(),
            partitions: self
                .partitions
                .iter()
                .map(|(name, rows)| (name.clone(), rows.len()))
                .collect(),
            remainder: self.remainder.len(),
        }
    }

    /// Total rows across all outputs; equals the input row count.
    pub fn total_rows(&self) -> usize {
        self.duplicates.len()
            + self.partitions.values().map(RowSet::len).sum::<usize>()
            + self.remainder.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Predicate;
    use crate::schema::PredicateMode;
    use checksift_core::Record;

    fn check(host: &str, status: Option<&str>) -> Record {
        Record::from_pairs([("Hostname", Some(host)), ("Status", status)])
    }

    fn table(records: Vec<Record>) -> RowSet {
        RowSet::with_records(vec!["Hostname".into(), "Status".into()], records)
    }

    fn contains(column: &str, pattern: &str) -> Predicate {
        Predicate::new(column, pattern, PredicateMode::Contains).unwrap()
    }

    fn sorted(mut records: Vec<Record>) -> Vec<String> {
        let mut out: Vec<String> = records
            .drain(..)
            .map(|r| format!("{}|{}", r.text("Hostname"), r.text("Status")))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn duplicate_then_group_then_remainder() {
        let rows = table(vec![
            check("a.test.com", Some("active")),
            check("a.test.com", Some("paused")),
            check("b.prod.com", Some("active")),
        ]);
        let engine = PartitionEngine::new(
            "Hostname",
            vec![ConditionGroup::new("test", vec![contains("Hostname", "test")])],
        );

        let out = engine.run(rows);
        assert_eq!(out.duplicates.records, vec![check("a.test.com", Some("paused"))]);
        assert_eq!(out.partitions["test"].records, vec![check("a.test.com", Some("active"))]);
        assert_eq!(out.remainder.records, vec![check("b.prod.com", Some("active"))]);
    }

    #[test]
    fn earlier_group_claims_the_row() {
        let rows = table(vec![check("x.test.com", Some("paused"))]);
        let engine = PartitionEngine::new(
            "Hostname",
            vec![
                ConditionGroup::new("paused", vec![contains("Status", "paused")]),
                ConditionGroup::new("test", vec![contains("Hostname", "test")]),
            ],
        );

        let out = engine.run(rows);
        assert_eq!(out.partitions["paused"].len(), 1);
        assert!(out.partitions["test"].is_empty());
        assert!(out.remainder.is_empty());
    }

    #[test]
    fn outputs_cover_input_exactly_once() {
        let input = vec![
            check("a.test.com", Some("active")),
            check("b.uat.com", Some("paused")),
            check("a.test.com", None),
            check("c.prod.com", None),
            check("d.prod.com", Some("Paused")),
            check(" c.prod.com", Some("active")),
            check("e.stage.com", Some("active")),
        ];
        let engine = PartitionEngine::new(
            "Hostname",
            vec![
                ConditionGroup::new("paused", vec![contains("Status", "paused")]),
                ConditionGroup::new("test", vec![contains("Hostname", "test|uat|stage")]),
                ConditionGroup::new("ghost", vec![contains("Owner", "x")]),
            ],
        );

        let out = engine.run(table(input.clone()));
        assert_eq!(out.total_rows(), input.len());

        let mut all = out.duplicates.records.clone();
        for rows in out.partitions.values() {
            all.extend(rows.records.iter().cloned());
        }
        all.extend(out.remainder.records.iter().cloned());
        assert_eq!(sorted(all), sorted(input));

        // the ghost group only references a missing column, so it claims the whole pool
        assert!(out.remainder.is_empty());
        let counts = out.counts();
        assert_eq!(counts.duplicates, 2);
        assert_eq!(counts.partitions["paused"], 2);
        assert_eq!(counts.partitions["test"], 2);
        assert_eq!(counts.partitions["ghost"], 1);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let rows = table(vec![
            check("a.test.com", Some("active")),
            check("b.prod.com", Some("paused")),
            check("c.prod.com", Some("active")),
        ]);
        let engine = PartitionEngine::new(
            "Hostname",
            vec![ConditionGroup::new("paused", vec![contains("Status", "paused")])],
        );
        let first = engine.run(rows.clone());
        let second = engine.run(rows);
        assert_eq!(first.partitions, second.partitions);
        assert_eq!(first.remainder, second.remainder);
        assert_eq!(first.duplicates, second.duplicates);
    }

    #[test]
    fn repeated_group_names_accumulate() {
        let rows = table(vec![
            check("a.test.com", Some("active")),
            check("b.prod.com", Some("paused")),
        ]);
        let engine = PartitionEngine::new(
            "Hostname",
            vec![
                ConditionGroup::new("flagged", vec![contains("Hostname", "test")]),
                ConditionGroup::new("flagged", vec![contains("Status", "paused")]),
            ],
        );
        let out = engine.run(rows);
        assert_eq!(out.partitions.len(), 1);
        assert_eq!(out.partitions["flagged"].len(), 2);
        assert_eq!(out.total_rows(), 2);
    }

    #[test]
    fn from_rule_compiles_groups_in_order() {
        let rule: PartitionRule = serde_yaml::from_str(
            r#"
apiVersion: v1
kind: PartitionConfig
metadata:
  id: triage
  name: Triage
spec:
  groups:
    paused:
      - [Status, paused, contains]
      - [Status, paused, bogus_mode]
    test:
      - [Hostname, test, contains]
"#,
        )
        .unwrap();

        let engine = PartitionEngine::from_rule(&rule);
        assert_eq!(engine.key_column, "Hostname");
        let names: Vec<&str> = engine.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["paused", "test"]);
        assert_eq!(engine.groups[0].predicates.len(), 1);
    }
}
