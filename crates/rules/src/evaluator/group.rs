//! Named AND-groups of predicates.

use tracing::{debug, info, warn};

use checksift_core::RowSet;

use crate::schema::ConditionSpec;

use super::Predicate;

/// An ordered list of predicates combined with logical AND.
///
/// An empty group matches every row.
#[derive(Debug, Clone)]
pub struct ConditionGroup {
    pub name: String,
    pub predicates: Vec<Predicate>,
}

impl ConditionGroup {
    pub fn new(name: impl Into<String>, predicates: Vec<Predicate>) -> Self {
        Self {
            name: name.into(),
            predicates,
        }
    }

    /// Compile YAML conditions, dropping (and logging) the ones that fail.
    pub fn compile(name: impl Into<String>, specs: &[ConditionSpec]) -> Self {
        let name = name.into();
        let mut predicates = Vec::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            match Predicate::compile(spec) {
                Ok(p) => predicates.push(p),
                Err(e) => {
                    warn!(group = %name, condition = index, error = %e, "skipping invalid condition");
                }
            }
        }
        Self { name, predicates }
    }

    /// Split `pool` into `(matched, unmatched)`, both in input order.
    ///
    /// Predicates on columns the pool does not have abstain, so they never
    /// narrow the match.
    pub fn apply(&self, pool: RowSet) -> (RowSet, RowSet) {
        let active: Vec<&Predicate> = self
            .predicates
            .iter()
            .filter(|p| {
                let present = pool.has_column(&p.column);
                if !present {
                    warn!(group = %self.name, column = %p.column, "column not found, condition abstains");
                }
                present
            })
            .collect();

        let mask: Vec<bool> = pool
            .iter()
            .map(|record| active.iter().all(|p| p.evaluate(record)))
            .collect();

        let (matched, unmatched) = pool.split_by_mask(&mask);
        debug!(
            group = %self.name,
            matched = matched.len(),
            unmatched = unmatched.len(),
            "applied condition group"
        );
        (matched, unmatched)
    }
}

/// Apply a post-filter group to an enriched row set.
pub fn post_filter(rows: RowSet, group: &ConditionGroup) -> (RowSet, RowSet) {
    let (matched, residual) = group.apply(rows);
    if matched.is_empty() {
        info!(group = %group.name, "no rows passed the post-filter");
    } else {
        info!(group = %group.name, matched = matched.len(), residual = residual.len(), "post-filter applied");
    }
    (matched, residual)
}
