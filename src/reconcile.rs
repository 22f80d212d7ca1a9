//! Reconciliation of the event log into the fixture file.
//!
//! A pass event approves the comparisons attributed to its own call site
//! (file and line).
//!
//! The log is walked newest to oldest. Within one assertion the comparisons
//! are logged before the pass that certifies their line, so walking backwards
//! sees the certification first and can approve comparisons as it reaches
//! them. Walking backwards also makes the last executed comparison for a key
//! the one that is kept.

use crate::event::{display_actual, Event, FixtureId};
use crate::warning::{UsageWarning, WarningKind};
use golden_fixture_store::FixtureDocument;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Final value for one key.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciled {
    Value(toml::Value),
    /// Remove the key from the file.
    Absent,
}

impl Reconciled {
    fn as_value(&self) -> Option<&toml::Value> {
        match self {
            Reconciled::Value(value) => Some(value),
            Reconciled::Absent => None,
        }
    }
}

pub type ReconciledMap = BTreeMap<String, Reconciled>;

#[derive(Debug, Default)]
pub struct Reconciliation {
    pub map: ReconciledMap,
    /// In execution order.
    pub warnings: Vec<UsageWarning>,
}

/// Compute the final map for `fixture` and mark approved comparisons.
///
/// With `assertion_hook` unset nothing can be approved, so every recorded
/// comparison is accepted.
pub fn reconcile(events: &mut [Event], fixture: FixtureId, assertion_hook: bool) -> Reconciliation {
    let mut map = ReconciledMap::new();
    let mut approved_sites = HashSet::new();
    let mut warnings = Vec::new();

    for event in events.iter_mut().rev() {
        let comparison = match event {
            Event::AssertionPass(pass) => {
                approved_sites.insert(pass.call_site);
                continue;
            }
            Event::Comparison(comparison) if comparison.fixture == fixture => comparison,
            Event::Comparison(_) => continue,
        };

        if approved_sites.contains(&comparison.call_site) {
            comparison.approved = true;
        }
        if assertion_hook && !comparison.approved {
            warnings.push(UsageWarning::new(
                WarningKind::OutsideAssert,
                format!(
                    "Comparison to a golden output '{}' outside of an assert is ignored:\n{}",
                    comparison.key,
                    comparison.describe()
                ),
                comparison.call_site,
            ));
            continue;
        }

        let value = match &comparison.actual {
            Some(value) => Reconciled::Value(value.clone()),
            None => Reconciled::Absent,
        };
        match map.get(&comparison.key) {
            Some(chosen) if *chosen != value => {
                warnings.push(UsageWarning::new(
                    WarningKind::ConflictingValues,
                    format!(
                        "Comparison to golden output '{}' has gotten conflicting values: {} vs {}",
                        comparison.key,
                        display_actual(value.as_value()),
                        display_actual(chosen.as_value())
                    ),
                    comparison.call_site,
                ));
            }
            Some(_) => {}
            None => {
                map.insert(comparison.key.clone(), value);
            }
        }
    }

    warnings.reverse();
    Reconciliation { map, warnings }
}

/// Write `map` into `doc`, returning whether anything changed.
pub fn apply(doc: &mut FixtureDocument, map: &ReconciledMap) -> bool {
    let mut changed = false;
    for (key, value) in map {
        changed |= match value {
            Reconciled::Value(value) => doc.set(key, value),
            Reconciled::Absent => doc.remove(key),
        };
    }
    changed
}

/// Keys of `doc` the test never read, sorted.
pub fn unused_fields(doc: &FixtureDocument, used: &BTreeSet<String>) -> Vec<String> {
    let mut unused: Vec<String> = doc
        .keys()
        .into_iter()
        .filter(|key| !used.contains(key))
        .collect();
    unused.sort();
    unused
}
