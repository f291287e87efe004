// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Deep merge of JSON settings trees.
//!
//! A __master__ settings tree is merged into a __local__ settings tree. The
//! local tree is generally preserved: keys it already holds keep their value
//! unless force mode is active. Keys only the master holds are adopted. Keys
//! only the local tree holds survive untouched.
//!
//! # Qualified Keys
//!
//! Every key reachable from the master tree is reported through its
//! __qualified key__, i.e., the dot-joined path of object keys from the root,
//! e.g., `"permissions.allow"`. Qualified keys exist for reporting only. They
//! are never used to look anything up.
//!
//! # Classification
//!
//! Each qualified key of the master tree lands in exactly one of four sets:
//!
//! 1. __Added__: absent from local, so the whole master value was adopted.
//! 2. __Matching__: present in both with deeply equal values.
//! 3. __Conflicts__: present in both with different values, local value kept.
//! 4. __Forced__: a conflict that force mode resolved in favour of master.
//!
//! Objects present on both sides are never classified themselves. They are
//! descended into, and their keys are classified instead. A key that is an
//! object on one side and anything else on the other side is an ordinary
//! conflict.
//!
//! Keys present in the original local tree but absent from master at the same
//! path are reported separately as __local-only__.

pub mod value;

use crate::merge::value::deep_eq;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// JSON object tree.
pub type Object = Map<String, Value>;

/// Key whose master and local values differ.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    /// Qualified key of the conflict.
    pub key: String,

    /// Value held by the master tree.
    pub master: Value,

    /// Value held by the local tree.
    pub local: Value,
}

/// Outcome of a merge.
///
/// Owns the merged tree and the classification of every qualified key that
/// was visited. All key listings are sorted.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MergeReport {
    /// The merged settings tree.
    pub merged: Object,

    /// Keys adopted from master.
    pub added: Vec<String>,

    /// Keys whose values were already identical.
    pub matching: Vec<String>,

    /// Keys that differ where the local value was kept.
    pub conflicts: Vec<Conflict>,

    /// Keys that differ where the master value was applied.
    pub forced: Vec<String>,

    /// Keys only the local tree holds.
    pub local_only: Vec<String>,
}

impl MergeReport {
    /// Check if merged tree differs from local tree that produced it.
    ///
    /// Only additions and forced overwrites modify the local tree.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.forced.is_empty()
    }
}

/// Merge master tree into local tree.
///
/// Neither input is mutated. Local values win over master values unless
/// `force` is set, in which case master values win. Never fails.
#[instrument(skip(master, local), level = "debug")]
pub fn merge(master: &Object, local: &Object, force: bool) -> MergeReport {
    let mut report = MergeReport::default();
    let merged = merge_level(master, local, "", force, &mut report);
    report.merged = merged;

    report.added.sort();
    report.matching.sort();
    report.forced.sort();
    report.local_only.sort();
    report.conflicts.sort_by(|lhs, rhs| lhs.key.cmp(&rhs.key));

    debug!(
        "merge done: {} added, {} forced, {} conflicts, {} matching, {} local-only",
        report.added.len(),
        report.forced.len(),
        report.conflicts.len(),
        report.matching.len(),
        report.local_only.len()
    );

    report
}

/// Merge one level of master into a copy of the local object at that level.
///
/// Builds the merged object bottom-up. Since the copy starts out identical to
/// `local`, and each master key is visited exactly once, `local` always holds
/// the value the merged object had before that key was processed. It also
/// remains the untouched original for local-only bookkeeping.
fn merge_level(
    master: &Object,
    local: &Object,
    prefix: &str,
    force: bool,
    report: &mut MergeReport,
) -> Object {
    let mut merged = local.clone();

    for (key, master_value) in master {
        let qualified = qualified_key(prefix, key);

        match (master_value, local.get(key)) {
            (_, None) => {
                merged.insert(key.clone(), master_value.clone());
                report.added.push(qualified);
            }
            (Value::Object(master_obj), Some(Value::Object(local_obj))) => {
                let nested = merge_level(master_obj, local_obj, &qualified, force, report);
                merged.insert(key.clone(), Value::Object(nested));
            }
            (_, Some(local_value)) if deep_eq(master_value, local_value) => {
                report.matching.push(qualified);
            }
            (_, Some(_)) if force => {
                merged.insert(key.clone(), master_value.clone());
                report.forced.push(qualified);
            }
            (_, Some(local_value)) => {
                report.conflicts.push(Conflict {
                    key: qualified,
                    master: master_value.clone(),
                    local: local_value.clone(),
                });
            }
        }
    }

    // INVARIANT: Only keys of the original local object can be local-only.
    report.local_only.extend(
        local
            .keys()
            .filter(|key| !master.contains_key(*key))
            .map(|key| qualified_key(prefix, key)),
    );

    merged
}

fn qualified_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
