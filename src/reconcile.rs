//! Set reconciliation between a source of truth and a target collection.
//!
//! The reconciler only ever looks at keys. Ordering and duplicates of the
//! inputs are preserved in every output list so that upstream duplication
//! stays visible.

use serde::{Deserialize, Serialize};

use crate::normalize::Normalizer;

/// Which side of the comparison gets a normalized second pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Only extra target keys are retried; missing keys are exact misses.
    #[default]
    ExtraOnly,
    /// Missing source keys are retried against the target as well.
    Symmetric,
}

/// A target key that matched a source key only after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedMatch<K> {
    /// The key as it appears in the target.
    pub target: K,
    /// The source key it was matched to.
    pub source: K,
}

/// Outcome of comparing a source key sequence with a target key sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult<K> {
    /// Number of source keys, duplicates included.
    pub total_source: usize,
    /// Number of target keys, duplicates included.
    pub total_target: usize,
    /// Source keys found in the target, in source order.
    pub present_in_target: Vec<K>,
    /// Source keys with no exact match in the target, in source order.
    pub missing_in_target: Vec<K>,
    /// Target keys with no match in the source, exact or normalized, in
    /// target order.
    pub extra_in_target: Vec<K>,
    /// Extra keys absorbed by the normalized second pass.
    pub normalized_matches: Vec<NormalizedMatch<K>>,
    /// Extra keys that survived the normalized second pass.
    pub residual_extra: Vec<K>,
    /// Missing keys that survived a normalized retry; `None` unless the
    /// policy was [`RetryPolicy::Symmetric`].
    pub residual_missing: Option<Vec<K>>,
}

impl<K> ReconciliationResult<K> {
    /// Missing keys that count as drift under the policy used.
    #[must_use]
    pub fn effective_missing(&self) -> &[K] {
        self.residual_missing.as_deref().unwrap_or(&self.missing_in_target)
    }

    /// Returns `true` when nothing is missing and no extra key survived.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.effective_missing().is_empty() && self.residual_extra.is_empty()
    }

    /// Returns `true` when source and target agree without normalization.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.missing_in_target.is_empty()
            && self.extra_in_target.is_empty()
            && self.normalized_matches.is_empty()
    }
}

/// Compares `source` against `target`.
///
/// Exact membership decides `missing_in_target` and the candidate extras.
/// Every candidate is then normalized and compared with the normalized source
/// keys; matches are dropped from `extra_in_target` and recorded in
/// `normalized_matches`, the rest stay and are listed in `residual_extra`.
/// Missing keys get the same retry only under [`RetryPolicy::Symmetric`].
#[must_use]
pub fn reconcile<K>(
    source: &[K],
    target: &[K],
    normalizer: &Normalizer,
    policy: RetryPolicy,
) -> ReconciliationResult<K>
where
    K: AsRef<str> + Clone + PartialEq,
{
    let (present_in_target, missing_in_target): (Vec<K>, Vec<K>) =
        source.iter().cloned().partition(|k| target.contains(k));
    let exact_extra: Vec<K> = target.iter().filter(|k| !source.contains(k)).cloned().collect();

    let mut normalized_matches = Vec::new();
    let mut residual_extra = Vec::new();
    if !exact_extra.is_empty() {
        let source_keys: Vec<String> = source.iter().map(|k| normalizer.normalize(k.as_ref())).collect();
        for extra in exact_extra {
            let key = normalizer.normalize(extra.as_ref());
            match source_keys.iter().position(|s| *s == key) {
                Some(i) => normalized_matches.push(NormalizedMatch { target: extra, source: source[i].clone() }),
                None => residual_extra.push(extra),
            }
        }
    }
    let extra_in_target = residual_extra.clone();

    let residual_missing = match policy {
        RetryPolicy::ExtraOnly => None,
        RetryPolicy::Symmetric => {
            let target_keys: Vec<String> =
                target.iter().map(|k| normalizer.normalize(k.as_ref())).collect();
            Some(
                missing_in_target
                    .iter()
                    .filter(|k| !target_keys.contains(&normalizer.normalize(k.as_ref())))
                    .cloned()
                    .collect(),
            )
        }
    };

    ReconciliationResult {
        total_source: source.len(),
        total_target: target.len(),
        present_in_target,
        missing_in_target,
        extra_in_target,
        normalized_matches,
        residual_extra,
        residual_missing,
    }
}

/// Keys that occur more than once, each listed once in the order its second
/// occurrence appears.
#[must_use]
pub fn duplicates<K: Clone + PartialEq>(keys: &[K]) -> Vec<K> {
    let mut seen: Vec<&K> = Vec::new();
    let mut dups: Vec<K> = Vec::new();
    for key in keys {
        if seen.contains(&key) {
            if !dups.contains(key) {
                dups.push(key.clone());
            }
        } else {
            seen.push(key);
        }
    }
    dups
}
