//! Hashtag association reconciliation and orphan sweeping

use super::extractor::extract;
use super::model::{HashtagName, HashtagRecord};
use crate::error::Result;
use crate::store::HashtagStore;
use crate::types::HashtagId;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Association change produced by an article edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HashtagDiff {
    /// Ids associated before the edit; each must be swept after commit
    pub candidate_orphans: BTreeSet<HashtagId>,
    /// Names associated now but not before
    pub added: BTreeSet<HashtagName>,
    /// Names associated before but not now
    pub removed: BTreeSet<HashtagName>,
}

/// Outcome of a best-effort orphan sweep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Records that had no referencing article and were deleted
    pub deleted: Vec<HashtagId>,
    /// Records that are still referenced, or were already gone
    pub retained: Vec<HashtagId>,
    /// Records whose check failed; they stay behind for a later sweep
    pub failed: Vec<(HashtagId, String)>,
}

impl SweepReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Derives hashtag associations from article content through a [`HashtagStore`]
pub struct HashtagReconciler<'a, S: HashtagStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: HashtagStore + ?Sized> HashtagReconciler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Associations for newly created content.
    ///
    /// Existing records are reused by name; the rest are created unsaved.
    /// Nothing is deleted.
    pub fn reconcile(&self, content: &str) -> Result<BTreeSet<HashtagRecord>> {
        let names = extract(content);
        if names.is_empty() {
            return Ok(BTreeSet::new());
        }

        let mut existing: BTreeMap<HashtagName, HashtagRecord> = self
            .store
            .find_hashtags_by_name(&names)?
            .into_iter()
            .filter(|record| names.contains(&record.name))
            .map(|record| (record.name.clone(), record))
            .collect();

        let mut records = BTreeSet::new();
        for name in names {
            match existing.remove(&name) {
                Some(record) => {
                    debug!("Reusing hashtag '{}' ({:?})", name, record.id);
                    records.insert(record);
                }
                None => {
                    debug!("Creating hashtag '{}'", name);
                    records.insert(self.store.create_hashtag(name)?);
                }
            }
        }

        Ok(records)
    }

    /// Replace `associations` with the hashtags of `new_content`.
    ///
    /// The returned diff carries every previously associated id, including
    /// ones that stay associated, for [`sweep_orphans`](Self::sweep_orphans)
    /// once the change is committed. On error `associations` is untouched.
    pub fn reconcile_update(
        &self,
        associations: &mut BTreeSet<HashtagRecord>,
        new_content: &str,
    ) -> Result<HashtagDiff> {
        let candidate_orphans: BTreeSet<HashtagId> =
            associations.iter().filter_map(|record| record.id).collect();

        let desired = self.reconcile(new_content)?;

        let added = desired
            .difference(associations)
            .map(|record| record.name.clone())
            .collect();
        let removed = associations
            .difference(&desired)
            .map(|record| record.name.clone())
            .collect();

        *associations = desired;

        Ok(HashtagDiff {
            candidate_orphans,
            added,
            removed,
        })
    }

    /// Delete each candidate that no article references any more.
    ///
    /// Must run after the association change is committed. Failures are
    /// collected, never propagated.
    pub fn sweep_orphans<'i>(
        &self,
        candidates: impl IntoIterator<Item = &'i HashtagId>,
    ) -> SweepReport {
        let mut report = SweepReport::default();

        for id in candidates {
            match self.store.delete_hashtag_if_orphaned(*id) {
                Ok(true) => {
                    info!("Deleted orphaned hashtag {}", id);
                    report.deleted.push(*id);
                }
                Ok(false) => report.retained.push(*id),
                Err(e) => {
                    warn!("Failed to sweep hashtag {}: {}", id, e);
                    report.failed.push((*id, e.to_string()));
                }
            }
        }

        report
    }
}
