// crates/plan-contract-core/src/fixtures.rs
// ============================================================================
// Module: Fixture Ledger
// Description: Per-scenario bookkeeping for plans created during a run.
// Purpose: Generate collision-free slugs and release fixtures best-effort.
// Dependencies: rand, tracing
// ============================================================================

//! ## Overview
//! Every plan a scenario creates is tracked in its [`FixtureLedger`] as soon
//! as the server assigns an identifier. Plans the scenario deletes itself are
//! forgotten. [`FixtureLedger::release`] runs after the scenario body,
//! whatever its outcome, and deletes what is left. Release failures are
//! logged at `warn` and reported, never raised.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;

use rand::Rng;
use serde::Serialize;

use crate::plan::PlanId;
use crate::resource::PlanResource;

// ============================================================================
// SECTION: Slugs
// ============================================================================

/// Prefix of every generated fixture slug.
pub const SLUG_PREFIX: &str = "test-plan";

/// Returns `test-plan-<8 lowercase hex>`.
#[must_use]
pub fn unique_slug() -> String {
    let suffix: u32 = rand::thread_rng().r#gen();
    format!("{SLUG_PREFIX}-{suffix:08x}")
}

/// Returns `<base>-<variant>`, e.g. `test-plan-1a2b3c4d-unique`.
#[must_use]
pub fn slug_variant(base: &str, variant: &str) -> String {
    format!("{base}-{variant}")
}

// ============================================================================
// SECTION: Ledger
// ============================================================================

/// Outcome of releasing a ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Plans confirmed gone (deleted now or already absent).
    pub deleted: Vec<PlanId>,
    /// Plans whose deletion failed, with the reason.
    pub failed: Vec<(PlanId, String)>,
}

impl CleanupReport {
    /// Returns true when nothing was left behind.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Identifiers of plans a scenario still owns.
#[derive(Debug, Default)]
pub struct FixtureLedger {
    /// Tracked identifiers in creation order.
    ids: Mutex<Vec<PlanId>>,
}

impl FixtureLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks a created plan; duplicates are ignored.
    pub fn track(&self, id: &PlanId) {
        if let Ok(mut ids) = self.ids.lock()
            && !ids.contains(id)
        {
            ids.push(id.clone());
        }
    }

    /// Stops tracking a plan the scenario deleted itself.
    pub fn forget(&self, id: &PlanId) {
        if let Ok(mut ids) = self.ids.lock() {
            ids.retain(|tracked| tracked != id);
        }
    }

    /// Returns the tracked identifiers.
    #[must_use]
    pub fn tracked(&self) -> Vec<PlanId> {
        self.ids.lock().map(|ids| ids.clone()).unwrap_or_default()
    }

    /// Deletes every tracked plan, newest first, and empties the ledger.
    ///
    /// A 200, 204 or 404 answer counts as gone.
    pub async fn release(&self, resource: &PlanResource) -> CleanupReport {
        let ids = match self.ids.lock() {
            Ok(mut ids) => std::mem::take(&mut *ids),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        let mut report = CleanupReport::default();
        for id in ids.into_iter().rev() {
            match resource.delete_raw(&id).await {
                Ok(response) if matches!(response.status_code(), 200 | 204 | 404) => {
                    tracing::debug!(plan_id = %id, status = response.status_code(), "fixture released");
                    report.deleted.push(id);
                }
                Ok(response) => {
                    let reason = format!("status {}: {}", response.status_code(), response.preview());
                    tracing::warn!(plan_id = %id, reason = %reason, "fixture cleanup failed");
                    report.failed.push((id, reason));
                }
                Err(err) => {
                    tracing::warn!(plan_id = %id, error = %err, "fixture cleanup failed");
                    report.failed.push((id, err.to_string()));
                }
            }
        }
        report
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
