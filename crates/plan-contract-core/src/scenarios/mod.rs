// crates/plan-contract-core/src/scenarios/mod.rs
// ============================================================================
// Module: Contract Scenarios
// Description: Scenario catalog and the runner that always releases fixtures.
// Purpose: Compose client, auth, and resource helpers into contract checks.
// Dependencies: serde, tracing
// ============================================================================

//! ## Overview
//! Each scenario is an async body over a [`ScenarioRun`]. Bodies fail through
//! `Result` only, so [`run_scenario`] can always release the fixture ledger
//! after the body returns, whatever its outcome.
//!
//! Scenarios are independent: every fixture slug is freshly generated and
//! every run gets its own clients and cookie jars, so scenarios may run
//! concurrently against the same target.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod admin;
mod context;
mod create;
mod delete;
mod public;
mod update;


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use std::time::Instant;

use serde::Serialize;

pub use self::context::ClientTranscript;
pub use self::context::ScenarioRun;
pub use self::public::NONEXISTENT_PLAN_ID;
use crate::config::HarnessConfig;
use crate::error::ContractError;
use crate::fixtures::CleanupReport;

// ============================================================================
// SECTION: Scenario Catalog
// ============================================================================

/// Identifies one contract scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioId {
    /// Public listing: 200, cache header, only PUBLISHED plans.
    PublicListing,
    /// Public lookup by id and by slug; unknown id is 404.
    PublicLookup,
    /// Authenticated admin listing.
    AdminListing,
    /// Create validation and slug uniqueness.
    CreateValidation,
    /// Update round-trip, slug uniqueness, and enum validation.
    UpdateValidation,
    /// Delete and post-delete non-retrievability.
    Delete,
}

impl ScenarioId {
    /// Every scenario in execution order.
    pub const ALL: [Self; 6] = [
        Self::PublicListing,
        Self::PublicLookup,
        Self::AdminListing,
        Self::CreateValidation,
        Self::UpdateValidation,
        Self::Delete,
    ];

    /// Returns the stable scenario name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PublicListing => "public-listing",
            Self::PublicLookup => "public-lookup",
            Self::AdminListing => "admin-listing",
            Self::CreateValidation => "create-validation",
            Self::UpdateValidation => "update-validation",
            Self::Delete => "delete",
        }
    }

    /// Returns a one-line description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::PublicListing => {
                "public listing answers 200 with max-age=300 and only PUBLISHED plans"
            }
            Self::PublicLookup => "public lookup by id and by slug; unknown id answers 404",
            Self::AdminListing => "authenticated admin listing answers 200 with an array",
            Self::CreateValidation => "create rejects missing fields and duplicate slugs",
            Self::UpdateValidation => {
                "update round-trips fields and rejects duplicate slugs and invalid priority"
            }
            Self::Delete => "delete answers 200, then the plan is gone and a second delete is 404",
        }
    }

    /// Returns true when the scenario cannot run without admin credentials.
    ///
    /// `public-lookup` only logs in to seed a plan when the listing is empty.
    #[must_use]
    pub const fn requires_admin(self) -> bool {
        matches!(
            self,
            Self::AdminListing | Self::CreateValidation | Self::UpdateValidation | Self::Delete
        )
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioId {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ALL.into_iter().find(|id| id.as_str() == trimmed).ok_or_else(|| {
            let known = Self::ALL.map(Self::as_str).join(", ");
            format!("unknown scenario {trimmed:?} (expected one of: {known})")
        })
    }
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Result of one scenario run, cleanup included.
#[derive(Debug)]
pub struct ScenarioOutcome {
    /// Scenario that ran.
    pub scenario: ScenarioId,
    /// Body result; cleanup failures never appear here.
    pub result: Result<(), ContractError>,
    /// Checks that passed before the body returned.
    pub checks: Vec<String>,
    /// Fixture release report.
    pub cleanup: CleanupReport,
    /// Exchanges per client.
    pub transcript: Vec<ClientTranscript>,
    /// Wall-clock duration, cleanup included.
    pub elapsed: Duration,
}

impl ScenarioOutcome {
    /// Returns true when the body passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ContractError> {
        self.result.as_ref().err()
    }

    /// Returns the number of recorded exchanges.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.transcript.iter().map(|client| client.entries.len()).sum()
    }
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Runs one scenario and releases its fixtures.
///
/// Never fails itself: setup errors and contract violations both land in
/// [`ScenarioOutcome::result`].
pub async fn run_scenario(scenario: ScenarioId, config: &HarnessConfig) -> ScenarioOutcome {
    let started = Instant::now();
    tracing::info!(scenario = scenario.as_str(), base_url = %config.base_url, "scenario started");

    let mut run = match ScenarioRun::new(config.clone()) {
        Ok(run) => run,
        Err(err) => {
            tracing::info!(scenario = scenario.as_str(), error = %err, "scenario could not start");
            return ScenarioOutcome {
                scenario,
                result: Err(err),
                checks: Vec::new(),
                cleanup: CleanupReport::default(),
                transcript: Vec::new(),
                elapsed: started.elapsed(),
            };
        }
    };

    let result = match scenario {
        ScenarioId::PublicListing => public::public_listing(&mut run).await,
        ScenarioId::PublicLookup => public::public_lookup(&mut run).await,
        ScenarioId::AdminListing => admin::admin_listing(&mut run).await,
        ScenarioId::CreateValidation => create::create_validation(&mut run).await,
        ScenarioId::UpdateValidation => update::update_validation(&mut run).await,
        ScenarioId::Delete => delete::delete_lifecycle(&mut run).await,
    };

    let (checks, cleanup, transcript) = run.finish().await;
    let outcome = ScenarioOutcome {
        scenario,
        result,
        checks,
        cleanup,
        transcript,
        elapsed: started.elapsed(),
    };
    match outcome.error() {
        None => tracing::info!(
            scenario = scenario.as_str(),
            checks = outcome.checks.len(),
            elapsed_ms = u64::try_from(outcome.elapsed.as_millis()).unwrap_or(u64::MAX),
            "scenario passed"
        ),
        Some(err) => tracing::info!(
            scenario = scenario.as_str(),
            kind = err.kind(),
            error = %err,
            "scenario failed"
        ),
    }
    outcome
}

/// Runs scenarios one after another.
pub async fn run_scenarios(scenarios: &[ScenarioId], config: &HarnessConfig) -> Vec<ScenarioOutcome> {
    let mut outcomes = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        outcomes.push(run_scenario(*scenario, config).await);
    }
    outcomes
}
