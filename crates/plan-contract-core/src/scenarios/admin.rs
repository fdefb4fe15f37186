// crates/plan-contract-core/src/scenarios/admin.rs
// ============================================================================
// Module: Admin Listing Scenario
// Description: Authenticated listing check.
// Purpose: Verify the admin session reaches the admin listing.
// Dependencies: none
// ============================================================================

use super::ScenarioRun;
use crate::error::ContractResult;

/// Admin listing: login, then 200 with an array (possibly empty).
pub(super) async fn admin_listing(run: &mut ScenarioRun) -> ContractResult<()> {
    let admin = run.admin_plans().await?;
    let plans = admin.list_admin().await?;
    run.check(format!("admin listing answered 200 with {} plans", plans.len()));
    Ok(())
}
