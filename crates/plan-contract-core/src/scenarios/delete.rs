// crates/plan-contract-core/src/scenarios/delete.rs
// ============================================================================
// Module: Delete Scenario
// Description: Delete, then confirm the plan is gone everywhere.
// Purpose: Verify deletion and its idempotent 404 on repeat.
// Dependencies: none
// ============================================================================

use super::ScenarioRun;
use crate::error::ContractResult;
use crate::expect::expect_status;
use crate::expect::expect_status_in;
use crate::fixtures::unique_slug;
use crate::plan::NewPlan;
use crate::plan::PlanStatus;
use crate::plan::Priority;

/// Delete lifecycle: 200, then admin/public reads miss and a repeat DELETE is 404.
pub(super) async fn delete_lifecycle(run: &mut ScenarioRun) -> ContractResult<()> {
    let admin = run.admin_plans().await?;
    let created = run
        .create_fixture(
            &NewPlan::fixture(unique_slug(), Priority::Low, PlanStatus::Published),
            "creating the plan to delete succeeds",
        )
        .await?;

    admin.delete(&created.id).await?;
    run.check(format!("deleted plan {}", created.id));

    let response = admin.get_admin_raw(&created.id).await?;
    expect_status_in(&response, &[404, 400], "deleted plan is not retrievable by id")?;
    run.check(format!("{} answered {}", response.endpoint(), response.status_code()));

    let response = run.public_plans().get_public(created.id.as_str()).await?;
    expect_status(&response, 404, "deleted plan is not publicly retrievable")?;
    run.check(format!("{} answered 404", response.endpoint()));

    let response = admin.delete_raw(&created.id).await?;
    expect_status(&response, 404, "deleting a deleted plan answers 404")?;
    run.check("repeated delete answered 404");
    run.ledger().forget(&created.id);
    Ok(())
}
