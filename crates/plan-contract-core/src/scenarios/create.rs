// crates/plan-contract-core/src/scenarios/create.rs
// ============================================================================
// Module: Create Validation Scenario
// Description: Required-field validation and slug uniqueness on create.
// Purpose: Verify the server rejects incomplete and conflicting plans.
// Dependencies: serde_json
// ============================================================================

use serde_json::json;

use super::ScenarioRun;
use crate::error::ContractResult;
use crate::expect::expect_body_hints;
use crate::expect::expect_status_in;
use crate::fixtures::slug_variant;
use crate::fixtures::unique_slug;
use crate::plan::NewPlan;
use crate::plan::PlanStatus;
use crate::plan::Priority;

/// Create validation: empty body rejected, duplicate slug rejected, fresh slug accepted.
pub(super) async fn create_validation(run: &mut ScenarioRun) -> ContractResult<()> {
    let admin = run.admin_plans().await?;

    let response = admin.create_raw(json!({})).await?;
    run.adopt_if_created(&response);
    expect_status_in(&response, &[400, 422], "creating an empty plan is rejected")?;
    expect_body_hints(
        &response,
        &[&["title", "slug", "content"]],
        "rejection names a required field",
    )?;
    run.check(format!("{} rejected an empty body with {}", response.endpoint(), response.status_code()));

    let slug = unique_slug();
    let first = NewPlan::fixture(slug.clone(), Priority::Medium, PlanStatus::Draft);
    let created = run.create_fixture(&first, "creating a plan with a fresh slug succeeds").await?;
    run.check(format!("created plan {} with slug {slug}", created.id));

    let duplicate = NewPlan::fixture(slug.clone(), Priority::Low, PlanStatus::Draft);
    let response = admin.create_raw(duplicate.to_json()).await?;
    run.adopt_if_created(&response);
    expect_status_in(&response, &[400, 409, 422], "creating a plan with a taken slug is rejected")?;
    expect_body_hints(&response, &[&["slug"]], "rejection names the slug")?;
    run.check(format!("duplicate slug rejected with {}", response.status_code()));

    let unique = NewPlan::fixture(slug_variant(&slug, "unique"), Priority::High, PlanStatus::Draft);
    let created = run.create_fixture(&unique, "creating a plan with a distinct slug succeeds").await?;
    run.check(format!("created plan {} with slug {}", created.id, created.slug));
    Ok(())
}
