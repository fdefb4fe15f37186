// crates/plan-contract-core/src/scenarios/update.rs
// ============================================================================
// Module: Update Validation Scenario
// Description: Field round-trip, slug uniqueness, and enum validation on update.
// Purpose: Verify PATCH applies changes and rejects invalid ones.
// Dependencies: serde_json
// ============================================================================

use serde_json::json;

use super::ScenarioRun;
use crate::error::ContractResult;
use crate::expect::ensure;
use crate::expect::expect_body_hints;
use crate::expect::expect_status;
use crate::expect::expect_status_at_least;
use crate::fixtures::slug_variant;
use crate::fixtures::unique_slug;
use crate::plan::NewPlan;
use crate::plan::PlanPatch;
use crate::plan::PlanStatus;
use crate::plan::Priority;
use crate::plan::StrategicPlan;

/// Update validation against an original and a conflicting fixture.
pub(super) async fn update_validation(run: &mut ScenarioRun) -> ContractResult<()> {
    let admin = run.admin_plans().await?;
    let base = unique_slug();

    let original = run
        .create_fixture(
            &NewPlan::fixture(base.clone(), Priority::Low, PlanStatus::Draft),
            "creating the plan to update succeeds",
        )
        .await?;
    let conflicting = run
        .create_fixture(
            &NewPlan::fixture(slug_variant(&base, "conflict"), Priority::Low, PlanStatus::Draft),
            "creating the conflicting plan succeeds",
        )
        .await?;
    run.check(format!("created plans {} and {}", original.id, conflicting.id));

    let patch = PlanPatch {
        title: Some(format!("Updated Contract Plan {base}")),
        slug: Some(slug_variant(&base, "updated")),
        content: Some(format!("Updated content for {base}.")),
        priority: Some(Priority::High),
        status: Some(PlanStatus::Published),
    };
    let response = admin.update_raw(&original.id, patch.to_json()).await?;
    expect_status(&response, 200, "updating every field succeeds")?;
    let updated = StrategicPlan::from_json(response.endpoint(), response.json()?)?;
    expect_fields(response.endpoint(), &updated, &patch, "update response reflects")?;
    run.check(format!("{} applied {} fields", response.endpoint(), patch.supplied_fields().len()));

    let response = run.public_plans().get_public(original.id.as_str()).await?;
    expect_status(&response, 200, "updated plan is readable by id")?;
    let reread = StrategicPlan::from_json(response.endpoint(), response.json()?)?;
    expect_fields(response.endpoint(), &reread, &patch, "re-read plan reflects")?;
    run.check("updated fields round-trip through the public lookup");

    let response =
        admin.update_raw(&original.id, json!({ "slug": conflicting.slug.clone() })).await?;
    expect_status_at_least(&response, 400, "updating to a taken slug is rejected")?;
    expect_body_hints(
        &response,
        &[&["slug"], &["unique", "duplicate"]],
        "rejection explains the slug conflict",
    )?;
    run.check(format!("slug conflict rejected with {}", response.status_code()));

    let invalid = PlanPatch {
        priority: Some(Priority::Other("INVALID_PRIORITY".to_string())),
        ..PlanPatch::default()
    };
    let response = admin.update_raw(&original.id, invalid.to_json()).await?;
    expect_status_at_least(&response, 400, "updating to an unknown priority is rejected")?;
    expect_body_hints(
        &response,
        &[&["priority", "validation", "zod", "enum"]],
        "rejection names the invalid priority",
    )?;
    run.check(format!("invalid priority rejected with {}", response.status_code()));
    Ok(())
}

/// Checks that every supplied patch field has the patched value.
fn expect_fields(
    endpoint: &str,
    plan: &StrategicPlan,
    patch: &PlanPatch,
    context: &str,
) -> ContractResult<()> {
    for (field, expected) in patch.supplied_fields() {
        let actual = plan.field(&field);
        ensure(
            actual.as_ref() == Some(&expected),
            endpoint,
            &format!("{context} {field}"),
            expected.to_string(),
            actual.map_or_else(|| "<missing>".to_string(), |value| value.to_string()),
        )?;
    }
    Ok(())
}
