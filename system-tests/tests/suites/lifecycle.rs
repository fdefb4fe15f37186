// system-tests/tests/suites/lifecycle.rs
// ============================================================================
// Module: Resource Lifecycle Tests
// Description: Typed plan operations through an authenticated session.
// Purpose: Validate the resource client and fixture ledger directly.
// Dependencies: system-tests helpers
// ============================================================================

//! Resource lifecycle coverage for strategic-plan contract system-tests.

use helpers::api_stub::StubBehavior;
use helpers::api_stub::spawn_api_stub;
use helpers::artifacts::TestReporter;
use helpers::harness::stub_config;
use plan_contract_core::AuthSession;
use plan_contract_core::ContractError;
use plan_contract_core::FixtureLedger;
use plan_contract_core::HttpClient;
use plan_contract_core::NewPlan;
use plan_contract_core::PlanId;
use plan_contract_core::PlanPatch;
use plan_contract_core::PlanResource;
use plan_contract_core::PlanStatus;
use plan_contract_core::Priority;
use plan_contract_core::fixtures::unique_slug;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn typed_create_update_delete_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("typed_create_update_delete_round_trip")?;
    let stub = spawn_api_stub(StubBehavior::default())?;
    let config = stub_config(&stub)?;
    let session = AuthSession::login(&config).await?;
    if session.csrf_token().is_empty() {
        return Err("login kept an empty CSRF token".into());
    }
    let plans = PlanResource::for_session(&session);

    let slug = unique_slug();
    let created = plans.create(&NewPlan::fixture(slug.clone(), Priority::Low, PlanStatus::Draft)).await?;
    if created.slug != slug || created.status != Some(PlanStatus::Draft) {
        return Err(format!("created plan does not echo the payload: {created:?}").into());
    }
    if plans.list_public().await?.plans.iter().any(|plan| plan.id == created.id) {
        return Err("draft plan visible on the public listing".into());
    }

    let patch = PlanPatch {
        status: Some(PlanStatus::Published),
        priority: Some(Priority::Critical),
        ..PlanPatch::default()
    };
    let updated = plans.update(&created.id, &patch).await?;
    if updated.status != Some(PlanStatus::Published) || updated.priority != Some(Priority::Critical) {
        return Err(format!("patch not applied: {updated:?}").into());
    }
    if !plans.list_public().await?.plans.iter().any(|plan| plan.id == created.id) {
        return Err("published plan missing from the public listing".into());
    }

    plans.delete(&created.id).await?;
    if stub.plan_count() != 0 {
        return Err(format!("plan survived delete: {:?}", stub.plans()).into());
    }

    reporter.finish("pass", vec!["create, publish, and delete observed through typed calls".to_string()])?;
    drop(reporter);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn admin_listing_requires_session() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("admin_listing_requires_session")?;
    let stub = spawn_api_stub(StubBehavior::default())?;
    let config = stub_config(&stub)?;
    let anonymous = PlanResource::new(HttpClient::from_config(&config)?);

    let failure = match anonymous.list_admin().await {
        Err(ContractError::Assertion(failure)) => failure,
        other => return Err(format!("expected an assertion failure, got {other:?}").into()),
    };
    if !failure.to_string().contains("401") {
        return Err(format!("failure should name the 401: {failure}").into());
    }

    reporter.finish("pass", vec!["anonymous admin listing rejected with 401".to_string()])?;
    drop(reporter);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn ledger_release_treats_missing_plans_as_deleted() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("ledger_release_treats_missing_plans_as_deleted")?;
    let stub = spawn_api_stub(StubBehavior::default())?;
    let config = stub_config(&stub)?;
    let session = AuthSession::login(&config).await?;
    let plans = PlanResource::for_session(&session);

    let created = plans
        .create(&NewPlan::fixture(unique_slug(), Priority::Medium, PlanStatus::Draft))
        .await?;
    let missing = PlanId::new("already-gone");
    let ledger = FixtureLedger::new();
    ledger.track(&missing);
    ledger.track(&created.id);

    let report = ledger.release(&plans).await;
    if !report.is_clean() {
        return Err(format!("cleanup reported failures: {:?}", report.failed).into());
    }
    if report.deleted != vec![created.id.clone(), missing] {
        return Err(format!("unexpected release order: {:?}", report.deleted).into());
    }
    if !ledger.tracked().is_empty() || stub.plan_count() != 0 {
        return Err("ledger or store not emptied".into());
    }

    reporter.finish("pass", vec!["404 on release counted as deleted".to_string()])?;
    drop(reporter);
    Ok(())
}
