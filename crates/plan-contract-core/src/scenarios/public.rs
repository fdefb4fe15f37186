// crates/plan-contract-core/src/scenarios/public.rs
// ============================================================================
// Module: Public Scenarios
// Description: Unauthenticated listing and id/slug lookup checks.
// Purpose: Verify what anonymous visitors can see.
// Dependencies: none
// ============================================================================

use super::ScenarioRun;
use crate::error::AssertionFailure;
use crate::error::ContractResult;
use crate::expect::ensure;
use crate::expect::expect_status;
use crate::fixtures::unique_slug;
use crate::plan::NewPlan;
use crate::plan::PlanStatus;
use crate::plan::Priority;
use crate::plan::StrategicPlan;

/// Identifier that no plan is expected to have.
pub const NONEXISTENT_PLAN_ID: &str = "non-existent-id-1234567890";

/// Cache directive the public listing must carry.
const PUBLIC_MAX_AGE: &str = "max-age=300";

/// Public listing: 200, cache header, array of PUBLISHED plans.
pub(super) async fn public_listing(run: &mut ScenarioRun) -> ContractResult<()> {
    let listing = run.public_plans().list_public().await?;
    let endpoint = listing.response.endpoint();
    run.check(format!("{endpoint} answered 200 with {} plans", listing.plans.len()));

    let Some(cache_control) = listing.response.header("cache-control") else {
        return Err(AssertionFailure::new(
            endpoint,
            "public listing sets Cache-Control",
            format!("Cache-Control containing {PUBLIC_MAX_AGE}"),
            "no Cache-Control header",
        )
        .into());
    };
    ensure(
        cache_control.to_ascii_lowercase().contains(PUBLIC_MAX_AGE),
        endpoint,
        "public listing is cacheable for five minutes",
        format!("Cache-Control containing {PUBLIC_MAX_AGE}"),
        cache_control,
    )?;
    run.check(format!("Cache-Control: {cache_control}"));

    for plan in &listing.plans {
        let status = plan.status.as_ref().map_or("<missing>", PlanStatus::as_str);
        ensure(
            plan.status == Some(PlanStatus::Published),
            endpoint,
            "public listing only returns PUBLISHED plans",
            "status PUBLISHED",
            format!("plan {} ({}) has status {status}", plan.id, plan.slug),
        )?;
    }
    run.check("every listed plan is PUBLISHED");
    Ok(())
}

/// Public lookup by id and by slug, plus a 404 for an unknown id.
pub(super) async fn public_lookup(run: &mut ScenarioRun) -> ContractResult<()> {
    let public = run.public_plans();
    let mut listing = public.list_public().await?;

    if listing.plans.is_empty() && run.config().admin.is_some() {
        let seed = NewPlan::fixture(unique_slug(), Priority::Medium, PlanStatus::Published);
        let created =
            run.create_fixture(&seed, "seeding a PUBLISHED plan for lookup succeeds").await?;
        run.check(format!("seeded PUBLISHED plan {}", created.id));
        listing = public.list_public().await?;
    }

    let Some(target) = listing.plans.first().cloned() else {
        return Err(AssertionFailure::new(
            listing.response.endpoint(),
            "public listing has a plan to look up",
            "at least one PUBLISHED plan",
            "empty list",
        )
        .into());
    };

    let response = public.get_public(target.id.as_str()).await?;
    expect_status(&response, 200, "lookup by id succeeds")?;
    let by_id = StrategicPlan::from_json(response.endpoint(), response.json()?)?;
    ensure(
        by_id.id == target.id || by_id.slug == target.slug,
        response.endpoint(),
        "lookup by id returns the requested plan",
        format!("id {} or slug {}", target.id, target.slug),
        format!("id {} slug {}", by_id.id, by_id.slug),
    )?;
    run.check(format!("{} returned plan {}", response.endpoint(), by_id.id));

    let response = public.get_public(&target.slug).await?;
    expect_status(&response, 200, "lookup by slug succeeds")?;
    let by_slug = StrategicPlan::from_json(response.endpoint(), response.json()?)?;
    ensure(
        by_slug.slug == target.slug || by_slug.id == target.id,
        response.endpoint(),
        "lookup by slug returns the requested plan",
        format!("slug {} or id {}", target.slug, target.id),
        format!("slug {} id {}", by_slug.slug, by_slug.id),
    )?;
    run.check(format!("{} returned plan {}", response.endpoint(), by_slug.slug));

    let response = public.get_public(NONEXISTENT_PLAN_ID).await?;
    expect_status(&response, 404, "lookup of an unknown id answers 404")?;
    run.check(format!("{} answered 404", response.endpoint()));
    Ok(())
}
