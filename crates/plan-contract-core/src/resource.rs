// crates/plan-contract-core/src/resource.rs
// ============================================================================
// Module: Plan Resource Lifecycle
// Description: Typed and raw operations against the strategic-plan endpoints.
// Purpose: Wrap list/get/create/update/delete and normalize plan identifiers.
// Dependencies: serde_json, url
// ============================================================================

//! ## Overview
//! Each operation comes in up to two forms:
//!
//! - A typed form (`create`, `update`, `delete`, `list_admin`, `list_public`)
//!   that asserts the success status and decodes the plan(s).
//! - A raw form (`*_raw`, `get_public`) that returns the [`ApiResponse`]
//!   untouched, for negative paths where the caller asserts on the status and
//!   on hints in the error body. Error bodies are never parsed into types.
//!
//! Whether a call is authenticated depends only on the [`HttpClient`] the
//! resource was built with.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::auth::AuthSession;
use crate::error::ContractResult;
use crate::error::TransportError;
use crate::expect::expect_status;
use crate::http::ApiRequest;
use crate::http::ApiResponse;
use crate::http::HttpClient;
use crate::plan::NewPlan;
use crate::plan::PlanId;
use crate::plan::PlanPatch;
use crate::plan::StrategicPlan;
use crate::plan::decode_plan_list;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Base path of the strategic-plan resource.
pub const PLAN_BASE_PATH: &str = "/api/strategic-plan";

/// Public listing path.
pub const PUBLIC_LIST_PATH: &str = "/api/strategic-plan/public";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Public listing response together with its decoded plans.
#[derive(Debug, Clone)]
pub struct PlanListing {
    /// Raw response, for header checks.
    pub response: ApiResponse,
    /// Decoded plans.
    pub plans: Vec<StrategicPlan>,
}

/// Strategic-plan operations bound to one client.
#[derive(Debug, Clone)]
pub struct PlanResource {
    /// Client used for every call.
    client: HttpClient,
}

impl PlanResource {
    /// Binds the resource to a client (unauthenticated unless it carries a session).
    #[must_use]
    pub const fn new(client: HttpClient) -> Self {
        Self {
            client,
        }
    }

    /// Binds the resource to an admin session.
    #[must_use]
    pub fn for_session(session: &AuthSession) -> Self {
        Self::new(session.client().clone())
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &HttpClient {
        &self.client
    }

    // ------------------------------------------------------------------------
    // Public endpoints
    // ------------------------------------------------------------------------

    /// `GET /public`; expects 200 and a plan array.
    ///
    /// # Errors
    ///
    /// Returns a transport, assertion, or decode error.
    pub async fn list_public(&self) -> ContractResult<PlanListing> {
        let response = self.client.send(ApiRequest::get(PUBLIC_LIST_PATH)).await?;
        expect_status(&response, 200, "public listing succeeds")?;
        let plans = decode_plan_list(response.endpoint(), response.json()?)?;
        Ok(PlanListing {
            response,
            plans,
        })
    }

    /// `GET /public/{idOrSlug}`; returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the exchange fails.
    pub async fn get_public(&self, id_or_slug: &str) -> Result<ApiResponse, TransportError> {
        let path = format!("{PUBLIC_LIST_PATH}/{}", path_segment(id_or_slug));
        self.client.send(ApiRequest::get(path)).await
    }

    // ------------------------------------------------------------------------
    // Admin endpoints
    // ------------------------------------------------------------------------

    /// `GET /`; expects 200 and a plan array.
    ///
    /// # Errors
    ///
    /// Returns a transport, assertion, or decode error.
    pub async fn list_admin(&self) -> ContractResult<Vec<StrategicPlan>> {
        let response = self.client.send(ApiRequest::get(PLAN_BASE_PATH)).await?;
        expect_status(&response, 200, "admin listing succeeds")?;
        Ok(decode_plan_list(response.endpoint(), response.json()?)?)
    }

    /// `GET /{id}` with the session; used only to confirm a plan is gone.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the exchange fails.
    pub async fn get_admin_raw(&self, id: &PlanId) -> Result<ApiResponse, TransportError> {
        self.client.send(ApiRequest::get(item_path(id))).await
    }

    /// `POST /`; expects 201 and a plan with a resolvable identifier.
    ///
    /// # Errors
    ///
    /// Returns a transport, assertion, or decode error.
    pub async fn create(&self, plan: &NewPlan) -> ContractResult<StrategicPlan> {
        let response = self.create_raw(plan.to_json()).await?;
        expect_status(&response, 201, "plan creation succeeds")?;
        Ok(StrategicPlan::from_json(response.endpoint(), response.json()?)?)
    }

    /// `POST /` with an arbitrary JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the exchange fails.
    pub async fn create_raw(&self, body: Value) -> Result<ApiResponse, TransportError> {
        self.client.send(ApiRequest::post(PLAN_BASE_PATH).json(body)).await
    }

    /// `PATCH /{id}`; expects 200 and the updated plan.
    ///
    /// # Errors
    ///
    /// Returns a transport, assertion, or decode error.
    pub async fn update(&self, id: &PlanId, patch: &PlanPatch) -> ContractResult<StrategicPlan> {
        let response = self.update_raw(id, patch.to_json()).await?;
        expect_status(&response, 200, "plan update succeeds")?;
        Ok(StrategicPlan::from_json(response.endpoint(), response.json()?)?)
    }

    /// `PATCH /{id}` with an arbitrary JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the exchange fails.
    pub async fn update_raw(&self, id: &PlanId, body: Value) -> Result<ApiResponse, TransportError> {
        self.client.send(ApiRequest::patch(item_path(id)).json(body)).await
    }

    /// `DELETE /{id}`; expects 200.
    ///
    /// # Errors
    ///
    /// Returns a transport or assertion error.
    pub async fn delete(&self, id: &PlanId) -> ContractResult<()> {
        let response = self.delete_raw(id).await?;
        expect_status(&response, 200, "plan deletion succeeds")?;
        Ok(())
    }

    /// `DELETE /{id}`; returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the exchange fails.
    pub async fn delete_raw(&self, id: &PlanId) -> Result<ApiResponse, TransportError> {
        self.client.send(ApiRequest::delete(item_path(id))).await
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Path of a single plan under the admin base path.
fn item_path(id: &PlanId) -> String {
    format!("{PLAN_BASE_PATH}/{}", path_segment(id.as_str()))
}

/// Percent-encodes one path segment.
fn path_segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect::<String>().replace('+', "%20")
}
