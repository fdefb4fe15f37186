// crates/plan-contract-core/src/lib.rs
// ============================================================================
// Module: Strategic Plan Contract Core
// Description: Black-box contract checks for the strategic-plan HTTP resource.
// Purpose: Provide the client, auth, lifecycle helpers, and scenarios.
// Dependencies: reqwest, serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! This crate verifies a remote application's strategic-plan API purely over
//! HTTP. It never links against the application; everything it knows is the
//! request/response contract.
//!
//! Layers, leaf first:
//!
//! - [`http`]: timeout-bounded client with a per-instance cookie jar.
//! - [`auth`]: CSRF + credentials handshake producing an [`AuthSession`].
//! - [`resource`]: list/get/create/update/delete with identifier normalization.
//! - [`scenarios`]: six independent contract scenarios with guaranteed cleanup.
//!
//! Security posture: the target is untrusted; response bodies are size-capped
//! and credentials are never logged.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod config;
pub mod error;
pub mod expect;
pub mod fixtures;
pub mod http;
pub mod plan;
pub mod report;
pub mod resource;
pub mod scenarios;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth::AuthSession;
pub use config::AdminCredentials;
pub use config::HarnessConfig;
pub use error::AssertionFailure;
pub use error::AuthError;
pub use error::ConfigError;
pub use error::ContractError;
pub use error::ContractResult;
pub use error::DecodeError;
pub use error::TransportError;
pub use fixtures::CleanupReport;
pub use fixtures::FixtureLedger;
pub use http::ApiRequest;
pub use http::ApiResponse;
pub use http::HttpClient;
pub use plan::NewPlan;
pub use plan::PlanId;
pub use plan::PlanPatch;
pub use plan::PlanStatus;
pub use plan::Priority;
pub use plan::StrategicPlan;
pub use report::RunArtifacts;
pub use resource::PlanResource;
pub use scenarios::ScenarioId;
pub use scenarios::ScenarioOutcome;
pub use scenarios::run_scenario;
pub use scenarios::run_scenarios;
