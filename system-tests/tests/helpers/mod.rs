// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for strategic-plan contract system-tests.
// Purpose: Provide the API stub, harness configuration, and artifact reporting.
// Dependencies: system-tests, plan-contract-core
// ============================================================================

//! ## Overview
//! Shared helpers for the contract system-tests.
//! Invariants:
//! - Every suite talks to a fresh stub unless it targets a live deployment.
//! - Artifacts are written even when a test fails.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod api_stub;
