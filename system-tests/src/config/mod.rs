// system-tests/src/config/mod.rs
// ============================================================================
// Module: System Test Configuration
// Description: Environment settings for contract system tests.
// Purpose: Provide typed access to test environment settings and defaults.
// Dependencies: plan-contract-core
// ============================================================================

//! ## Overview
//! System-test configuration is read from environment variables and mapped into
//! a small typed structure for reuse across test helpers. The target itself
//! (base URL, credentials) is configured through `plan-contract-core`.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::DEFAULT_STUB_TIMEOUT;
pub use env::SystemTestConfig;
pub use env::SystemTestEnv;
