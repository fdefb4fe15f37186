// system-tests/src/lib.rs
// ============================================================================
// Module: Strategic Plan Contract System Tests Library
// Description: Shared configuration for the contract system-test binaries.
// Purpose: Provide typed access to system-test environment settings.
// Dependencies: plan-contract-core
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the system-test binaries in
//! `system-tests/tests`. The binaries drive every contract scenario against an
//! in-process stub of the remote API, or against a live target when the
//! `live-target` feature is enabled.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
