// crates/plan-contract-core/src/http/mod.rs
// ============================================================================
// Module: HTTP Layer
// Description: HTTP client wrapper and buffered responses.
// Purpose: Give scenarios a single, retry-free way to reach the remote API.
// Dependencies: reqwest
// ============================================================================

mod client;
mod response;


pub use client::ApiRequest;
pub use client::HttpClient;
pub use client::HttpMethod;
pub use client::MAX_RESPONSE_BYTES;
pub use client::RequestBody;
pub use client::TranscriptEntry;
pub use client::parse_cookie_names;
pub use response::ApiResponse;
pub use reqwest::StatusCode;
