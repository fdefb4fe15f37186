// crates/plan-contract-core/src/scenarios/context.rs
// ============================================================================
// Module: Scenario Context
// Description: Per-scenario clients, session, fixture ledger, and check log.
// Purpose: Own everything a scenario creates and hand it back for cleanup.
// Dependencies: serde
// ============================================================================

use serde::Serialize;

use crate::auth::AuthSession;
use crate::config::HarnessConfig;
use crate::error::ContractResult;
use crate::expect::ensure;
use crate::expect::expect_status;
use crate::fixtures::CleanupReport;
use crate::fixtures::FixtureLedger;
use crate::http::ApiResponse;
use crate::http::HttpClient;
use crate::http::TranscriptEntry;
use crate::plan::NewPlan;
use crate::plan::StrategicPlan;
use crate::plan::resolve_identifier;
use crate::resource::PlanResource;

/// Exchanges recorded by one client of a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ClientTranscript {
    /// `public` or `admin`.
    pub client: String,
    /// Recorded exchanges in order.
    pub entries: Vec<TranscriptEntry>,
}

/// State owned by one scenario run.
///
/// # Invariants
/// - Every 2xx create whose body names an identifier is in the ledger before
///   any assertion on that response runs, and stays there until
///   [`ScenarioRun::finish`] releases it.
/// - The admin session is created lazily, at most once.
#[derive(Debug)]
pub struct ScenarioRun {
    config: HarnessConfig,
    public: PlanResource,
    session: Option<AuthSession>,
    ledger: FixtureLedger,
    checks: Vec<String>,
}

impl ScenarioRun {
    /// Creates the context with an unauthenticated client.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ContractError::Transport`] when the client cannot be built.
    pub fn new(config: HarnessConfig) -> ContractResult<Self> {
        let public = PlanResource::new(HttpClient::from_config(&config)?);
        Ok(Self {
            config,
            public,
            session: None,
            ledger: FixtureLedger::new(),
            checks: Vec::new(),
        })
    }

    /// Returns the harness configuration.
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Returns the unauthenticated resource.
    #[must_use]
    pub fn public_plans(&self) -> PlanResource {
        self.public.clone()
    }

    /// Returns the admin resource, logging in on first use.
    ///
    /// # Errors
    ///
    /// Returns a config error without credentials and an auth error when the
    /// handshake fails.
    pub async fn admin_plans(&mut self) -> ContractResult<PlanResource> {
        if let Some(session) = &self.session {
            return Ok(PlanResource::for_session(session));
        }
        let session = AuthSession::login(&self.config).await?;
        self.check(format!("admin login established ({} cookies)", session.cookie_names().len()));
        let resource = PlanResource::for_session(&session);
        self.session = Some(session);
        Ok(resource)
    }

    /// Returns the fixture ledger.
    #[must_use]
    pub const fn ledger(&self) -> &FixtureLedger {
        &self.ledger
    }

    /// Records a passed check.
    pub fn check(&mut self, note: impl Into<String>) {
        self.checks.push(note.into());
    }

    /// Creates a plan as admin, expects 201, and tracks it.
    ///
    /// # Errors
    ///
    /// Returns a transport, auth, assertion, or decode error.
    pub async fn create_fixture(
        &mut self,
        plan: &NewPlan,
        expectation: &str,
    ) -> ContractResult<StrategicPlan> {
        let admin = self.admin_plans().await?;
        let response = admin.create_raw(plan.to_json()).await?;
        self.adopt_if_created(&response);
        expect_status(&response, 201, expectation)?;
        let created = StrategicPlan::from_json(response.endpoint(), response.json()?)?;
        ensure(
            created.slug == plan.slug,
            response.endpoint(),
            "created plan echoes the requested slug",
            plan.slug.clone(),
            created.slug.clone(),
        )?;
        Ok(created)
    }

    /// Tracks the plan behind any 2xx create response.
    ///
    /// Only the identifier is read, so a sparse or malformed body still gets
    /// its plan cleaned up. Negative paths call this too, in case the server
    /// accepts a request it should have refused.
    pub fn adopt_if_created(&self, response: &ApiResponse) {
        if !response.status().is_success() {
            return;
        }
        match response.json().ok().as_ref().and_then(resolve_identifier) {
            Some(id) => self.ledger.track(&id),
            None => tracing::warn!(
                endpoint = response.endpoint(),
                status = response.status_code(),
                "create answered without a resolvable plan id; fixture cannot be cleaned up"
            ),
        }
    }

    /// Releases fixtures and returns checks, cleanup report, and transcripts.
    pub async fn finish(self) -> (Vec<String>, CleanupReport, Vec<ClientTranscript>) {
        let cleanup = match &self.session {
            Some(session) => self.ledger.release(&PlanResource::for_session(session)).await,
            None => CleanupReport::default(),
        };
        let mut transcript = vec![ClientTranscript {
            client: "public".to_string(),
            entries: self.public.client().transcript(),
        }];
        if let Some(session) = &self.session {
            transcript.push(ClientTranscript {
                client: "admin".to_string(),
                entries: session.client().transcript(),
            });
        }
        (self.checks, cleanup, transcript)
    }
}
