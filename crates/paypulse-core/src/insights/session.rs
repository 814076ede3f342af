//! Insight Session state machine
//!
//! One session per activation of the insights panel:
//!
//! ```text
//! Idle ──trigger──▶ Loading ──ok──▶ Ready(result)
//!                      │
//!                      └──err──▶ Failed(failure)
//! Ready / Failed ──trigger──▶ Loading
//! ```
//!
//! At most one request is in flight per session. A trigger issued while
//! `Loading` starts nothing; it waits for the in-flight request and returns
//! the same resolved state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{info, warn};

use crate::models::Transaction;

use super::requester::InsightRequester;
use super::types::{AnalysisError, InsightResult};

/// Message shown to the user for every failed analysis
pub const FAILURE_MESSAGE: &str = "Failed to generate insights. Please try again.";

/// A failed analysis as presented to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFailure {
    /// User-facing text
    pub message: String,
    /// Underlying error, kept for logging and finer-grained handling
    pub error: AnalysisError,
}

impl From<AnalysisError> for SessionFailure {
    fn from(error: AnalysisError) -> Self {
        Self {
            message: FAILURE_MESSAGE.to_string(),
            error,
        }
    }
}

/// What the insights panel is allowed to render
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Loading,
    Ready(InsightResult),
    Failed(SessionFailure),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    /// Resolved states are the ones a request can end in
    pub fn is_resolved(&self) -> bool {
        matches!(self, SessionState::Ready(_) | SessionState::Failed(_))
    }

    pub fn result(&self) -> Option<&InsightResult> {
        match self {
            SessionState::Ready(result) => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&SessionFailure> {
        match self {
            SessionState::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Loading => "loading",
            SessionState::Ready(_) => "ready",
            SessionState::Failed(_) => "failed",
        }
    }
}

/// Outcome channel of one request; `None` until it resolves
type Outcome = watch::Receiver<Option<SessionState>>;

/// Insight session: owns the state and the single in-flight request
pub struct InsightSession {
    requester: InsightRequester,
    state: watch::Sender<SessionState>,
    /// Outcome of the request in flight, if any
    pending: Mutex<Option<Outcome>>,
    closed: AtomicBool,
}

enum Start<'a> {
    Run(Flight<'a>),
    Join(Outcome),
    Closed,
}

impl InsightSession {
    pub fn new(requester: InsightRequester) -> Self {
        let (state, _) = watch::channel(SessionState::Idle);
        Self {
            requester,
            state,
            pending: Mutex::new(None),
            closed: AtomicBool::new(false),
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Watch state changes (for a renderer)
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn requester(&self) -> &InsightRequester {
        &self.requester
    }

    /// Analyze `transactions` and return the resolved state
    ///
    /// Callable from any state. If a request is already in flight, no new
    /// request is made and the caller receives that request's outcome. After
    /// `close`, triggers are ignored and return the current state.
    ///
    /// Dropping the returned future before it completes abandons the request
    /// and resolves the session to `Failed`, so a later trigger can retry.
    pub async fn trigger(&self, transactions: &[Transaction]) -> SessionState {
        let mut flight = match self.start() {
            Start::Run(flight) => flight,
            Start::Join(mut outcome) => {
                warn!("Insight analysis already in progress, waiting for it");
                let joined = match outcome.wait_for(Option::is_some).await {
                    Ok(state) => state.clone(),
                    Err(_) => None,
                };
                return joined.unwrap_or_else(|| self.state());
            }
            Start::Closed => return self.state(),
        };

        info!(transactions = transactions.len(), "Insight analysis started");

        let next = match self.requester.request_insights(transactions).await {
            Ok(result) => {
                info!(trend = %result.spending_trend, "Insight analysis ready");
                SessionState::Ready(result)
            }
            Err(error) => {
                warn!(kind = %error.kind, error = %error.message, "Insight analysis failed");
                SessionState::Failed(error.into())
            }
        };

        flight.resolve(next)
    }

    /// Tear the session down
    ///
    /// Resets to `Idle` and drops the eventual outcome of any in-flight
    /// request. The network call itself is not aborted.
    pub fn close(&self) {
        self.state.send_modify(|state| {
            self.closed.store(true, Ordering::SeqCst);
            *state = SessionState::Idle;
        });
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Check-and-set: only one caller can move the session into `Loading`
    fn start(&self) -> Start<'_> {
        let mut pending = self.lock_pending();

        if self.is_closed() {
            return Start::Closed;
        }
        if let Some(outcome) = pending.as_ref() {
            return Start::Join(outcome.clone());
        }

        let (outcome_tx, outcome_rx) = watch::channel(None);
        *pending = Some(outcome_rx);
        self.state.send_replace(SessionState::Loading);

        Start::Run(Flight {
            session: self,
            outcome: outcome_tx,
            resolved: false,
        })
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<Outcome>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The request currently owned by a `trigger` call
///
/// Resolves the session when dropped unresolved (the caller's future was
/// cancelled), so `Loading` never outlives its request.
struct Flight<'a> {
    session: &'a InsightSession,
    outcome: watch::Sender<Option<SessionState>>,
    resolved: bool,
}

impl Flight<'_> {
    /// Publish `next` unless the session was closed, and hand the resulting
    /// state to every caller that joined this request
    fn resolve(&mut self, next: SessionState) -> SessionState {
        self.resolved = true;
        let session = self.session;

        // Held until the state is published so no new request can start in between
        let mut pending = session.lock_pending();
        *pending = None;

        let published = session.state.send_if_modified(|state| {
            if session.is_closed() {
                false
            } else {
                *state = next.clone();
                true
            }
        });

        let settled = if published {
            next
        } else {
            info!("Insight session closed, discarding result");
            session.state()
        };
        drop(pending);

        self.outcome.send_replace(Some(settled.clone()));
        settled
    }
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        if !self.resolved {
            warn!("Insight analysis cancelled before completion");
            let failure = AnalysisError::transport("Insight request cancelled before completion");
            self.resolve(SessionState::Failed(failure.into()));
        }
    }
}
