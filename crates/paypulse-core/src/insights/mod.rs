//! Spending insights
//!
//! Two pieces:
//! - `InsightRequester`: projects transactions into a prompt, calls the AI
//!   backend in schema-constrained mode and validates the reply
//! - `InsightSession`: the Idle → Loading → Ready/Failed lifecycle that gates
//!   what the insights panel renders, with at most one request in flight
//!
//! The AI service's schema enforcement is advisory; every reply is parsed and
//! validated locally before it can reach `Ready`.

mod requester;
mod session;
mod types;

pub use requester::InsightRequester;
pub use session::{InsightSession, SessionFailure, SessionState, FAILURE_MESSAGE};
pub use types::{
    AnalysisError, AnalysisErrorKind, InsightRequest, InsightResult, ProjectedTransaction,
    SpendingTrend,
};
