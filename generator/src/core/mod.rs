//! Generation core: admission, classification, retry and dispatch

pub mod budget;
pub mod classifier;
pub mod dispatcher;
pub mod prompt;
pub mod retry;

pub use budget::TokenBudgetChecker;
pub use classifier::{decide, AttemptOutcome};
pub use dispatcher::Dispatcher;
pub use retry::{RetryController, RetryPolicy, RetrySession, SessionState};
