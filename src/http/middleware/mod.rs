//! Request pipeline stages, outermost first.
//!
//! ```text
//! RequestIdLayer      (request.rs)  received → correlated
//! track_completion    (completion)  error records, slow alerts, metrics
//! CatchPanicLayer                   panics → AppError 500
//! log_request         (request_log) correlated → logged
//! enforce_timeout     (timeout)     optional handler deadline
//! routes / fallback                 logged → routed → completed | errored | unmatched
//! ```

pub mod completion;
pub mod request_log;
pub mod timeout;

pub use completion::track_completion;
pub use request_log::log_request;
pub use timeout::enforce_timeout;
