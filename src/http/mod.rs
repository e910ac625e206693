//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, CORS, tower-http tracing)
//!     → request.rs (fresh request ID + start instant)
//!     → middleware/ (completion tracking, request log, timeout)
//!     → api routes, health.rs, or fallback.rs
//!     → error.rs (AppError → JSON body + error record)
//!     → Send to client
//! ```

pub mod error;
pub mod fallback;
pub mod health;
pub mod middleware;
pub mod request;
pub mod server;

pub use error::{AppError, ErrorReport};
pub use request::{RequestContext, RequestContextExt, RequestIdLayer};
pub use server::{build_router, instrument, AppState, HttpServer};
