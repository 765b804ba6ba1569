//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, trace layers)
//!     → dispatch.rs (buffer body, pick router, match, invoke handler)
//!     → request.rs (envelope + links handed to the handler)
//!     → response.rs / error.rs (JSON bodies, error → status mapping)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use dispatch::Dispatcher;
pub use error::{HandlerError, HttpError};
pub use request::{ApiRequest, X_REQUEST_ID};
pub use response::{created, no_content, ok};
pub use server::HttpServer;
