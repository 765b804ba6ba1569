//! REST resource routing library.
//!
//! Declare a tree of resources and their operations, compile it once, then
//! match requests against it and generate links back into it.

pub mod app;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use http::{Dispatcher, HttpServer};
pub use lifecycle::Shutdown;
pub use routing::{Operation, Resource, Router, RoutingError};
