//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at construction):
//!     Resource tree
//!     → compile.rs (one depth-first walk → Route per declared operation)
//!         → forward: anchored regex per route → index.rs (bucket by
//!           segment count + method)
//!         → reverse: template.rs (dotted key → path template)
//!     → Freeze as immutable Router
//!
//! Incoming Request (method, path)
//!     → router.rs (segment count → bucket → first matching pattern)
//!     → Return: BoundHandler (captured params) or NotFound
//!
//! Link generation (key, params, query)
//!     → template.rs (fill placeholders, append query)
//!     → Return: path/URL or UnknownResource / IncompleteResource
//! ```
//!
//! # Design Decisions
//! - Routes compiled once, immutable at runtime
//! - Forward and reverse tables are projections of the same walk
//! - Deterministic: first declared operation wins within a bucket
//! - No logging here; the dispatcher owns it

pub mod compile;
pub mod error;
pub mod handler;
pub mod index;
pub mod pattern;
pub mod resource;
pub mod router;
pub mod template;

pub use error::{RoutingError, RoutingResult};
pub use handler::{BoundHandler, Handler, HandlerResult, PathParams};
pub use resource::{Operation, Resource};
pub use router::{Links, Router};
pub use template::{PathTable, PathTemplate};
