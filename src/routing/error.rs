//! Routing error definitions.

use axum::http::Method;
use thiserror::Error;

/// Errors raised while compiling a resource tree, matching a request or
/// generating a path.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// No compiled matcher accepts this method and path.
    #[error("No route for {method} {path}")]
    NotFound { method: Method, path: String },

    /// Reverse lookup of an operation key that was never compiled.
    #[error("Unknown API resource: {key}.")]
    UnknownResource { key: String },

    /// Reverse lookup without every placeholder the template needs.
    #[error("Incomplete API resource: {key}. Missing parameter(s): {}", .missing.join(", "))]
    IncompleteResource { key: String, missing: Vec<String> },

    /// An id pattern did not compile, or capture names collided.
    #[error("Invalid route pattern {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// `list`/`create` declared on a resource without an id.
    #[error("Resource '{resource}' has no id and cannot declare '{operation}'")]
    IllegalOperation {
        resource: String,
        operation: &'static str,
    },

    /// Only the root resource may have an empty name.
    #[error("Empty resource name below '{parent}'")]
    EmptyName { parent: String },
}

impl RoutingError {
    /// True for the one condition a multi-router dispatcher falls through on.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RoutingError::NotFound { .. })
    }
}

/// Result type for routing operations.
pub type RoutingResult<T> = Result<T, RoutingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_resource_names_every_missing_placeholder() {
        let err = RoutingError::IncompleteResource {
            key: "orders.items.read".into(),
            missing: vec!["orders_id".into(), "id".into()],
        };
        assert_eq!(
            err.to_string(),
            "Incomplete API resource: orders.items.read. Missing parameter(s): orders_id, id"
        );
    }

    #[test]
    fn test_not_found_is_the_only_fallthrough() {
        let not_found = RoutingError::NotFound {
            method: Method::GET,
            path: "/nope".into(),
        };
        assert!(not_found.is_not_found());

        let unknown = RoutingError::UnknownResource { key: "x.read".into() };
        assert!(!unknown.is_not_found());
        assert_eq!(unknown.to_string(), "Unknown API resource: x.read.");
    }
}
