//! Tree compilation.
//!
//! [`walk`] flattens a resource tree into one [`Route`] per declared
//! operation: depth-first, pre-order, operation slots in `list, create,
//! read, update, delete` order before descending into children. The forward
//! compiler ([`compile_matchers`]) and the reverse compiler
//! ([`compile_paths`]) are both projections of that single walk.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::Method;
use regex::Regex;

use crate::routing::error::{RoutingError, RoutingResult};
use crate::routing::handler::Handler;
use crate::routing::pattern::{self, Segment};
use crate::routing::resource::{Operation, Resource};
use crate::routing::template::PathTemplate;

/// One declared operation at its position in the tree.
pub struct Route<S> {
    pub key: String,
    pub operation: Operation,
    pub segments: Vec<Segment>,
    pub handler: Arc<dyn Handler<S>>,
}

impl<S> fmt::Debug for Route<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("key", &self.key)
            .field("operation", &self.operation)
            .field("segments", &self.segments)
            .finish_non_exhaustive()
    }
}

/// Flatten `resource` (the root) into routes.
pub fn walk<S>(resource: &Resource<S>) -> RoutingResult<Vec<Route<S>>> {
    walk_resource(resource, &[], &[], true)
}

fn walk_resource<S>(
    resource: &Resource<S>,
    prefix: &[Segment],
    prefix_keys: &[&str],
    is_root: bool,
) -> RoutingResult<Vec<Route<S>>> {
    let mut keys = prefix_keys.to_vec();
    if !is_root {
        keys.push(resource.name.as_str());
    }

    let mut collection = prefix.to_vec();
    if !resource.name.is_empty() {
        collection.push(Segment::literal(&resource.name));
    }

    let (entity, child_prefix) = match &resource.id {
        Some(id) => {
            let mut entity = collection.clone();
            entity.push(Segment::own_id(id));
            let mut child_prefix = collection.clone();
            child_prefix.push(Segment::ancestor_id(&resource.name, id));
            (entity, child_prefix)
        }
        None => (collection.clone(), collection.clone()),
    };

    let mut routes = Vec::new();
    for (operation, handler) in resource.operations() {
        let segments = match (&resource.id, operation.on_collection()) {
            (None, true) => {
                return Err(RoutingError::IllegalOperation {
                    resource: resource.name.clone(),
                    operation: operation.verb(),
                })
            }
            (Some(_), true) => collection.clone(),
            (_, false) => entity.clone(),
        };
        routes.push(Route {
            key: operation_key(&keys, operation),
            operation,
            segments,
            handler: Arc::clone(handler),
        });
    }

    for child in &resource.resources {
        if child.name.is_empty() {
            return Err(RoutingError::EmptyName {
                parent: resource.name.clone(),
            });
        }
        routes.extend(walk_resource(child, &child_prefix, &keys, false)?);
    }

    Ok(routes)
}

/// Dotted key: non-root ancestor names, the resource's own name, the verb.
fn operation_key(keys: &[&str], operation: Operation) -> String {
    if keys.is_empty() {
        operation.verb().to_string()
    } else {
        format!("{}.{}", keys.join("."), operation.verb())
    }
}

/// A compiled forward route.
#[derive(Clone)]
pub struct Matcher<S> {
    /// Number of path segments; a pre-filter only.
    pub segment_count: usize,
    pub method: Method,
    pub pattern: Regex,
    pub key: Arc<str>,
    pub operation: Operation,
    pub handler: Arc<dyn Handler<S>>,
}

impl<S> fmt::Debug for Matcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("segment_count", &self.segment_count)
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Forward compiler: one anchored matcher per route, in walk order.
pub fn compile_matchers<S>(routes: &[Route<S>]) -> RoutingResult<Vec<Matcher<S>>> {
    // Read/update/delete of one entity share a pattern; compile it once.
    let mut compiled: HashMap<String, Regex> = HashMap::new();
    let mut matchers = Vec::with_capacity(routes.len());

    for route in routes {
        let source = pattern::path_pattern(&route.segments);
        let regex = match compiled.get(&source) {
            Some(regex) => regex.clone(),
            None => {
                let regex = pattern::compile(&source)?;
                compiled.insert(source, regex.clone());
                regex
            }
        };
        matchers.push(Matcher {
            segment_count: route.segments.len(),
            method: route.operation.method(),
            pattern: regex,
            key: Arc::from(route.key.as_str()),
            operation: route.operation,
            handler: Arc::clone(&route.handler),
        });
    }

    Ok(matchers)
}

/// Reverse compiler: `(operation key, path template)` in walk order.
pub fn compile_paths<S>(routes: &[Route<S>]) -> Vec<(String, PathTemplate)> {
    routes
        .iter()
        .map(|route| (route.key.clone(), PathTemplate::from_segments(&route.segments)))
        .collect()
}
