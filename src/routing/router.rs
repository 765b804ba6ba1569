//! Route lookup and path generation.
//!
//! # Responsibilities
//! - Compile a resource tree once, at construction
//! - Match `(method, path)` to a bound operation handler
//! - Generate canonical paths and URLs for dotted operation keys
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) bucket lookup by segment count and method
//! - O(n) regex scan within a bucket; first declared wins
//! - Explicit `NotFound` rather than silent default

use std::fmt;
use std::sync::Arc;

use axum::http::Method;
use regex::Regex;

use crate::routing::compile::{compile_matchers, compile_paths, walk};
use crate::routing::error::{RoutingError, RoutingResult};
use crate::routing::handler::{BoundHandler, PathParams};
use crate::routing::index::MatcherIndex;
use crate::routing::pattern::{self, identifier};
use crate::routing::resource::Resource;
use crate::routing::template::{PathTable, PathTemplate};

/// A compiled resource tree plus the config threaded into its handlers.
pub struct Router<S> {
    name: String,
    id: Option<String>,
    config: S,
    index: MatcherIndex<S>,
    start: Regex,
    paths: Arc<PathTable>,
}

impl<S: Clone + 'static> Router<S> {
    /// Compile `root` into a router.
    ///
    /// A root with an id scopes the router to one entity: its own
    /// `<name>_id` is supplied implicitly by [`links`](Self::links).
    pub fn new(root: Resource<S>, config: S) -> RoutingResult<Self> {
        let routes = walk(&root)?;
        let paths = PathTable::new(compile_paths(&routes));
        let index = MatcherIndex::new(compile_matchers(&routes)?);
        let start = pattern::compile(&pattern::start_pattern(&root.name, root.id.as_deref()))?;

        Ok(Self {
            name: root.name,
            id: root.id,
            config,
            index,
            start,
            paths: Arc::new(paths),
        })
    }

    /// Find the operation for `method` and `path`.
    pub fn match_route(&self, method: &Method, path: &str) -> RoutingResult<BoundHandler<S>> {
        let count = pattern::segment_count(path);
        self.index
            .candidates(count, method)
            .iter()
            .find_map(|matcher| {
                let captures = matcher.pattern.captures(path)?;
                let params: PathParams = matcher
                    .pattern
                    .capture_names()
                    .flatten()
                    .filter_map(|name| captures.name(name).map(|m| (name, m.as_str())))
                    .collect();
                Some(BoundHandler::new(
                    Arc::clone(&matcher.key),
                    matcher.operation,
                    params,
                    Arc::clone(&matcher.handler),
                ))
            })
            .ok_or_else(|| RoutingError::NotFound {
                method: method.clone(),
                path: path.to_string(),
            })
    }

    /// Cheap check that `path` starts with this router's `/<name>[/<id>]`.
    pub fn matches_start(&self, path: &str) -> bool {
        self.start.is_match(path)
    }

    /// Path for the operation `key`, with an optional query string.
    pub fn path_for(&self, key: &str, params: &[(&str, &str)], query: &[(&str, &str)]) -> RoutingResult<String> {
        self.paths.path_for(key, params, query)
    }

    /// Absolute URL: `base_url` followed by [`path_for`](Self::path_for).
    pub fn url_for(
        &self,
        base_url: &str,
        key: &str,
        params: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> RoutingResult<String> {
        self.links(base_url).url_for(key, params, query)
    }

    /// Path table bound to `base_url` and this router's own identifier.
    pub fn links(&self, base_url: &str) -> Links {
        Links {
            base_url: base_url.trim_end_matches('/').to_string(),
            paths: Arc::clone(&self.paths),
            scope: self
                .id
                .as_ref()
                .map(|id| (format!("{}_id", identifier(&self.name)), id.clone())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn config(&self) -> &S {
        &self.config
    }

    /// Operation keys and their templates, in declaration order.
    pub fn templates(&self) -> impl Iterator<Item = (&str, &PathTemplate)> {
        self.paths.iter()
    }

    /// Number of compiled operations.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl<S> fmt::Debug for Router<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("start", &self.start.as_str())
            .field("operations", &self.paths.len())
            .finish_non_exhaustive()
    }
}

/// A router's path table bound to a base URL.
///
/// Carried by every request so handlers can link to other operations.
#[derive(Debug, Clone, Default)]
pub struct Links {
    base_url: String,
    paths: Arc<PathTable>,
    scope: Option<(String, String)>,
}

impl Links {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Like [`Router::path_for`], with the router's own id supplied when it
    /// is scoped to one entity. Explicit `params` take precedence.
    pub fn path_for(&self, key: &str, params: &[(&str, &str)], query: &[(&str, &str)]) -> RoutingResult<String> {
        match &self.scope {
            Some((name, id)) => {
                let mut scoped: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 1);
                scoped.push((name.as_str(), id.as_str()));
                scoped.extend_from_slice(params);
                self.paths.path_for(key, &scoped, query)
            }
            None => self.paths.path_for(key, params, query),
        }
    }

    pub fn url_for(&self, key: &str, params: &[(&str, &str)], query: &[(&str, &str)]) -> RoutingResult<String> {
        let path = self.path_for(key, params, query)?;
        Ok(format!("{}{}", self.base_url, path))
    }
}
