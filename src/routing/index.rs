//! Matcher buckets keyed by `(segment count, method)`.

use std::collections::HashMap;

use axum::http::Method;

use crate::routing::compile::Matcher;

/// Compiled matchers grouped so a request only scans the bucket it could
/// possibly fall into. Bucket order is compile order.
#[derive(Debug)]
pub struct MatcherIndex<S> {
    buckets: HashMap<(usize, Method), Vec<Matcher<S>>>,
}

impl<S> MatcherIndex<S> {
    pub fn new(matchers: impl IntoIterator<Item = Matcher<S>>) -> Self {
        let mut buckets: HashMap<(usize, Method), Vec<Matcher<S>>> = HashMap::new();
        for matcher in matchers {
            buckets
                .entry((matcher.segment_count, matcher.method.clone()))
                .or_default()
                .push(matcher);
        }
        Self { buckets }
    }

    /// Matchers that could accept a path of `segment_count` segments.
    pub fn candidates(&self, segment_count: usize, method: &Method) -> &[Matcher<S>] {
        self.buckets
            .get(&(segment_count, method.clone()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of matchers across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Matcher<S>> {
        self.buckets.values().flatten()
    }
}
