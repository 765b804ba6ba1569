//! Path templates and the reverse-lookup table.

use std::collections::HashMap;
use std::fmt;

use url::form_urlencoded;

use crate::routing::error::{RoutingError, RoutingResult};
use crate::routing::pattern::Segment;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Placeholder(String),
}

/// A path with named placeholders, e.g. `/orders/{orders_id}/items/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    parts: Vec<Part>,
}

impl PathTemplate {
    pub fn from_segments(segments: &[Segment]) -> Self {
        let parts = segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(name) => Part::Literal(name.clone()),
                Segment::Capture { name, .. } => Part::Placeholder(name.clone()),
            })
            .collect();
        Self { parts }
    }

    /// Placeholder names in path order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            Part::Placeholder(name) => Some(name.as_str()),
            Part::Literal(_) => None,
        })
    }

    /// Fill every placeholder from `values`, or report all that are missing.
    pub fn render(&self, values: &HashMap<&str, &str>) -> Result<String, Vec<String>> {
        let missing: Vec<String> = self
            .placeholders()
            .filter(|name| !values.contains_key(name))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        if self.parts.is_empty() {
            return Ok("/".to_string());
        }
        let mut path = String::new();
        for part in &self.parts {
            path.push('/');
            match part {
                Part::Literal(name) => path.push_str(name),
                Part::Placeholder(name) => path.push_str(values[name.as_str()]),
            }
        }
        Ok(path)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parts.is_empty() {
            return f.write_str("/");
        }
        for part in &self.parts {
            match part {
                Part::Literal(name) => write!(f, "/{name}")?,
                Part::Placeholder(name) => write!(f, "/{{{name}}}")?,
            }
        }
        Ok(())
    }
}

/// Operation key → path template, in compile order.
#[derive(Debug, Clone, Default)]
pub struct PathTable {
    entries: Vec<(String, PathTemplate)>,
    index: HashMap<String, usize>,
}

impl PathTable {
    /// Build the table. A key that appears again later keeps its first
    /// template, the same operation the forward matcher picks first.
    pub fn new(entries: Vec<(String, PathTemplate)>) -> Self {
        let mut kept = Vec::with_capacity(entries.len());
        let mut index = HashMap::with_capacity(entries.len());
        for (key, template) in entries {
            if index.contains_key(&key) {
                continue;
            }
            index.insert(key.clone(), kept.len());
            kept.push((key, template));
        }
        Self { entries: kept, index }
    }

    pub fn get(&self, key: &str) -> Option<&PathTemplate> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathTemplate)> {
        self.entries.iter().map(|(key, template)| (key.as_str(), template))
    }

    /// Instantiate the template for `key`.
    ///
    /// Later `params` entries override earlier ones. A non-empty `query` is
    /// appended form-urlencoded, in the order given.
    pub fn path_for(&self, key: &str, params: &[(&str, &str)], query: &[(&str, &str)]) -> RoutingResult<String> {
        let template = self.get(key).ok_or_else(|| RoutingError::UnknownResource { key: key.to_string() })?;

        let values: HashMap<&str, &str> = params.iter().copied().collect();
        let mut path = template
            .render(&values)
            .map_err(|missing| RoutingError::IncompleteResource {
                key: key.to_string(),
                missing,
            })?;

        if !query.is_empty() {
            path.push('?');
            path.push_str(&form_urlencoded::Serializer::new(String::new()).extend_pairs(query).finish());
        }
        Ok(path)
    }
}
