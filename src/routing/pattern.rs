//! Path segments and the regular expressions built from them.
//!
//! Both the forward and the reverse compiler read the same segment list, and
//! both name captures through [`identifier`], so a generated path always
//! satisfies the matcher it was derived alongside.

use regex::Regex;

use crate::routing::error::{RoutingError, RoutingResult};

/// One component of a compiled path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Resource name, matched verbatim.
    Literal(String),
    /// Identifier segment captured under `name`.
    Capture { name: String, pattern: String },
}

impl Segment {
    pub fn literal(name: impl Into<String>) -> Self {
        Segment::Literal(name.into())
    }

    /// The entity's own id, always captured as `id`.
    pub fn own_id(pattern: &str) -> Self {
        Segment::Capture {
            name: "id".to_string(),
            pattern: pattern.to_string(),
        }
    }

    /// An ancestor entity's id as seen by its descendants: `<name>_id`.
    pub fn ancestor_id(resource: &str, pattern: &str) -> Self {
        Segment::Capture {
            name: format!("{}_id", identifier(resource)),
            pattern: pattern.to_string(),
        }
    }
}

/// Turn a resource name into a capture/placeholder-safe identifier.
///
/// Every character that is not ASCII alphanumeric or `_` becomes `_`; a
/// leading digit is prefixed with `_`.
pub fn identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 1);
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        out.push('_');
    }
    out.extend(
        name.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }),
    );
    out
}

/// Regex source for a full path: every segment, then at most one trailing
/// slash, anchored at both ends.
pub fn path_pattern(segments: &[Segment]) -> String {
    let mut source = String::from("^");
    for segment in segments {
        source.push('/');
        match segment {
            Segment::Literal(name) => source.push_str(&regex::escape(name)),
            Segment::Capture { name, pattern } => {
                source.push_str("(?P<");
                source.push_str(name);
                source.push('>');
                source.push_str(pattern);
                source.push(')');
            }
        }
    }
    source.push_str("/?$");
    source
}

/// Regex source for the leading `/<name>[/<id>]` of a router, ending on a
/// segment boundary.
pub fn start_pattern(name: &str, id: Option<&str>) -> String {
    let mut source = String::from("^");
    if !name.is_empty() {
        source.push('/');
        source.push_str(&regex::escape(name));
    }
    if let Some(id) = id {
        source.push_str("/(?:");
        source.push_str(id);
        source.push(')');
    }
    if source.len() == 1 {
        source.push('/');
    } else {
        source.push_str("(?:/|$)");
    }
    source
}

pub fn compile(source: &str) -> RoutingResult<Regex> {
    Regex::new(source).map_err(|source_err| RoutingError::InvalidPattern {
        pattern: source.to_string(),
        source: source_err,
    })
}

/// Number of non-empty `/`-separated segments in a request path.
pub fn segment_count(path: &str) -> usize {
    path.split('/').filter(|s| !s.is_empty()).count()
}
