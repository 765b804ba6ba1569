//! Declarative resource tree.
//!
//! A [`Resource`] is either a singleton (one URL shape, no identifier) or an
//! entity-bearing resource with a collection path and an entity path whose
//! last segment matches the resource's id pattern.

use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::routing::handler::Handler;

/// The five operation slots, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    List,
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::List,
        Operation::Create,
        Operation::Read,
        Operation::Update,
        Operation::Delete,
    ];

    /// Operation named by a verb (`"read"`), or by the last component of a
    /// dotted key (`"orders.read"`).
    pub fn from_key(key: &str) -> Option<Operation> {
        let verb = key.rsplit('.').next()?;
        Operation::ALL.into_iter().find(|op| op.verb() == verb)
    }

    /// Last component of the dotted operation key.
    pub fn verb(self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// Fixed HTTP method binding. PUT and PATCH are never used.
    pub fn method(self) -> Method {
        match self {
            Operation::List | Operation::Read => Method::GET,
            Operation::Create | Operation::Update => Method::POST,
            Operation::Delete => Method::DELETE,
        }
    }

    /// Whether the operation addresses the collection path (no id segment).
    pub fn on_collection(self) -> bool {
        matches!(self, Operation::List | Operation::Create)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// A node of the resource tree.
pub struct Resource<S> {
    pub(crate) name: String,
    pub(crate) id: Option<String>,
    pub(crate) handlers: [Option<Arc<dyn Handler<S>>>; 5],
    pub(crate) resources: Vec<Resource<S>>,
}

impl<S> Resource<S> {
    /// Anonymous root: empty name, no id.
    pub fn root() -> Self {
        Self::singleton("")
    }

    /// A resource with exactly one URL shape.
    pub fn singleton(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            handlers: Default::default(),
            resources: Vec::new(),
        }
    }

    /// A collection/entity pair. `id` is a regular expression matching one
    /// path segment.
    pub fn entity(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::singleton(name)
        }
    }

    pub fn list(self, handler: impl Handler<S>) -> Self {
        self.with(Operation::List, handler)
    }

    pub fn create(self, handler: impl Handler<S>) -> Self {
        self.with(Operation::Create, handler)
    }

    pub fn read(self, handler: impl Handler<S>) -> Self {
        self.with(Operation::Read, handler)
    }

    pub fn update(self, handler: impl Handler<S>) -> Self {
        self.with(Operation::Update, handler)
    }

    pub fn delete(self, handler: impl Handler<S>) -> Self {
        self.with(Operation::Delete, handler)
    }

    /// Register a handler for any slot.
    pub fn with(mut self, operation: Operation, handler: impl Handler<S>) -> Self {
        self.handlers[operation as usize] = Some(Arc::new(handler));
        self
    }

    /// Append a child. Declaration order is match priority.
    pub fn resource(mut self, child: Resource<S>) -> Self {
        self.resources.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn children(&self) -> &[Resource<S>] {
        &self.resources
    }

    pub fn handler(&self, operation: Operation) -> Option<&Arc<dyn Handler<S>>> {
        self.handlers[operation as usize].as_ref()
    }

    /// Populated slots in emission order.
    pub(crate) fn operations(&self) -> impl Iterator<Item = (Operation, &Arc<dyn Handler<S>>)> {
        Operation::ALL
            .into_iter()
            .filter_map(move |op| self.handler(op).map(|h| (op, h)))
    }
}

impl<S> fmt::Debug for Resource<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operations: Vec<Operation> = self.operations().map(|(op, _)| op).collect();
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("operations", &operations)
            .field("resources", &self.resources)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::error::HandlerError;
    use crate::http::request::ApiRequest;
    use crate::routing::handler::{HandlerResult, PathParams};

    async fn noop(_req: ApiRequest, _params: PathParams, _config: ()) -> HandlerResult {
        Err(HandlerError::other("unused"))
    }

    #[test]
    fn test_operations_follow_slot_order() {
        let resource: Resource<()> = Resource::entity("orders", r"\d+")
            .delete(noop)
            .read(noop)
            .list(noop);

        let ops: Vec<Operation> = resource.operations().map(|(op, _)| op).collect();
        assert_eq!(ops, vec![Operation::List, Operation::Read, Operation::Delete]);
    }

    #[test]
    fn test_method_binding() {
        assert_eq!(Operation::List.method(), Method::GET);
        assert_eq!(Operation::Create.method(), Method::POST);
        assert_eq!(Operation::Read.method(), Method::GET);
        assert_eq!(Operation::Update.method(), Method::POST);
        assert_eq!(Operation::Delete.method(), Method::DELETE);
        assert!(Operation::Create.on_collection());
        assert!(!Operation::Update.on_collection());
    }

    #[test]
    fn test_from_key() {
        assert_eq!(Operation::from_key("read"), Some(Operation::Read));
        assert_eq!(Operation::from_key("orders.items.delete"), Some(Operation::Delete));
        assert_eq!(Operation::from_key("orders.summary"), None);
    }

    #[test]
    fn test_root_is_anonymous_singleton() {
        let root: Resource<()> = Resource::root().resource(Resource::singleton("status"));
        assert_eq!(root.name(), "");
        assert!(root.id().is_none());
        assert_eq!(root.children().len(), 1);
    }
}
