//! Sample orders API.
//!
//! # Resource Tree
//! ```text
//! /                                      read    index of links
//! /orders                                list    (?customer= filter), create
//! /orders/<id>                           read, update, delete
//! /orders/<orders_id>/summary            read
//! /orders/<orders_id>/items              list, create
//! /orders/<orders_id>/items/<id>         read, delete
//! ```

pub mod handlers;
pub mod store;

use std::sync::Arc;

use crate::routing::{Resource, Router, RoutingResult};

pub use store::{Item, Order, OrderStore};

/// Config threaded into every orders handler.
pub type Store = Arc<OrderStore>;

/// The orders resource tree.
pub fn resources() -> Resource<Store> {
    Resource::root().read(handlers::index).resource(
        Resource::entity("orders", r"\d+")
            .list(handlers::list_orders)
            .create(handlers::create_order)
            .read(handlers::read_order)
            .update(handlers::update_order)
            .delete(handlers::delete_order)
            .resource(Resource::singleton("summary").read(handlers::order_summary))
            .resource(
                Resource::entity("items", r"\d+")
                    .list(handlers::list_items)
                    .create(handlers::create_item)
                    .read(handlers::read_item)
                    .delete(handlers::delete_item),
            ),
    )
}

/// Compile the orders API over `store`.
pub fn orders_api(store: Store) -> RoutingResult<Router<Store>> {
    Router::new(resources(), store)
}
