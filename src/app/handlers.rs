//! Operation handlers for the orders API.

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::json;

use crate::app::store::{NewItem, NewOrder, Order, OrderUpdate};
use crate::app::Store;
use crate::http::{created, no_content, ok, ApiRequest, HandlerError, HttpError};
use crate::routing::{HandlerResult, PathParams};

#[derive(Debug, Serialize)]
struct OrderView<'a> {
    #[serde(flatten)]
    order: &'a Order,
    href: String,
}

fn order_view<'a>(req: &ApiRequest, order: &'a Order) -> Result<OrderView<'a>, HandlerError> {
    let id = order.id.to_string();
    let href = req.url_for("orders.read", &[("id", id.as_str())], &[])?;
    Ok(OrderView { order, href })
}

/// Parse the numeric path parameter `name`; values that overflow are a 404.
fn id_param(params: &PathParams, name: &str) -> Result<u64, HttpError> {
    params
        .get(name)
        .and_then(|v| v.parse().ok())
        .ok_or_else(HttpError::not_found)
}

fn missing_order(id: u64) -> HttpError {
    HttpError::not_found().with_detail(format!("Order {id} does not exist."))
}

pub async fn index(req: ApiRequest, _params: PathParams, _store: Store) -> HandlerResult {
    ok(json!({
        "links": {
            "orders": req.url_for("orders.list", &[], &[])?,
        }
    }))
}

pub async fn list_orders(req: ApiRequest, _params: PathParams, store: Store) -> HandlerResult {
    let customer = req.query("customer");
    let orders = store.list(customer.as_deref());
    let views = orders
        .iter()
        .map(|order| order_view(&req, order))
        .collect::<Result<Vec<_>, _>>()?;
    ok(views)
}

pub async fn create_order(req: ApiRequest, _params: PathParams, store: Store) -> HandlerResult {
    let new: NewOrder = req.json()?;
    if new.customer.trim().is_empty() {
        return Err(HttpError::unprocessable("customer must not be empty").into());
    }
    let order = store.insert(new);
    tracing::debug!(order_id = order.id, "Order created");
    let id = order.id.to_string();
    created(&req, "orders.read", &[("id", id.as_str())])
}

pub async fn read_order(req: ApiRequest, params: PathParams, store: Store) -> HandlerResult {
    let id = id_param(&params, "id")?;
    let order = store.get(id).ok_or_else(|| missing_order(id))?;
    ok(order_view(&req, &order)?)
}

pub async fn update_order(req: ApiRequest, params: PathParams, store: Store) -> HandlerResult {
    let id = id_param(&params, "id")?;
    let update: OrderUpdate = req.json()?;
    let order = store.update(id, update).ok_or_else(|| missing_order(id))?;
    ok(order_view(&req, &order)?)
}

pub async fn delete_order(_req: ApiRequest, params: PathParams, store: Store) -> HandlerResult {
    let id = id_param(&params, "id")?;
    store.remove(id).ok_or_else(|| missing_order(id))?;
    no_content()
}

pub async fn order_summary(req: ApiRequest, params: PathParams, store: Store) -> HandlerResult {
    let id = id_param(&params, "orders_id")?;
    let order = store.get(id).ok_or_else(|| missing_order(id))?;
    let total_quantity: u64 = order.items.iter().map(|i| u64::from(i.quantity)).sum();
    let id = id.to_string();
    ok(json!({
        "order": req.url_for("orders.read", &[("id", id.as_str())], &[])?,
        "items": order.items.len(),
        "total_quantity": total_quantity,
    }))
}

pub async fn list_items(_req: ApiRequest, params: PathParams, store: Store) -> HandlerResult {
    let id = id_param(&params, "orders_id")?;
    let order = store.get(id).ok_or_else(|| missing_order(id))?;
    ok(order.items)
}

pub async fn create_item(req: ApiRequest, params: PathParams, store: Store) -> HandlerResult {
    let order_id = id_param(&params, "orders_id")?;
    let new: NewItem = req.json()?;
    if new.quantity == 0 {
        return Err(HttpError::new(StatusCode::UNPROCESSABLE_ENTITY)
            .with_detail("quantity must be positive")
            .into());
    }
    let item = store
        .add_item(order_id, new)
        .ok_or_else(|| missing_order(order_id))?;
    let (order_id, item_id) = (order_id.to_string(), item.id.to_string());
    created(
        &req,
        "orders.items.read",
        &[("orders_id", order_id.as_str()), ("id", item_id.as_str())],
    )
}

pub async fn read_item(_req: ApiRequest, params: PathParams, store: Store) -> HandlerResult {
    let order_id = id_param(&params, "orders_id")?;
    let item_id = id_param(&params, "id")?;
    let item = store.item(order_id, item_id).ok_or_else(HttpError::not_found)?;
    ok(item)
}

pub async fn delete_item(_req: ApiRequest, params: PathParams, store: Store) -> HandlerResult {
    let order_id = id_param(&params, "orders_id")?;
    let item_id = id_param(&params, "id")?;
    store
        .remove_item(order_id, item_id)
        .ok_or_else(HttpError::not_found)?;
    no_content()
}
