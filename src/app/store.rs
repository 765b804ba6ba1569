//! In-memory order storage.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Order {
    pub id: u64,
    pub customer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
    pub sku: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct NewOrder {
    pub customer: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderUpdate {
    pub customer: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewItem {
    pub sku: String,
    pub quantity: u32,
}

/// Orders and their line items, ids assigned sequentially from 1.
#[derive(Debug, Default)]
pub struct OrderStore {
    orders: DashMap<u64, Order>,
    next_order_id: AtomicU64,
    next_item_id: AtomicU64,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All orders by id, optionally only those of `customer`.
    pub fn list(&self, customer: Option<&str>) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|entry| customer.map_or(true, |c| entry.customer == c))
            .map(|entry| entry.value().clone())
            .collect();
        orders.sort_by_key(|order| order.id);
        orders
    }

    pub fn insert(&self, new: NewOrder) -> Order {
        let order = Order {
            id: self.next_order_id.fetch_add(1, Ordering::Relaxed) + 1,
            customer: new.customer,
            note: new.note,
            items: Vec::new(),
        };
        self.orders.insert(order.id, order.clone());
        order
    }

    pub fn get(&self, id: u64) -> Option<Order> {
        self.orders.get(&id).map(|order| order.value().clone())
    }

    pub fn update(&self, id: u64, update: OrderUpdate) -> Option<Order> {
        let mut order = self.orders.get_mut(&id)?;
        if let Some(customer) = update.customer {
            order.customer = customer;
        }
        if update.note.is_some() {
            order.note = update.note;
        }
        Some(order.value().clone())
    }

    pub fn remove(&self, id: u64) -> Option<Order> {
        self.orders.remove(&id).map(|(_, order)| order)
    }

    /// Add an item to order `order_id`; `None` if the order does not exist.
    pub fn add_item(&self, order_id: u64, new: NewItem) -> Option<Item> {
        let mut order = self.orders.get_mut(&order_id)?;
        let item = Item {
            id: self.next_item_id.fetch_add(1, Ordering::Relaxed) + 1,
            sku: new.sku,
            quantity: new.quantity,
        };
        order.items.push(item.clone());
        Some(item)
    }

    pub fn item(&self, order_id: u64, item_id: u64) -> Option<Item> {
        self.orders
            .get(&order_id)?
            .items
            .iter()
            .find(|i| i.id == item_id)
            .cloned()
    }

    pub fn remove_item(&self, order_id: u64, item_id: u64) -> Option<Item> {
        let mut order = self.orders.get_mut(&order_id)?;
        let position = order.items.iter().position(|i| i.id == item_id)?;
        Some(order.items.remove(position))
    }
}
