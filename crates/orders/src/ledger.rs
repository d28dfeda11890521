//! Committed order history.
//!
//! The ledger is the source of truth for what customers ordered. Row state is
//! derived from it and can always be rebuilt from `OrderLedger::orders`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use copurchase_core::{CatalogKey, CustomerId, DomainError, DomainResult, Money, OrderedMap};

use crate::cart::CartLine;

/// One committed order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedOrder {
    /// 1-based position in the ledger; renumbered after deletions.
    pub index: usize,
    pub customer: CustomerId,
    pub key: CatalogKey,
    pub name: String,
    pub weight: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub total: Money,
    pub committed_at: DateTime<Utc>,
}

/// Per-product aggregate over the whole ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductTotal {
    pub key: CatalogKey,
    pub name: String,
    pub weight: String,
    pub quantity: u64,
    pub total: Money,
    /// Distinct customers, first-seen order.
    pub customers: Vec<CustomerId>,
}

/// Append-only (except for explicit deletions) list of committed orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderLedger {
    orders: Vec<CommittedOrder>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt an existing order list (e.g. from a snapshot), fixing up indexes.
    pub fn from_orders(orders: Vec<CommittedOrder>) -> Self {
        let mut ledger = Self { orders };
        ledger.renumber();
        ledger
    }

    pub fn orders(&self) -> &[CommittedOrder] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CommittedOrder> {
        index.checked_sub(1).and_then(|i| self.orders.get(i))
    }

    /// Record a cart line as committed for `customer`.
    pub fn append(&mut self, customer: &CustomerId, line: &CartLine, committed_at: DateTime<Utc>) -> &CommittedOrder {
        let index = self.orders.len() + 1;
        self.orders.push(CommittedOrder {
            index,
            customer: customer.clone(),
            key: line.key.clone(),
            name: line.name.clone(),
            weight: line.weight.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            total: line.line_total,
            committed_at,
        });
        &self.orders[index - 1]
    }

    /// Remove the order at 1-based `index`; later orders move up by one.
    pub fn remove(&mut self, index: usize) -> DomainResult<CommittedOrder> {
        if index == 0 || index > self.orders.len() {
            return Err(DomainError::not_found(format!("order #{index}")));
        }
        let removed = self.orders.remove(index - 1);
        self.renumber();
        Ok(removed)
    }

    /// Remove every order for `key`, returning how many were dropped.
    pub fn remove_key(&mut self, key: &CatalogKey) -> usize {
        let before = self.orders.len();
        self.orders.retain(|o| &o.key != key);
        self.renumber();
        before - self.orders.len()
    }

    pub fn clear(&mut self) {
        self.orders.clear();
    }

    pub fn total(&self) -> Money {
        self.orders.iter().map(|o| o.total).sum()
    }

    pub fn customer_total(&self, customer: &CustomerId) -> Money {
        self.orders
            .iter()
            .filter(|o| &o.customer == customer)
            .map(|o| o.total)
            .sum()
    }

    /// Totals per customer, sorted by customer id.
    pub fn totals_by_customer(&self) -> Vec<(CustomerId, Money)> {
        let mut totals: OrderedMap<CustomerId, Money> = OrderedMap::new();
        for order in &self.orders {
            *totals.get_or_insert_with(order.customer.clone(), || Money::ZERO) += order.total;
        }
        let mut totals: Vec<(CustomerId, Money)> = totals.iter().map(|(c, m)| (c.clone(), *m)).collect();
        totals.sort_by(|a, b| a.0.cmp(&b.0));
        totals
    }

    /// Totals per catalog key, sorted by (name, weight).
    pub fn totals_by_product(&self) -> Vec<ProductTotal> {
        let mut totals: OrderedMap<CatalogKey, ProductTotal> = OrderedMap::new();
        for order in &self.orders {
            let entry = totals.get_or_insert_with(order.key.clone(), || ProductTotal {
                key: order.key.clone(),
                name: order.name.clone(),
                weight: order.weight.clone(),
                quantity: 0,
                total: Money::ZERO,
                customers: Vec::new(),
            });
            entry.quantity += u64::from(order.quantity);
            entry.total += order.total;
            if !entry.customers.contains(&order.customer) {
                entry.customers.push(order.customer.clone());
            }
        }
        let mut totals: Vec<ProductTotal> = totals.values().cloned().collect();
        totals.sort_by(|a, b| (&a.name, &a.weight).cmp(&(&b.name, &b.weight)));
        totals
    }

    fn renumber(&mut self) {
        for (i, order) in self.orders.iter_mut().enumerate() {
            order.index = i + 1;
        }
    }
}
