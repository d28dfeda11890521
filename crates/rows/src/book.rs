//! Row Consolidation Engine.
//!
//! A row is the open remainder of customer contributions for one catalog key.
//! Whenever a row's pending total reaches the standard pack quantity, whole
//! packs are consumed oldest-first until the remainder is below the threshold
//! again. Completed packs are not recorded; only the remainder is tracked.
//!
//! The row book is a disposable read model: `rebuild_from_orders` derives it
//! from the committed order list alone.

use serde::{Deserialize, Serialize};

use copurchase_catalog::Catalog;
use copurchase_core::{CatalogKey, CustomerId, OrderedMap};
use copurchase_orders::CommittedOrder;

/// One customer's pending quantity for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub customer: CustomerId,
    pub quantity: u32,
}

/// Pending contributions for one key, oldest first.
///
/// Outside of `RowBook::contribute` a bucket is never empty and its pending
/// total is below the standard pack quantity it was last consolidated with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowBucket {
    contributions: Vec<Contribution>,
}

impl RowBucket {
    pub fn contributions(&self) -> &[Contribution] {
        &self.contributions
    }

    pub fn pending(&self) -> u64 {
        self.contributions.iter().map(|c| u64::from(c.quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }

    /// Consume whole packs until the pending total is below `threshold`.
    /// Returns how many packs were consumed.
    fn consolidate(&mut self, threshold: u32) -> u32 {
        let threshold = u64::from(threshold.max(1));
        let mut packs = 0;

        while self.pending() >= threshold {
            let mut consumed: u64 = 0;
            let mut fully_consumed = 0;

            for contribution in self.contributions.iter_mut() {
                let need = threshold - consumed;
                if u64::from(contribution.quantity) <= need {
                    consumed += u64::from(contribution.quantity);
                    fully_consumed += 1;
                    if consumed == threshold {
                        break;
                    }
                } else {
                    // need < quantity, so the narrowing cannot fail.
                    contribution.quantity -= need as u32;
                    break;
                }
            }

            self.contributions.drain(..fully_consumed);
            packs += 1;
        }

        packs
    }
}

/// All open rows, keyed by catalog key in first-contribution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowBook {
    buckets: OrderedMap<CatalogKey, RowBucket>,
}

impl RowBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, key: &CatalogKey) -> Option<&RowBucket> {
        self.buckets.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CatalogKey, &RowBucket)> {
        self.buckets.iter()
    }

    /// Add a contribution and consolidate the row.
    ///
    /// A zero quantity changes nothing. A `standard_pack_quantity` of 0 is
    /// treated as 1. Returns the number of packs completed by this call.
    pub fn contribute(
        &mut self,
        key: &CatalogKey,
        customer: &CustomerId,
        quantity: u32,
        standard_pack_quantity: u32,
    ) -> u32 {
        if quantity == 0 {
            return 0;
        }

        let bucket = self.buckets.get_or_insert_with(key.clone(), RowBucket::default);
        bucket.contributions.push(Contribution {
            customer: customer.clone(),
            quantity,
        });
        let packs = bucket.consolidate(standard_pack_quantity);
        let emptied = bucket.is_empty();

        if emptied {
            self.buckets.remove(key);
        }
        if packs > 0 {
            tracing::debug!(key = %key, packs, "row reached standard pack quantity");
        }
        packs
    }

    pub fn remove(&mut self, key: &CatalogKey) -> Option<RowBucket> {
        self.buckets.remove(key)
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Clear every row and replay `orders` in order.
    ///
    /// Orders whose key is not in `catalog`, or whose quantity equals the
    /// entry's standard pack quantity, do not contribute.
    pub fn rebuild_from_orders(&mut self, orders: &[CommittedOrder], catalog: &Catalog) {
        self.buckets.clear();

        for order in orders {
            let Some(entry) = catalog.get(&order.key) else {
                continue;
            };
            let standard = entry.standard_pack_quantity();
            if order.quantity != standard {
                self.contribute(&order.key, &order.customer, order.quantity, standard);
            }
        }

        tracing::debug!(orders = orders.len(), rows = self.buckets.len(), "rows rebuilt");
    }
}
