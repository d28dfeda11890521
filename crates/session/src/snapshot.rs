use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use copurchase_orders::CommittedOrder;
use copurchase_rows::RowBook;

use crate::session::PurchaseSession;

/// Serializable state handed to whatever persists the session.
///
/// `rows` is informational; `restore` always rebuilds rows from `orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub orders: Vec<CommittedOrder>,
    #[serde(default)]
    pub rows: RowBook,
    pub saved_at: DateTime<Utc>,
}

impl PurchaseSession {
    pub fn snapshot(&self, saved_at: DateTime<Utc>) -> Snapshot {
        Snapshot {
            orders: self.ledger().orders().to_vec(),
            rows: self.rows().clone(),
            saved_at,
        }
    }

    /// Replace orders with the snapshot's and rebuild rows against the
    /// current catalog. The cart and catalog are not touched.
    pub fn restore(&mut self, snapshot: Snapshot) {
        tracing::info!(orders = snapshot.orders.len(), saved_at = %snapshot.saved_at, "restoring session");
        self.adopt_orders(snapshot.orders);
    }
}
