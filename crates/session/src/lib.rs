//! The purchase session: catalog, cart, committed orders and rows held in one
//! owned state object, plus snapshots and text summaries over it.

pub mod session;
pub mod snapshot;
pub mod summary;

pub use session::{CommitReceipt, ImportReport, PurchaseSession};
pub use snapshot::Snapshot;
