//! Rows: open remainders of customer contributions per product, consolidated
//! against the supplier's standard pack quantity.

pub mod book;
pub mod view;

pub use book::{Contribution, RowBook, RowBucket};
pub use view::{RowView, row_views};
