//! Order lines: pasted-text parsing, cart, and committed order history.
//!
//! Pure domain logic; resolving parsed lines against the catalog and feeding
//! rows happens in the session crate.

pub mod cart;
pub mod ledger;
pub mod parser;
pub mod paste;
pub mod tokens;

pub use cart::{Cart, CartLine, parse_quantity_input};
pub use ledger::{CommittedOrder, OrderLedger, ProductTotal};
pub use parser::{OrderLineRecord, ParseOutcome, SkipReason, SkippedLine, format_line, parse_line, parse_order_text};
pub use paste::{PastedOrder, split_blocks, split_customer};
