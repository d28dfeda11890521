use serde::{Deserialize, Serialize};

use copurchase_catalog::CatalogEntry;
use copurchase_core::{CatalogKey, DomainError, DomainResult, Money};

/// A resolved catalog entry plus the quantity a customer asked for.
///
/// The entry's fields are copied in, so a later catalog reload does not change
/// what is sitting in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub key: CatalogKey,
    pub name: String,
    pub weight: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub standard_pack_quantity: u32,
    pub line_total: Money,
}

impl CartLine {
    pub fn from_entry(entry: &CatalogEntry, quantity: u32) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::invalid_quantity("quantity must be at least 1"));
        }
        Ok(Self {
            key: entry.key().clone(),
            name: entry.name().to_string(),
            weight: entry.weight().to_string(),
            unit_price: entry.unit_price(),
            quantity,
            standard_pack_quantity: entry.standard_pack_quantity(),
            line_total: entry.unit_price().times(quantity),
        })
    }

    /// Whether this line is exactly one standard pack (and so never waits in a
    /// row).
    pub fn is_full_pack(&self) -> bool {
        self.quantity == self.standard_pack_quantity
    }
}

/// Read an operator-typed quantity. Non-digit characters are dropped first, so
/// `"3 шт."` reads as 3.
pub fn parse_quantity_input(raw: &str) -> DomainResult<u32> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let quantity: u32 = digits
        .parse()
        .map_err(|_| DomainError::invalid_quantity(format!("not a quantity: {:?}", raw.trim())))?;
    if quantity == 0 {
        return Err(DomainError::invalid_quantity("quantity must be at least 1"));
    }
    Ok(quantity)
}

/// Lines collected for one customer before they are committed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    pub fn remove(&mut self, position: usize) -> DomainResult<CartLine> {
        if position >= self.lines.len() {
            return Err(DomainError::not_found(format!("cart line {position}")));
        }
        Ok(self.lines.remove(position))
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total(&self) -> Money {
        self.lines.iter().map(|l| l.line_total).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Empty the cart, handing its lines to the caller.
    pub fn take(&mut self) -> Vec<CartLine> {
        std::mem::take(&mut self.lines)
    }
}
