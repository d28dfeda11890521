use serde::{Deserialize, Serialize};

use copurchase_core::{CatalogKey, DomainError, DomainResult, Money, OrderedMap};

/// Where a catalog entry came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "file")]
pub enum EntrySource {
    /// Loaded from a price file (file name only, not the full path).
    File(String),
    /// Typed in by the operator, or accepted as-is at commit time.
    Manual,
    /// Created from an unresolved line of a pasted order.
    Paste,
}

impl core::fmt::Display for EntrySource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EntrySource::File(name) => f.write_str(name),
            EntrySource::Manual => f.write_str("manual"),
            EntrySource::Paste => f.write_str("paste"),
        }
    }
}

/// One priced product + weight combination from the supplier price list.
///
/// Entries are immutable once built; an update replaces the whole entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    key: CatalogKey,
    name: String,
    weight: String,
    unit_price: Money,
    standard_pack_quantity: u32,
    source: EntrySource,
}

impl CatalogEntry {
    /// Build a validated entry.
    ///
    /// - name must be non-blank
    /// - unit price must be strictly positive
    /// - standard pack quantity must be at least 1
    pub fn new(
        name: &str,
        weight: &str,
        unit_price: Money,
        standard_pack_quantity: u32,
        source: EntrySource,
    ) -> DomainResult<Self> {
        let name = name.trim();
        let weight = weight.trim();
        if name.is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if !unit_price.is_positive() {
            return Err(DomainError::invalid_price(format!(
                "price must be positive, got {unit_price}"
            )));
        }
        if standard_pack_quantity == 0 {
            return Err(DomainError::invalid_quantity(
                "standard pack quantity must be at least 1",
            ));
        }

        Ok(Self {
            key: CatalogKey::new(name, weight),
            name: name.to_string(),
            weight: weight.to_string(),
            unit_price,
            standard_pack_quantity,
            source,
        })
    }

    pub fn key(&self) -> &CatalogKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> &str {
        &self.weight
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn standard_pack_quantity(&self) -> u32 {
        self.standard_pack_quantity
    }

    pub fn source(&self) -> &EntrySource {
        &self.source
    }
}

/// The supplier catalog: entries keyed by [`CatalogKey`], in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: OrderedMap<CatalogKey, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &CatalogKey) -> Option<&CatalogEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &CatalogKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// Insert an entry, replacing (not merging) any entry with the same key.
    pub fn insert(&mut self, entry: CatalogEntry) -> Option<CatalogEntry> {
        self.entries.insert(entry.key.clone(), entry)
    }

    /// Insert `entry` only when its key is unknown; returns the stored entry.
    pub fn insert_if_absent(&mut self, entry: CatalogEntry) -> &CatalogEntry {
        let key = entry.key.clone();
        self.entries.get_or_insert_with(key, || entry)
    }

    pub fn remove(&mut self, key: &CatalogKey) -> Option<CatalogEntry> {
        self.entries.remove(key)
    }

    /// Add or replace an entry from operator-typed fields.
    ///
    /// Rejects an unparseable or non-positive price with `InvalidPrice` and a
    /// non-integer or zero pack quantity with `InvalidQuantity`.
    pub fn upsert_manual(
        &mut self,
        name: &str,
        weight: &str,
        price: &str,
        standard_pack_quantity: &str,
    ) -> DomainResult<CatalogKey> {
        let unit_price = Money::parse_decimal(price)
            .ok_or_else(|| DomainError::invalid_price(format!("not a number: {:?}", price.trim())))?;
        let quantity: u32 = standard_pack_quantity.trim().parse().map_err(|_| {
            DomainError::invalid_quantity(format!(
                "not a whole number: {:?}",
                standard_pack_quantity.trim()
            ))
        })?;

        let entry = CatalogEntry::new(name, weight, unit_price, quantity, EntrySource::Manual)?;
        let key = entry.key.clone();
        self.insert(entry);
        Ok(key)
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for entry in iter {
            catalog.insert(entry);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, weight: &str, cents: i64, qty: u32) -> CatalogEntry {
        CatalogEntry::new(name, weight, Money::from_cents(cents), qty, EntrySource::Manual).unwrap()
    }

    #[test]
    fn new_entry_computes_key() {
        let e = entry("Вяленые томаты", "130 гр", 9540, 10);
        assert_eq!(e.key().as_str(), "вяленые томаты|130 гр");
    }

    #[test]
    fn new_entry_rejects_bad_fields() {
        let zero = CatalogEntry::new("x", "", Money::ZERO, 1, EntrySource::Manual).unwrap_err();
        assert!(matches!(zero, DomainError::InvalidPrice(_)));

        let no_pack = CatalogEntry::new("x", "", Money::from_cents(1), 0, EntrySource::Manual).unwrap_err();
        assert!(matches!(no_pack, DomainError::InvalidQuantity(_)));

        let blank = CatalogEntry::new("  ", "", Money::from_cents(1), 1, EntrySource::Manual).unwrap_err();
        assert!(matches!(blank, DomainError::Validation(_)));
    }

    #[test]
    fn insert_replaces_whole_entry_in_place() {
        let mut catalog = Catalog::new();
        catalog.insert(entry("A", "1 кг", 100, 1));
        catalog.insert(entry("B", "1 кг", 200, 1));
        let old = catalog.insert(entry("a", "1 КГ", 300, 6)).unwrap();

        assert_eq!(old.unit_price(), Money::from_cents(100));
        let names: Vec<_> = catalog.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["a", "B"]);
        assert_eq!(catalog.iter().next().unwrap().standard_pack_quantity(), 6);
    }

    #[test]
    fn insert_if_absent_keeps_existing() {
        let mut catalog = Catalog::new();
        catalog.insert(entry("A", "", 100, 4));
        let stored = catalog.insert_if_absent(entry("A", "", 999, 1));
        assert_eq!(stored.unit_price(), Money::from_cents(100));
    }

    #[test]
    fn upsert_manual_validates_price_and_quantity() {
        let mut catalog = Catalog::new();

        let err = catalog.upsert_manual("Томаты", "130 гр", "abc", "10").unwrap_err();
        assert!(matches!(err, DomainError::InvalidPrice(_)));

        let err = catalog.upsert_manual("Томаты", "130 гр", "-5", "10").unwrap_err();
        assert!(matches!(err, DomainError::InvalidPrice(_)));

        let err = catalog.upsert_manual("Томаты", "130 гр", "95,40", "ten").unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuantity(_)));

        let key = catalog.upsert_manual("Томаты", "130 гр", "95,40", "10").unwrap();
        let stored = catalog.get(&key).unwrap();
        assert_eq!(stored.unit_price(), Money::from_cents(9540));
        assert_eq!(stored.source(), &EntrySource::Manual);
    }
}
