use serde::Serialize;

use copurchase_catalog::Catalog;
use copurchase_core::{CatalogKey, CustomerId, OrderedMap};

use crate::book::RowBook;

/// Display projection of one open row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub key: CatalogKey,
    pub name: String,
    pub weight: String,
    pub pending: u64,
    /// `None` when the key is no longer in the catalog.
    pub standard_pack_quantity: Option<u32>,
    /// How many more units complete the next pack.
    pub remaining: Option<u64>,
    /// Pending quantity per customer, first-seen order.
    pub customers: Vec<(CustomerId, u64)>,
}

/// Project every open row against the current catalog.
pub fn row_views(book: &RowBook, catalog: &Catalog) -> Vec<RowView> {
    book.iter()
        .map(|(key, bucket)| {
            let entry = catalog.get(key);
            let pending = bucket.pending();

            let mut customers: OrderedMap<CustomerId, u64> = OrderedMap::new();
            for c in bucket.contributions() {
                *customers.get_or_insert_with(c.customer.clone(), || 0) += u64::from(c.quantity);
            }

            let standard = entry.map(|e| e.standard_pack_quantity());
            RowView {
                key: key.clone(),
                name: entry.map_or_else(|| key.name_part().to_string(), |e| e.name().to_string()),
                weight: entry.map(|e| e.weight().to_string()).unwrap_or_default(),
                pending,
                standard_pack_quantity: standard,
                remaining: standard.map(|s| u64::from(s).saturating_sub(pending)),
                customers: customers.iter().map(|(c, q)| (c.clone(), *q)).collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use copurchase_catalog::{CatalogEntry, EntrySource};
    use copurchase_core::Money;

    #[test]
    fn view_aggregates_customers_and_remaining() {
        let entry = CatalogEntry::new("Оливки", "300 г", Money::from_cents(100_00), 10, EntrySource::Manual).unwrap();
        let catalog: Catalog = [entry.clone()].into_iter().collect();
        let a = CustomerId::parse("A").unwrap();
        let b = CustomerId::parse("B").unwrap();

        let mut book = RowBook::new();
        book.contribute(entry.key(), &b, 2, 10);
        book.contribute(entry.key(), &a, 3, 10);
        book.contribute(entry.key(), &b, 1, 10);

        let views = row_views(&book, &catalog);
        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.name, "Оливки");
        assert_eq!(view.pending, 6);
        assert_eq!(view.remaining, Some(4));
        assert_eq!(view.customers, vec![(b, 3), (a, 3)]);
    }

    #[test]
    fn missing_catalog_entry_falls_back_to_key() {
        let key = CatalogKey::new("Мёд", "250 г");
        let mut book = RowBook::new();
        book.contribute(&key, &CustomerId::parse("A").unwrap(), 1, 5);

        let views = row_views(&book, &Catalog::new());
        assert_eq!(views[0].name, "мёд");
        assert_eq!(views[0].standard_pack_quantity, None);
        assert_eq!(views[0].remaining, None);
    }
}
