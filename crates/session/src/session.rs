//! The purchase session: the one owned mutable state object.
//!
//! Every operation that changes the catalog, the cart, committed orders or
//! rows goes through `PurchaseSession`, so the rows can always be rebuilt from
//! the ledger after a deletion.

use chrono::{DateTime, Utc};
use serde::Serialize;

use copurchase_catalog::{
    Catalog, CatalogEntry, EntrySource, Resolution, ResolverOptions, resolve, resolve_for_entry, resolve_with_weight,
};
use copurchase_core::{CatalogKey, CustomerId, DomainError, DomainResult, Money};
use copurchase_orders::{
    Cart, CartLine, CommittedOrder, OrderLedger, SkippedLine, parse_order_text, parse_quantity_input, split_customer,
};
use copurchase_rows::{RowBook, RowView, row_views};

/// What a successful commit recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitReceipt {
    pub customer: CustomerId,
    pub orders: Vec<CommittedOrder>,
    /// The customer's total over the whole ledger after this commit.
    pub customer_total: Money,
}

/// Outcome of importing one pasted order block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub customer: CustomerId,
    /// Catalog names of the lines placed in the cart.
    pub added: Vec<String>,
    /// Parsed names that had no catalog match and were added as new entries.
    pub not_found: Vec<String>,
    pub skipped: Vec<SkippedLine>,
    /// `None` when nothing could be parsed and nothing was committed.
    pub receipt: Option<CommitReceipt>,
}

#[derive(Debug, Clone, Default)]
pub struct PurchaseSession {
    catalog: Catalog,
    ledger: OrderLedger,
    rows: RowBook,
    cart: Cart,
    customer: Option<CustomerId>,
    markup_percent: Option<u32>,
    resolver: ResolverOptions,
}

impl PurchaseSession {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn with_resolver(mut self, resolver: ResolverOptions) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &OrderLedger {
        &self.ledger
    }

    pub fn rows(&self) -> &RowBook {
        &self.rows
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn customer(&self) -> Option<&CustomerId> {
        self.customer.as_ref()
    }

    // ── catalog ─────────────────────────────────────────────────────────

    /// Swap in a freshly loaded catalog. Orders, rows and cart are kept.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        tracing::info!(entries = catalog.len(), "catalog replaced");
        self.catalog = catalog;
    }

    pub fn upsert_catalog_entry(
        &mut self,
        name: &str,
        weight: &str,
        price: &str,
        standard_pack_quantity: &str,
    ) -> DomainResult<CatalogKey> {
        self.catalog.upsert_manual(name, weight, price, standard_pack_quantity)
    }

    pub fn remove_catalog_entry(&mut self, key: &CatalogKey) -> DomainResult<CatalogEntry> {
        self.catalog
            .remove(key)
            .ok_or_else(|| DomainError::not_found(format!("catalog entry {key}")))
    }

    pub fn search(&self, query: &str) -> Vec<&CatalogEntry> {
        resolve(query, &self.catalog, &self.resolver)
    }

    pub fn resolve(&self, query: &str) -> Resolution<'_> {
        resolve_for_entry(query, &self.catalog, &self.resolver)
    }

    // ── cart ────────────────────────────────────────────────────────────

    pub fn set_customer(&mut self, raw: &str) -> DomainResult<&CustomerId> {
        let customer = CustomerId::parse(raw)?;
        Ok(&*self.customer.insert(customer))
    }

    pub fn clear_customer(&mut self) {
        self.customer = None;
    }

    /// Put a product into the cart for the current customer.
    ///
    /// `chosen` is the entry the operator picked; without it the best
    /// resolution of `query` is used.
    pub fn add_to_cart(
        &mut self,
        query: &str,
        chosen: Option<&CatalogKey>,
        quantity: &str,
    ) -> DomainResult<&CartLine> {
        if self.customer.is_none() {
            return Err(DomainError::validation("enter the customer first"));
        }
        let quantity = parse_quantity_input(quantity)?;

        let entry = match chosen {
            Some(key) => self.catalog.get(key),
            None => self.resolve(query).entry(),
        }
        .ok_or_else(|| DomainError::not_found(format!("no catalog entry for {:?}", query.trim())))?;

        let line = CartLine::from_entry(entry, quantity)?;
        self.cart.push(line);
        Ok(&self.cart.lines()[self.cart.len() - 1])
    }

    pub fn remove_cart_line(&mut self, position: usize) -> DomainResult<CartLine> {
        self.cart.remove(position)
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Commit the cart for the current customer.
    pub fn commit_cart(&mut self, committed_at: DateTime<Utc>) -> DomainResult<CommitReceipt> {
        let customer = self
            .customer
            .clone()
            .ok_or_else(|| DomainError::validation("enter the customer first"))?;
        if self.cart.is_empty() {
            return Err(DomainError::validation("the cart is empty"));
        }

        // Entries for lines whose product vanished from the catalog since they
        // were added; built up front so a bad line leaves everything untouched.
        let mut missing = Vec::new();
        for line in self.cart.lines() {
            if !self.catalog.contains(&line.key) {
                missing.push(CatalogEntry::new(
                    &line.name,
                    &line.weight,
                    line.unit_price,
                    line.standard_pack_quantity,
                    EntrySource::Manual,
                )?);
            }
        }
        for entry in missing {
            self.catalog.insert_if_absent(entry);
        }

        // A line that was exactly one pack when added ships as is; otherwise
        // it joins the row, closing packs at the catalog's current quantity.
        let mut orders = Vec::with_capacity(self.cart.len());
        for line in self.cart.take() {
            let order = self.ledger.append(&customer, &line, committed_at).clone();
            if !line.is_full_pack() {
                let standard = self
                    .catalog
                    .get(&line.key)
                    .map_or(line.standard_pack_quantity, CatalogEntry::standard_pack_quantity);
                self.rows.contribute(&order.key, &customer, order.quantity, standard);
            }
            orders.push(order);
        }

        let customer_total = self.ledger.customer_total(&customer);
        tracing::info!(customer = %customer, lines = orders.len(), total = %customer_total, "cart committed");

        Ok(CommitReceipt {
            customer,
            orders,
            customer_total,
        })
    }

    // ── pasted orders ───────────────────────────────────────────────────

    /// Parse a pasted order, put the recognized lines into the cart and commit.
    ///
    /// Without a current customer the first non-blank line names one. Lines
    /// with no catalog match become new catalog entries (pack quantity 1) at
    /// the price from the text. After a commit the current customer is
    /// cleared for the next paste.
    ///
    /// Lines already in the cart belong to the current customer; a paste for
    /// anyone else is refused with `Validation` until that cart is committed
    /// or cleared.
    pub fn import_pasted(&mut self, text: &str, committed_at: DateTime<Utc>) -> DomainResult<ImportReport> {
        let pasted = split_customer(text, self.customer.as_ref())?;
        if !self.cart.is_empty() && self.customer.as_ref() != Some(&pasted.customer) {
            return Err(DomainError::validation(format!(
                "the cart holds {} unsaved line(s); commit or clear it before taking {}'s order",
                self.cart.len(),
                pasted.customer
            )));
        }
        let parsed = parse_order_text(&pasted.body);

        let mut report = ImportReport {
            customer: pasted.customer.clone(),
            added: Vec::new(),
            not_found: Vec::new(),
            skipped: parsed.skipped,
            receipt: None,
        };
        if parsed.lines.is_empty() {
            tracing::info!(customer = %report.customer, skipped = report.skipped.len(), "nothing recognized in pasted order");
            return Ok(report);
        }

        self.customer = Some(pasted.customer);

        for record in parsed.lines {
            let found = resolve_with_weight(&record.name, &record.weight, &self.catalog).map(|e| e.key().clone());
            let key = match found {
                Some(key) => key,
                None => {
                    let entry =
                        CatalogEntry::new(&record.name, &record.weight, record.unit_price, 1, EntrySource::Paste)?;
                    report.not_found.push(record.name.clone());
                    self.catalog.insert_if_absent(entry).key().clone()
                }
            };
            let entry = self
                .catalog
                .get(&key)
                .ok_or_else(|| DomainError::invariant(format!("resolved entry {key} is not in the catalog")))?;
            let line = CartLine::from_entry(entry, record.quantity)?;
            report.added.push(line.name.clone());
            self.cart.push(line);
        }

        report.receipt = Some(self.commit_cart(committed_at)?);
        self.customer = None;
        Ok(report)
    }

    // ── deletions ───────────────────────────────────────────────────────

    /// Delete the order at 1-based `index` and rebuild rows from what is left.
    pub fn delete_order(&mut self, index: usize) -> DomainResult<CommittedOrder> {
        let removed = self.ledger.remove(index)?;
        self.rows.rebuild_from_orders(self.ledger.orders(), &self.catalog);
        tracing::info!(index, customer = %removed.customer, key = %removed.key, "order deleted");
        Ok(removed)
    }

    /// Delete a row together with every order for its product. Returns the
    /// number of orders removed.
    pub fn delete_row(&mut self, key: &CatalogKey) -> DomainResult<usize> {
        let bucket = self.rows.remove(key);
        let removed = self.ledger.remove_key(key);
        if bucket.is_none() && removed == 0 {
            return Err(DomainError::not_found(format!("row {key}")));
        }
        tracing::info!(key = %key, orders = removed, "row deleted");
        Ok(removed)
    }

    /// Drop orders, rows and cart. The catalog stays.
    pub fn clear_all(&mut self) {
        self.ledger.clear();
        self.rows.clear();
        self.cart.clear();
    }

    /// Adopt an order list from outside and rebuild rows from it.
    pub fn adopt_orders(&mut self, orders: Vec<CommittedOrder>) {
        self.ledger = OrderLedger::from_orders(orders);
        self.rows.rebuild_from_orders(self.ledger.orders(), &self.catalog);
    }

    // ── totals ──────────────────────────────────────────────────────────

    pub fn markup_percent(&self) -> Option<u32> {
        self.markup_percent
    }

    pub fn set_markup(&mut self, percent: Option<u32>) {
        self.markup_percent = percent;
    }

    /// An amount as shown to customers (with the markup when enabled).
    pub fn displayed(&self, amount: Money) -> Money {
        match self.markup_percent {
            Some(percent) => amount.with_markup(percent),
            None => amount,
        }
    }

    /// Grand total of all committed orders, markup applied per order.
    pub fn grand_total(&self) -> Money {
        self.ledger.orders().iter().map(|o| self.displayed(o.total)).sum()
    }

    pub fn row_views(&self) -> Vec<RowView> {
        row_views(&self.rows, &self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn session() -> PurchaseSession {
        let catalog: Catalog = [
            CatalogEntry::new("Вяленые томаты", "130 гр", Money::from_cents(9540), 6, EntrySource::Manual).unwrap(),
            CatalogEntry::new("Оливки", "300 г", Money::from_cents(100_00), 10, EntrySource::Manual).unwrap(),
        ]
        .into_iter()
        .collect();
        PurchaseSession::new(catalog)
    }

    #[test]
    fn add_to_cart_requires_customer_and_quantity() {
        let mut s = session();
        assert!(matches!(s.add_to_cart("оливки", None, "2"), Err(DomainError::Validation(_))));

        s.set_customer("Маша").unwrap();
        assert!(matches!(s.add_to_cart("оливки", None, "шт"), Err(DomainError::InvalidQuantity(_))));
        assert!(matches!(s.add_to_cart("шоколад", None, "1"), Err(DomainError::NotFound(_))));

        let line = s.add_to_cart("олив", None, "2 шт").unwrap();
        assert_eq!(line.name, "Оливки");
        assert_eq!(line.line_total, Money::from_cents(200_00));
    }

    #[test]
    fn chosen_entry_wins_over_query() {
        let mut s = session();
        s.set_customer("Маша").unwrap();
        let key = CatalogKey::new("Вяленые томаты", "130 гр");
        let line = s.add_to_cart("олив", Some(&key), "1").unwrap();
        assert_eq!(line.key, key);
    }

    #[test]
    fn commit_feeds_rows_except_full_packs() {
        let mut s = session();
        s.set_customer("Маша").unwrap();
        s.add_to_cart("оливки", None, "4").unwrap();
        s.add_to_cart("вяленые томаты", None, "6").unwrap();

        let receipt = s.commit_cart(at()).unwrap();
        assert_eq!(receipt.orders.len(), 2);
        assert_eq!(receipt.customer_total, Money::from_cents(400_00 + 6 * 9540));
        assert!(s.cart().is_empty());

        assert_eq!(s.rows().len(), 1);
        assert_eq!(s.rows().get(&CatalogKey::new("Оливки", "300 г")).unwrap().pending(), 4);
    }

    #[test]
    fn commit_rejects_empty_cart() {
        let mut s = session();
        s.set_customer("Маша").unwrap();
        assert!(matches!(s.commit_cart(at()), Err(DomainError::Validation(_))));
    }

    #[test]
    fn commit_restores_entries_missing_from_catalog() {
        let mut s = session();
        s.set_customer("Маша").unwrap();
        s.add_to_cart("оливки", None, "3").unwrap();
        s.replace_catalog(Catalog::new());

        s.commit_cart(at()).unwrap();
        let entry = s.catalog().get(&CatalogKey::new("Оливки", "300 г")).unwrap();
        assert_eq!(entry.source(), &EntrySource::Manual);
        assert_eq!(entry.standard_pack_quantity(), 10);
        assert_eq!(s.rows().len(), 1);
    }

    #[test]
    fn markup_applies_per_order() {
        let mut s = session();
        s.set_customer("Маша").unwrap();
        s.add_to_cart("вяленые томаты", None, "1").unwrap();
        s.commit_cart(at()).unwrap();

        assert_eq!(s.grand_total(), Money::from_cents(9540));
        s.set_markup(Some(13));
        assert_eq!(s.grand_total(), Money::from_cents(10780));
    }

    #[test]
    fn full_pack_is_judged_by_the_pack_size_it_was_added_with() {
        let mut s = session();
        s.set_customer("Маша").unwrap();
        s.add_to_cart("оливки", None, "10").unwrap();
        // Supplier now packs 12: the line was a whole pack of 10 and still ships alone.
        s.upsert_catalog_entry("Оливки", "300 г", "100", "12").unwrap();
        s.add_to_cart("оливки", None, "10").unwrap();

        s.commit_cart(at()).unwrap();
        let row = s.rows().get(&CatalogKey::new("Оливки", "300 г")).unwrap();
        assert_eq!(row.pending(), 10);
        assert_eq!(s.ledger().len(), 2);
    }

    #[test]
    fn paste_refuses_cart_left_by_another_customer() {
        let mut s = session();
        s.set_customer("Аня").unwrap();
        s.add_to_cart("оливки", None, "3").unwrap();
        s.clear_customer();

        let err = s.import_pasted("Маша\nОливки 300 г 100 - 1шт", at()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(s.ledger().is_empty());
        assert_eq!(s.cart().len(), 1);
        assert_eq!(s.customer(), None);

        s.set_customer("Аня").unwrap();
        let report = s.import_pasted("Оливки 300 г 100 - 1шт", at()).unwrap();
        let receipt = report.receipt.unwrap();
        assert!(receipt.orders.iter().all(|o| o.customer.as_str() == "Аня"));
        assert_eq!(receipt.orders.len(), 2);
    }

    #[test]
    fn remove_catalog_entry_reports_missing_key() {
        let mut s = session();
        let key = CatalogKey::new("Оливки", "300 г");
        assert!(s.remove_catalog_entry(&key).is_ok());
        assert!(matches!(s.remove_catalog_entry(&key), Err(DomainError::NotFound(_))));
    }
}
