//! Plain-text reports for copying into a chat with the supplier or customers.

use chrono::{DateTime, Utc};

use copurchase_core::{CustomerId, Money};
use copurchase_orders::CommittedOrder;

use crate::session::PurchaseSession;

const WIDTH: usize = 64;
const TIMESTAMP_FORMAT: &str = "%d.%m.%Y  %H:%M";

fn banner(lines: &mut Vec<String>, title: &str, generated_at: DateTime<Utc>) {
    let stamp = format!("Сформирована: {}", generated_at.format(TIMESTAMP_FORMAT));
    lines.push("=".repeat(WIDTH));
    lines.push(format!("{title:^WIDTH$}"));
    lines.push(format!("{stamp:^WIDTH$}"));
    lines.push("=".repeat(WIDTH));
}

fn section(title: &str) -> String {
    let used = title.chars().count() + 4;
    format!("── {title} {}", "─".repeat(WIDTH.saturating_sub(used)))
}

impl PurchaseSession {
    /// The full order summary, or `None` when nothing has been committed.
    ///
    /// Customers are sorted by id and products by (name, weight). Amounts
    /// include the markup when it is enabled.
    pub fn order_summary(&self, generated_at: DateTime<Utc>) -> Option<String> {
        let ledger = self.ledger();
        if ledger.is_empty() {
            return None;
        }

        let mut lines = Vec::new();
        banner(&mut lines, "СВОДКА ЗАКАЗОВ", generated_at);

        lines.push(String::new());
        lines.push(section("ПО ЗАКАЗЧИКАМ"));
        let mut customers: Vec<&CustomerId> = Vec::new();
        for order in ledger.orders() {
            if !customers.contains(&&order.customer) {
                customers.push(&order.customer);
            }
        }
        customers.sort();

        let mut grand_total = Money::ZERO;
        for customer in customers {
            let orders: Vec<&CommittedOrder> = ledger.orders().iter().filter(|o| &o.customer == customer).collect();
            let total: Money = orders.iter().map(|o| self.displayed(o.total)).sum();
            grand_total += total;

            lines.push(String::new());
            lines.push(format!("  {customer}  |  итого: {} руб.", total.grouped()));
            for o in orders {
                lines.push(format!(
                    "    • {} {}  {} × {} шт = {} руб.",
                    o.name,
                    o.weight,
                    o.unit_price,
                    o.quantity,
                    self.displayed(o.total).grouped()
                ));
            }
        }

        lines.push(String::new());
        lines.push(section("ПО ТОВАРАМ"));
        for product in ledger.totals_by_product() {
            let customers: Vec<&str> = product.customers.iter().map(CustomerId::as_str).collect();
            lines.push(String::new());
            lines.push(format!("  {}  {}", product.name, product.weight));
            lines.push(format!(
                "    Итого: {} шт. = {} руб.",
                product.quantity,
                self.displayed(product.total).grouped()
            ));
            lines.push(format!("    Заказчики: {}", customers.join(", ")));
        }

        let markup_note = self
            .markup_percent()
            .map(|p| format!("   [наценка +{p}% включена]"))
            .unwrap_or_default();
        lines.push(String::new());
        lines.push("=".repeat(WIDTH));
        lines.push(format!(
            "  ИТОГО:  {} руб.   |   Строк заказов: {}{markup_note}",
            grand_total.grouped(),
            ledger.len()
        ));
        lines.push("=".repeat(WIDTH));

        let rows = self.row_views();
        if !rows.is_empty() {
            lines.push(String::new());
            lines.push("⚠  НЕЗАКРЫТЫЕ РЯДЫ:".to_string());
            for row in rows {
                let standard = row.standard_pack_quantity.map_or_else(|| "?".to_string(), |s| s.to_string());
                let remaining = row.remaining.map_or_else(|| "?".to_string(), |r| r.to_string());
                lines.push(format!(
                    "  • {}  {}  :  накоплено {}/{standard} шт.  (не хватает {remaining} шт.)",
                    row.name, row.weight, row.pending
                ));
                for (customer, quantity) in &row.customers {
                    lines.push(format!("      – {customer}: {quantity} шт."));
                }
            }
        }

        if !self.cart().is_empty() {
            let owner = self.customer().map_or("?", CustomerId::as_str);
            lines.push(String::new());
            lines.push(format!("⏳  НЕСОХРАНЁННАЯ КОРЗИНА ({owner}):"));
            for line in self.cart().lines() {
                lines.push(format!(
                    "  • {} {}  {} шт. = {} руб.",
                    line.name,
                    line.weight,
                    line.quantity,
                    line.line_total.grouped()
                ));
            }
        }

        Some(lines.join("\n"))
    }

    /// Open rows with their progress toward the next full pack.
    pub fn rows_summary(&self, generated_at: DateTime<Utc>) -> String {
        let mut lines = Vec::new();
        banner(&mut lines, "СВОДКА РЯДОВ", generated_at);

        let rows = self.row_views();
        lines.push(String::new());
        if rows.is_empty() {
            lines.push("  ✓  Все ряды закрыты, незакрытых позиций нет.".to_string());
        } else {
            lines.push(format!("  Незакрытых рядов: {}", rows.len()));
            for row in rows {
                let standard = row.standard_pack_quantity.map_or_else(|| "?".to_string(), |s| s.to_string());
                let remaining = row.remaining.map_or_else(|| "?".to_string(), |r| r.to_string());
                lines.push(String::new());
                lines.push(format!("  {}", "─".repeat(58)));
                lines.push(format!("  {}  {}", row.name, row.weight));
                lines.push(format!(
                    "  Норма: {standard} шт.  |  Накоплено: {} шт.  |  Осталось: {remaining} шт.",
                    row.pending
                ));
                lines.push("  Заказчики:".to_string());
                for (customer, quantity) in &row.customers {
                    lines.push(format!("    • {customer}: {quantity} шт."));
                }
            }
        }

        lines.push(String::new());
        lines.push("=".repeat(WIDTH));
        lines.join("\n")
    }
}
