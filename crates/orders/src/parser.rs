//! Order Line Parser: turn pasted free text into structured order lines.
//!
//! Each non-blank line is sliced around its weight token:
//!
//! ```text
//! Вяленые томаты с прованскими травами 130 гр 95.40 - 2шт
//! └──────────────── name ────────────┘ └weight┘ └price┘ └qty┘
//! ```
//!
//! The name is everything before the weight; the quantity is the `<n> шт`
//! token after it (1 when absent); the price is the last number between the
//! weight and the quantity token, or in the whole tail when there is no
//! quantity token. Lines that do not fit are reported back, never dropped
//! silently.

use serde::{Deserialize, Serialize};

use copurchase_core::Money;

use crate::tokens::{find_quantity, find_weight, last_number};

/// Characters trimmed from the end of a product name.
const NAME_TRAILING_PUNCTUATION: &[char] = &['.', ',', '-', ' '];

/// One structured order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineRecord {
    pub name: String,
    pub weight: String,
    pub unit_price: Money,
    pub quantity: u32,
}

/// Why a line could not be parsed.
///
/// `InvalidQuantity` and `InvalidPrice` reject lines the token grammar itself
/// accepts (`0шт`, a price of `0`): a committed order needs at least one unit,
/// and a line that becomes a catalog entry needs a positive price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingWeight,
    MissingName,
    MissingPrice,
    /// The quantity token matched but is zero or does not fit a `u32`.
    InvalidQuantity,
    /// The price matched but is zero or could not be read as an amount.
    InvalidPrice,
}

impl core::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            SkipReason::MissingWeight => "no weight token",
            SkipReason::MissingName => "no product name before the weight",
            SkipReason::MissingPrice => "no price after the weight",
            SkipReason::InvalidQuantity => "quantity must be a positive integer",
            SkipReason::InvalidPrice => "price must be a positive amount",
        };
        f.write_str(text)
    }
}

/// A line that was reported back instead of parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    /// The trimmed original text.
    pub text: String,
    pub reason: SkipReason,
}

/// Result of parsing a block of pasted text. Every non-blank input line ends
/// up in exactly one of the two lists, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub lines: Vec<OrderLineRecord>,
    pub skipped: Vec<SkippedLine>,
}

impl ParseOutcome {
    pub fn skipped_texts(&self) -> impl Iterator<Item = &str> {
        self.skipped.iter().map(|s| s.text.as_str())
    }
}

/// Parse every non-blank line of `text`. `\r\n` and lone `\r` count as line
/// breaks.
pub fn parse_order_text(text: &str) -> ParseOutcome {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut outcome = ParseOutcome::default();

    for raw in normalized.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(record) => outcome.lines.push(record),
            Err(reason) => {
                tracing::debug!(line, %reason, "order line skipped");
                outcome.skipped.push(SkippedLine {
                    text: line.to_string(),
                    reason,
                });
            }
        }
    }

    outcome
}

/// Parse a single, already trimmed line.
pub fn parse_line(line: &str) -> Result<OrderLineRecord, SkipReason> {
    let weight = find_weight(line).ok_or(SkipReason::MissingWeight)?;

    let name = line[..weight.span.start]
        .trim()
        .trim_end_matches(NAME_TRAILING_PUNCTUATION)
        .trim();
    if name.is_empty() {
        return Err(SkipReason::MissingName);
    }

    let tail = &line[weight.span.end..];
    let (quantity, price_zone) = match find_quantity(tail) {
        Some(token) => {
            let quantity: u32 = token.text.parse().map_err(|_| SkipReason::InvalidQuantity)?;
            (quantity, &tail[..token.span.start])
        }
        None => (1, tail),
    };
    if quantity == 0 {
        return Err(SkipReason::InvalidQuantity);
    }

    let price_text = last_number(price_zone).ok_or(SkipReason::MissingPrice)?;
    let unit_price = Money::parse_decimal(price_text)
        .filter(|p| p.is_positive())
        .ok_or(SkipReason::InvalidPrice)?;

    Ok(OrderLineRecord {
        name: name.to_string(),
        weight: weight.text.to_string(),
        unit_price,
        quantity,
    })
}

/// Render a record back into the paste format.
pub fn format_line(record: &OrderLineRecord) -> String {
    format!(
        "{} {} {} - {}шт",
        record.name, record.weight, record.unit_price, record.quantity
    )
}
