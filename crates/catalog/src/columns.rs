//! Header detection and column-role mapping.
//!
//! Supplier price lists put a title block above the table and name their
//! columns inconsistently, so roles are found by keyword priority: the first
//! keyword (in list order) that occurs in any header cell wins, and among
//! cells containing it the leftmost one is taken.

/// Markers that make a row look like the name column's header.
pub const NAME_MARKERS: [&str; 2] = ["наименов", "name"];

/// Markers that make a row look like it carries a price column.
pub const PRICE_MARKERS: [&str; 2] = ["цена", "price"];

pub const NAME_KEYWORDS: [&str; 2] = ["наименов", "name"];

pub const WEIGHT_KEYWORDS: [&str; 6] = ["масса нетто", "масса", "вес, кг", "вес", "net weight", "weight"];

pub const PACK_QUANTITY_KEYWORDS: [&str; 9] = [
    "штук в коробке",
    "ведер в коробке",
    "штук",
    "ведер",
    "уп.",
    "в коробке",
    "units per box",
    "units",
    "pail count",
];

/// Per-unit price phrases, preferred over a bare price column (which is often
/// the price of a whole box).
pub const UNIT_PRICE_KEYWORDS: [&str; 7] = [
    "цена за штуку",
    "цена за ведро",
    "цена за уп",
    "цена за ед",
    "price per unit",
    "price per pail",
    "price per pack",
];

pub const BARE_PRICE_KEYWORDS: [&str; 2] = ["цена", "price"];

/// Column indexes resolved from a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: usize,
    pub weight: Option<usize>,
    pub price: usize,
    pub pack_quantity: Option<usize>,
}

/// Whether the concatenated, lowercased row contains both a name and a price
/// marker.
pub fn looks_like_header(row: &[String]) -> bool {
    let joined = row
        .iter()
        .map(|c| c.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    NAME_MARKERS.iter().any(|m| joined.contains(m)) && PRICE_MARKERS.iter().any(|m| joined.contains(m))
}

/// Map header cells to column roles. Requires at least a name and a price
/// column.
pub fn detect_columns(header: &[String]) -> Option<ColumnMap> {
    let cells: Vec<String> = header.iter().map(|c| c.trim().to_lowercase()).collect();

    let name = first_match(&cells, &NAME_KEYWORDS)?;
    let price = first_match(&cells, &UNIT_PRICE_KEYWORDS).or_else(|| first_match(&cells, &BARE_PRICE_KEYWORDS))?;

    Some(ColumnMap {
        name,
        weight: first_match(&cells, &WEIGHT_KEYWORDS),
        price,
        pack_quantity: first_match(&cells, &PACK_QUANTITY_KEYWORDS),
    })
}

fn first_match(cells: &[String], keywords: &[&str]) -> Option<usize> {
    keywords
        .iter()
        .find_map(|kw| cells.iter().position(|cell| cell.contains(kw)))
}
