//! Token grammar for pasted order lines.
//!
//! A line is sliced in a fixed order: weight → quantity → price. Each step has
//! its own pattern so the pipeline can be tested one token at a time.
//!
//! - weight: a decorated bucket (`пл. ведро 1,6 / 3,1 кг`) or `<number><unit>`
//!   where unit is one of `г`, `гр`, `мл`, `кг`, `ml`, `g` (optionally followed
//!   by a dot)
//! - quantity: `<integer> шт`
//! - number: `<digits>[.,]<digits>` or `<digits>`

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)",
        r"(?:пл\.?\s*ведро\s+\d+[.,]\d+(?:\s*/\s*\d+[.,]\d+)?(?:\s*кг)?)",
        r"|(?:\d+[.,]?\d*\s*(?:гр?|мл|кг|ml|g)\.?)",
    ))
    .expect("weight pattern compiles")
});

static QUANTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*шт").expect("quantity pattern compiles"));

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+[.,]\d+|\d+").expect("number pattern compiles"));

/// A token located inside the text it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub span: Range<usize>,
}

/// The leftmost weight token in `line`.
pub fn find_weight(line: &str) -> Option<Token<'_>> {
    WEIGHT.find(line).map(|m| Token {
        text: m.as_str().trim(),
        span: m.range(),
    })
}

/// The leftmost `<n> шт` token; `text` is the digits only.
pub fn find_quantity(text: &str) -> Option<Token<'_>> {
    let caps = QUANTITY.captures(text)?;
    let whole = caps.get(0)?;
    let digits = caps.get(1)?;
    Some(Token {
        text: digits.as_str(),
        span: whole.range(),
    })
}

/// The last number in `text`.
pub fn last_number(text: &str) -> Option<&str> {
    NUMBER.find_iter(text).last().map(|m| m.as_str())
}
