//! Weight field normalization for headered price files.

/// Unit tokens recognised inside a weight cell (substring, case-insensitive).
pub const UNIT_TOKENS: [&str; 9] = ["г", "гр", "кг", "мл", "л", "g", "kg", "ml", "l"];

/// Suffix appended when a weight cell carries no recognised unit.
pub const DEFAULT_UNIT_SUFFIX: &str = " кг";

/// Normalize a raw weight cell.
///
/// `"1,8 / 3,1"` keeps only the part before the first slash (`"1,8"`) and, since
/// no unit is present, becomes `"1,8 кг"`. Empty input stays empty.
pub fn normalize_weight(raw: &str, default_suffix: &str) -> String {
    let mut value = raw.trim();
    if let Some((head, _)) = value.split_once('/') {
        value = head.trim();
    }
    if value.is_empty() {
        return String::new();
    }

    let lower = value.to_lowercase();
    if UNIT_TOKENS.iter().any(|unit| lower.contains(unit)) {
        value.to_string()
    } else {
        format!("{value}{default_suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_value_before_slash_and_adds_unit() {
        assert_eq!(normalize_weight("1,8 / 3,1", DEFAULT_UNIT_SUFFIX), "1,8 кг");
    }

    #[test]
    fn leaves_values_with_units_alone() {
        assert_eq!(normalize_weight(" 130 гр ", DEFAULT_UNIT_SUFFIX), "130 гр");
        assert_eq!(normalize_weight("0,5 Л", DEFAULT_UNIT_SUFFIX), "0,5 Л");
        assert_eq!(normalize_weight("250ml", DEFAULT_UNIT_SUFFIX), "250ml");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(normalize_weight("   ", DEFAULT_UNIT_SUFFIX), "");
        assert_eq!(normalize_weight("/ 3,1", DEFAULT_UNIT_SUFFIX), "");
    }
}
