//! Fuzzy Resolver: rank catalog entries against a free-text product query.
//!
//! Ranking:
//! - the query is a substring of the entry name → rank = char offset of the
//!   first occurrence (earlier is better)
//! - otherwise, the matching ratio `2·M / (|query| + |name|)` (M = chars in
//!   common, in order) above the threshold → rank = `10 + (1 − ratio)`, so
//!   every similarity hit sorts after every substring hit
//!
//! Ties keep catalog order (stable sort).

use similar::TextDiff;

use crate::entry::{Catalog, CatalogEntry};

/// Offset that pushes similarity-only matches below all substring matches.
const SIMILARITY_RANK_BASE: f64 = 10.0;

#[derive(Debug, Clone, Copy)]
pub struct ResolverOptions {
    /// Maximum number of hits returned.
    pub limit: usize,
    /// Similarity must be strictly greater than this to count as a match.
    pub min_similarity: f64,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            min_similarity: 0.42,
        }
    }
}

/// Outcome of resolving a query for the operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    /// A hit whose name equals the query (case-insensitive).
    Confirmed(&'a CatalogEntry),
    /// No exact name; `best` is the top-ranked hit, `hits` the full ranking.
    Suggested {
        best: &'a CatalogEntry,
        hits: Vec<&'a CatalogEntry>,
    },
    NotFound,
}

impl<'a> Resolution<'a> {
    /// The entry a commit would use, if any.
    pub fn entry(&self) -> Option<&'a CatalogEntry> {
        match self {
            Resolution::Confirmed(entry) => Some(entry),
            Resolution::Suggested { best, .. } => Some(best),
            Resolution::NotFound => None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Resolution::Confirmed(_))
    }
}

/// Rank catalog entries against `query`, best first, at most `options.limit`.
///
/// A blank query or an empty catalog yields no hits.
pub fn resolve<'a>(query: &str, catalog: &'a Catalog, options: &ResolverOptions) -> Vec<&'a CatalogEntry> {
    let query = query.trim().to_lowercase();
    if query.is_empty() || catalog.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<(f64, &CatalogEntry)> = catalog
        .iter()
        .filter_map(|entry| rank(&query, entry, options.min_similarity).map(|r| (r, entry)))
        .collect();

    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked.into_iter().take(options.limit).map(|(_, e)| e).collect()
}

/// Resolve and flag an exact (case-insensitive) name match as confirmed.
///
/// The ranking is not changed; the exact hit is picked out of it.
pub fn resolve_for_entry<'a>(query: &str, catalog: &'a Catalog, options: &ResolverOptions) -> Resolution<'a> {
    let hits = resolve(query, catalog, options);
    let wanted = query.trim().to_lowercase();

    if let Some(&exact) = hits.iter().find(|e| e.name().to_lowercase() == wanted) {
        return Resolution::Confirmed(exact);
    }
    match hits.first() {
        Some(&best) => Resolution::Suggested { best, hits },
        None => Resolution::NotFound,
    }
}

/// Resolve a parsed order line: among the default top hits, prefer the first
/// whose weight matches (ignoring whitespace and case), else the best hit.
pub fn resolve_with_weight<'a>(name: &str, weight: &str, catalog: &'a Catalog) -> Option<&'a CatalogEntry> {
    let hits = resolve(name, catalog, &ResolverOptions::default());
    let wanted = squash(weight);
    hits.iter()
        .find(|e| squash(e.weight()) == wanted)
        .or_else(|| hits.first())
        .copied()
}

fn rank(query: &str, entry: &CatalogEntry, min_similarity: f64) -> Option<f64> {
    let name = entry.name().to_lowercase();
    if let Some(byte_offset) = name.find(query) {
        return Some(name[..byte_offset].chars().count() as f64);
    }
    let similarity = f64::from(TextDiff::from_chars(query, name.as_str()).ratio());
    (similarity > min_similarity).then(|| SIMILARITY_RANK_BASE + (1.0 - similarity))
}

fn squash(weight: &str) -> String {
    weight.split_whitespace().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntrySource;
    use copurchase_core::Money;

    fn catalog(items: &[(&str, &str)]) -> Catalog {
        items
            .iter()
            .map(|(name, weight)| {
                CatalogEntry::new(name, weight, Money::from_cents(100), 1, EntrySource::Manual).unwrap()
            })
            .collect()
    }

    fn names<'a>(hits: &[&'a CatalogEntry]) -> Vec<&'a str> {
        hits.iter().map(|e| e.name()).collect()
    }

    #[test]
    fn substring_hits_rank_by_offset_before_similarity_hits() {
        let c = catalog(&[
            ("Томаты вяленые", "130 гр"),
            ("Вялено", "1 кг"),
            ("Вяленые томаты", "130 гр"),
        ]);
        let hits = resolve("вялен", &c, &ResolverOptions::default());
        // Equal offsets keep catalog order.
        assert_eq!(names(&hits), vec!["Вялено", "Вяленые томаты", "Томаты вяленые"]);
    }

    #[test]
    fn similarity_hits_follow_substring_hits() {
        let c = catalog(&[("Олифки зелёные", ""), ("Оливни", ""), ("Зелёные оливки", "")]);
        let hits = resolve("оливки", &c, &ResolverOptions::default());
        // Closer ratios first: "оливни" shares 5 of 6 chars, "олифки зелёные" 5 of 14.
        assert_eq!(names(&hits), vec!["Зелёные оливки", "Оливни", "Олифки зелёные"]);
    }

    #[test]
    fn typo_resolves_by_similarity() {
        let c = catalog(&[("Каперсы", "100 г"), ("Мёд гречишный", "250 г")]);
        let hits = resolve("каперсв", &c, &ResolverOptions::default());
        assert_eq!(names(&hits), vec!["Каперсы"]);
    }

    #[test]
    fn typo_against_long_name_passes_threshold() {
        let c = catalog(&[("Мёд гречишный", "250 г"), ("Оливки зелёные", "300 г")]);
        let hits = resolve("оливкы", &c, &ResolverOptions::default());
        assert_eq!(names(&hits), vec!["Оливки зелёные"]);
    }

    #[test]
    fn blank_query_or_empty_catalog_yields_nothing() {
        let c = catalog(&[("Каперсы", "")]);
        assert!(resolve("   ", &c, &ResolverOptions::default()).is_empty());
        assert!(resolve("кап", &Catalog::new(), &ResolverOptions::default()).is_empty());
    }

    #[test]
    fn limit_caps_results() {
        let c = catalog(&[("Мёд 1", ""), ("Мёд 2", ""), ("Мёд 3", "")]);
        let options = ResolverOptions {
            limit: 2,
            ..ResolverOptions::default()
        };
        assert_eq!(resolve("мёд", &c, &options).len(), 2);
    }

    #[test]
    fn exact_name_is_confirmed_without_reordering() {
        let c = catalog(&[("Мёд гречишный", "250 г"), ("Мёд", "500 г")]);

        let resolution = resolve_for_entry("МЁД", &c, &ResolverOptions::default());
        assert!(resolution.is_confirmed());
        assert_eq!(resolution.entry().unwrap().weight(), "500 г");

        match resolve_for_entry("мё", &c, &ResolverOptions::default()) {
            Resolution::Suggested { best, hits } => {
                assert_eq!(best.name(), "Мёд гречишный");
                assert_eq!(hits.len(), 2);
            }
            other => panic!("expected suggestion, got {other:?}"),
        }

        assert_eq!(
            resolve_for_entry("шоколад", &c, &ResolverOptions::default()),
            Resolution::NotFound
        );
    }

    #[test]
    fn weight_preference_picks_matching_pack() {
        let c = catalog(&[("Оливки", "300 г"), ("Оливки", "1,6 кг")]);
        let picked = resolve_with_weight("Оливки", "1,6кг", &c).unwrap();
        assert_eq!(picked.weight(), "1,6 кг");

        let fallback = resolve_with_weight("Оливки", "5 кг", &c).unwrap();
        assert_eq!(fallback.weight(), "300 г");
    }
}
