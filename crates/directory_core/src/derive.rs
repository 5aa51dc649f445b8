//! Filter, sort and window pipeline over the accumulated records.
use std::cmp::Ordering;

use icu_collator::options::{CollatorOptions, Strength};
use icu_collator::{Collator, CollatorBorrowed};

use crate::{FilterKind, SortKey, UserRecord};

/// Records revealed per "more" step, and the initial window.
pub const PAGE_SIZE: usize = 6;

/// User-controlled inputs of the derivation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Query {
    pub search_term: String,
    pub sort_key: SortKey,
    pub filter_kind: FilterKind,
}

impl Query {
    /// Case-insensitive substring match on first name, last name or email,
    /// combined with the filter predicate.
    pub fn matches(&self, record: &UserRecord) -> bool {
        let needle = self.search_term.to_lowercase();
        matches_lowered(record, &needle) && self.filter_kind.accepts(record)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DerivedView {
    pub visible_records: Vec<UserRecord>,
    pub total_matching: usize,
    pub has_more: bool,
}

/// Filter then stable-sort. Equal keys keep their order in `records`.
pub fn filter_and_sort<'a>(records: &'a [UserRecord], query: &Query) -> Vec<&'a UserRecord> {
    let needle = query.search_term.to_lowercase();
    let mut matching: Vec<&UserRecord> = records
        .iter()
        .filter(|record| matches_lowered(record, &needle) && query.filter_kind.accepts(record))
        .collect();
    let key = query.sort_key;
    let collator = root_collator();
    matching.sort_by(|a, b| compare(collator.as_ref(), key.field(a), key.field(b)));
    matching
}

/// Pure projection of `records` for display.
///
/// `server_pages_remain` feeds `has_more` so the display can offer loading
/// even when every fetched match is already visible.
pub fn derive_view(
    records: &[UserRecord],
    query: &Query,
    visible_window: usize,
    server_pages_remain: bool,
) -> DerivedView {
    let matching = filter_and_sort(records, query);
    let total_matching = matching.len();
    let visible_records = matching
        .into_iter()
        .take(visible_window)
        .cloned()
        .collect();

    DerivedView {
        visible_records,
        total_matching,
        has_more: visible_window < total_matching || server_pages_remain,
    }
}

/// Root-locale ordering at tertiary strength: base letters first, then
/// accents, then case with lowercase ahead of uppercase.
pub fn collate(a: &str, b: &str) -> Ordering {
    compare(root_collator().as_ref(), a, b)
}

fn root_collator() -> Option<CollatorBorrowed<'static>> {
    let mut options = CollatorOptions::default();
    options.strength = Some(Strength::Tertiary);
    Collator::try_new(Default::default(), options).ok()
}

fn compare(collator: Option<&CollatorBorrowed<'static>>, a: &str, b: &str) -> Ordering {
    match collator {
        Some(collator) => collator.compare(a, b),
        None => fold_case(a, b),
    }
}

/// Used only if the collation data fails to load.
fn fold_case(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| b.cmp(a))
}

fn matches_lowered(record: &UserRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [&record.first_name, &record.last_name, &record.email]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collate_ignores_case_before_breaking_ties() {
        assert_eq!(collate("alpha", "Beta"), Ordering::Less);
        assert_eq!(collate("Zeta", "alpha"), Ordering::Greater);
        assert_eq!(collate("abc", "Abc"), Ordering::Less);
        assert_eq!(collate("same", "same"), Ordering::Equal);
    }

    #[test]
    fn collate_orders_prefix_first() {
        assert_eq!(collate("Ann", "Anna"), Ordering::Less);
    }

    #[test]
    fn collate_treats_accents_as_secondary() {
        assert_eq!(collate("Émile", "Eve"), Ordering::Less);
        assert_eq!(collate("Emile", "Émile"), Ordering::Less);
        assert_eq!(collate("Zoe", "Émile"), Ordering::Greater);
    }

    #[test]
    fn fold_case_keeps_lowercase_first() {
        assert_eq!(fold_case("abc", "Abc"), Ordering::Less);
        assert_eq!(fold_case("alpha", "Beta"), Ordering::Less);
    }
}
