// Search utilities for plugin catalogs

use std::cmp::Reverse;

/// Trait for items that can be searched
pub trait Searchable {
    /// Get the name to compare against the search query
    fn search_name(&self) -> &str;

    /// Alternative identifier that also counts as an exact match
    fn search_slug(&self) -> &str {
        self.search_name()
    }

    /// Popularity used to rank results (e.g. download count)
    fn popularity(&self) -> u64;
}

/// Edit distance between two strings, counted in characters
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Check whether an item's name or slug equals the query.
/// Case-insensitive; '-' and ' ' are interchangeable.
pub fn is_exact_match<T: Searchable + ?Sized>(item: &T, query: &str) -> bool {
    let normalize = |s: &str| s.trim().to_lowercase().replace('-', " ");
    let query = normalize(query);
    normalize(item.search_name()) == query || normalize(item.search_slug()) == query
}

/// Score used for ordering: popularity minus the distance between query and name
pub fn score<T: Searchable + ?Sized>(item: &T, query: &str) -> i64 {
    let distance = levenshtein(&query.to_lowercase(), &item.search_name().to_lowercase());
    let popularity = i64::try_from(item.popularity()).unwrap_or(i64::MAX);
    popularity.saturating_sub(distance as i64)
}

/// Rank search results: exact matches first, then by descending score.
/// Ties keep their original order.
pub fn rank_search_results<T: Searchable>(results: &mut [T], query: &str) {
    results.sort_by_cached_key(|item| {
        (
            Reverse(is_exact_match(item, query)),
            Reverse(score(item, query)),
        )
    });
}

/// Pick the result that exactly matches the query, if any
pub fn find_exact<T: Searchable>(results: Vec<T>, query: &str) -> Option<T> {
    results.into_iter().find(|item| is_exact_match(item, query))
}
