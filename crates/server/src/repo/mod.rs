//! Named backend operations of the academy. Each function builds its
//! PostgREST request and decodes the answer; no other logic lives here.

pub mod backup;
pub mod certificates;
pub mod courses;
pub mod paging;
pub mod people;
pub mod quotas;

use shared_types::SearchTerm;

use crate::gateway::Filter;

/// OR group matching a search term against name and card number, plus
/// `nr_quota` equality when the term is numeric and `numeric` is on.
pub fn search_group(term: &SearchTerm, numeric: bool) -> Vec<Filter> {
    let pattern = term.ilike_pattern();
    let mut group = vec![
        Filter::ilike("display_name", &pattern),
        Filter::ilike("nr_tessera", &pattern),
    ];
    if numeric {
        if let Some(quota) = term.quota() {
            group.push(Filter::eq("nr_quota", quota));
        }
    }
    group
}
