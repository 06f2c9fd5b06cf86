use std::collections::BTreeMap;

use super::PageRequest;

/// Navigation links of a page (`first`, `last`, `prev`, `next`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageLinks(BTreeMap<String, String>);

impl PageLinks {
    pub(super) fn from_map(links: BTreeMap<String, String>) -> Self {
        Self(links)
    }

    /// Builds links for `path` given the total record count and the window.
    ///
    /// Every link repeats the window size so that following it yields the same
    /// total count as long as the underlying data does not change.
    #[must_use]
    pub fn build(path: &str, count: u64, page: &PageRequest) -> Self {
        let mut links = BTreeMap::new();
        let link = |limit: u64, offset: u64| format!("{path}?limit={limit}&offset={offset}");

        let Some(limit) = page.limit() else {
            links.insert("first".to_owned(), link(0, 0));
            links.insert("last".to_owned(), link(0, 0));
            return Self(links);
        };

        let offset = page.offset();
        let last_offset = count.saturating_sub(1) / limit * limit;

        links.insert("first".to_owned(), link(limit, 0));
        links.insert("last".to_owned(), link(limit, last_offset));

        if offset > 0 {
            let previous = offset.saturating_sub(limit).min(last_offset);
            links.insert("prev".to_owned(), link(limit, previous));
        }

        if offset.saturating_add(limit) < count {
            links.insert("next".to_owned(), link(limit, offset + limit));
        }

        Self(links)
    }

    /// Returns the link for a relation name.
    #[must_use]
    pub fn get(&self, relation: &str) -> Option<&str> {
        self.0.get(relation).map(String::as_str)
    }

    /// Returns whether the page carries no links.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(relation, href)` pairs in relation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(relation, href)| (relation.as_str(), href.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::PageLinks;
    use crate::PageRequest;

    const PATH: &str = "/api/integrations/v2.0/endpoints";

    fn window(limit: i64, offset: i64) -> PageRequest {
        match PageRequest::from_transport(Some(limit), Some(offset), None, 1_000) {
            Ok(page) => page,
            Err(error) => panic!("window should be valid: {error}"),
        }
    }

    #[test]
    fn middle_page_links_in_both_directions() {
        let links = PageLinks::build(PATH, 45, &window(10, 20));

        assert_eq!(links.get("first"), Some("/api/integrations/v2.0/endpoints?limit=10&offset=0"));
        assert_eq!(links.get("last"), Some("/api/integrations/v2.0/endpoints?limit=10&offset=40"));
        assert_eq!(links.get("prev"), Some("/api/integrations/v2.0/endpoints?limit=10&offset=10"));
        assert_eq!(links.get("next"), Some("/api/integrations/v2.0/endpoints?limit=10&offset=30"));
    }

    #[test]
    fn first_page_has_no_prev_and_last_page_has_no_next() {
        let first = PageLinks::build(PATH, 25, &window(10, 0));
        assert!(first.get("prev").is_none());
        assert!(first.get("next").is_some());

        let last = PageLinks::build(PATH, 25, &window(10, 20));
        assert!(last.get("next").is_none());
        assert!(last.get("prev").is_some());
    }

    #[test]
    fn unbounded_window_only_links_first_and_last() {
        let links = PageLinks::build(PATH, 1_234, &PageRequest::unbounded());
        assert_eq!(links.iter().count(), 2);
        assert_eq!(links.get("first"), links.get("last"));
    }

    #[test]
    fn empty_result_points_last_at_first_page() {
        let links = PageLinks::build(PATH, 0, &window(10, 0));
        assert_eq!(links.get("first"), links.get("last"));
        assert!(links.get("next").is_none());
    }

    proptest! {
        #[test]
        fn navigation_offsets_stay_within_result(
            count in 0_u64..5_000,
            limit in 1_i64..200,
            page in 0_i64..60,
        ) {
            let offset = page * limit;
            let links = PageLinks::build(PATH, count, &window(limit, offset));

            for (relation, href) in links.iter() {
                let Some((_, raw_offset)) = href.rsplit_once("offset=") else {
                    panic!("link '{relation}' has no offset");
                };
                let Ok(link_offset) = raw_offset.parse::<u64>() else {
                    panic!("link '{relation}' has a non-numeric offset");
                };
                prop_assert_eq!(link_offset % limit.unsigned_abs(), 0);
                prop_assert!(link_offset == 0 || link_offset < count);
            }

            prop_assert!(links.get("first").is_some());
            prop_assert!(links.get("last").is_some());
        }
    }
}
