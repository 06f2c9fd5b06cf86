use std::collections::HashSet;

use uuid::Uuid;

/// Integration ids a principal may view, as enumerated by the relation system.
///
/// Never empty: an enumeration that yields nothing is represented by the
/// absence of a set, not by an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedIdSet(HashSet<Uuid>);

impl AuthorizedIdSet {
    /// Wraps a fully collected id set. Returns `None` for an empty set.
    #[must_use]
    pub fn from_ids(ids: HashSet<Uuid>) -> Option<Self> {
        (!ids.is_empty()).then_some(Self(ids))
    }

    /// Returns whether the id is authorized.
    #[must_use]
    pub fn contains(&self, id: &Uuid) -> bool {
        self.0.contains(id)
    }

    /// Returns the number of authorized ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set holds no ids. Never true for a constructed set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copies the ids into a vector, e.g. for binding as a SQL array.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Uuid> {
        self.0.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use uuid::Uuid;

    use super::AuthorizedIdSet;

    #[test]
    fn empty_id_set_is_not_representable() {
        assert!(AuthorizedIdSet::from_ids(HashSet::new()).is_none());
    }

    #[test]
    fn membership_is_order_independent() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let forward = AuthorizedIdSet::from_ids(HashSet::from([first, second]));
        let backward = AuthorizedIdSet::from_ids(HashSet::from([second, first]));

        assert_eq!(forward, backward);
        assert!(forward.is_some_and(|set| set.contains(&first) && set.len() == 2));
    }
}
