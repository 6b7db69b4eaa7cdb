use std::collections::BTreeMap;

use crate::kinds::KindId;

/// Shareable state of one list view: the resource plus its filter and
/// search parameters. Paging is never part of a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub kind: KindId,
    pub params: BTreeMap<String, String>,
}

impl Location {
    pub fn new(kind: KindId, params: BTreeMap<String, String>) -> Self {
        Self { kind, params }
    }

    pub fn root(kind: KindId) -> Self {
        Self::new(kind, BTreeMap::new())
    }
}

/// Back stack of visited locations.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Location,
    back: Vec<Location>,
}

impl Navigator {
    pub fn new(current: Location) -> Self {
        Self {
            current,
            back: Vec::new(),
        }
    }

    pub fn current(&self) -> &Location {
        &self.current
    }

    pub fn depth(&self) -> usize {
        self.back.len()
    }

    /// Records a new entry. Pushing the current location again is a no-op.
    pub fn push(&mut self, location: Location) {
        if location == self.current {
            return;
        }
        let previous = std::mem::replace(&mut self.current, location);
        self.back.push(previous);
    }

    /// Rewrites the current entry in place.
    pub fn replace(&mut self, location: Location) {
        self.current = location;
    }

    pub fn back(&mut self) -> Option<&Location> {
        let previous = self.back.pop()?;
        self.current = previous;
        Some(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(kind: KindId, pairs: &[(&str, &str)]) -> Location {
        Location::new(
            kind,
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn push_then_back() {
        let mut nav = Navigator::new(Location::root(KindId::Documents));
        nav.push(with(KindId::Documents, &[("status", "pending")]));
        nav.push(Location::root(KindId::Links));
        assert_eq!(nav.depth(), 2);

        assert_eq!(
            nav.back().cloned(),
            Some(with(KindId::Documents, &[("status", "pending")]))
        );
        assert_eq!(nav.back().cloned(), Some(Location::root(KindId::Documents)));
        assert!(nav.back().is_none());
        assert_eq!(nav.current(), &Location::root(KindId::Documents));
    }

    #[test]
    fn replace_does_not_grow_history() {
        let mut nav = Navigator::new(Location::root(KindId::Members));
        nav.replace(with(KindId::Members, &[("q", "a")]));
        nav.replace(with(KindId::Members, &[("q", "acme")]));
        assert_eq!(nav.depth(), 0);
        assert_eq!(nav.current().params.get("q").map(String::as_str), Some("acme"));
    }

    #[test]
    fn pushing_current_is_ignored() {
        let mut nav = Navigator::new(Location::root(KindId::Users));
        nav.push(Location::root(KindId::Users));
        assert_eq!(nav.depth(), 0);
    }
}
