//! Insertion-ordered registry of decoded worldgen values keyed by identifier.

use std::slice;

use rustc_hash::FxHashMap;
use strata_utils::Identifier;

use crate::RegistryError;

/// An append-only map from key to value that remembers registration order.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: Vec<(Identifier, T)>,
    by_key: FxHashMap<Identifier, usize>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_key: FxHashMap::default(),
        }
    }
}

impl<T> Registry<T> {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` under `key`.
    ///
    /// # Errors
    /// [`RegistryError::DuplicateKey`] if `key` is taken; the registry is unchanged.
    pub fn register(&mut self, key: Identifier, value: T) -> Result<(), RegistryError> {
        if self.by_key.contains_key(&key) {
            return Err(RegistryError::DuplicateKey(key));
        }
        self.by_key.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        Ok(())
    }

    /// The value under `key`.
    #[must_use]
    pub fn get(&self, key: &Identifier) -> Option<&T> {
        self.by_key.get(key).map(|&i| &self.entries[i].1)
    }

    /// Whether `key` is registered.
    #[must_use]
    pub fn contains_key(&self, key: &Identifier) -> bool {
        self.by_key.contains_key(key)
    }

    /// Visit every entry in registration order.
    pub fn for_each(&self, mut f: impl FnMut(&Identifier, &T)) {
        for (key, value) in &self.entries {
            f(key, value);
        }
    }

    /// Fill in entries of `lower` whose keys are not registered here.
    ///
    /// Existing entries win. Returns the number of entries taken from `lower`.
    pub fn merge_down(&mut self, lower: Self) -> usize {
        let mut added = 0;
        for (key, value) in lower.entries {
            if !self.by_key.contains_key(&key) {
                self.by_key.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                added += 1;
            }
        }
        added
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.entries.iter(),
        }
    }
}

/// Iterator over a [`Registry`] in registration order.
pub struct Iter<'a, T> {
    inner: slice::Iter<'a, (Identifier, T)>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a Identifier, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> IntoIterator for &'a Registry<T> {
    type Item = (&'a Identifier, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(path: &'static str) -> Identifier {
        Identifier::vanilla_static(path)
    }

    #[test]
    fn register_and_get() {
        let mut registry = Registry::new();
        registry.register(key("a"), 1).expect("fresh key");
        registry.register(key("b"), 2).expect("fresh key");
        assert_eq!(registry.get(&key("a")), Some(&1));
        assert_eq!(registry.get(&key("c")), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn duplicate_is_rejected_and_keeps_first() {
        let mut registry = Registry::new();
        registry.register(key("a"), 1).expect("fresh key");
        assert_eq!(
            registry.register(key("a"), 9),
            Err(RegistryError::DuplicateKey(key("a")))
        );
        assert_eq!(registry.get(&key("a")), Some(&1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn for_each_follows_registration_order() {
        let mut registry = Registry::new();
        for (i, path) in ["z", "a", "m"].into_iter().enumerate() {
            registry.register(key(path), i).expect("fresh key");
        }
        let mut seen = Vec::new();
        registry.for_each(|k, v| seen.push((k.path.to_string(), *v)));
        assert_eq!(
            seen,
            vec![("z".to_owned(), 0), ("a".to_owned(), 1), ("m".to_owned(), 2)]
        );
    }

    #[test]
    fn merge_down_keeps_existing_entries() {
        let mut upper = Registry::new();
        upper.register(key("shared"), "upper").expect("fresh key");
        let mut lower = Registry::new();
        lower.register(key("shared"), "lower").expect("fresh key");
        lower.register(key("extra"), "lower").expect("fresh key");

        assert_eq!(upper.merge_down(lower), 1);
        assert_eq!(upper.get(&key("shared")), Some(&"upper"));
        assert_eq!(upper.get(&key("extra")), Some(&"lower"));
        let keys: Vec<_> = upper.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec![key("shared"), key("extra")]);
    }
}
