//! Insertion-ordered multimap of children keyed by their parent's id.

use std::hash::Hash;

use indexmap::IndexMap;
use uuid::Uuid;

use crate::entities::{questions, template_questions, template_themes, themes};
use crate::errors::domain::DomainError;

/// A child row that names its parent.
pub trait HasParent {
    /// Singular entity name used in integrity errors ("theme").
    const KIND: &'static str;
    /// Singular parent name ("round").
    const PARENT: &'static str;

    fn id(&self) -> Uuid;
    fn parent_id(&self) -> Uuid;
}

/// Children grouped under the key they were filed under.
///
/// Keys keep first-insertion order; values keep push order within a key.
#[derive(Debug, Clone)]
pub struct Grouped<K, V> {
    buckets: IndexMap<K, Vec<V>>,
}

impl<K, V> Default for Grouped<K, V> {
    fn default() -> Self {
        Self {
            buckets: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for Grouped<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.buckets == other.buckets
    }
}

impl<K: Hash + Eq, V> Grouped<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: K, value: V) {
        self.buckets.entry(key).or_default().push(value);
    }

    pub fn get(&self, key: &K) -> &[V] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Buckets in key insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.buckets.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Every value, bucket by bucket.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.buckets.values().flatten()
    }

    /// Total number of values across buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: HasParent> Grouped<Uuid, V> {
    /// Check that every value's parent id equals the key it is filed under.
    pub fn verify(&self) -> Result<(), DomainError> {
        for (key, values) in &self.buckets {
            for v in values {
                if v.parent_id() != *key {
                    return Err(DomainError::integrity(format!(
                        "{} {} has incorrect {} ID: expected {}, got {}",
                        V::KIND,
                        v.id(),
                        V::PARENT,
                        key,
                        v.parent_id()
                    )));
                }
            }
        }
        Ok(())
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for Grouped<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut grouped = Self::new();
        for (k, v) in iter {
            grouped.push(k, v);
        }
        grouped
    }
}

impl HasParent for template_themes::Model {
    const KIND: &'static str = "theme";
    const PARENT: &'static str = "round";

    fn id(&self) -> Uuid {
        self.id
    }
    fn parent_id(&self) -> Uuid {
        self.round_id
    }
}

impl HasParent for template_questions::Model {
    const KIND: &'static str = "question";
    const PARENT: &'static str = "theme";

    fn id(&self) -> Uuid {
        self.id
    }
    fn parent_id(&self) -> Uuid {
        self.theme_id
    }
}

impl HasParent for themes::Model {
    const KIND: &'static str = "theme";
    const PARENT: &'static str = "round";

    fn id(&self) -> Uuid {
        self.id
    }
    fn parent_id(&self) -> Uuid {
        self.round_id
    }
}

impl HasParent for questions::Model {
    const KIND: &'static str = "question";
    const PARENT: &'static str = "theme";

    fn id(&self) -> Uuid {
        self.id
    }
    fn parent_id(&self) -> Uuid {
        self.theme_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme(id: Uuid, round_id: Uuid, position: i32) -> themes::Model {
        themes::Model {
            id,
            round_id,
            name: format!("t{position}"),
            position,
        }
    }

    #[test]
    fn keeps_key_and_value_order() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut g = Grouped::new();
        g.push(b, 1);
        g.push(a, 2);
        g.push(b, 3);

        let keys: Vec<_> = g.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![b, a]);
        assert_eq!(g.get(&b), &[1, 3]);
        assert_eq!(g.values().copied().collect::<Vec<_>>(), vec![1, 3, 2]);
        assert_eq!(g.len(), 3);
        assert!(g.get(&Uuid::nil()).is_empty());
    }

    #[test]
    fn equality_respects_bucket_contents() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let left: Grouped<Uuid, i32> = [(a, 1), (b, 2)].into_iter().collect();
        let same: Grouped<Uuid, i32> = [(a, 1), (b, 2)].into_iter().collect();
        let other: Grouped<Uuid, i32> = [(a, 1), (b, 3)].into_iter().collect();

        assert_eq!(left, same);
        assert_ne!(left, other);
    }

    #[test]
    fn verify_accepts_consistent_parents() {
        let round = Uuid::new_v4();
        let g: Grouped<Uuid, _> = [(round, theme(Uuid::new_v4(), round, 0))].into_iter().collect();
        assert!(g.verify().is_ok());
    }

    #[test]
    fn verify_names_entity_expected_and_actual_parent() {
        let (filed_under, actual) = (Uuid::new_v4(), Uuid::new_v4());
        let theme_id = Uuid::new_v4();
        let mut g = Grouped::new();
        g.push(filed_under, theme(theme_id, actual, 0));

        let err = g.verify().unwrap_err();
        assert_eq!(
            err,
            DomainError::integrity(format!(
                "theme {theme_id} has incorrect round ID: expected {filed_under}, got {actual}"
            ))
        );
    }
}
