//! Tests for the paired element primitive
//!
//! Equality, hashing and ordering must look at the working slot only.

use std::cmp::Ordering;
use std::hash::{BuildHasher, Hash, Hasher};

use cachestream_structures::{PairedElement, SequenceError};

fn hash_of<T: Hash>(value: &T) -> u64 {
    let state = ahash::RandomState::with_seeds(1, 2, 3, 4);
    let mut hasher = state.build_hasher();
    value.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod test_equality {
    use super::*;

    #[test]
    fn test_same_working_different_cache_is_equal() {
        let first = PairedElement::new("left", 12);
        let second = PairedElement::new("right", 12);
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_working_different_cache_type_is_equal() {
        let first = PairedElement::new(1u8, "value");
        let second = PairedElement::new(vec![1, 2, 3], "value");
        assert!(first == second);
    }

    #[test]
    fn test_different_working_is_not_equal() {
        let first = PairedElement::new("same", 1);
        let second = PairedElement::new("same", 2);
        assert_ne!(first, second);
    }

    #[test]
    fn test_hash_on_same_working() {
        let first = PairedElement::new("a", "shared");
        let second = PairedElement::new("b", "shared");
        assert_eq!(hash_of(&first), hash_of(&second));
    }

    #[test]
    fn test_hash_on_different_working() {
        let first = PairedElement::new("a", "one");
        let second = PairedElement::new("a", "two");
        assert_ne!(hash_of(&first), hash_of(&second));
    }
}

#[cfg(test)]
mod test_ordering {
    use super::*;

    #[test]
    fn test_ordering_follows_working() {
        let small = PairedElement::new("zzz", 1);
        let large = PairedElement::new("aaa", 2);
        assert!(small < large);
        assert_eq!(small.cmp(&large), Ordering::Less);
    }

    #[test]
    fn test_unordered_working_values() {
        let nan = PairedElement::new("nan", f32::NAN);
        let zero = PairedElement::new("zero", 0.0f32);
        assert_eq!(nan.partial_cmp(&zero), None);
        assert!(matches!(
            nan.try_cmp(&zero),
            Err(SequenceError::NotOrderable { .. })
        ));
    }
}

#[cfg(test)]
mod test_cache_channel {
    use super::*;

    #[test]
    fn test_round_trip_restores_original() {
        let element = PairedElement::from(String::from("monkey"))
            .map_working(|word| word.len())
            .swap_to_cache();
        assert_eq!(element.working(), "monkey");
        assert_eq!(element.cached(), "monkey");
    }

    #[test]
    fn test_with_working_copies_cache() {
        let parent = PairedElement::new("parent1", 2);
        let children: Vec<_> = [4, 11].iter().map(|c| parent.with_working(*c)).collect();
        assert!(children.iter().all(|child| *child.cached() == "parent1"));
    }
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_keeps_both_slots() {
    let element = PairedElement::new("cached".to_string(), 7u32);
    let json = serde_json::to_string(&element).unwrap();
    assert_eq!(json, r#"{"cached":"cached","working":7}"#);
    let back: PairedElement<String, u32> = serde_json::from_str(&json).unwrap();
    assert_eq!(back.cached(), "cached");
}
