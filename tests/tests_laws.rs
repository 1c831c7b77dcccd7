//! Property-based tests for the cache laws
//!
//! Every law is checked in both execution modes: parallel evaluation must
//! give the same results in the same order.

use std::collections::HashSet;

use cachestream::prelude::*;
use proptest::prelude::*;

fn words_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{0,8}", 0..40)
}

fn source(words: &[String], parallel: bool) -> UnpairedSequence<'static, String> {
    let words = words.to_vec();
    if parallel {
        UnpairedSequence::from_parallel(words)
    } else {
        UnpairedSequence::from_collection(words)
    }
}

proptest! {
    #[test]
    fn filter_keeps_matching_originals_paired_with_themselves(
        words in words_strategy(),
        min_len in 0usize..8,
        parallel in any::<bool>(),
    ) {
        let pairs = source(&words, parallel)
            .begin_caching()
            .filter(move |word| word.len() >= min_len)
            .to_elements()
            .unwrap();
        let expected: Vec<&String> = words.iter().filter(|word| word.len() >= min_len).collect();

        prop_assert_eq!(pairs.len(), expected.len());
        for (pair, original) in pairs.iter().zip(expected) {
            prop_assert_eq!(pair.working(), original);
            prop_assert_eq!(pair.cached(), original);
        }
    }

    #[test]
    fn mapping_never_touches_the_cache(words in words_strategy(), parallel in any::<bool>()) {
        let restored = source(&words, parallel)
            .begin_caching()
            .map(|word| word.chars().rev().collect::<String>() + "!")
            .swap_to_cache()
            .to_vec()
            .unwrap();
        prop_assert_eq!(restored, words);
    }

    #[test]
    fn begin_caching_twice_is_begin_caching_once(words in words_strategy()) {
        let twice = source(&words, false)
            .begin_caching()
            .begin_caching()
            .to_elements()
            .unwrap();
        let once = source(&words, false).begin_caching().to_elements().unwrap();

        prop_assert_eq!(twice.len(), once.len());
        for (left, right) in twice.iter().zip(once.iter()) {
            prop_assert_eq!(left.cached(), right.cached());
            prop_assert_eq!(left.working(), right.working());
        }
    }

    #[test]
    fn distinct_counts_distinct_working_values(words in words_strategy(), parallel in any::<bool>()) {
        let lengths = source(&words, parallel)
            .begin_caching()
            .map(|word| word.len())
            .distinct()
            .to_vec()
            .unwrap();
        let unique: HashSet<usize> = words.iter().map(String::len).collect();

        prop_assert_eq!(lengths.len(), unique.len());
        prop_assert_eq!(lengths.iter().collect::<HashSet<_>>().len(), lengths.len());
    }

    #[test]
    fn swap_after_begin_caching_is_identity(words in words_strategy(), parallel in any::<bool>()) {
        let swapped = source(&words, parallel)
            .begin_caching()
            .swap_to_cache()
            .to_vec()
            .unwrap();
        prop_assert_eq!(swapped, words);
    }

    #[test]
    fn parallel_sort_matches_sequential_sort(words in words_strategy()) {
        let sequential = source(&words, false)
            .begin_caching()
            .map(|word| word.len())
            .sorted()
            .swap_to_cache()
            .to_vec()
            .unwrap();
        let parallel = source(&words, true)
            .begin_caching()
            .map(|word| word.len())
            .sorted()
            .swap_to_cache()
            .to_vec()
            .unwrap();
        prop_assert_eq!(sequential, parallel);
    }

    #[test]
    fn limit_and_skip_slice_in_order(
        words in words_strategy(),
        skip in 0usize..10,
        limit in 0usize..10,
        parallel in any::<bool>(),
    ) {
        let sliced = source(&words, parallel).skip(skip).limit(limit).to_vec().unwrap();
        let expected: Vec<String> = words.iter().skip(skip).take(limit).cloned().collect();
        prop_assert_eq!(sliced, expected);
    }
}

fn unordered_floats_strategy() -> impl Strategy<Value = Vec<f64>> {
    (
        prop::collection::vec(
            prop_oneof![15 => -1.0e6f64..1.0e6, 1 => Just(f64::NAN)],
            1..2_000,
        ),
        any::<prop::sample::Index>(),
    )
        .prop_map(|(mut values, position)| {
            let at = position.index(values.len() + 1);
            values.insert(at, f64::NAN);
            values
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn unordered_sort_fails_at_terminal_in_both_modes(values in unordered_floats_strategy()) {
        for parallel in [false, true] {
            let pending = if parallel {
                UnpairedSequence::from_parallel(values.clone())
            } else {
                UnpairedSequence::from_collection(values.clone())
            }
            .begin_caching()
            .sorted();

            prop_assert_eq!(
                pending.count(),
                Err(SequenceError::NotOrderable { type_name: "f64" })
            );
        }
    }
}
