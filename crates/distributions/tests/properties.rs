//! Property tests for the range and coverage guarantees of the generator family.

use oltp_distributions::{
    FocusedZipfianGenerator, IntegerGenerator, UniformGenerator, ZipfianGenerator,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: plain Zipfian draws never leave [min, max]
    #[test]
    fn prop_zipfian_in_range(
        min in -1_000_000i64..1_000_000,
        span in 0i64..5_000,
        theta in 0.0f64..0.999,
        seed in any::<u64>()
    ) {
        let max = min + span;
        let mut generator = ZipfianGenerator::with_theta(min, max, theta).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..200 {
            let value = generator.next_rank(&mut rng);
            prop_assert!(value >= min && value <= max, "{} not in [{}, {}]", value, min, max);
        }
    }

    /// Property: focused Zipfian draws never leave [min, max]
    #[test]
    fn prop_focused_in_range(
        min in -1_000_000i64..1_000_000,
        span in 0i64..5_000,
        denom in 1i64..16,
        num_seed in any::<u16>(),
        theta in 0.0f64..0.999,
        seed in any::<u64>()
    ) {
        let max = min + span;
        let num = num_seed as i64 % denom;
        prop_assume!(num == 0 || span + 1 >= 2 * denom);
        let mut generator =
            FocusedZipfianGenerator::with_theta(min, max, num, denom, theta).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..200 {
            let value = generator.next_rank(&mut rng);
            prop_assert!(value >= min && value <= max, "{} not in [{}, {}]", value, min, max);
        }
    }

    /// Property: bounds near the i64 extremes never wrap out of range
    #[test]
    fn prop_focused_in_range_at_extremes(
        span in 0i64..2_000,
        denom in 1i64..8,
        high in any::<bool>(),
        seed in any::<u64>()
    ) {
        prop_assume!(denom == 1 || span + 1 >= 2 * denom);
        let (min, max) = if high {
            (i64::MAX - span, i64::MAX)
        } else {
            (i64::MIN, i64::MIN + span)
        };
        let mut generator = FocusedZipfianGenerator::new(min, max, denom - 1, denom).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..100 {
            let value = generator.next_rank(&mut rng);
            prop_assert!(value >= min && value <= max);
        }
    }

    /// Property: uniform draws never leave [min, max]
    #[test]
    fn prop_uniform_in_range(
        min in any::<i32>(),
        span in 0i64..1_000_000,
        seed in any::<u64>()
    ) {
        let min = min as i64;
        let max = min + span;
        let mut generator = UniformGenerator::new(min, max).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..100 {
            let value = generator.next_rank(&mut rng);
            prop_assert!(value >= min && value <= max);
        }
    }

    /// Property: growing the item count matches fresh construction
    #[test]
    fn prop_incremental_zeta_matches_fresh(
        start in 1u64..3_000,
        steps in prop::collection::vec(1u64..2_000, 1..5),
        theta in 0.0f64..0.999
    ) {
        let mut grown = ZipfianGenerator::with_item_count(0, start, theta).unwrap();
        let mut count = start;
        for step in steps {
            count += step;
            grown.set_item_count(count).unwrap();
        }
        let fresh = ZipfianGenerator::with_item_count(0, count, theta).unwrap();
        prop_assert!((grown.zeta() - fresh.zeta()).abs() <= 1e-9 * fresh.zeta());
        prop_assert!((grown.mean() - fresh.mean()).abs() <= 1e-6 * fresh.mean().abs().max(1.0));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Property: the focused generator eventually produces every key
    #[test]
    fn prop_focused_covers_small_key_space(
        min in -1_000i64..1_000,
        span in 0i64..24,
        denom in 1i64..6,
        num_seed in any::<u8>(),
        seed in any::<u64>()
    ) {
        let max = min + span;
        let num = num_seed as i64 % denom;
        prop_assume!(num == 0 || span + 1 >= 2 * denom);
        // Modest theta keeps the rarest folded rank reachable in a bounded run.
        let mut generator =
            FocusedZipfianGenerator::with_theta(min, max, num, denom, 0.5).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);

        let mut seen = HashSet::new();
        for _ in 0..20_000 {
            seen.insert(generator.next_rank(&mut rng));
        }
        prop_assert_eq!(seen.len() as i64, span + 1);
    }
}

/// Coverage over a larger key space with the default skew.
#[test]
fn test_focused_covers_key_space_with_default_theta() {
    let mut generator = FocusedZipfianGenerator::new(1, 200, 1, 3).unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    let mut seen = vec![false; 200];
    for _ in 0..400_000 {
        let value = generator.next_rank(&mut rng);
        seen[(value - 1) as usize] = true;
    }
    let holes: Vec<usize> = seen
        .iter()
        .enumerate()
        .filter(|(_, s)| !**s)
        .map(|(i, _)| i + 1)
        .collect();
    assert!(holes.is_empty(), "never produced: {holes:?}");
}

/// Coverage above the exact-table limit, where draws use the approximation.
#[test]
fn test_focused_covers_large_key_space() {
    let mut generator = FocusedZipfianGenerator::with_theta(0, 1_999, 3, 4, 0.5).unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    let mut seen = vec![false; 2_000];
    for _ in 0..200_000 {
        seen[generator.next_rank(&mut rng) as usize] = true;
    }
    let holes: Vec<usize> = seen
        .iter()
        .enumerate()
        .filter(|(_, s)| !**s)
        .map(|(i, _)| i)
        .collect();
    assert!(holes.is_empty(), "never produced: {holes:?}");
}

/// Plain Zipfian coverage on the approximate path.
#[test]
fn test_zipfian_covers_large_key_space() {
    let mut generator = ZipfianGenerator::with_theta(0, 1_999, 0.5).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    let mut seen = HashSet::new();
    for _ in 0..200_000 {
        seen.insert(generator.next_rank(&mut rng));
    }
    assert_eq!(seen.len(), 2_000);
}

/// Thousands of randomized bounds with zero out-of-range draws.
#[test]
fn test_randomized_bounds_have_no_out_of_range_draws() {
    use rand::Rng;

    let mut rng = StdRng::seed_from_u64(2024);
    let mut violations = 0u64;
    for _ in 0..2_000 {
        let min: i64 = rng.random_range(-1_000_000_000..1_000_000_000);
        let max = min + rng.random_range(0..2_000);
        let denom = rng.random_range(1..10);
        let num = if max - min + 1 >= 2 * denom {
            rng.random_range(0..denom)
        } else {
            0
        };

        let mut zipf = ZipfianGenerator::new(min, max).unwrap();
        let mut focused = FocusedZipfianGenerator::new(min, max, num, denom).unwrap();
        for _ in 0..50 {
            let a = zipf.next_rank(&mut rng);
            let b = focused.next_rank(&mut rng);
            if !(min..=max).contains(&a) || !(min..=max).contains(&b) {
                violations += 1;
            }
        }
    }
    assert_eq!(violations, 0);
}
