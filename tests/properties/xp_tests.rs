use proptest::prelude::*;

use ascent::xp::{MAX_LEVEL, XpSystem};

proptest! {
    #[test]
    fn test_level_lookup_matches_threshold_table(xp in 0u64..5_000_000) {
        let system = XpSystem::new();
        let info = system.level_for_xp(xp);
        let thresholds = system.thresholds();

        prop_assert!((1..=MAX_LEVEL).contains(&info.level));

        if info.level < MAX_LEVEL {
            let floor = thresholds[(info.level - 1) as usize];
            let ceiling = thresholds[info.level as usize];
            prop_assert!(floor <= xp && xp < ceiling);
            prop_assert_eq!(xp + info.xp_to_next, ceiling);
            prop_assert_eq!(xp - info.xp_into_level, floor);
        } else {
            prop_assert_eq!(info.xp_to_next, 0);
            prop_assert_eq!(info.xp_into_level, 0);
        }
    }

    #[test]
    fn test_level_never_drops_as_xp_grows(a in 0u64..5_000_000, b in 0u64..5_000_000) {
        let system = XpSystem::new();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(system.level_for_xp(lo).level <= system.level_for_xp(hi).level);
    }

    #[test]
    fn test_nonpositive_factors_award_nothing(
        base in 0.0f64..10_000.0,
        multiplier in -4.0f64..4.0,
        performance in -2.0f64..2.0
    ) {
        let mut system = XpSystem::new();
        system.set_multiplier("workshop", multiplier);
        let award = system.calculate_xp("workshop", base, performance, 1.0);

        if base == 0.0 || multiplier <= 0.0 || performance <= 0.0 {
            prop_assert_eq!(award, 0);
        } else {
            let product = base * multiplier * performance;
            prop_assert!(award as f64 <= product);
            prop_assert!(product < award as f64 + 1.0);
        }
    }

    #[test]
    fn test_awards_scale_with_performance(
        base in 1.0f64..1_000.0,
        low in 0.1f64..1.0,
        high in 1.0f64..2.0
    ) {
        let system = XpSystem::new();
        let smaller = system.calculate_xp("assignment", base, low, 1.0);
        let larger = system.calculate_xp("assignment", base, high, 1.0);
        prop_assert!(smaller <= larger);
    }
}
