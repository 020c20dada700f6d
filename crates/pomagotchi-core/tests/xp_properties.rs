//! Property tests for XP rewards and the level curve.

use pomagotchi_core::{calculate_xp, CreatureState, SelectedDuration, Stage, TimerState};
use proptest::prelude::*;

fn timer_with(initial: u32, remaining: u32) -> TimerState {
    let mut state = TimerState::from_duration(SelectedDuration::from_total_seconds(remaining));
    state.initial_total_seconds = initial;
    state.is_paused = true;
    state
}

proptest! {
    #[test]
    fn natural_completion_is_always_full(initial in 0u32..100_000, elapsed in 0u32..100_000) {
        let remaining = initial.saturating_sub(elapsed);
        prop_assert_eq!(calculate_xp(true, &timer_with(initial, remaining)), 25);
    }

    #[test]
    fn early_completion_stays_in_range(initial in 1u32..100_000, elapsed in 0u32..100_000) {
        let remaining = initial.saturating_sub(elapsed);
        let xp = calculate_xp(false, &timer_with(initial, remaining));
        prop_assert!((1..=25).contains(&xp));
    }

    #[test]
    fn fully_elapsed_early_completion_is_full(initial in 1u32..100_000) {
        prop_assert_eq!(calculate_xp(false, &timer_with(initial, 0)), 25);
    }

    #[test]
    fn more_elapsed_time_never_earns_less(initial in 1u32..10_000, a in 0u32..10_000, b in 0u32..10_000) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let xp_low = calculate_xp(false, &timer_with(initial, initial.saturating_sub(low)));
        let xp_high = calculate_xp(false, &timer_with(initial, initial.saturating_sub(high)));
        prop_assert!(xp_low <= xp_high);
    }

    #[test]
    fn xp_stays_below_threshold(gains in proptest::collection::vec(0u32..500, 0..50)) {
        let mut creature = CreatureState::default();
        let mut total = 0u64;
        for gain in gains {
            let before = creature.level;
            let result = creature.apply_xp(gain);
            total += u64::from(gain);
            prop_assert!(creature.xp < creature.xp_needed);
            prop_assert_eq!(result.levels_gained, creature.level - before);
            prop_assert_eq!(creature.stage, Stage::for_level(creature.level));
        }
        prop_assert!(u64::from(creature.xp) <= total);
    }
}
