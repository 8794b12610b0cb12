use poh_roulette::animator::{eased_progress, SpinAnimator, SpinPlan, JITTER_CUTOFF};
use poh_roulette::presets::{load_preset, save_preset, PresetError};
use poh_roulette::storage::{KeyValueStore, MemoryStore};
use poh_roulette::{choose_winner, winner_at, Item, Roster, Wheel, WheelControl, WinHistory};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f64::consts::TAU;

fn named(names: &[&str]) -> Vec<Item> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Item::new(format!("id-{}", i), *name, "hsl(0 75% 55%)"))
        .collect()
}

#[test]
fn four_items_with_no_history_pick_a_valid_index() {
    for seed in 0..100 {
        let mut strong = StdRng::seed_from_u64(seed);
        let mut weak = StdRng::seed_from_u64(seed + 1_000);
        let mut roster = Roster::from_items(named(&["A", "B", "C", "D"]));
        let index = roster.pick_winner(&mut strong, &mut weak).unwrap();
        assert!(index < 4);
        assert_eq!(roster.history().as_slice(), &[index]);
    }
}

#[test]
fn two_items_after_first_wins_pick_second() {
    let mut strong = StdRng::seed_from_u64(1);
    let mut weak = StdRng::seed_from_u64(2);
    let (index, history) = choose_winner(2, &WinHistory::from_indices(&[0]), &mut strong, &mut weak);
    assert_eq!(index, 1);
    assert_eq!(history.as_slice(), &[0, 1]);
}

#[test]
fn removing_a_recent_winner_leaves_only_valid_history() {
    let mut history = WinHistory::from_indices(&[1, 2]);
    history.forget_removed(1);
    history.sync_item_count(3, 2);
    assert!(history.is_empty() || history.as_slice() == [1]);

    for seed in 0..50 {
        let mut strong = StdRng::seed_from_u64(seed);
        let mut weak = StdRng::seed_from_u64(seed + 500);
        let mut roster = Roster::from_items(named(&["A", "B", "C"]));
        roster.pick_winner(&mut strong, &mut weak).unwrap();
        roster.pick_winner(&mut strong, &mut weak).unwrap();

        let removed = roster.remove("id-1").unwrap();
        assert_eq!(removed.name, "B");
        let history = roster.history().as_slice();
        assert!(history.len() <= 1);
        assert!(history.iter().all(|&index| index < roster.len()));
    }
}

#[test]
fn spin_to_index_two_of_five_lands_there() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut animator = SpinAnimator::with_angle(0.7);
    let plan = animator.start(2, 5, 3000, &mut rng).unwrap();

    let mut last = None;
    for progress in [0.0, 0.25, 0.5, 0.85, 1.0] {
        let frame = animator.step(progress * 3000.0, &mut rng).unwrap();
        assert!((frame.progress - progress).abs() < 1e-12);
        last = Some(frame);
    }
    let last = last.unwrap();
    assert!(last.finished);
    assert_eq!(last.angle, plan.final_angle());
    assert_eq!(winner_at(last.angle, 5), 2);
    assert!(!animator.is_running());
}

#[test]
fn final_angle_matches_target_for_many_seeds() {
    for seed in 0..500 {
        let mut rng = StdRng::seed_from_u64(seed);
        let item_count = 2 + (seed as usize % 23);
        let start = (seed as f64).sin() * 500.0;
        for target in 0..item_count {
            let plan = SpinPlan::new(target, item_count, start, 4500, &mut rng).unwrap();
            let final_angle = plan.final_angle();
            assert_eq!(winner_at(final_angle, item_count), target);
            assert_eq!(winner_at(final_angle + 3.0 * TAU, item_count), target);
            assert_eq!(winner_at(final_angle - 5.0 * TAU, item_count), target);
        }
    }
}

#[test]
fn easing_converges_monotonically_after_cutoff() {
    let mut previous = eased_progress(JITTER_CUTOFF, 0.3);
    for step in 1..=150 {
        let progress = JITTER_CUTOFF + step as f64 * 0.001;
        let eased = eased_progress(progress, 0.7);
        assert!(eased >= previous);
        previous = eased;
    }
    assert_eq!(eased_progress(1.0, 0.7), 1.0);
}

#[test]
fn selector_and_wheel_agree_over_a_session() {
    let mut strong = StdRng::seed_from_u64(9);
    let mut weak = StdRng::seed_from_u64(10);
    let mut roster = Roster::from_items(named(&["A", "B", "C", "D", "E", "F"]));
    let mut wheel = Wheel::with_rng(StdRng::seed_from_u64(11));
    wheel.set_item_count(roster.len());
    wheel.set_duration_ms(2000);

    for _ in 0..25 {
        let target = roster.pick_winner(&mut strong, &mut weak).unwrap();
        wheel.spin(target).unwrap();
        let mut now = 0.0;
        while let Some(frame) = wheel.advance(now) {
            if frame.finished {
                break;
            }
            now += 16.0;
        }
        assert_eq!(wheel.current_winner(), target);
    }
}

#[test]
fn corrupt_preset_leaves_roster_untouched() {
    let mut store = MemoryStore::new();
    store.set("poh_preset_lunch", "not json").unwrap();
    let mut roster = Roster::from_items(named(&["A", "B"]));
    let before = roster.clone();

    match load_preset(&store, "lunch") {
        Ok(items) => roster.replace(items),
        Err(err) => assert!(matches!(err, PresetError::Malformed { .. })),
    }
    assert_eq!(roster, before);

    save_preset(&mut store, "lunch", roster.items()).unwrap();
    let loaded = load_preset(&store, "lunch").unwrap();
    assert_eq!(loaded, roster.items());
}
