mod common;

use common::{engine_with_clock, one_day};
use mana_core::ProgressEngine;

#[test]
fn first_transaction_on_fresh_state() {
    let (mut engine, _) = engine_with_clock();
    engine.add_transaction(25.0, "food", "lunch");

    assert_eq!(engine.transactions().len(), 1);
    assert_eq!(engine.total_spent(), 25.0);
    assert_eq!(engine.budget_remaining(), 49_975.0);
    assert_eq!(engine.xp(), 15);
    assert!(engine.has_achievement("first-transaction"));
    assert_eq!(engine.streak_days(), 1);
    assert_eq!(engine.transactions()[0].category.name, "Food");
}

#[test]
fn xp_below_threshold_does_not_level() {
    let mut engine = ProgressEngine::with_defaults();
    engine.add_xp(95);
    assert_eq!(engine.xp(), 95);
    assert_eq!(engine.level(), 1);
}

#[test]
fn xp_crossing_threshold_levels_once() {
    let mut engine = ProgressEngine::with_defaults();
    engine.add_xp(95);
    engine.add_xp(10);
    assert_eq!(engine.level(), 2);
    assert_eq!(engine.xp(), 5);
    assert_eq!(engine.xp_to_next_level(), 200);
}

#[test]
fn consecutive_days_build_streak_and_pay_bonus_on_day_seven() {
    let (mut engine, clock) = engine_with_clock();

    for day in 1..=5 {
        engine.add_transaction(10.0, "transport", &format!("commute {day}"));
        clock.advance(one_day());
    }
    assert_eq!(engine.streak_days(), 5);
    assert!(!engine.has_achievement("streak-7"));

    engine.add_transaction(10.0, "transport", "commute 6");
    clock.advance(one_day());
    assert_eq!(engine.streak_days(), 6);

    let level_before = engine.level();
    let xp_before = engine.xp();
    engine.add_transaction(10.0, "transport", "commute 7");

    assert_eq!(engine.streak_days(), 7);
    assert!(engine.has_achievement("streak-7"));
    // 6 * 15 = 90 xp before; 90 + 10 crosses 100, then +5 and +20.
    assert_eq!((level_before, xp_before), (1, 90));
    assert_eq!(engine.level(), 2);
    assert_eq!(engine.xp(), 25);
}

#[test]
fn same_day_transactions_keep_streak() {
    let (mut engine, clock) = engine_with_clock();
    engine.add_transaction(3.0, "food", "coffee");
    clock.advance(chrono::Duration::hours(6));
    engine.add_transaction(9.0, "food", "lunch");
    assert_eq!(engine.streak_days(), 1);
}

#[test]
fn gap_resets_streak() {
    let (mut engine, clock) = engine_with_clock();
    engine.add_transaction(3.0, "food", "coffee");
    clock.advance(one_day());
    engine.add_transaction(3.0, "food", "coffee");
    assert_eq!(engine.streak_days(), 2);

    clock.advance(one_day() * 3);
    engine.add_transaction(3.0, "food", "coffee");
    assert_eq!(engine.streak_days(), 1);
}

#[test]
fn editing_amount_moves_totals_and_keeps_identity() {
    let (mut engine, _) = engine_with_clock();
    engine.add_transaction(5.0, "food", "older");
    let id = engine.add_transaction(100.0, "shopping", "shoes");
    engine.add_transaction(7.0, "food", "newer");

    let spent_before = engine.total_spent();
    let remaining_before = engine.budget_remaining();
    engine.edit_transaction(id, 40.0, "shopping", "shoes (sale)");

    assert_eq!(engine.total_spent(), spent_before - 60.0);
    assert_eq!(engine.budget_remaining(), remaining_before + 60.0);
    assert_eq!(engine.transactions()[1].id, id);
    assert_eq!(engine.transactions()[1].amount, 40.0);
    assert_eq!(engine.transactions()[1].description, "shoes (sale)");
}

#[test]
fn deleting_unknown_id_changes_nothing() {
    let (mut engine, _) = engine_with_clock();
    engine.add_transaction(12.0, "health", "vitamins");
    engine.unlock_achievement("custom");

    let before = engine.snapshot();
    engine.delete_transaction(uuid::Uuid::new_v4());
    engine.edit_transaction(uuid::Uuid::new_v4(), 1.0, "food", "ghost");

    assert_eq!(engine.snapshot(), before);
}

#[test]
fn unknown_category_falls_back_to_first_catalog_entry() {
    let (mut engine, _) = engine_with_clock();
    let id = engine.add_transaction(8.0, "pets", "kibble");
    assert_eq!(engine.transaction(id).unwrap().category.id, "food");

    engine.edit_transaction(id, 8.0, "nope", "kibble");
    assert_eq!(engine.transaction(id).unwrap().category.id, "food");
}

#[test]
fn budget_master_unlocks_on_fifth_transaction_and_survives_deletes() {
    let (mut engine, _) = engine_with_clock();
    let mut ids = Vec::new();
    for n in 0..4 {
        ids.push(engine.add_transaction(100.0, "bills", &format!("bill {n}")));
    }
    assert!(!engine.has_achievement("budget-master"));

    ids.push(engine.add_transaction(100.0, "bills", "bill 4"));
    assert!(engine.has_achievement("budget-master"));

    for id in ids {
        engine.delete_transaction(id);
    }
    assert_eq!(engine.transaction_count(), 0);
    assert!(engine.has_achievement("budget-master"));
}

#[test]
fn budget_master_needs_more_than_half_left() {
    let (mut engine, _) = engine_with_clock();
    engine.set_monthly_budget(1_000.0);
    for n in 0..5 {
        engine.add_transaction(100.0, "bills", &format!("bill {n}"));
    }
    // Exactly 50% left does not qualify.
    assert_eq!(engine.budget_remaining(), 500.0);
    assert!(!engine.has_achievement("budget-master"));
}

#[test]
fn overspending_clamps_remaining_and_delete_restores_it() {
    let (mut engine, _) = engine_with_clock();
    engine.set_monthly_budget(100.0);
    let big = engine.add_transaction(150.0, "shopping", "console");
    assert_eq!(engine.budget_remaining(), 0.0);

    engine.add_transaction(20.0, "food", "pizza");
    assert_eq!(engine.budget_remaining(), 0.0);

    engine.delete_transaction(big);
    assert_eq!(engine.total_spent(), 20.0);
    assert_eq!(engine.budget_remaining(), 80.0);
}

#[test]
fn reset_discards_everything() {
    let (mut engine, _) = engine_with_clock();
    engine.add_transaction(25.0, "food", "lunch");
    engine.add_xp(400);
    engine.set_monthly_budget(900.0);
    engine.reset_all_data();

    assert_eq!(engine.level(), 1);
    assert_eq!(engine.xp(), 0);
    assert_eq!(engine.xp_to_next_level(), 100);
    assert_eq!(engine.total_spent(), 0.0);
    assert_eq!(engine.monthly_budget(), 50_000.0);
    assert_eq!(engine.budget_remaining(), 50_000.0);
    assert!(engine.achievements().is_empty());
    assert!(engine.transactions().is_empty());
    assert_eq!(engine.streak_days(), 0);
    assert!(engine.last_transaction_date().is_none());

    // The streak starts over after a reset.
    engine.add_transaction(1.0, "food", "gum");
    assert_eq!(engine.streak_days(), 1);
}

#[test]
fn subscribers_see_every_change() {
    let (mut engine, _) = engine_with_clock();
    let updates = engine.subscribe();

    let id = engine.add_transaction(10.0, "food", "salad");
    engine.edit_transaction(id, 12.0, "food", "salad + drink");
    engine.set_monthly_budget(500.0);
    engine.unlock_achievement("custom");
    engine.unlock_achievement("custom");
    engine.delete_transaction(id);

    let versions: Vec<u64> = updates.try_iter().map(|snapshot| snapshot.version).collect();
    assert_eq!(versions, [1, 2, 3, 4, 5]);
}
