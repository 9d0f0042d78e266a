#![cfg(test)]
use super::*;

// ============================================================
// Level values
// ============================================================

#[test]
fn test_level_values_for_all_levels() {
    for n in 1..=LEVEL_COUNT as i32 {
        let entry = level_value(n);
        assert_eq!(entry, 10 * SCALE * (1i128 << (n - 1)));
        assert_eq!(reward_value(n), entry * 2);
        assert_eq!(bonus_value(n), entry * 4 / 10);
    }
}

#[test]
fn test_level_five_values() {
    assert_eq!(level_value(5), 160 * SCALE);
    assert_eq!(reward_value(5), 320 * SCALE);
    assert_eq!(bonus_value(5), 64 * SCALE);
}

#[test]
fn test_level_value_below_one_is_fractional() {
    assert_eq!(level_value(0), 5 * SCALE);
    assert_eq!(level_value(-1), 25 * SCALE / 10);
    assert_eq!(level_value(-200), 0);
    assert_eq!(level_value(i32::MIN), 0);
}

#[test]
fn test_level_value_saturates() {
    assert_eq!(level_value(101), BASE_ENTRY_VALUE << 100);
    assert!(level_value(101) < i128::MAX);
    assert_eq!(level_value(102), i128::MAX);
    assert_eq!(level_value(i32::MAX), i128::MAX);
}

// ============================================================
// Referral points
// ============================================================

#[test]
fn test_referral_points_boundaries() {
    assert_eq!(referral_points(0), 0);
    assert_eq!(referral_points(10), 100);
    assert_eq!(referral_points(11), 105);
    assert_eq!(referral_points(30), 200);
    assert_eq!(referral_points(50), 240);
    assert_eq!(referral_points(100), 290);
    assert_eq!(referral_points(101), 290);
    assert_eq!(referral_points(100_000), 290);
}

#[test]
fn test_referral_points_monotonic() {
    let mut prev = referral_points(0);
    for n in 1..=500 {
        let p = referral_points(n);
        assert!(p >= prev, "points dropped at {}", n);
        prev = p;
    }
}

#[test]
fn test_referral_points_negative_not_clamped() {
    assert_eq!(referral_points(-3), -30);
}

// ============================================================
// Bonus tiers
// ============================================================

#[test]
fn test_variable_bonus_boundaries() {
    for n in 0..=4 {
        assert_eq!(variable_bonus_bps(n), 0);
    }
    assert_eq!(variable_bonus_bps(5), 2_000);
    assert_eq!(variable_bonus_bps(9), 2_000);
    assert_eq!(variable_bonus_bps(10), 4_000);
    assert_eq!(variable_bonus_bps(1_000), 4_000);
    assert_eq!(variable_bonus_bps(-1), 0);
}

#[test]
fn test_bonus_tier_info_next_tier() {
    let base = bonus_tier_info(2);
    assert_eq!(base.percent_bps, 0);
    assert_eq!(base.next_threshold, Some(5));
    assert_eq!(base.next_percent_bps, Some(2_000));

    let mid = bonus_tier_info(7);
    assert_eq!(mid.percent_bps, 2_000);
    assert_eq!(mid.next_threshold, Some(10));
    assert_eq!(mid.next_percent_bps, Some(4_000));

    let top = bonus_tier_info(10);
    assert_eq!(top.percent_bps, 4_000);
    assert_eq!(top.next_threshold, None);
    assert_eq!(top.next_percent_bps, None);
}

// ============================================================
// Score
// ============================================================

#[test]
fn test_calculate_score_reference_values() {
    assert_eq!(calculate_score(24, 2, 5), 101 * SCORE_SCALE);
    assert_eq!(calculate_score(24, 0, 100), 338 * SCORE_SCALE);
    assert_eq!(calculate_score(0, 1, 0), 150);
}

#[test]
fn test_score_after_wait_uses_fractional_hours() {
    // 90 minutes = 1.5h -> 3.00
    assert_eq!(score_after_wait(5_400, 0, 0), 300);
    assert_eq!(score_after_wait(24 * 3_600, 2, 5), calculate_score(24, 2, 5));
}

#[test]
fn test_score_accepts_negative_inputs() {
    assert_eq!(calculate_score(-1, 0, 0), -200);
    assert_eq!(calculate_score(0, -2, 0), -300);
}

// ============================================================
// Positions and splits
// ============================================================

#[test]
fn test_position_mapping() {
    assert_eq!(Position::for_rank(0), None);
    assert_eq!(Position::for_rank(1), Some(Position::Receiver));
    assert_eq!(Position::for_rank(5), Some(Position::Community));
    assert_eq!(Position::for_rank(6), Some(Position::Reentry));
    assert_eq!(Position::for_rank(8), None);

    let advances = CYCLE_POSITIONS.iter().filter(|p| p.is_advance()).count();
    let reentries = CYCLE_POSITIONS.iter().filter(|p| p.recirculates()).count();
    assert_eq!(advances, 2);
    assert_eq!(reentries, 1);
}

#[test]
fn test_receiver_split() {
    let split = receiver_split(20 * SCALE);
    assert_eq!(split.payout, 18 * SCALE);
    assert_eq!(split.pool_skim, 2 * SCALE);
}

#[test]
fn test_community_split_without_referrer() {
    let e = 10 * SCALE;
    let split = community_split(e, 0);
    assert_eq!(split.reserve, SCALE);
    assert_eq!(split.operational, SCALE);
    assert_eq!(split.referral, 0);
    assert_eq!(split.profit, 8 * SCALE);
}

#[test]
fn test_community_split_tiers() {
    let e = 10 * SCALE;
    let mid = community_split(e, 2_000);
    assert_eq!(mid.referral, 2 * SCALE);
    assert_eq!(mid.profit, 6 * SCALE);

    let top = community_split(e, 4_000);
    assert_eq!(top.referral, 4 * SCALE);
    assert_eq!(top.profit, 4 * SCALE);

    // never more than the bonus slice
    assert_eq!(community_split(e, 9_000).referral, 4 * SCALE);
}

// ============================================================
// Pool health
// ============================================================

#[test]
fn test_level_health_thresholds() {
    let e = 10 * SCALE;
    assert_eq!(level_health(10, 6, 0, e, 3, 5), (HealthStatus::Healthy, 0));
    assert_eq!(level_health(10, 7, 7 * e, e, 3, 5), (HealthStatus::Healthy, 0));
    assert_eq!(level_health(2, 7, 0, e, 3, 5), (HealthStatus::Healthy, 0));
    assert_eq!(level_health(3, 7, 0, e, 3, 5), (HealthStatus::Warning, 35 * SCALE));
    assert_eq!(level_health(5, 9, e, e, 3, 5), (HealthStatus::Critical, 7 * e));
}

#[test]
fn test_pool_health_score() {
    assert_eq!(pool_health_score(0, 0), 100);
    assert_eq!(pool_health_score(50, 100), 50);
    assert_eq!(pool_health_score(2, 3), 67);
    assert_eq!(pool_health_score(500, 100), 100);
}
