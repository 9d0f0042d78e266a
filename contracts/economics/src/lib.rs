//! Matrix - Economics
//! Level values, queue scoring, referral tiers and payout splits for the matrix engine.

#![no_std]
use soroban_sdk::{contracttype, symbol_short, Symbol};

/// Token base units per whole unit (7 decimals, Stellar asset precision).
pub const SCALE: i128 = 10_000_000;
/// Level 1 entry value.
pub const BASE_ENTRY_VALUE: i128 = 10 * SCALE;
pub const LEVEL_COUNT: u32 = 10;
pub const CYCLE_SIZE: u32 = 7;

pub const BPS: i128 = 10_000;
pub const RECEIVER_PAYOUT_BPS: i128 = 9_000;
pub const BONUS_SHARE_BPS: i128 = 4_000;
pub const COMMUNITY_RESERVE_BPS: i128 = 1_000;
pub const COMMUNITY_OPERATIONAL_BPS: i128 = 1_000;
pub const TIER_MID_BPS: u32 = 2_000;
pub const TIER_TOP_BPS: u32 = 4_000;
pub const TIER_MID_THRESHOLD: u32 = 5;
pub const TIER_TOP_THRESHOLD: u32 = 10;

/// Scores are fixed point in hundredths.
pub const SCORE_SCALE: i128 = 100;
pub const REFERRAL_POINTS_CAP: i32 = 290;

pub const SECONDS_PER_HOUR: u64 = 3_600;
pub const SECONDS_PER_DAY: u64 = 86_400;

// Largest left shift of BASE_ENTRY_VALUE that stays inside i128.
const MAX_LEVEL_SHIFT: u32 = 100;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Position {
    Receiver,
    Donate1,
    Advance1,
    Donate2,
    Advance2,
    Community,
    Reentry,
}

/// Cycle roles by rank, rank 1 (highest score) first.
pub const CYCLE_POSITIONS: [Position; 7] = [
    Position::Receiver,
    Position::Advance1,
    Position::Donate1,
    Position::Advance2,
    Position::Community,
    Position::Reentry,
    Position::Donate2,
];

impl Position {
    pub fn for_rank(rank: u32) -> Option<Position> {
        if rank == 0 {
            return None;
        }
        CYCLE_POSITIONS.get((rank - 1) as usize).copied()
    }

    pub fn is_advance(&self) -> bool {
        matches!(self, Position::Advance1 | Position::Advance2)
    }

    pub fn recirculates(&self) -> bool {
        matches!(self, Position::Reentry)
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BonusTierInfo {
    pub percent_bps: u32,
    pub label: Symbol,
    pub next_threshold: Option<u32>,
    pub next_percent_bps: Option<u32>,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReceiverSplit {
    pub payout: i128,
    pub pool_skim: i128,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CommunitySplit {
    pub reserve: i128,
    pub operational: i128,
    pub referral: i128,
    pub profit: i128,
}

/// `10 * 2^(n-1)` whole units. Levels at or below zero halve per step and
/// truncate to base units; values past `i128` saturate.
pub fn level_value(level_number: i32) -> i128 {
    if level_number >= 1 {
        let shift = (level_number - 1) as u32;
        if shift > MAX_LEVEL_SHIFT {
            return i128::MAX;
        }
        BASE_ENTRY_VALUE << shift
    } else {
        let shift = 1i64 - level_number as i64;
        if shift >= 127 {
            return 0;
        }
        BASE_ENTRY_VALUE >> shift
    }
}

pub fn reward_value(level_number: i32) -> i128 {
    level_value(level_number).saturating_mul(2)
}

pub fn bonus_value(level_number: i32) -> i128 {
    bps_of(level_value(level_number), BONUS_SHARE_BPS)
}

/// Progressive referral points: 10 per referral up to 10, 5 up to 30, 2 up to
/// 50, 1 up to 100, then flat at 290. Negative counts are not clamped.
pub fn referral_points(referral_count: i32) -> i32 {
    let n = referral_count;
    if n <= 10 {
        n.saturating_mul(10)
    } else if n <= 30 {
        100 + (n - 10) * 5
    } else if n <= 50 {
        200 + (n - 30) * 2
    } else if n <= 100 {
        240 + (n - 50)
    } else {
        REFERRAL_POINTS_CAP
    }
}

pub fn variable_bonus_bps(referral_count: i32) -> u32 {
    if referral_count < TIER_MID_THRESHOLD as i32 {
        0
    } else if referral_count < TIER_TOP_THRESHOLD as i32 {
        TIER_MID_BPS
    } else {
        TIER_TOP_BPS
    }
}

pub fn bonus_tier_info(referral_count: i32) -> BonusTierInfo {
    match variable_bonus_bps(referral_count) {
        0 => BonusTierInfo {
            percent_bps: 0,
            label: symbol_short!("tier_0"),
            next_threshold: Some(TIER_MID_THRESHOLD),
            next_percent_bps: Some(TIER_MID_BPS),
        },
        TIER_MID_BPS => BonusTierInfo {
            percent_bps: TIER_MID_BPS,
            label: symbol_short!("tier_20"),
            next_threshold: Some(TIER_TOP_THRESHOLD),
            next_percent_bps: Some(TIER_TOP_BPS),
        },
        bps => BonusTierInfo {
            percent_bps: bps,
            label: symbol_short!("tier_40"),
            next_threshold: None,
            next_percent_bps: None,
        },
    }
}

/// Score from wait time in hundredths of an hour:
/// `hours * 2 + reentries * 1.5 + referral_points`, in `SCORE_SCALE` units.
pub fn score_from_hundredths(hours_hundredths: i128, reentries: i32, referral_count: i32) -> i128 {
    hours_hundredths.saturating_mul(2)
        + (reentries as i128) * 150
        + (referral_points(referral_count) as i128) * SCORE_SCALE
}

pub fn calculate_score(waiting_hours: i64, reentries: i32, referral_count: i32) -> i128 {
    score_from_hundredths(
        (waiting_hours as i128).saturating_mul(SCORE_SCALE),
        reentries,
        referral_count,
    )
}

pub fn score_after_wait(waited_secs: u64, reentries: u32, referral_count: u32) -> i128 {
    let hours_hundredths = waited_secs as i128 * SCORE_SCALE / SECONDS_PER_HOUR as i128;
    score_from_hundredths(
        hours_hundredths,
        reentries.min(i32::MAX as u32) as i32,
        referral_count.min(i32::MAX as u32) as i32,
    )
}

pub fn bps_of(amount: i128, bps: i128) -> i128 {
    amount.saturating_mul(bps) / BPS
}

pub fn receiver_split(reward: i128) -> ReceiverSplit {
    let payout = bps_of(reward, RECEIVER_PAYOUT_BPS);
    ReceiverSplit {
        payout,
        pool_skim: reward - payout,
    }
}

/// Splits a community position's entry value. The referral share is the
/// referrer's tier percentage of the entry value, never more than the 40%
/// bonus slice; whatever the referrer does not receive is profit.
pub fn community_split(entry_value: i128, referral_tier_bps: u32) -> CommunitySplit {
    let reserve = bps_of(entry_value, COMMUNITY_RESERVE_BPS);
    let operational = bps_of(entry_value, COMMUNITY_OPERATIONAL_BPS);
    let tier = (referral_tier_bps as i128).min(BONUS_SHARE_BPS);
    let referral = bps_of(entry_value, tier);
    CommunitySplit {
        reserve,
        operational,
        referral,
        profit: entry_value - reserve - operational - referral,
    }
}

/// Health of a level that may be stuck: only a full queue blocked by cash is
/// ever flagged. Returns the status and the estimated injection it needs.
pub fn level_health(
    days_since_last_cycle: u64,
    queue_size: u32,
    cash_balance: i128,
    entry_value: i128,
    warning_days: u32,
    critical_days: u32,
) -> (HealthStatus, i128) {
    let draw = entry_value.saturating_mul(CYCLE_SIZE as i128);
    if queue_size < CYCLE_SIZE || cash_balance >= draw {
        return (HealthStatus::Healthy, 0);
    }
    if days_since_last_cycle >= critical_days as u64 {
        (HealthStatus::Critical, draw)
    } else if days_since_last_cycle >= warning_days as u64 {
        (HealthStatus::Warning, draw / 2)
    } else {
        (HealthStatus::Healthy, 0)
    }
}

/// `min(100, round(balance / total_deposits * 100))`, 100 for an unfunded pool.
pub fn pool_health_score(balance: i128, total_deposits: i128) -> u32 {
    if total_deposits <= 0 {
        return 100;
    }
    let pct = (balance.saturating_mul(200) + total_deposits) / (2 * total_deposits);
    pct.clamp(0, 100) as u32
}

mod test;
