use matrix_economics::{
    community_split, receiver_split, variable_bonus_bps, Position, CYCLE_SIZE, LEVEL_COUNT,
};
use soroban_sdk::{log, Address, Env, Vec};

use crate::errors::{checked_add, checked_sub, Error};
use crate::events;
use crate::jupiter::JupiterModule;
use crate::ledger::{Bucket, FundsModule, LedgerModule};
use crate::levels::LevelRegistry;
use crate::members::MemberModule;
use crate::queue::QueueModule;
use crate::storage;
use crate::types::{
    CycleHistory, CycleSummary, DataKey, MemberStatus, OpenCycle, QueueEntry, QuotaStatus,
    TxKind, TxStatus,
};

pub struct CycleModule;

impl CycleModule {
    pub fn run(env: &Env, level_number: u32) -> Result<CycleSummary, Error> {
        let open = QueueModule::select_candidates(env, level_number)?;
        Self::settle(env, &open)
    }

    /// Fires cycles on a level while it stays ready, at most `max` of them.
    /// A level with an unresolved open cycle is left for recovery.
    pub fn sweep(env: &Env, level_number: u32, max: u32) -> Result<u32, Error> {
        if storage::open_cycle(env, level_number).is_some() {
            log!(env, "level {} has an open cycle, sweep skipped", level_number);
            return Ok(0);
        }
        let mut fired = 0;
        while fired < max && QueueModule::can_process_cycle(env, level_number) {
            Self::run(env, level_number)?;
            fired += 1;
        }
        Ok(fired)
    }

    /// Pays out an open cycle. Preconditions are re-checked before the first
    /// write; any error aborts the invocation and the host discards every
    /// change made since selection.
    pub fn settle(env: &Env, open: &OpenCycle) -> Result<CycleSummary, Error> {
        let now = env.ledger().timestamp();
        let level_number = open.level_number;
        let mut level = storage::level(env, level_number)?;

        if open.quota_ids.len() != CYCLE_SIZE {
            log!(
                env,
                "cycle {} on level {}: wrong candidate count",
                open.cycle_id,
                level_number
            );
            return Err(Error::InsufficientCandidates);
        }
        let mut entries: Vec<QueueEntry> = Vec::new(env);
        for id in open.quota_ids.iter() {
            let entry = storage::quota(env, id)?;
            if entry.status != QuotaStatus::Processing || entry.cycle_id != Some(open.cycle_id) {
                log!(
                    env,
                    "cycle {}: quota {} is not held by this cycle",
                    open.cycle_id,
                    id
                );
                return Err(Error::InsufficientCandidates);
            }
            entries.push_back(entry);
        }
        let draw = LevelRegistry::cycle_draw(&level)?;
        if level.cash_balance < draw {
            log!(
                env,
                "cycle {} on level {}: cash below draw",
                open.cycle_id,
                level_number
            );
            return Err(Error::InsufficientLevelCash);
        }
        LevelRegistry::debit_cash(&mut level, draw)?;

        let entry_value = level.entry_value;
        let mut history = Vec::new(env);
        let mut allocated: i128 = 0;
        let mut pool_deposit: i128 = 0;
        let mut receiver: Option<Address> = None;
        let mut recirculating: Option<QueueEntry> = None;

        for (i, mut entry) in entries.iter().enumerate() {
            let position =
                Position::for_rank(i as u32 + 1).ok_or(Error::InsufficientCandidates)?;
            let amount = match position {
                Position::Receiver => {
                    let split = receiver_split(level.reward_value);
                    MemberModule::credit_earnings(env, &entry.user, split.payout, false)?;
                    LedgerModule::record(
                        env,
                        Some(entry.user.clone()),
                        TxKind::CycleReward,
                        split.payout,
                        Some(level_number),
                        None,
                    );
                    JupiterModule::deposit(
                        env,
                        split.pool_skim,
                        level_number,
                        Some(entry.user.clone()),
                    )?;
                    pool_deposit = split.pool_skim;
                    receiver = Some(entry.user.clone());
                    allocated = checked_add(allocated, level.reward_value)?;
                    split.payout
                }
                Position::Advance1 | Position::Advance2 => {
                    Self::advance(env, &entry, entry_value)?;
                    allocated = checked_add(allocated, entry_value)?;
                    entry_value
                }
                Position::Community => {
                    Self::distribute_community(env, &entry.user, entry_value, level_number)?;
                    allocated = checked_add(allocated, entry_value)?;
                    entry_value
                }
                // contribution already counted in the receiver's reward
                Position::Donate1 | Position::Donate2 => entry_value,
                Position::Reentry => 0,
            };

            if position.recirculates() {
                recirculating = Some(entry.clone());
            } else {
                entry.status = QuotaStatus::Completed;
                entry.processed_at = Some(now);
                storage::save_quota(env, &entry);
            }

            history.push_back(CycleHistory {
                cycle_id: open.cycle_id,
                user: entry.user.clone(),
                quota_id: entry.id,
                level_number,
                position,
                amount,
                status: TxStatus::Confirmed,
                confirmed_at: now,
            });
        }

        // Stakes not paid out above stay in the system as reserve.
        let retained = checked_sub(draw, allocated)?;
        if retained > 0 {
            FundsModule::credit(env, Bucket::Reserve, retained)?;
        }

        let mut reentry = recirculating.ok_or(Error::InsufficientCandidates)?;
        let referrals = storage::member(env, &reentry.user)?.active_referrals;
        level.total_users = QueueModule::requeue(env, &mut reentry, referrals)?;
        level.total_cycles += 1;
        level.last_cycle_at = Some(now);
        storage::save_level(env, &level);

        storage::set_persistent(env, &DataKey::Cycle(open.cycle_id), &history);
        storage::clear_open_cycle(env, level_number);

        let receiver = receiver.ok_or(Error::InsufficientCandidates)?;
        events::cycle_fired(env, level_number, open.cycle_id, &receiver);
        Ok(CycleSummary {
            cycle_id: open.cycle_id,
            level_number,
            receiver,
            reentry_quota_id: reentry.id,
            cash_drawn: draw,
            pool_deposit,
        })
    }

    /// Carries an advancing participant's stake to the next level as a fresh
    /// WAITING entry. Level 10 has nowhere to go, so the stake becomes profit.
    fn advance(env: &Env, entry: &QueueEntry, carried: i128) -> Result<(), Error> {
        if entry.level_number >= LEVEL_COUNT {
            FundsModule::credit(env, Bucket::Profit, carried)?;
            return Ok(());
        }

        let next_number = entry.level_number + 1;
        let mut next = storage::level(env, next_number)?;
        let mut member = storage::member(env, &entry.user)?;
        QueueModule::open_entry(env, &entry.user, &mut next, member.active_referrals)?;
        LevelRegistry::credit_cash(&mut next, carried)?;
        storage::save_level(env, &next);

        if member.current_level < next_number {
            member.current_level = next_number;
            storage::save_member(env, &member);
        }
        Ok(())
    }

    fn distribute_community(
        env: &Env,
        user: &Address,
        entry_value: i128,
        level_number: u32,
    ) -> Result<(), Error> {
        let member = storage::member(env, user)?;
        let mut tier_bps = 0;
        let mut beneficiary = None;
        if let Some(referrer) = member.referrer {
            if let Ok(parent) = storage::member(env, &referrer) {
                if parent.status == MemberStatus::Active {
                    let count = parent.active_referrals.min(i32::MAX as u32) as i32;
                    tier_bps = variable_bonus_bps(count);
                    beneficiary = Some(referrer);
                }
            }
        }

        let split = community_split(entry_value, tier_bps);
        FundsModule::credit(env, Bucket::Reserve, split.reserve)?;
        FundsModule::credit(env, Bucket::Operational, split.operational)?;
        FundsModule::credit(env, Bucket::Profit, split.profit)?;

        if let Some(referrer) = beneficiary {
            if split.referral > 0 {
                MemberModule::credit_earnings(env, &referrer, split.referral, true)?;
                LedgerModule::record(
                    env,
                    Some(referrer),
                    TxKind::BonusReferral,
                    split.referral,
                    Some(level_number),
                    None,
                );
            }
        }
        Ok(())
    }

    /// Resolves a level's open cycle left behind by an interrupted run.
    /// Without a settled record every held entry goes back to WAITING as it
    /// was before selection; with one, entries take the outcome the record
    /// shows. Returns the number of entries put back in the queue.
    pub fn recover(env: &Env, level_number: u32) -> Result<u32, Error> {
        let mut level = storage::level(env, level_number)?;
        let Some(open) = storage::open_cycle(env, level_number) else {
            return Ok(0);
        };
        let now = env.ledger().timestamp();
        let settled: Option<Vec<CycleHistory>> =
            storage::get_persistent(env, &DataKey::Cycle(open.cycle_id));
        let mut requeued = 0;

        match settled {
            None => {
                let mut queue = storage::queue(env, level_number);
                for id in open.quota_ids.iter() {
                    let mut entry = storage::quota(env, id)?;
                    if entry.status == QuotaStatus::Completed {
                        continue;
                    }
                    entry.status = QuotaStatus::Waiting;
                    entry.cycle_id = None;
                    storage::save_quota(env, &entry);
                    QueueModule::remove_slot(&mut queue, entry.id);
                    QueueModule::insert_slot(&mut queue, QueueModule::slot(&entry));
                    requeued += 1;
                }
                storage::save_queue(env, level_number, &queue);
            }
            Some(rows) => {
                for row in rows.iter() {
                    let mut entry = storage::quota(env, row.quota_id)?;
                    if entry.status != QuotaStatus::Processing {
                        continue;
                    }
                    if row.position.recirculates() {
                        let referrals = storage::member(env, &entry.user)?.active_referrals;
                        QueueModule::requeue(env, &mut entry, referrals)?;
                        requeued += 1;
                    } else {
                        entry.status = QuotaStatus::Completed;
                        entry.processed_at = Some(now);
                        storage::save_quota(env, &entry);
                    }
                }
            }
        }

        level.total_users = storage::queue(env, level_number).len();
        storage::save_level(env, &level);
        storage::clear_open_cycle(env, level_number);

        log!(
            env,
            "level {} recovered cycle {}: {} requeued",
            level_number,
            open.cycle_id,
            requeued
        );
        events::cycle_recovered(env, level_number, open.cycle_id, requeued);
        Ok(requeued)
    }

    pub fn history(env: &Env, cycle_id: u64) -> Result<Vec<CycleHistory>, Error> {
        storage::get_persistent(env, &DataKey::Cycle(cycle_id)).ok_or(Error::CycleNotFound)
    }
}
