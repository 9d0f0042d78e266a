use matrix_economics::{score_after_wait, CYCLE_SIZE, LEVEL_COUNT};
use soroban_sdk::{symbol_short, Address, Env, Symbol, Vec};

use crate::errors::Error;
use crate::events;
use crate::levels::LevelRegistry;
use crate::storage;
use crate::types::{
    DataKey, Level, Member, MemberStatus, OpenCycle, PurchaseEligibility, QueueEntry, QueueSlot,
    QuotaStatus,
};

pub struct QueueModule;

impl QueueModule {
    pub fn enqueue(
        env: &Env,
        user: &Address,
        level_number: u32,
        is_new: bool,
    ) -> Result<QueueEntry, Error> {
        let mut level = storage::level(env, level_number)?;
        let member = storage::member(env, user)?;

        if is_new {
            let entry = Self::open_entry(env, user, &mut level, member.active_referrals)?;
            let entry_value = level.entry_value;
            LevelRegistry::credit_cash(&mut level, entry_value)?;
            storage::save_level(env, &level);
            return Ok(entry);
        }

        let mut entry =
            Self::waiting_entry(env, user, level_number)?.ok_or(Error::NoWaitingQuota)?;
        Self::requeue(env, &mut entry, member.active_referrals)?;
        Ok(entry)
    }

    /// Creates a WAITING entry with the next per-user quota number. The caller
    /// owns the level record and decides how much cash backs the entry.
    pub fn open_entry(
        env: &Env,
        user: &Address,
        level: &mut Level,
        referral_count: u32,
    ) -> Result<QueueEntry, Error> {
        let now = env.ledger().timestamp();
        let mut ids = storage::user_quotas(env, user, level.level_number);
        let entry = QueueEntry {
            id: storage::next_id(env, &DataKey::QuotaCounter),
            user: user.clone(),
            level_number: level.level_number,
            quota_number: ids.len() + 1,
            score: score_after_wait(0, 0, referral_count),
            reentries: 0,
            status: QuotaStatus::Waiting,
            entered_at: now,
            processed_at: None,
            cycle_id: None,
        };
        storage::save_quota(env, &entry);
        ids.push_back(entry.id);
        storage::save_user_quotas(env, user, level.level_number, &ids);

        let mut queue = storage::queue(env, level.level_number);
        Self::insert_slot(&mut queue, Self::slot(&entry));
        storage::save_queue(env, level.level_number, &queue);
        level.total_users = queue.len();

        events::quota_enqueued(env, entry.id, user, level.level_number, entry.quota_number);
        Ok(entry)
    }

    /// Puts an entry (back) into WAITING with one more reentry and a score
    /// recomputed from its full wait. Returns the level's new queue length.
    pub fn requeue(env: &Env, entry: &mut QueueEntry, referral_count: u32) -> Result<u32, Error> {
        let now = env.ledger().timestamp();
        entry.reentries = entry.reentries.checked_add(1).ok_or(Error::MathOverflow)?;
        entry.score = score_after_wait(
            now.saturating_sub(entry.entered_at),
            entry.reentries,
            referral_count,
        );
        entry.status = QuotaStatus::Waiting;
        entry.cycle_id = None;
        storage::save_quota(env, entry);

        let mut queue = storage::queue(env, entry.level_number);
        Self::remove_slot(&mut queue, entry.id);
        Self::insert_slot(&mut queue, Self::slot(entry));
        storage::save_queue(env, entry.level_number, &queue);

        events::quota_reentered(env, entry.id, entry.reentries, entry.score);
        Ok(queue.len())
    }

    pub fn waiting_entry(
        env: &Env,
        user: &Address,
        level_number: u32,
    ) -> Result<Option<QueueEntry>, Error> {
        for id in storage::user_quotas(env, user, level_number).iter() {
            let entry = storage::quota(env, id)?;
            if entry.status == QuotaStatus::Waiting {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    pub fn count_active(env: &Env, user: &Address, level_number: u32) -> u32 {
        if storage::level(env, level_number).is_err() {
            return 0;
        }
        Self::user_entries(env, user, level_number)
            .iter()
            .filter(|e| e.status == QuotaStatus::Waiting)
            .count() as u32
    }

    pub fn user_entries(env: &Env, user: &Address, level_number: u32) -> Vec<QueueEntry> {
        let mut entries = Vec::new(env);
        for id in storage::user_quotas(env, user, level_number).iter() {
            if let Ok(entry) = storage::quota(env, id) {
                entries.push_back(entry);
            }
        }
        entries
    }

    pub fn check_purchase(env: &Env, user: &Address, level_number: u32) -> Result<Member, Error> {
        if level_number == 0 || level_number > LEVEL_COUNT {
            return Err(Error::InvalidLevel);
        }
        let member = storage::member(env, user)?;
        if member.status != MemberStatus::Active {
            return Err(Error::MemberNotActive);
        }
        if level_number > 1 && Self::count_active(env, user, level_number - 1) == 0 {
            return Err(Error::PrerequisiteQuotaMissing);
        }
        Ok(member)
    }

    pub fn can_purchase(env: &Env, user: &Address, level_number: u32) -> PurchaseEligibility {
        match Self::check_purchase(env, user, level_number) {
            Ok(_) => PurchaseEligibility {
                can_purchase: true,
                reason: None,
            },
            Err(e) => PurchaseEligibility {
                can_purchase: false,
                reason: Some(Self::denial_reason(e)),
            },
        }
    }

    fn denial_reason(error: Error) -> Symbol {
        match error {
            Error::InvalidLevel => symbol_short!("bad_level"),
            Error::MemberNotFound => symbol_short!("no_member"),
            Error::MemberNotActive => symbol_short!("inactive"),
            Error::PrerequisiteQuotaMissing => symbol_short!("need_prev"),
            _ => symbol_short!("denied"),
        }
    }

    pub fn can_process_cycle(env: &Env, level_number: u32) -> bool {
        let Ok(level) = storage::level(env, level_number) else {
            return false;
        };
        let Ok(draw) = LevelRegistry::cycle_draw(&level) else {
            return false;
        };
        storage::queue(env, level_number).len() >= CYCLE_SIZE && level.cash_balance >= draw
    }

    /// Takes the top seven WAITING entries off the level's queue, marks them
    /// PROCESSING under a fresh cycle id and records the level's open cycle.
    /// Only one open cycle may exist per level.
    pub fn select_candidates(env: &Env, level_number: u32) -> Result<OpenCycle, Error> {
        let mut level = storage::level(env, level_number)?;
        if storage::open_cycle(env, level_number).is_some() {
            return Err(Error::CycleInProgress);
        }
        let mut queue = storage::queue(env, level_number);
        if queue.len() < CYCLE_SIZE || level.cash_balance < LevelRegistry::cycle_draw(&level)? {
            return Err(Error::CycleNotReady);
        }

        let cycle_id = storage::next_id(env, &DataKey::CycleCounter);
        let mut quota_ids = Vec::new(env);
        for _ in 0..CYCLE_SIZE {
            let slot = queue.pop_front().ok_or(Error::InsufficientCandidates)?;
            let mut entry = storage::quota(env, slot.quota_id)?;
            if entry.status != QuotaStatus::Waiting {
                return Err(Error::InsufficientCandidates);
            }
            entry.status = QuotaStatus::Processing;
            entry.cycle_id = Some(cycle_id);
            storage::save_quota(env, &entry);
            quota_ids.push_back(entry.id);
        }
        storage::save_queue(env, level_number, &queue);
        level.total_users = queue.len();
        storage::save_level(env, &level);

        let open = OpenCycle {
            cycle_id,
            level_number,
            quota_ids,
            opened_at: env.ledger().timestamp(),
        };
        storage::set_open_cycle(env, &open);
        Ok(open)
    }

    /// WAITING entries of a level in cycle order.
    pub fn ranked(env: &Env, level_number: u32) -> Result<Vec<QueueEntry>, Error> {
        storage::level(env, level_number)?;
        let mut entries = Vec::new(env);
        for slot in storage::queue(env, level_number).iter() {
            entries.push_back(storage::quota(env, slot.quota_id)?);
        }
        Ok(entries)
    }

    /// Recomputes every WAITING score from the current wait and re-sorts the
    /// queue. Returns how many entries were rescored.
    pub fn refresh_scores(env: &Env, level_number: u32) -> Result<u32, Error> {
        storage::level(env, level_number)?;
        let now = env.ledger().timestamp();
        let mut reordered = Vec::new(env);
        for slot in storage::queue(env, level_number).iter() {
            let mut entry = storage::quota(env, slot.quota_id)?;
            let member = storage::member(env, &entry.user)?;
            let score = score_after_wait(
                now.saturating_sub(entry.entered_at),
                entry.reentries,
                member.active_referrals,
            );
            if score != entry.score {
                entry.score = score;
                storage::save_quota(env, &entry);
            }
            Self::insert_slot(&mut reordered, Self::slot(&entry));
        }
        storage::save_queue(env, level_number, &reordered);
        Ok(reordered.len())
    }

    pub fn slot(entry: &QueueEntry) -> QueueSlot {
        QueueSlot {
            quota_id: entry.id,
            score: entry.score,
            entered_at: entry.entered_at,
        }
    }

    /// Score descending, then earlier entry, then lower id.
    fn outranks(a: &QueueSlot, b: &QueueSlot) -> bool {
        if a.score != b.score {
            return a.score > b.score;
        }
        if a.entered_at != b.entered_at {
            return a.entered_at < b.entered_at;
        }
        a.quota_id < b.quota_id
    }

    pub fn insert_slot(queue: &mut Vec<QueueSlot>, slot: QueueSlot) {
        let mut index = queue.len();
        for (i, existing) in queue.iter().enumerate() {
            if Self::outranks(&slot, &existing) {
                index = i as u32;
                break;
            }
        }
        queue.insert(index, slot);
    }

    pub fn remove_slot(queue: &mut Vec<QueueSlot>, quota_id: u64) -> bool {
        let position = queue.iter().position(|s| s.quota_id == quota_id);
        match position {
            Some(i) => queue.remove(i as u32).is_some(),
            None => false,
        }
    }
}
