use matrix_economics::{level_health, pool_health_score, CYCLE_SIZE, SECONDS_PER_DAY};
use soroban_sdk::{symbol_short, Address, Env, Vec};

use crate::errors::{checked_add, checked_sub, Error};
use crate::events;
use crate::ledger::LedgerModule;
use crate::levels::LevelRegistry;
use crate::storage;
use crate::types::{JupiterPool, Level, LevelHealth, TxKind};

/// Secondary reserve fed by the receiver skim. It only reports which levels
/// are stuck; moving money into a level is an explicit admin call.
pub struct JupiterModule;

impl JupiterModule {
    fn roll_day(env: &Env, pool: &mut JupiterPool) {
        let today = env.ledger().timestamp() / SECONDS_PER_DAY;
        if pool.day != today {
            pool.day = today;
            pool.deposits_today = 0;
            pool.withdrawals_today = 0;
        }
    }

    pub fn deposit(
        env: &Env,
        amount: i128,
        level_number: u32,
        from: Option<Address>,
    ) -> Result<(), Error> {
        if amount <= 0 {
            return Ok(());
        }
        let mut pool = storage::jupiter_pool(env);
        Self::roll_day(env, &mut pool);
        pool.balance = checked_add(pool.balance, amount)?;
        pool.total_deposits = checked_add(pool.total_deposits, amount)?;
        pool.deposits_today = checked_add(pool.deposits_today, amount)?;
        storage::save_jupiter_pool(env, &pool);

        LedgerModule::record(
            env,
            from,
            TxKind::JupiterPoolDeposit,
            amount,
            Some(level_number),
            None,
        );
        events::pool_moved(env, symbol_short!("deposit"), level_number, amount);
        Ok(())
    }

    pub fn state(env: &Env) -> JupiterPool {
        let mut pool = storage::jupiter_pool(env);
        Self::roll_day(env, &mut pool);
        pool
    }

    pub fn health_score(env: &Env) -> u32 {
        let pool = storage::jupiter_pool(env);
        pool_health_score(pool.balance, pool.total_deposits)
    }

    pub fn levels_health(env: &Env) -> Result<Vec<LevelHealth>, Error> {
        let config = storage::config(env)?;
        let now = env.ledger().timestamp();
        let mut report = Vec::new(env);
        for level in LevelRegistry::all(env).iter() {
            let since = level.last_cycle_at.unwrap_or(level.created_at);
            let days = now.saturating_sub(since) / SECONDS_PER_DAY;
            let queue_size = storage::queue(env, level.level_number).len();
            let (status, estimated_intervention) = level_health(
                days,
                queue_size,
                level.cash_balance,
                level.entry_value,
                config.warning_days,
                config.critical_days,
            );
            report.push_back(LevelHealth {
                level_number: level.level_number,
                days_since_last_cycle: days,
                queue_size,
                status,
                estimated_intervention,
            });
        }
        Ok(report)
    }

    /// Debits the pool and credits a level that has a full queue but not
    /// enough cash to draw a cycle.
    pub fn intervene(env: &Env, level_number: u32, amount: i128) -> Result<Level, Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let mut level = storage::level(env, level_number)?;
        let queue_size = storage::queue(env, level_number).len();
        if queue_size < CYCLE_SIZE || level.cash_balance >= LevelRegistry::cycle_draw(&level)? {
            return Err(Error::InterventionNotNeeded);
        }

        let mut pool = storage::jupiter_pool(env);
        Self::roll_day(env, &mut pool);
        if pool.balance < amount {
            return Err(Error::InsufficientPoolBalance);
        }
        pool.balance = checked_sub(pool.balance, amount)?;
        pool.total_withdrawals = checked_add(pool.total_withdrawals, amount)?;
        pool.withdrawals_today = checked_add(pool.withdrawals_today, amount)?;
        pool.interventions += 1;
        storage::save_jupiter_pool(env, &pool);

        LevelRegistry::credit_cash(&mut level, amount)?;
        storage::save_level(env, &level);

        LedgerModule::record(
            env,
            None,
            TxKind::JupiterPoolWithdrawal,
            amount,
            Some(level_number),
            None,
        );
        events::pool_moved(env, symbol_short!("inject"), level_number, amount);
        Ok(level)
    }
}
