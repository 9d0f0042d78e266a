use matrix_economics::{bonus_value, level_value, reward_value, CYCLE_SIZE, LEVEL_COUNT};
use soroban_sdk::{Env, Vec};

use crate::errors::{checked_add, checked_sub, Error};
use crate::storage;
use crate::types::Level;

pub struct LevelRegistry;

impl LevelRegistry {
    /// Creates the fixed level table. Economics are derived once here and
    /// never change afterwards.
    pub fn create_all(env: &Env) {
        let now = env.ledger().timestamp();
        for n in 1..=LEVEL_COUNT {
            let level = Level {
                level_number: n,
                entry_value: level_value(n as i32),
                reward_value: reward_value(n as i32),
                bonus_value: bonus_value(n as i32),
                cash_balance: 0,
                total_cycles: 0,
                total_users: 0,
                created_at: now,
                last_cycle_at: None,
            };
            storage::save_level(env, &level);
        }
    }

    pub fn all(env: &Env) -> Vec<Level> {
        let mut levels = Vec::new(env);
        for n in 1..=LEVEL_COUNT {
            if let Ok(level) = storage::level(env, n) {
                levels.push_back(level);
            }
        }
        levels
    }

    pub fn cycle_draw(level: &Level) -> Result<i128, Error> {
        level
            .entry_value
            .checked_mul(CYCLE_SIZE as i128)
            .ok_or(Error::MathOverflow)
    }

    pub fn credit_cash(level: &mut Level, amount: i128) -> Result<(), Error> {
        level.cash_balance = checked_add(level.cash_balance, amount)?;
        Ok(())
    }

    /// The pooled balance never goes negative; a short level is an invariant
    /// failure for the caller, not a clamp.
    pub fn debit_cash(level: &mut Level, amount: i128) -> Result<(), Error> {
        if level.cash_balance < amount {
            return Err(Error::InsufficientLevelCash);
        }
        level.cash_balance = checked_sub(level.cash_balance, amount)?;
        Ok(())
    }
}
