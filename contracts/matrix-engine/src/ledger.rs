use soroban_sdk::{Address, Env, String};

use crate::errors::{checked_add, Error};
use crate::events;
use crate::storage;
use crate::types::{DataKey, SystemFunds, Transaction, TxKind, TxStatus};

pub struct LedgerModule;

impl LedgerModule {
    /// Appends a confirmed transaction. Writes only ever happen inside the
    /// invocation that moved the money, so a failed invocation leaves no row.
    pub fn record(
        env: &Env,
        user: Option<Address>,
        kind: TxKind,
        amount: i128,
        level_number: Option<u32>,
        reference: Option<String>,
    ) -> u64 {
        let id = storage::next_id(env, &DataKey::TxCounter);
        let tx = Transaction {
            id,
            user: user.clone(),
            kind,
            amount,
            status: TxStatus::Confirmed,
            level_number,
            reference,
            created_at: env.ledger().timestamp(),
        };
        storage::set_persistent(env, &DataKey::Transaction(id), &tx);
        events::ledger_entry(env, id, kind, &user, amount);
        id
    }

    pub fn transaction(env: &Env, id: u64) -> Option<Transaction> {
        storage::get_persistent(env, &DataKey::Transaction(id))
    }
}

/// Buckets of the singleton `SystemFunds` record.
#[derive(Clone, Copy)]
pub enum Bucket {
    Reserve,
    Operational,
    Profit,
}

pub struct FundsModule;

impl FundsModule {
    pub fn credit(env: &Env, bucket: Bucket, amount: i128) -> Result<SystemFunds, Error> {
        let mut funds = storage::system_funds(env);
        match bucket {
            Bucket::Reserve => funds.reserve = checked_add(funds.reserve, amount)?,
            Bucket::Operational => funds.operational = checked_add(funds.operational, amount)?,
            Bucket::Profit => funds.profit = checked_add(funds.profit, amount)?,
        }
        storage::save_system_funds(env, &funds);
        Ok(funds)
    }

    pub fn track_inflow(env: &Env, amount: i128) -> Result<(), Error> {
        let mut funds = storage::system_funds(env);
        funds.total_in = checked_add(funds.total_in, amount)?;
        storage::save_system_funds(env, &funds);
        Ok(())
    }

    pub fn track_outflow(env: &Env, amount: i128) -> Result<(), Error> {
        let mut funds = storage::system_funds(env);
        funds.total_out = checked_add(funds.total_out, amount)?;
        storage::save_system_funds(env, &funds);
        Ok(())
    }
}
