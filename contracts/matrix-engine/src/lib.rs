//! Matrix - Engine (Soroban)
//! Level queues, cycle payouts, referral bonuses and the Jupiter Pool reserve.

#![no_std]
use matrix_economics::BonusTierInfo;
use soroban_sdk::{contract, contractimpl, token, Address, Env, String, Vec};

mod cycle;
mod errors;
mod events;
mod jupiter;
mod ledger;
mod levels;
mod members;
mod queue;
mod storage;
mod types;

pub use errors::Error;
pub use types::*;

use cycle::CycleModule;
use jupiter::JupiterModule;
use ledger::{FundsModule, LedgerModule};
use levels::LevelRegistry;
use members::MemberModule;
use queue::QueueModule;

const DEFAULT_WARNING_DAYS: u32 = 3;
const DEFAULT_CRITICAL_DAYS: u32 = 5;
const DEFAULT_MAX_QUOTAS_PER_LEVEL: u32 = 10;
const DEFAULT_MAX_CYCLES_PER_TRIGGER: u32 = 3;

fn require_admin(env: &Env, admin: &Address) -> Result<(), Error> {
    matrix_common_admin::require_admin::<DataKey, Error>(env, &DataKey::Admin, admin)
}

#[contract]
pub struct MatrixEngineContract;

#[contractimpl]
impl MatrixEngineContract {
    pub fn initialize(env: Env, admin: Address, token: Address) -> Result<(), Error> {
        storage::bump_instance(&env);
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        env.storage().instance().set(&DataKey::Admin, &admin);
        storage::set_config(
            &env,
            &Config {
                token,
                warning_days: DEFAULT_WARNING_DAYS,
                critical_days: DEFAULT_CRITICAL_DAYS,
                max_quotas_per_level: DEFAULT_MAX_QUOTAS_PER_LEVEL,
                max_cycles_per_trigger: DEFAULT_MAX_CYCLES_PER_TRIGGER,
            },
        );
        storage::save_system_funds(&env, &SystemFunds::default());
        LevelRegistry::create_all(&env);
        Ok(())
    }

    pub fn update_config(env: Env, admin: Address, config: Config) -> Result<(), Error> {
        storage::bump_instance(&env);
        require_admin(&env, &admin)?;
        if config.warning_days >= config.critical_days
            || config.max_quotas_per_level == 0
            || config.max_cycles_per_trigger == 0
        {
            return Err(Error::InvalidConfig);
        }
        storage::set_config(&env, &config);
        events::config_updated(&env, &admin);
        Ok(())
    }

    pub fn get_config(env: Env) -> Result<Config, Error> {
        storage::bump_instance(&env);
        storage::config(&env)
    }

    // ============================================================
    // Members
    // ============================================================

    pub fn register_member(
        env: Env,
        user: Address,
        referrer: Option<Address>,
    ) -> Result<Member, Error> {
        storage::bump_instance(&env);
        user.require_auth();
        storage::config(&env)?;
        MemberModule::register(&env, user, referrer)
    }

    pub fn set_member_status(
        env: Env,
        admin: Address,
        user: Address,
        status: MemberStatus,
    ) -> Result<Member, Error> {
        storage::bump_instance(&env);
        require_admin(&env, &admin)?;
        MemberModule::set_status(&env, &user, status)
    }

    pub fn deposit(env: Env, user: Address, amount: i128) -> Result<Member, Error> {
        storage::bump_instance(&env);
        user.require_auth();
        MemberModule::deposit(&env, &user, amount)
    }

    pub fn withdraw(env: Env, user: Address, amount: i128) -> Result<Member, Error> {
        storage::bump_instance(&env);
        user.require_auth();
        MemberModule::withdraw(&env, &user, amount)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), Error> {
        storage::bump_instance(&env);
        from.require_auth();
        MemberModule::transfer(&env, &from, &to, amount)
    }

    pub fn get_member(env: Env, user: Address) -> Option<Member> {
        storage::bump_instance(&env);
        storage::member(&env, &user).ok()
    }

    // ============================================================
    // Quotas
    // ============================================================

    pub fn can_purchase_quota(env: Env, user: Address, level_number: u32) -> PurchaseEligibility {
        storage::bump_instance(&env);
        QueueModule::can_purchase(&env, &user, level_number)
    }

    /// Buys a new quota at `level_number`. Without `external_ref` the entry
    /// value is debited from the member's internal balance; with one it is
    /// pulled from the member's wallet and the reference is kept on the
    /// ledger row. Ready cycles on the level fire before returning.
    pub fn purchase_quota(
        env: Env,
        user: Address,
        level_number: u32,
        external_ref: Option<String>,
    ) -> Result<PurchaseReceipt, Error> {
        storage::bump_instance(&env);
        user.require_auth();
        let config = storage::config(&env)?;
        let mut member = QueueModule::check_purchase(&env, &user, level_number)?;
        if QueueModule::count_active(&env, &user, level_number) >= config.max_quotas_per_level {
            return Err(Error::QuotaCapExceeded);
        }

        let price = storage::level(&env, level_number)?.entry_value;
        if external_ref.is_some() {
            token::Client::new(&env, &config.token).transfer(
                &user,
                &env.current_contract_address(),
                &price,
            );
            FundsModule::track_inflow(&env, price)?;
        } else {
            MemberModule::debit(&mut member, price)?;
        }
        if member.current_level < level_number {
            member.current_level = level_number;
        }
        storage::save_member(&env, &member);

        let entry = QueueModule::enqueue(&env, &user, level_number, true)?;
        LedgerModule::record(
            &env,
            Some(user),
            TxKind::QuotaPurchase,
            price,
            Some(level_number),
            external_ref,
        );

        let cycles_fired = CycleModule::sweep(&env, level_number, config.max_cycles_per_trigger)?;
        Ok(PurchaseReceipt {
            quota_id: entry.id,
            quota_number: entry.quota_number,
            level_number,
            cycles_fired,
        })
    }

    /// Operator entry point onto a queue. A new quota credits the level with
    /// its entry value; otherwise the user's WAITING entry gains a reentry.
    ///
    /// No tokens move, the member's balance is not debited and `total_in` is
    /// untouched, so the credited cash is not backed by any deposit. Use it
    /// only for placements paid off-ledger, such as migrated entries; payouts
    /// it funds are withdrawable against the contract's token balance.
    pub fn enqueue(
        env: Env,
        admin: Address,
        user: Address,
        level_number: u32,
        is_new: bool,
    ) -> Result<QueueEntry, Error> {
        storage::bump_instance(&env);
        require_admin(&env, &admin)?;
        QueueModule::enqueue(&env, &user, level_number, is_new)
    }

    pub fn count_user_quotas(env: Env, user: Address, level_number: u32) -> u32 {
        storage::bump_instance(&env);
        QueueModule::count_active(&env, &user, level_number)
    }

    pub fn get_quota(env: Env, quota_id: u64) -> Option<QueueEntry> {
        storage::bump_instance(&env);
        storage::quota(&env, quota_id).ok()
    }

    pub fn get_user_quotas(env: Env, user: Address, level_number: u32) -> Vec<QueueEntry> {
        storage::bump_instance(&env);
        QueueModule::user_entries(&env, &user, level_number)
    }

    pub fn get_queue(env: Env, level_number: u32) -> Result<Vec<QueueEntry>, Error> {
        storage::bump_instance(&env);
        QueueModule::ranked(&env, level_number)
    }

    pub fn refresh_scores(env: Env, level_number: u32) -> Result<u32, Error> {
        storage::bump_instance(&env);
        QueueModule::refresh_scores(&env, level_number)
    }

    // ============================================================
    // Cycles
    // ============================================================

    pub fn can_process_cycle(env: Env, level_number: u32) -> bool {
        storage::bump_instance(&env);
        QueueModule::can_process_cycle(&env, level_number)
    }

    pub fn process_cycle(env: Env, level_number: u32) -> Result<CycleSummary, Error> {
        storage::bump_instance(&env);
        storage::config(&env)?;
        CycleModule::run(&env, level_number)
    }

    pub fn sweep_cycles(env: Env, level_number: u32) -> Result<u32, Error> {
        storage::bump_instance(&env);
        let config = storage::config(&env)?;
        storage::level(&env, level_number)?;
        CycleModule::sweep(&env, level_number, config.max_cycles_per_trigger)
    }

    pub fn recover_processing(env: Env, admin: Address, level_number: u32) -> Result<u32, Error> {
        storage::bump_instance(&env);
        require_admin(&env, &admin)?;
        CycleModule::recover(&env, level_number)
    }

    pub fn get_cycle(env: Env, cycle_id: u64) -> Result<Vec<CycleHistory>, Error> {
        storage::bump_instance(&env);
        CycleModule::history(&env, cycle_id)
    }

    // ============================================================
    // Levels, ledger and funds
    // ============================================================

    pub fn get_level(env: Env, level_number: u32) -> Option<Level> {
        storage::bump_instance(&env);
        storage::level(&env, level_number).ok()
    }

    pub fn get_levels(env: Env) -> Vec<Level> {
        storage::bump_instance(&env);
        LevelRegistry::all(&env)
    }

    pub fn get_transaction(env: Env, tx_id: u64) -> Option<Transaction> {
        storage::bump_instance(&env);
        LedgerModule::transaction(&env, tx_id)
    }

    pub fn get_system_funds(env: Env) -> SystemFunds {
        storage::bump_instance(&env);
        storage::system_funds(&env)
    }

    // ============================================================
    // Jupiter Pool
    // ============================================================

    pub fn get_pool_state(env: Env) -> JupiterPool {
        storage::bump_instance(&env);
        JupiterModule::state(&env)
    }

    pub fn get_pool_balance(env: Env) -> i128 {
        storage::bump_instance(&env);
        storage::jupiter_pool(&env).balance
    }

    pub fn get_pool_health_score(env: Env) -> u32 {
        storage::bump_instance(&env);
        JupiterModule::health_score(&env)
    }

    pub fn get_levels_health(env: Env) -> Result<Vec<LevelHealth>, Error> {
        storage::bump_instance(&env);
        JupiterModule::levels_health(&env)
    }

    /// Injects pool money into a stalled level, then lets the level cycle as
    /// usual. Returns the number of cycles that fired.
    pub fn pool_intervene(
        env: Env,
        admin: Address,
        level_number: u32,
        amount: i128,
    ) -> Result<u32, Error> {
        storage::bump_instance(&env);
        require_admin(&env, &admin)?;
        let config = storage::config(&env)?;
        JupiterModule::intervene(&env, level_number, amount)?;
        CycleModule::sweep(&env, level_number, config.max_cycles_per_trigger)
    }

    // ============================================================
    // Economics
    // ============================================================

    pub fn calculate_level_value(_env: Env, level_number: i32) -> i128 {
        matrix_economics::level_value(level_number)
    }

    pub fn calculate_reward(_env: Env, level_number: i32) -> i128 {
        matrix_economics::reward_value(level_number)
    }

    pub fn calculate_bonus(_env: Env, level_number: i32) -> i128 {
        matrix_economics::bonus_value(level_number)
    }

    pub fn calculate_variable_bonus(_env: Env, referral_count: i32) -> u32 {
        matrix_economics::variable_bonus_bps(referral_count)
    }

    pub fn get_bonus_tier_info(_env: Env, referral_count: i32) -> BonusTierInfo {
        matrix_economics::bonus_tier_info(referral_count)
    }

    pub fn calculate_referral_points(_env: Env, referral_count: i32) -> i32 {
        matrix_economics::referral_points(referral_count)
    }

    pub fn calculate_score(
        _env: Env,
        waiting_hours: i64,
        reentries: i32,
        referral_count: i32,
    ) -> i128 {
        matrix_economics::calculate_score(waiting_hours, reentries, referral_count)
    }

    // ============================================================
    // Admin
    // ============================================================

    pub fn propose_admin(
        env: Env,
        current_admin: Address,
        new_admin: Address,
    ) -> Result<(), Error> {
        matrix_common_admin::propose_admin::<DataKey, Error>(
            &env,
            &DataKey::Admin,
            &DataKey::PendingAdmin,
            current_admin,
            new_admin,
        )
    }

    pub fn accept_admin(env: Env, new_admin: Address) -> Result<(), Error> {
        matrix_common_admin::accept_admin::<DataKey, Error>(
            &env,
            &DataKey::Admin,
            &DataKey::PendingAdmin,
            new_admin,
        )
    }
}
