use soroban_sdk::{Address, Env, IntoVal, TryFromVal, Val, Vec};

use crate::errors::Error;
use crate::types::{
    Config, DataKey, JupiterPool, Level, Member, OpenCycle, QueueEntry, QueueSlot, SystemFunds,
};

const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 86_400;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 120_960;
const PERSISTENT_BUMP_AMOUNT: u32 = 1_051_200;

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn set_persistent<V: IntoVal<Env, Val>>(env: &Env, key: &DataKey, value: &V) {
    env.storage().persistent().set(key, value);
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn get_persistent<V: TryFromVal<Env, Val>>(env: &Env, key: &DataKey) -> Option<V> {
    let value = env.storage().persistent().get(key);
    if value.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
    }
    value
}

pub fn next_id(env: &Env, key: &DataKey) -> u64 {
    let current: u64 = env.storage().instance().get(key).unwrap_or(0);
    let id = current + 1;
    env.storage().instance().set(key, &id);
    id
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn config(env: &Env) -> Result<Config, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn set_config(env: &Env, config: &Config) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn level(env: &Env, level_number: u32) -> Result<Level, Error> {
    get_persistent(env, &DataKey::Level(level_number)).ok_or(Error::LevelNotFound)
}

pub fn save_level(env: &Env, level: &Level) {
    set_persistent(env, &DataKey::Level(level.level_number), level);
}

pub fn quota(env: &Env, quota_id: u64) -> Result<QueueEntry, Error> {
    get_persistent(env, &DataKey::Quota(quota_id)).ok_or(Error::QuotaNotFound)
}

pub fn save_quota(env: &Env, entry: &QueueEntry) {
    set_persistent(env, &DataKey::Quota(entry.id), entry);
}

pub fn queue(env: &Env, level_number: u32) -> Vec<QueueSlot> {
    get_persistent(env, &DataKey::Queue(level_number)).unwrap_or(Vec::new(env))
}

pub fn save_queue(env: &Env, level_number: u32, queue: &Vec<QueueSlot>) {
    set_persistent(env, &DataKey::Queue(level_number), queue);
}

pub fn user_quotas(env: &Env, user: &Address, level_number: u32) -> Vec<u64> {
    get_persistent(env, &DataKey::UserQuotas(user.clone(), level_number))
        .unwrap_or(Vec::new(env))
}

pub fn save_user_quotas(env: &Env, user: &Address, level_number: u32, ids: &Vec<u64>) {
    set_persistent(env, &DataKey::UserQuotas(user.clone(), level_number), ids);
}

pub fn open_cycle(env: &Env, level_number: u32) -> Option<OpenCycle> {
    get_persistent(env, &DataKey::OpenCycle(level_number))
}

pub fn set_open_cycle(env: &Env, open: &OpenCycle) {
    set_persistent(env, &DataKey::OpenCycle(open.level_number), open);
}

pub fn clear_open_cycle(env: &Env, level_number: u32) {
    env.storage()
        .persistent()
        .remove(&DataKey::OpenCycle(level_number));
}

pub fn member(env: &Env, user: &Address) -> Result<Member, Error> {
    get_persistent(env, &DataKey::Member(user.clone())).ok_or(Error::MemberNotFound)
}

pub fn save_member(env: &Env, member: &Member) {
    set_persistent(env, &DataKey::Member(member.address.clone()), member);
}

pub fn system_funds(env: &Env) -> SystemFunds {
    env.storage()
        .instance()
        .get(&DataKey::SystemFunds)
        .unwrap_or_default()
}

pub fn save_system_funds(env: &Env, funds: &SystemFunds) {
    env.storage().instance().set(&DataKey::SystemFunds, funds);
}

pub fn jupiter_pool(env: &Env) -> JupiterPool {
    env.storage()
        .instance()
        .get(&DataKey::JupiterPool)
        .unwrap_or(JupiterPool {
            balance: 0,
            total_deposits: 0,
            total_withdrawals: 0,
            interventions: 0,
            day: 0,
            deposits_today: 0,
            withdrawals_today: 0,
        })
}

pub fn save_jupiter_pool(env: &Env, pool: &JupiterPool) {
    env.storage().instance().set(&DataKey::JupiterPool, pool);
}
