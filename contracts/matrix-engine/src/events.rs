use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::types::{MemberStatus, TxKind};

pub fn member_registered(env: &Env, user: &Address, referrer: &Option<Address>) {
    env.events().publish(
        (symbol_short!("member"), symbol_short!("joined")),
        (user.clone(), referrer.clone()),
    );
}

pub fn member_status(env: &Env, user: &Address, status: MemberStatus) {
    env.events().publish(
        (symbol_short!("member"), symbol_short!("status")),
        (user.clone(), status),
    );
}

pub fn ledger_entry(env: &Env, tx_id: u64, kind: TxKind, user: &Option<Address>, amount: i128) {
    env.events().publish(
        (symbol_short!("ledger"), kind),
        (tx_id, user.clone(), amount),
    );
}

pub fn quota_enqueued(
    env: &Env,
    quota_id: u64,
    user: &Address,
    level_number: u32,
    quota_number: u32,
) {
    env.events().publish(
        (symbol_short!("quota"), symbol_short!("enqueued")),
        (quota_id, user.clone(), level_number, quota_number),
    );
}

pub fn quota_reentered(env: &Env, quota_id: u64, reentries: u32, score: i128) {
    env.events().publish(
        (symbol_short!("quota"), symbol_short!("reentry")),
        (quota_id, reentries, score),
    );
}

pub fn cycle_fired(env: &Env, level_number: u32, cycle_id: u64, receiver: &Address) {
    env.events().publish(
        (symbol_short!("cycle"), symbol_short!("fired")),
        (level_number, cycle_id, receiver.clone()),
    );
}

pub fn cycle_recovered(env: &Env, level_number: u32, cycle_id: u64, reverted: u32) {
    env.events().publish(
        (symbol_short!("cycle"), symbol_short!("recover")),
        (level_number, cycle_id, reverted),
    );
}

pub fn pool_moved(env: &Env, action: Symbol, level_number: u32, amount: i128) {
    env.events()
        .publish((symbol_short!("pool"), action), (level_number, amount));
}

pub fn config_updated(env: &Env, admin: &Address) {
    env.events()
        .publish((symbol_short!("config"), symbol_short!("updated")), admin.clone());
}
