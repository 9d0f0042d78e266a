#![no_std]
use soroban_sdk::{Address, Env, IntoVal, TryFromVal, Val};

/// Errors a contract must be able to raise for the shared admin helpers.
pub trait AdminError {
    fn not_initialized() -> Self;
    fn unauthorized() -> Self;
    fn no_pending_admin() -> Self;
}

pub fn require_admin<K, E>(env: &Env, admin_key: &K, caller: &Address) -> Result<(), E>
where
    K: IntoVal<Env, Val> + TryFromVal<Env, Val> + Clone,
    E: AdminError,
{
    caller.require_auth();
    let stored: Address = env
        .storage()
        .instance()
        .get(admin_key)
        .ok_or_else(E::not_initialized)?;
    if *caller != stored {
        return Err(E::unauthorized());
    }
    Ok(())
}

pub fn propose_admin<K, E>(
    env: &Env,
    admin_key: &K,
    pending_key: &K,
    current_admin: Address,
    new_admin: Address,
) -> Result<(), E>
where
    K: IntoVal<Env, Val> + TryFromVal<Env, Val> + Clone,
    E: AdminError,
{
    require_admin::<K, E>(env, admin_key, &current_admin)?;
    env.storage().instance().set(pending_key, &new_admin);
    Ok(())
}

pub fn accept_admin<K, E>(
    env: &Env,
    admin_key: &K,
    pending_key: &K,
    new_admin: Address,
) -> Result<(), E>
where
    K: IntoVal<Env, Val> + TryFromVal<Env, Val> + Clone,
    E: AdminError,
{
    new_admin.require_auth();
    let pending: Address = env
        .storage()
        .instance()
        .get(pending_key)
        .ok_or_else(E::no_pending_admin)?;
    if new_admin != pending {
        return Err(E::unauthorized());
    }
    env.storage().instance().set(admin_key, &new_admin);
    env.storage().instance().remove(pending_key);
    Ok(())
}
