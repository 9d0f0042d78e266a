use soroban_sdk::{token, Address, Env};

use crate::errors::{checked_add, checked_sub, Error};
use crate::events;
use crate::ledger::{FundsModule, LedgerModule};
use crate::storage;
use crate::types::{Member, MemberStatus, TxKind};

pub struct MemberModule;

impl MemberModule {
    pub fn register(env: &Env, user: Address, referrer: Option<Address>) -> Result<Member, Error> {
        if storage::member(env, &user).is_ok() {
            return Err(Error::MemberAlreadyRegistered);
        }
        if let Some(r) = &referrer {
            if *r == user {
                return Err(Error::InvalidReferrer);
            }
            storage::member(env, r).map_err(|_| Error::ReferrerNotFound)?;
        }

        let member = Member {
            address: user.clone(),
            referrer: referrer.clone(),
            status: MemberStatus::Pending,
            balance: 0,
            total_earned: 0,
            total_bonus: 0,
            total_deposited: 0,
            total_withdrawn: 0,
            current_level: 0,
            active_referrals: 0,
            joined_at: env.ledger().timestamp(),
        };
        storage::save_member(env, &member);
        events::member_registered(env, &user, &referrer);
        Ok(member)
    }

    /// Moves a member between states, keeping the referrer's active-referral
    /// count in step with transitions into and out of `Active`.
    pub fn set_status(env: &Env, user: &Address, status: MemberStatus) -> Result<Member, Error> {
        let mut member = storage::member(env, user)?;
        let was_active = member.status == MemberStatus::Active;
        let is_active = status == MemberStatus::Active;
        member.status = status;
        storage::save_member(env, &member);

        if was_active != is_active {
            if let Some(referrer) = &member.referrer {
                let mut parent = storage::member(env, referrer)?;
                parent.active_referrals = if is_active {
                    parent.active_referrals.saturating_add(1)
                } else {
                    parent.active_referrals.saturating_sub(1)
                };
                storage::save_member(env, &parent);
            }
        }

        events::member_status(env, user, status);
        Ok(member)
    }

    pub fn deposit(env: &Env, user: &Address, amount: i128) -> Result<Member, Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let mut member = storage::member(env, user)?;
        let config = storage::config(env)?;
        token::Client::new(env, &config.token).transfer(
            user,
            &env.current_contract_address(),
            &amount,
        );

        member.balance = checked_add(member.balance, amount)?;
        member.total_deposited = checked_add(member.total_deposited, amount)?;
        storage::save_member(env, &member);
        FundsModule::track_inflow(env, amount)?;
        LedgerModule::record(env, Some(user.clone()), TxKind::Deposit, amount, None, None);

        if member.status == MemberStatus::Pending {
            member = Self::set_status(env, user, MemberStatus::Active)?;
        }
        Ok(member)
    }

    pub fn withdraw(env: &Env, user: &Address, amount: i128) -> Result<Member, Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let mut member = storage::member(env, user)?;
        Self::debit(&mut member, amount)?;
        member.total_withdrawn = checked_add(member.total_withdrawn, amount)?;
        storage::save_member(env, &member);

        let config = storage::config(env)?;
        token::Client::new(env, &config.token).transfer(
            &env.current_contract_address(),
            user,
            &amount,
        );
        FundsModule::track_outflow(env, amount)?;
        LedgerModule::record(
            env,
            Some(user.clone()),
            TxKind::Withdrawal,
            amount,
            None,
            None,
        );
        Ok(member)
    }

    pub fn transfer(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        if from == to {
            return Err(Error::InvalidRecipient);
        }
        let mut sender = storage::member(env, from)?;
        let mut recipient = storage::member(env, to)?;
        Self::debit(&mut sender, amount)?;
        recipient.balance = checked_add(recipient.balance, amount)?;
        storage::save_member(env, &sender);
        storage::save_member(env, &recipient);

        LedgerModule::record(
            env,
            Some(from.clone()),
            TxKind::InternalTransferOut,
            amount,
            None,
            None,
        );
        LedgerModule::record(
            env,
            Some(to.clone()),
            TxKind::InternalTransferIn,
            amount,
            None,
            None,
        );
        Ok(())
    }

    /// Conditional debit: fails rather than letting a balance go negative.
    pub fn debit(member: &mut Member, amount: i128) -> Result<(), Error> {
        if member.balance < amount {
            return Err(Error::InsufficientBalance);
        }
        member.balance = checked_sub(member.balance, amount)?;
        Ok(())
    }

    pub fn credit_earnings(
        env: &Env,
        user: &Address,
        amount: i128,
        bonus: bool,
    ) -> Result<Member, Error> {
        let mut member = storage::member(env, user)?;
        member.balance = checked_add(member.balance, amount)?;
        if bonus {
            member.total_bonus = checked_add(member.total_bonus, amount)?;
        } else {
            member.total_earned = checked_add(member.total_earned, amount)?;
        }
        storage::save_member(env, &member);
        Ok(member)
    }
}
