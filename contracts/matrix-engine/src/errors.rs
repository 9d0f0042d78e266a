use matrix_common_admin::AdminError;
use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    NoPendingAdmin = 4,
    InvalidConfig = 5,

    // not found
    LevelNotFound = 10,
    MemberNotFound = 11,
    QuotaNotFound = 12,
    NoWaitingQuota = 13,
    CycleNotFound = 14,

    // validation
    InvalidLevel = 20,
    InvalidAmount = 21,
    MemberAlreadyRegistered = 22,
    ReferrerNotFound = 23,
    InvalidReferrer = 24,
    MemberNotActive = 25,
    PrerequisiteQuotaMissing = 26,
    QuotaCapExceeded = 27,
    InsufficientBalance = 28,
    InsufficientPoolBalance = 29,
    InterventionNotNeeded = 30,
    CycleNotReady = 31,
    InvalidRecipient = 32,

    // conflict
    CycleInProgress = 40,

    // invariant
    InsufficientCandidates = 50,
    InsufficientLevelCash = 51,
    MathOverflow = 52,
}

impl AdminError for Error {
    fn not_initialized() -> Self {
        Error::NotInitialized
    }

    fn unauthorized() -> Self {
        Error::Unauthorized
    }

    fn no_pending_admin() -> Self {
        Error::NoPendingAdmin
    }
}

pub(crate) fn checked_add(a: i128, b: i128) -> Result<i128, Error> {
    a.checked_add(b).ok_or(Error::MathOverflow)
}

pub(crate) fn checked_sub(a: i128, b: i128) -> Result<i128, Error> {
    a.checked_sub(b).ok_or(Error::MathOverflow)
}
