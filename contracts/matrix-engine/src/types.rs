use matrix_economics::{HealthStatus, Position};
use soroban_sdk::{contracttype, Address, String, Symbol, Vec};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub token: Address,
    pub warning_days: u32,
    pub critical_days: u32,
    pub max_quotas_per_level: u32,
    pub max_cycles_per_trigger: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Level {
    pub level_number: u32,
    pub entry_value: i128,
    pub reward_value: i128,
    pub bonus_value: i128,
    pub cash_balance: i128,
    pub total_cycles: u64,
    pub total_users: u32, // WAITING entries
    pub created_at: u64,
    pub last_cycle_at: Option<u64>,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QuotaStatus {
    Waiting,
    Processing,
    Completed,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QueueEntry {
    pub id: u64,
    pub user: Address,
    pub level_number: u32,
    pub quota_number: u32,
    pub score: i128,
    pub reentries: u32,
    pub status: QuotaStatus,
    pub entered_at: u64,
    pub processed_at: Option<u64>,
    pub cycle_id: Option<u64>,
}

/// Ordering key kept in a level's queue so ranking never has to load entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QueueSlot {
    pub quota_id: u64,
    pub score: i128,
    pub entered_at: u64,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MemberStatus {
    Pending,
    Active,
    Suspended,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Member {
    pub address: Address,
    pub referrer: Option<Address>,
    pub status: MemberStatus,
    pub balance: i128,
    pub total_earned: i128,
    pub total_bonus: i128,
    pub total_deposited: i128,
    pub total_withdrawn: i128,
    pub current_level: u32,
    pub active_referrals: u32,
    pub joined_at: u64,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TxKind {
    Deposit,
    QuotaPurchase,
    CycleReward,
    BonusReferral,
    Withdrawal,
    InternalTransferIn,
    InternalTransferOut,
    JupiterPoolDeposit,
    JupiterPoolWithdrawal,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TxStatus {
    Pending,
    Confirmed,
    Failed,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    pub id: u64,
    pub user: Option<Address>,
    pub kind: TxKind,
    pub amount: i128,
    pub status: TxStatus,
    pub level_number: Option<u32>,
    pub reference: Option<String>,
    pub created_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CycleHistory {
    pub cycle_id: u64,
    pub user: Address,
    pub quota_id: u64,
    pub level_number: u32,
    pub position: Position,
    pub amount: i128,
    pub status: TxStatus,
    pub confirmed_at: u64,
}

/// Marker for a level whose candidates are selected but not yet settled.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OpenCycle {
    pub cycle_id: u64,
    pub level_number: u32,
    pub quota_ids: Vec<u64>,
    pub opened_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CycleSummary {
    pub cycle_id: u64,
    pub level_number: u32,
    pub receiver: Address,
    pub reentry_quota_id: u64,
    pub cash_drawn: i128,
    pub pool_deposit: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JupiterPool {
    pub balance: i128,
    pub total_deposits: i128,
    pub total_withdrawals: i128,
    pub interventions: u32,
    pub day: u64,
    pub deposits_today: i128,
    pub withdrawals_today: i128,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SystemFunds {
    pub reserve: i128,
    pub operational: i128,
    pub profit: i128,
    pub total_in: i128,
    pub total_out: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LevelHealth {
    pub level_number: u32,
    pub days_since_last_cycle: u64,
    pub queue_size: u32,
    pub status: HealthStatus,
    pub estimated_intervention: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PurchaseEligibility {
    pub can_purchase: bool,
    pub reason: Option<Symbol>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PurchaseReceipt {
    pub quota_id: u64,
    pub quota_number: u32,
    pub level_number: u32,
    pub cycles_fired: u32,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    PendingAdmin,
    Config,
    SystemFunds,
    JupiterPool,
    QuotaCounter,
    TxCounter,
    CycleCounter,
    Level(u32),
    Queue(u32),
    OpenCycle(u32),
    Quota(u64),
    UserQuotas(Address, u32),
    Member(Address),
    Transaction(u64),
    Cycle(u64),
}
