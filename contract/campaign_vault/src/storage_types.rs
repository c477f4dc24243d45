use soroban_sdk::{contracterror, contracttype, Address, BytesN};

// Storage keys for instance data (process-wide config, set once)
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Token,
    Treasury,
    FeeBps,
    NextCampaignId,
    CampaignCount,
}

// Storage keys for persistent data
#[derive(Clone)]
#[contracttype]
pub enum PersistentKey {
    Campaign(CampaignId),
}

pub type CampaignId = u64;

// Campaign status. Absence of the record stands in for the "none" state;
// Released and Refunded are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[contracttype]
pub enum CampaignStatus {
    Created,
    Deposited,
    Delivered,
    Released,
    Refunded,
}

// One escrow agreement between an advertiser and a publisher.
#[derive(Clone, Debug, PartialEq, Eq)]
#[contracttype]
pub struct Campaign {
    pub id: CampaignId,
    pub advertiser: Address,
    pub publisher: Option<Address>,
    pub budget: i128,
    pub deadline: u64,
    pub status: CampaignStatus,
    pub metadata_hash: BytesN<32>,
    pub proof_hash: Option<BytesN<32>>,
    pub milestone_count: u32,
    pub delivered_milestones: u32,
    pub released_milestones: u32,
    pub released_amount: i128,
    pub fee_paid: i128,
    pub created_at: u64,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidAddress = 3,
    Unauthorized = 4,
    InvalidStatus = 5,
    InvalidDeadline = 6,
    MilestoneNotDelivered = 7,
    InvalidMilestone = 8,
    InvalidAmount = 9,
    InvalidFee = 10,
    ArithmeticError = 11,
}

// Constants
pub const BASIS_POINTS: i128 = 10_000;
pub const MAX_FEE_BPS: u32 = 10_000;
pub const TTL_INSTANCE: u32 = 17280 * 30; // 30 days
pub const TTL_PERSISTENT: u32 = 17280 * 90; // 90 days
