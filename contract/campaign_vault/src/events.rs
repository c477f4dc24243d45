use soroban_sdk::{contracttype, Address, BytesN, Symbol};

#[contracttype]
#[derive(Clone)]
pub struct CampaignCreatedEvent {
    pub campaign_id: u64,
    pub advertiser: Address,
    pub publisher: Option<Address>,
    pub budget: i128,
    pub deadline: u64,
    pub metadata_hash: BytesN<32>,
    pub milestone_count: u32,
}

#[contracttype]
#[derive(Clone)]
pub struct PublisherAssignedEvent {
    pub campaign_id: u64,
    pub publisher: Address,
}

#[contracttype]
#[derive(Clone)]
pub struct DepositedEvent {
    pub campaign_id: u64,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone)]
pub struct DeliveredEvent {
    pub campaign_id: u64,
    pub proof_hash: BytesN<32>,
    pub milestone_index: u32,
}

#[contracttype]
#[derive(Clone)]
pub struct ReleasedEvent {
    pub campaign_id: u64,
    pub payout: i128,
    pub fee: i128,
}

#[contracttype]
#[derive(Clone)]
pub struct RefundedEvent {
    pub campaign_id: u64,
    pub amount: i128,
}

pub fn emit_campaign_created(env: &soroban_sdk::Env, event: CampaignCreatedEvent) {
    env.events().publish(
        (Symbol::new(env, "campaign_created"),),
        event,
    );
}

pub fn emit_publisher_assigned(env: &soroban_sdk::Env, event: PublisherAssignedEvent) {
    env.events().publish(
        (Symbol::new(env, "publisher_assigned"),),
        event,
    );
}

pub fn emit_deposited(env: &soroban_sdk::Env, event: DepositedEvent) {
    env.events().publish(
        (Symbol::new(env, "deposited"),),
        event,
    );
}

pub fn emit_delivered(env: &soroban_sdk::Env, event: DeliveredEvent) {
    env.events().publish(
        (Symbol::new(env, "delivered"),),
        event,
    );
}

pub fn emit_released(env: &soroban_sdk::Env, event: ReleasedEvent) {
    env.events().publish(
        (Symbol::new(env, "released"),),
        event,
    );
}

pub fn emit_refunded(env: &soroban_sdk::Env, event: RefundedEvent) {
    env.events().publish(
        (Symbol::new(env, "refunded"),),
        event,
    );
}
