#![no_std]


mod events;
mod storage_types;

use events::{
    emit_campaign_created, emit_delivered, emit_deposited, emit_publisher_assigned,
    emit_refunded, emit_released, CampaignCreatedEvent, DeliveredEvent, DepositedEvent,
    PublisherAssignedEvent, RefundedEvent, ReleasedEvent,
};
pub use storage_types::{Campaign, CampaignId, CampaignStatus, Error};
use storage_types::{DataKey, PersistentKey, BASIS_POINTS, MAX_FEE_BPS, TTL_INSTANCE, TTL_PERSISTENT};

use soroban_sdk::{contract, contractimpl, token, Address, BytesN, Env};

#[contract]
pub struct CampaignVault;

#[contractimpl]
impl CampaignVault {
    /// One-time configuration: custody token, fee recipient and fee rate.
    /// No mutation path exists after this call.
    pub fn initialize(env: Env, token: Address, treasury: Address, fee_bps: u32) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Token) {
            return Err(Error::AlreadyInitialized);
        }
        if fee_bps > MAX_FEE_BPS {
            return Err(Error::InvalidFee);
        }

        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::Treasury, &treasury);
        env.storage().instance().set(&DataKey::FeeBps, &fee_bps);
        env.storage().instance().set(&DataKey::NextCampaignId, &1u64);
        env.storage().instance().set(&DataKey::CampaignCount, &0u64);

        extend_instance(&env);
        Ok(())
    }

    /// Create an ordinary (single-milestone) campaign. The caller becomes
    /// the advertiser; the publisher may be bound later via
    /// `assign_publisher` but must be set before `deposit`.
    pub fn create_campaign(
        env: Env,
        advertiser: Address,
        publisher: Option<Address>,
        budget: i128,
        deadline: u64,
        metadata_hash: BytesN<32>,
    ) -> Result<CampaignId, Error> {
        Self::create_campaign_with_milestones(
            env,
            advertiser,
            publisher,
            budget,
            deadline,
            metadata_hash,
            1,
        )
    }

    /// Create a campaign whose budget is released in `milestone_count`
    /// sequential stages.
    pub fn create_campaign_with_milestones(
        env: Env,
        advertiser: Address,
        publisher: Option<Address>,
        budget: i128,
        deadline: u64,
        metadata_hash: BytesN<32>,
        milestone_count: u32,
    ) -> Result<CampaignId, Error> {
        advertiser.require_auth();
        require_initialized(&env)?;

        if deadline <= env.ledger().timestamp() {
            return Err(Error::InvalidDeadline);
        }
        if budget <= 0 {
            return Err(Error::InvalidAmount);
        }
        if milestone_count == 0 {
            return Err(Error::InvalidMilestone);
        }

        let campaign_id: CampaignId = env
            .storage()
            .instance()
            .get(&DataKey::NextCampaignId)
            .ok_or(Error::NotInitialized)?;

        let campaign = Campaign {
            id: campaign_id,
            advertiser: advertiser.clone(),
            publisher: publisher.clone(),
            budget,
            deadline,
            status: CampaignStatus::Created,
            metadata_hash: metadata_hash.clone(),
            proof_hash: None,
            milestone_count,
            delivered_milestones: 0,
            released_milestones: 0,
            released_amount: 0,
            fee_paid: 0,
            created_at: env.ledger().timestamp(),
        };
        store_campaign(&env, &campaign);

        let next_id = campaign_id.checked_add(1).ok_or(Error::ArithmeticError)?;
        env.storage().instance().set(&DataKey::NextCampaignId, &next_id);
        let count: u64 = env
            .storage()
            .instance()
            .get(&DataKey::CampaignCount)
            .unwrap_or(0);
        env.storage().instance().set(&DataKey::CampaignCount, &(count + 1));
        extend_instance(&env);

        emit_campaign_created(
            &env,
            CampaignCreatedEvent {
                campaign_id,
                advertiser,
                publisher,
                budget,
                deadline,
                metadata_hash,
                milestone_count,
            },
        );

        Ok(campaign_id)
    }

    /// Bind the publisher of a campaign created without one. Advertiser
    /// only, pre-deposit only, and immutable once set.
    pub fn assign_publisher(
        env: Env,
        caller: Address,
        campaign_id: CampaignId,
        publisher: Address,
    ) -> Result<(), Error> {
        caller.require_auth();
        let mut campaign = load_campaign(&env, campaign_id)?;

        if caller != campaign.advertiser {
            return Err(Error::Unauthorized);
        }
        if campaign.status != CampaignStatus::Created {
            return Err(Error::InvalidStatus);
        }
        if campaign.publisher.is_some() {
            return Err(Error::InvalidAddress);
        }

        campaign.publisher = Some(publisher.clone());
        store_campaign(&env, &campaign);

        emit_publisher_assigned(&env, PublisherAssignedEvent { campaign_id, publisher });
        Ok(())
    }

    /// Pull the budget from the advertiser into custody. The record is
    /// advanced to `Deposited` before the external pull; a failed pull
    /// reverts the whole invocation.
    pub fn deposit(env: Env, caller: Address, campaign_id: CampaignId) -> Result<(), Error> {
        caller.require_auth();
        let mut campaign = load_campaign(&env, campaign_id)?;

        if caller != campaign.advertiser {
            return Err(Error::Unauthorized);
        }
        if campaign.status != CampaignStatus::Created {
            return Err(Error::InvalidStatus);
        }
        if campaign.publisher.is_none() {
            return Err(Error::InvalidAddress);
        }

        campaign.status = CampaignStatus::Deposited;
        store_campaign(&env, &campaign);

        emit_deposited(
            &env,
            DepositedEvent {
                campaign_id,
                amount: campaign.budget,
            },
        );

        let token_client = token_client(&env)?;
        token_client.transfer_from(
            &env.current_contract_address(),
            &campaign.advertiser,
            &env.current_contract_address(),
            &campaign.budget,
        );
        Ok(())
    }

    /// Record the delivery proof of a single-milestone campaign. Staged
    /// campaigns must use `mark_milestone_delivered`.
    pub fn mark_delivered(
        env: Env,
        caller: Address,
        campaign_id: CampaignId,
        proof_hash: BytesN<32>,
    ) -> Result<(), Error> {
        caller.require_auth();
        let mut campaign = load_campaign(&env, campaign_id)?;

        require_publisher(&caller, &campaign)?;
        if campaign.status != CampaignStatus::Deposited {
            return Err(Error::InvalidStatus);
        }
        if campaign.milestone_count != 1 {
            return Err(Error::InvalidMilestone);
        }

        record_delivery(&env, &mut campaign, proof_hash, 1)
    }

    /// Record the delivery proof of the next milestone. `milestone_index`
    /// must be exactly `delivered_milestones + 1`: no skipping, no
    /// re-marking.
    pub fn mark_milestone_delivered(
        env: Env,
        caller: Address,
        campaign_id: CampaignId,
        proof_hash: BytesN<32>,
        milestone_index: u32,
    ) -> Result<(), Error> {
        caller.require_auth();
        let mut campaign = load_campaign(&env, campaign_id)?;

        require_publisher(&caller, &campaign)?;
        if campaign.status != CampaignStatus::Deposited {
            return Err(Error::InvalidStatus);
        }
        let expected = campaign
            .delivered_milestones
            .checked_add(1)
            .ok_or(Error::ArithmeticError)?;
        if milestone_index != expected {
            return Err(Error::InvalidMilestone);
        }

        record_delivery(&env, &mut campaign, proof_hash, milestone_index)
    }

    /// Pay out a delivered single-milestone campaign (or the next share of
    /// a fully delivered staged one). Advertiser only.
    pub fn release(env: Env, caller: Address, campaign_id: CampaignId) -> Result<(), Error> {
        caller.require_auth();
        let mut campaign = load_campaign(&env, campaign_id)?;

        if caller != campaign.advertiser {
            return Err(Error::Unauthorized);
        }
        if campaign.status != CampaignStatus::Delivered {
            return Err(Error::InvalidStatus);
        }

        apply_release(&env, &mut campaign)
    }

    /// Pay out the next delivered-but-unpaid milestone. Advertiser only.
    pub fn release_milestone(env: Env, caller: Address, campaign_id: CampaignId) -> Result<(), Error> {
        caller.require_auth();
        let mut campaign = load_campaign(&env, campaign_id)?;

        if caller != campaign.advertiser {
            return Err(Error::Unauthorized);
        }
        if campaign.status != CampaignStatus::Deposited
            && campaign.status != CampaignStatus::Delivered
        {
            return Err(Error::InvalidStatus);
        }
        if campaign.released_milestones >= campaign.delivered_milestones {
            return Err(Error::MilestoneNotDelivered);
        }

        apply_release(&env, &mut campaign)
    }

    /// Return the unreleased remainder to the advertiser once the deadline
    /// has passed. Already-paid milestone releases are never reverted; a
    /// never-deposited campaign is refunded as a pure cancellation.
    pub fn refund(env: Env, caller: Address, campaign_id: CampaignId) -> Result<(), Error> {
        caller.require_auth();
        let mut campaign = load_campaign(&env, campaign_id)?;

        if caller != campaign.advertiser {
            return Err(Error::Unauthorized);
        }
        if env.ledger().timestamp() <= campaign.deadline {
            return Err(Error::InvalidDeadline);
        }
        let remaining = match campaign.status {
            // No deposit ever reached custody; nothing to move.
            CampaignStatus::Created => 0,
            CampaignStatus::Deposited | CampaignStatus::Delivered => campaign
                .budget
                .checked_sub(campaign.released_amount)
                .ok_or(Error::ArithmeticError)?,
            CampaignStatus::Released | CampaignStatus::Refunded => {
                return Err(Error::InvalidStatus)
            }
        };

        campaign.status = CampaignStatus::Refunded;
        store_campaign(&env, &campaign);

        emit_refunded(
            &env,
            RefundedEvent {
                campaign_id,
                amount: remaining,
            },
        );

        if remaining > 0 {
            let token_client = token_client(&env)?;
            token_client.transfer(
                &env.current_contract_address(),
                &campaign.advertiser,
                &remaining,
            );
        }
        Ok(())
    }

    /// View functions
    pub fn get_campaign(env: Env, campaign_id: CampaignId) -> Option<Campaign> {
        env.storage()
            .persistent()
            .get(&PersistentKey::Campaign(campaign_id))
    }

    pub fn get_token(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Token)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_treasury(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Treasury)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_fee_bps(env: Env) -> Result<u32, Error> {
        env.storage()
            .instance()
            .get(&DataKey::FeeBps)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_campaign_count(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::CampaignCount)
            .unwrap_or(0)
    }
}

// Helper functions

fn extend_instance(env: &Env) {
    env.storage().instance().extend_ttl(TTL_INSTANCE, TTL_INSTANCE);
}

fn extend_persistent(env: &Env, key: &PersistentKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_PERSISTENT, TTL_PERSISTENT);
}

fn require_initialized(env: &Env) -> Result<(), Error> {
    if !env.storage().instance().has(&DataKey::Token) {
        return Err(Error::NotInitialized);
    }
    Ok(())
}

fn require_publisher(caller: &Address, campaign: &Campaign) -> Result<(), Error> {
    match &campaign.publisher {
        Some(publisher) if publisher == caller => Ok(()),
        _ => Err(Error::Unauthorized),
    }
}

// Unknown ids surface as InvalidStatus: there is no campaign in any state
// the operation could act on.
fn load_campaign(env: &Env, campaign_id: CampaignId) -> Result<Campaign, Error> {
    env.storage()
        .persistent()
        .get(&PersistentKey::Campaign(campaign_id))
        .ok_or(Error::InvalidStatus)
}

fn store_campaign(env: &Env, campaign: &Campaign) {
    let key = PersistentKey::Campaign(campaign.id);
    env.storage().persistent().set(&key, campaign);
    extend_persistent(env, &key);
}

fn token_client(env: &Env) -> Result<token::Client, Error> {
    let token_addr: Address = env
        .storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInitialized)?;
    Ok(token::Client::new(env, &token_addr))
}

fn record_delivery(
    env: &Env,
    campaign: &mut Campaign,
    proof_hash: BytesN<32>,
    milestone_index: u32,
) -> Result<(), Error> {
    campaign.proof_hash = Some(proof_hash.clone());
    campaign.delivered_milestones = milestone_index;
    if campaign.delivered_milestones == campaign.milestone_count {
        campaign.status = CampaignStatus::Delivered;
    }
    store_campaign(env, campaign);

    emit_delivered(
        env,
        DeliveredEvent {
            campaign_id: campaign.id,
            proof_hash,
            milestone_index,
        },
    );
    Ok(())
}

// Remaining-over-remaining share plus marginal fee on the running total:
// the shares sum to the budget exactly and the cumulative fee never drifts
// from floor(released_amount * fee_bps / 10000).
fn apply_release(env: &Env, campaign: &mut Campaign) -> Result<(), Error> {
    let remaining_budget = campaign
        .budget
        .checked_sub(campaign.released_amount)
        .ok_or(Error::ArithmeticError)?;
    let remaining_milestones = campaign
        .milestone_count
        .checked_sub(campaign.released_milestones)
        .ok_or(Error::ArithmeticError)?;
    if remaining_milestones == 0 {
        return Err(Error::InvalidStatus);
    }

    let share = remaining_budget
        .checked_div(remaining_milestones as i128)
        .ok_or(Error::ArithmeticError)?;

    let fee_bps: u32 = env
        .storage()
        .instance()
        .get(&DataKey::FeeBps)
        .ok_or(Error::NotInitialized)?;
    let new_released = campaign
        .released_amount
        .checked_add(share)
        .ok_or(Error::ArithmeticError)?;
    let new_fee_total = new_released
        .checked_mul(fee_bps as i128)
        .ok_or(Error::ArithmeticError)?
        / BASIS_POINTS;
    let fee = new_fee_total
        .checked_sub(campaign.fee_paid)
        .ok_or(Error::ArithmeticError)?;
    let payout = share.checked_sub(fee).ok_or(Error::ArithmeticError)?;

    campaign.released_amount = new_released;
    campaign.fee_paid = new_fee_total;
    campaign.released_milestones += 1;
    if campaign.released_milestones == campaign.milestone_count {
        campaign.status = CampaignStatus::Released;
    }
    store_campaign(env, campaign);

    emit_released(
        env,
        ReleasedEvent {
            campaign_id: campaign.id,
            payout,
            fee,
        },
    );

    let publisher = campaign
        .publisher
        .clone()
        .ok_or(Error::InvalidAddress)?;
    let treasury: Address = env
        .storage()
        .instance()
        .get(&DataKey::Treasury)
        .ok_or(Error::NotInitialized)?;
    let token_client = token_client(env)?;
    if payout > 0 {
        token_client.transfer(&env.current_contract_address(), &publisher, &payout);
    }
    if fee > 0 {
        token_client.transfer(&env.current_contract_address(), &treasury, &fee);
    }
    Ok(())
}
