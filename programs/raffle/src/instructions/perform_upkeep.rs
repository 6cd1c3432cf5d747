use anchor_lang::prelude::*;
use crate::{
    adapters::{RaffleLedger, VrfOracle, VRF_PROGRAM_ID},
    constants::*,
    engine::Ledger,
    errors::ErrorCode,
    state::{Config, PendingRequest, Raffle},
    utils::checked_add_u64,
};

/// Permissionless; the keeper calls it once `check_upkeep` reports true.
#[derive(Accounts)]
#[instruction(request_id: u64)]
pub struct PerformUpkeep<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(mut, seeds = [SEED_RAFFLE], bump)]
    pub raffle: AccountLoader<'info, Raffle>,

    #[account(
        init,
        payer = payer,
        space = PendingRequest::SPACE,
        seeds = [SEED_REQUEST, raffle.key().as_ref(), &request_id.to_le_bytes()],
        bump
    )]
    pub request: Account<'info, PendingRequest>,

    /// CHECK: Our program's identity PDA, used to sign the VRF CPI.
    #[account(seeds = [SEED_IDENTITY], bump)]
    pub program_identity: AccountInfo<'info>,

    /// CHECK: Oracle queue account configured at initialize
    #[account(mut, address = config.subscription @ ErrorCode::Unauthorized)]
    pub oracle_queue: AccountInfo<'info>,

    /// CHECK: MagicBlock VRF program
    #[account(address = VRF_PROGRAM_ID)]
    pub vrf_program: AccountInfo<'info>,

    /// CHECK: SlotHashes sysvar
    #[account(address = anchor_lang::solana_program::sysvar::slot_hashes::ID)]
    pub slot_hashes: AccountInfo<'info>,

    pub system_program: Program<'info, System>,
}

/// `perform_data` is opaque trigger data from the keeper and is not read.
pub fn handler(ctx: Context<PerformUpkeep>, request_id: u64, _perform_data: Vec<u8>) -> Result<()> {
    let cfg = &ctx.accounts.config;
    let now = Clock::get()?.unix_timestamp;
    let raffle_key = ctx.accounts.raffle.key();
    let balance = RaffleLedger::read_only(ctx.accounts.raffle.to_account_info()).balance()?;

    let entrants = {
        let raffle = ctx.accounts.raffle.load()?;
        require!(
            request_id == checked_add_u64(raffle.request_count, 1)?,
            ErrorCode::InvalidRequestId
        );
        raffle.entrants()
    };

    let mut oracle = VrfOracle {
        payer: ctx.accounts.payer.to_account_info(),
        program_identity: ctx.accounts.program_identity.to_account_info(),
        oracle_queue: ctx.accounts.oracle_queue.to_account_info(),
        slot_hashes: ctx.accounts.slot_hashes.to_account_info(),
        system_program: ctx.accounts.system_program.to_account_info(),
        identity_bump: ctx.bumps.program_identity,
        config: cfg.key(),
        raffle: raffle_key,
        request: ctx.accounts.request.key(),
        request_id,
        entrants,
    };

    let requested = {
        let mut raffle = ctx.accounts.raffle.load_mut()?;
        raffle.perform_upkeep(cfg, now, balance, &mut oracle)?
    };

    let request = &mut ctx.accounts.request;
    request.raffle = raffle_key;
    request.request_id = requested.request_id;
    request.round_id = requested.round_id;
    request.requester = ctx.accounts.payer.key();
    request.requested_at = now;
    request.fulfilled = false;
    request.randomness = [0u8; 32];
    request.bump = ctx.bumps.request;

    emit!(requested);

    Ok(())
}
