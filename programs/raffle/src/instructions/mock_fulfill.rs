use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    instructions::vrf_callback::settle,
    state::{Config, PendingRequest, Raffle},
};

/// Remaining accounts: the winner candidates, writable, as for `vrf_callback`.
#[derive(Accounts)]
#[instruction(request_id: u64)]
pub struct MockFulfill<'info> {
    /// Admin-only: test fulfillment without the VRF oracle.
    #[account(constraint = admin.key() == config.admin @ ErrorCode::Unauthorized)]
    pub admin: Signer<'info>,

    #[account(seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(mut, seeds = [SEED_RAFFLE], bump)]
    pub raffle: AccountLoader<'info, Raffle>,

    #[account(
        mut,
        has_one = raffle,
        seeds = [SEED_REQUEST, raffle.key().as_ref(), &request_id.to_le_bytes()],
        bump = request.bump,
    )]
    pub request: Account<'info, PendingRequest>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, MockFulfill<'info>>,
    _request_id: u64,
    randomness: [u8; 32],
) -> Result<()> {
    settle(
        &ctx.accounts.config,
        &ctx.accounts.raffle,
        &mut ctx.accounts.request,
        ctx.remaining_accounts,
        randomness,
    )
}
