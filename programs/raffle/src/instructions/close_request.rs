use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    state::{PendingRequest, Raffle},
};

/// Returns the rent of a fulfilled request record to whoever paid for it.
#[derive(Accounts)]
#[instruction(request_id: u64)]
pub struct CloseRequest<'info> {
    #[account(mut)]
    pub requester: Signer<'info>,

    #[account(seeds = [SEED_RAFFLE], bump)]
    pub raffle: AccountLoader<'info, Raffle>,

    #[account(
        mut,
        close = requester,
        has_one = raffle,
        has_one = requester @ ErrorCode::Unauthorized,
        seeds = [SEED_REQUEST, raffle.key().as_ref(), &request_id.to_le_bytes()],
        bump = request.bump,
    )]
    pub request: Account<'info, PendingRequest>,
}

pub fn handler(ctx: Context<CloseRequest>, request_id: u64) -> Result<()> {
    require!(ctx.accounts.request.fulfilled, ErrorCode::RequestNotFulfilled);
    {
        let raffle = ctx.accounts.raffle.load()?;
        require!(
            raffle.pending_request() != Some(request_id),
            ErrorCode::RequestNotFulfilled
        );
    }
    msg!("Closed request {}", request_id);
    Ok(())
}
