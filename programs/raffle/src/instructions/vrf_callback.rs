use anchor_lang::prelude::*;
use crate::{
    adapters::{RaffleLedger, VRF_PROGRAM_IDENTITY},
    constants::*,
    engine::Ledger,
    errors::ErrorCode,
    events::PayoutFailed,
    state::{Config, PendingRequest, Raffle},
    utils::random_words,
};

/// Remaining accounts: every distinct entrant of the round, writable, as
/// forwarded by `perform_upkeep`.
#[derive(Accounts)]
pub struct VrfCallback<'info> {
    /// Only the VRF program can sign as its identity PDA.
    #[account(address = VRF_PROGRAM_IDENTITY)]
    pub vrf_program_identity: Signer<'info>,

    #[account(seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(mut, seeds = [SEED_RAFFLE], bump)]
    pub raffle: AccountLoader<'info, Raffle>,

    /// The request id is not an argument of the callback; it is read from
    /// the request account and checked against its own address.
    #[account(
        mut,
        has_one = raffle,
        seeds = [SEED_REQUEST, raffle.key().as_ref(), &request.request_id.to_le_bytes()],
        bump = request.bump,
    )]
    pub request: Account<'info, PendingRequest>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, VrfCallback<'info>>,
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

/// Draw and pay the winner for `request`. Shared with the devnet
/// `mock_fulfill` path.
pub(crate) fn settle<'info>(
    config: &Config,
    raffle_loader: &AccountLoader<'info, Raffle>,
    request: &mut PendingRequest,
    recipients: &[AccountInfo<'info>],
    randomness: [u8; 32],
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let words = random_words(&randomness, config.num_words);
    let mut ledger = RaffleLedger::for_payout(raffle_loader.to_account_info(), recipients);

    let mut raffle = raffle_loader.load_mut()?;
    match raffle.fulfill(request.request_id, &words, now, &mut ledger) {
        Ok(picked) => {
            request.fulfilled = true;
            request.randomness = randomness;
            emit!(picked);
            Ok(())
        }
        Err(err) => {
            if ErrorCode::PayoutFailed.matches(&err) {
                let winner = raffle.draw_winner(&words)?;
                let payout = ledger.balance()?;
                msg!(
                    "Raffle stuck calculating: round {} request {} owes {} lamports to {}",
                    raffle.round_id,
                    request.request_id,
                    payout,
                    winner
                );
                emit!(PayoutFailed {
                    round_id: raffle.round_id,
                    request_id: request.request_id,
                    winner,
                    payout,
                });
            }
            Err(err)
        }
    }
}
