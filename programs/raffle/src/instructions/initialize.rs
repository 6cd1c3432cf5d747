use anchor_lang::prelude::*;
use crate::{
    adapters::DEFAULT_QUEUE,
    constants::*,
    errors::ErrorCode,
    events::RaffleInitialized,
    state::{Config, Raffle},
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct InitializeArgs {
    /// Lamports per entry.
    pub entry_fee: u64,
    /// Seconds between draws.
    pub interval: i64,
    /// VRF oracle queue. `Pubkey::default()` picks the MagicBlock default queue.
    pub subscription: Pubkey,
    pub callback_gas_limit: u32,
    pub request_confirmations: u16,
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    pub admin: Signer<'info>,

    #[account(
        init,
        payer = payer,
        space = Config::SPACE,
        seeds = [SEED_CFG],
        bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        init,
        payer = payer,
        space = Raffle::SPACE,
        seeds = [SEED_RAFFLE],
        bump
    )]
    pub raffle: AccountLoader<'info, Raffle>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, args: InitializeArgs) -> Result<()> {
    require!(args.entry_fee > 0, ErrorCode::InvalidEntryFee);
    require!(args.interval > 0, ErrorCode::InvalidInterval);

    let subscription = if args.subscription == Pubkey::default() {
        DEFAULT_QUEUE
    } else {
        args.subscription
    };

    let cfg = &mut ctx.accounts.config;
    cfg.admin = ctx.accounts.admin.key();
    cfg.entry_fee = args.entry_fee;
    cfg.interval = args.interval;
    cfg.subscription = subscription;
    cfg.callback_gas_limit = args.callback_gas_limit;
    cfg.request_confirmations = args.request_confirmations;
    cfg.num_words = NUM_WORDS;
    cfg.bump = ctx.bumps.config;
    cfg.reserved = [0u8; 32];

    let now = Clock::get()?.unix_timestamp;
    let raffle_key = ctx.accounts.raffle.key();
    let mut raffle = ctx.accounts.raffle.load_init()?;
    raffle.initialize(ctx.bumps.raffle, now);

    emit!(RaffleInitialized {
        raffle: raffle_key,
        entry_fee: args.entry_fee,
        interval: args.interval,
        subscription,
        start_ts: now,
    });

    Ok(())
}
