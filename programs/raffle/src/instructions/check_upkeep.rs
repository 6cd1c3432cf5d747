use anchor_lang::prelude::*;
use crate::{
    adapters::RaffleLedger,
    constants::*,
    engine::Ledger,
    state::{Config, Raffle, UpkeepCheck},
};

/// Read-only; keepers simulate it and read the return data.
#[derive(Accounts)]
pub struct CheckUpkeep<'info> {
    #[account(seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(seeds = [SEED_RAFFLE], bump)]
    pub raffle: AccountLoader<'info, Raffle>,
}

pub fn handler(ctx: Context<CheckUpkeep>) -> Result<UpkeepCheck> {
    let now = Clock::get()?.unix_timestamp;
    let balance = RaffleLedger::read_only(ctx.accounts.raffle.to_account_info()).balance()?;

    let raffle = ctx.accounts.raffle.load()?;
    Ok(raffle.check_upkeep(&ctx.accounts.config, now, balance))
}
