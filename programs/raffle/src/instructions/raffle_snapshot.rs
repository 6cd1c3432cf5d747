use anchor_lang::prelude::*;
use crate::{
    adapters::RaffleLedger,
    constants::*,
    engine::Ledger,
    state::{Config, Raffle, RaffleSnapshot},
};

#[derive(Accounts)]
pub struct RaffleView<'info> {
    #[account(seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(seeds = [SEED_RAFFLE], bump)]
    pub raffle: AccountLoader<'info, Raffle>,
}

pub fn handler(ctx: Context<RaffleView>) -> Result<RaffleSnapshot> {
    let pot = RaffleLedger::read_only(ctx.accounts.raffle.to_account_info()).balance()?;
    let raffle = ctx.accounts.raffle.load()?;
    Ok(RaffleSnapshot::capture(&raffle, &ctx.accounts.config, pot))
}
