use anchor_lang::prelude::*;
use crate::{
    adapters::RaffleLedger,
    constants::*,
    state::{Config, Raffle},
};

#[derive(Accounts)]
pub struct EnterRaffle<'info> {
    #[account(mut)]
    pub player: Signer<'info>,

    #[account(seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(mut, seeds = [SEED_RAFFLE], bump)]
    pub raffle: AccountLoader<'info, Raffle>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<EnterRaffle>, amount: u64) -> Result<()> {
    let cfg = &ctx.accounts.config;
    let player = ctx.accounts.player.key();

    let mut ledger = RaffleLedger::for_entry(
        ctx.accounts.raffle.to_account_info(),
        ctx.accounts.player.to_account_info(),
        ctx.accounts.system_program.to_account_info(),
    );

    let entered = {
        let mut raffle = ctx.accounts.raffle.load_mut()?;
        raffle.enter(cfg, player, amount, &mut ledger)?
    };
    ledger.commit()?;

    emit!(entered);

    Ok(())
}
