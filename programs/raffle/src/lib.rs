use anchor_lang::prelude::*;

pub mod adapters;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod events;
pub mod state;
pub mod utils;
pub mod instructions;

use instructions::*;
use state::{RaffleSnapshot, UpkeepCheck};

#[cfg(feature = "devnet")]
declare_id!("4PhNzNQ7XZAPrFmwcBFMe2ZY8ZaQWos8nJjcsjv1CHyh");

#[cfg(not(feature = "devnet"))]
declare_id!("3wi11KBqF3Qa7JPP6CH4AFrcXbvaYEXMsEr9cmWQy8Zj");

#[program]
pub mod raffle {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>, args: InitializeArgs) -> Result<()> {
        initialize::handler(ctx, args)
    }

    pub fn enter_raffle(ctx: Context<EnterRaffle>, amount: u64) -> Result<()> {
        enter_raffle::handler(ctx, amount)
    }

    /// View: whether `perform_upkeep` would succeed right now.
    pub fn check_upkeep(ctx: Context<CheckUpkeep>) -> Result<UpkeepCheck> {
        check_upkeep::handler(ctx)
    }

    /// Close the round and request randomness. `request_id` must be the next id.
    pub fn perform_upkeep(
        ctx: Context<PerformUpkeep>,
        request_id: u64,
        perform_data: Vec<u8>,
    ) -> Result<()> {
        perform_upkeep::handler(ctx, request_id, perform_data)
    }

    /// Called by the VRF program with the 32-byte randomness.
    pub fn vrf_callback<'info>(
        ctx: Context<'_, '_, 'info, 'info, VrfCallback<'info>>,
        randomness: [u8; 32],
    ) -> Result<()> {
        vrf_callback::handler(ctx, randomness)
    }

    pub fn raffle_snapshot(ctx: Context<RaffleView>) -> Result<RaffleSnapshot> {
        raffle_snapshot::handler(ctx)
    }

    /// Reclaim rent of a fulfilled request record.
    pub fn close_request(ctx: Context<CloseRequest>, request_id: u64) -> Result<()> {
        close_request::handler(ctx, request_id)
    }

    /// Admin-only fulfillment (bypasses VRF oracle). Only available with `devnet` feature.
    #[cfg(feature = "devnet")]
    pub fn mock_fulfill<'info>(
        ctx: Context<'_, '_, 'info, 'info, MockFulfill<'info>>,
        request_id: u64,
        randomness: [u8; 32],
    ) -> Result<()> {
        mock_fulfill::handler(ctx, request_id, randomness)
    }
}
