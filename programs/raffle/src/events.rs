use anchor_lang::prelude::*;

#[event]
#[derive(Debug, Clone, PartialEq)]
pub struct RaffleInitialized {
    pub raffle: Pubkey,
    pub entry_fee: u64,
    pub interval: i64,
    pub subscription: Pubkey,
    pub start_ts: i64,
}

#[event]
#[derive(Debug, Clone, PartialEq)]
pub struct Entered {
    pub round_id: u64,
    pub participant: Pubkey,
    pub amount: u64,
    pub participants_count: u16,
}

#[event]
#[derive(Debug, Clone, PartialEq)]
pub struct RandomnessRequested {
    pub round_id: u64,
    pub request_id: u64,
}

#[event]
#[derive(Debug, Clone, PartialEq)]
pub struct WinnerPicked {
    pub round_id: u64,
    pub request_id: u64,
    pub winner: Pubkey,
    pub payout: u64,
}

/// Raffle is stuck in `Calculating` with the pot unpaid until someone
/// intervenes.
#[event]
#[derive(Debug, Clone, PartialEq)]
pub struct PayoutFailed {
    pub round_id: u64,
    pub request_id: u64,
    pub winner: Pubkey,
    pub payout: u64,
}
