//! Round state machine.
//!
//! Everything here is plain Rust over the `Raffle` account data. Value
//! transfer and randomness come in through the [`Ledger`] and
//! [`RandomnessOracle`] traits, so the same transitions run on-chain with the
//! adapters in `adapters.rs` and in tests with in-memory fakes.
//!
//! ```text
//! OPEN --(perform_upkeep, eligible)--> CALCULATING
//! CALCULATING --(fulfill, valid id, payout ok)--> OPEN
//! CALCULATING --(fulfill, payout fails)--> CALCULATING
//! ```

use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    events::{Entered, RandomnessRequested, WinnerPicked},
    state::{Config, Raffle, RafflePhase, UpkeepCheck},
    utils::{checked_add_u64, winner_index},
};

/// Holds the pot of the current round.
pub trait Ledger {
    /// Move `amount` from the entrant into the pot.
    fn deposit(&mut self, amount: u64) -> Result<()>;

    /// Current pot, excluding anything reserved for the account itself.
    fn balance(&self) -> Result<u64>;

    /// Fails with `TransferFailed` when `to` cannot receive funds.
    fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomnessRequest {
    pub subscription: Pubkey,
    pub request_confirmations: u16,
    pub callback_gas_limit: u32,
    pub num_words: u32,
}

/// Issues a request id right away; the random words arrive later through
/// [`Raffle::fulfill`].
pub trait RandomnessOracle {
    fn request(&mut self, request: &RandomnessRequest) -> Result<u64>;
}

impl Raffle {
    pub fn initialize(&mut self, bump: u8, now: i64) {
        self.bump = bump;
        self.phase = RafflePhase::Open as u8;
        self.participants_count = 0;
        self.last_close_ts = now;
        self.pending_request_id = 0;
        self.request_count = 0;
        self.round_id = 1;
    }

    /// Eligibility predicate polled by the keeper. No side effects.
    pub fn check_upkeep(&self, config: &Config, now: i64, balance: u64) -> UpkeepCheck {
        let elapsed = now.saturating_sub(self.last_close_ts);
        let is_open = self.is_open();
        let time_passed = elapsed >= config.interval;
        let has_players = self.participants_count > 0;
        let has_balance = balance > 0;

        UpkeepCheck {
            upkeep_needed: is_open && time_passed && has_players && has_balance,
            is_open,
            time_passed,
            has_players,
            has_balance,
            phase: self.phase,
            elapsed,
            participants_count: self.participants_count,
            balance,
        }
    }

    /// Append one paid entry. Besides the slot cap, a round takes at most
    /// `MAX_ENTRANTS` distinct identities (`MaxEntrantsReached`): each one is
    /// forwarded to the VRF callback so the winner can be paid there.
    pub fn enter<L: Ledger>(
        &mut self,
        config: &Config,
        participant: Pubkey,
        amount: u64,
        ledger: &mut L,
    ) -> Result<Entered> {
        require!(amount >= config.entry_fee, ErrorCode::InsufficientPayment);
        require!(self.is_open(), ErrorCode::RoundNotOpen);

        let slot = self.participants_count as usize;
        require!(slot < MAX_PARTICIPANTS, ErrorCode::MaxParticipantsReached);
        if !self.has_entered(&participant) {
            require!(self.entrants().len() < MAX_ENTRANTS, ErrorCode::MaxEntrantsReached);
        }

        // Nothing below can fail once the deposit went through.
        ledger.deposit(amount)?;
        self.participants.data[slot] = participant.to_bytes();
        self.participants_count += 1;

        Ok(Entered {
            round_id: self.round_id,
            participant,
            amount,
            participants_count: self.participants_count,
        })
    }

    pub fn perform_upkeep<O: RandomnessOracle>(
        &mut self,
        config: &Config,
        now: i64,
        balance: u64,
        oracle: &mut O,
    ) -> Result<RandomnessRequested> {
        let check = self.check_upkeep(config, now, balance);
        if !check.upkeep_needed {
            msg!(
                "Upkeep not needed: balance={} participants={} phase={} elapsed={}",
                check.balance,
                check.participants_count,
                check.phase,
                check.elapsed
            );
            return err!(ErrorCode::UpkeepNotNeeded);
        }

        let request_count = checked_add_u64(self.request_count, 1)?;
        let request_id = oracle.request(&RandomnessRequest {
            subscription: config.subscription,
            request_confirmations: config.request_confirmations,
            callback_gas_limit: config.callback_gas_limit,
            num_words: config.num_words,
        })?;
        require!(request_id != 0, ErrorCode::InvalidRequestId);

        self.phase = RafflePhase::Calculating as u8;
        self.pending_request_id = request_id;
        self.request_count = request_count;

        Ok(RandomnessRequested {
            round_id: self.round_id,
            request_id,
        })
    }

    /// Entry that wins for the given words. Read-only.
    pub fn draw_winner(&self, random_words: &[u64]) -> Result<Pubkey> {
        let word = *random_words.first().ok_or(ErrorCode::MissingRandomWords)?;
        let index = winner_index(word, self.participants_count)?;
        self.participant_pubkey(index)
            .ok_or(ErrorCode::ParticipantIndexOutOfRange.into())
    }

    /// Randomness callback. Pays the whole pot to the drawn entry and opens
    /// the next round. On `PayoutFailed` nothing is reset: the raffle stays
    /// `Calculating` with the same pending request.
    pub fn fulfill<L: Ledger>(
        &mut self,
        request_id: u64,
        random_words: &[u64],
        now: i64,
        ledger: &mut L,
    ) -> Result<WinnerPicked> {
        require!(
            self.pending_request() == Some(request_id),
            ErrorCode::UnknownRequest
        );

        let winner = self.draw_winner(random_words)?;
        let payout = ledger.balance()?;
        let next_round_id = checked_add_u64(self.round_id, 1)?;

        if let Err(err) = ledger.transfer(&winner, payout) {
            msg!("Payout of {} lamports to {} failed: {}", payout, winner, err);
            return err!(ErrorCode::PayoutFailed);
        }

        let round_id = self.round_id;
        for slot in self.participants.data[..self.participants_count as usize].iter_mut() {
            *slot = [0u8; 32];
        }
        self.participants_count = 0;
        self.recent_winner = winner.to_bytes();
        self.last_close_ts = now;
        self.pending_request_id = 0;
        self.phase = RafflePhase::Open as u8;
        self.round_id = next_round_id;

        Ok(WinnerPicked {
            round_id,
            request_id,
            winner,
            payout,
        })
    }
}
