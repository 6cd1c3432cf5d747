use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Payment is below the entry fee")]
    InsufficientPayment,
    #[msg("Raffle is not open")]
    RoundNotOpen,
    #[msg("Upkeep not needed")]
    UpkeepNotNeeded,
    #[msg("Request id does not match the outstanding randomness request")]
    UnknownRequest,
    #[msg("Payout to the winner failed")]
    PayoutFailed,
    #[msg("Recipient cannot receive funds")]
    TransferFailed,
    #[msg("Invalid entry fee (must be > 0)")]
    InvalidEntryFee,
    #[msg("Invalid interval (must be > 0)")]
    InvalidInterval,
    #[msg("Too many entries for this round")]
    MaxParticipantsReached,
    #[msg("Too many distinct entrants for this round")]
    MaxEntrantsReached,
    #[msg("Oracle delivered no random words")]
    MissingRandomWords,
    #[msg("Request id is not the next one to issue")]
    InvalidRequestId,
    #[msg("Request has not been fulfilled")]
    RequestNotFulfilled,
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Math overflow")]
    MathOverflow,
    #[msg("Participant index is past the current entries")]
    ParticipantIndexOutOfRange,
    #[msg("Oracle request must ask for exactly one random word")]
    UnsupportedNumWords,
}

impl ErrorCode {
    /// True when `err` was raised from this code.
    pub fn matches(self, err: &anchor_lang::error::Error) -> bool {
        if let anchor_lang::error::Error::AnchorError(anchor_err) = err {
            anchor_err.error_code_number == self as u32 + anchor_lang::error::ERROR_CODE_OFFSET
        } else {
            false
        }
    }
}
