/// Entry slots per round. One identity may hold many slots.
pub const MAX_PARTICIPANTS: usize = 200;

/// Distinct identities per round. Every entrant is forwarded to the VRF
/// callback as a writable account so the winner can be paid inside it, and
/// the callback transaction has to stay under the packet size limit.
pub const MAX_ENTRANTS: usize = 20;

pub const NUM_WORDS: u32 = 1;

pub const SEED_CFG: &[u8] = b"cfg";
pub const SEED_RAFFLE: &[u8] = b"raffle";
pub const SEED_REQUEST: &[u8] = b"request";
pub const SEED_IDENTITY: &[u8] = b"identity";
