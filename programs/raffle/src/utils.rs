use anchor_lang::prelude::*;
use crate::errors::ErrorCode;

pub fn checked_add_u64(a: u64, b: u64) -> Result<u64> {
    a.checked_add(b).ok_or(ErrorCode::MathOverflow.into())
}

/// Split the 32-byte oracle output into little-endian u64 words, at most four.
pub fn random_words(randomness: &[u8; 32], num_words: u32) -> Vec<u64> {
    randomness
        .chunks_exact(8)
        .take(num_words as usize)
        .map(|chunk| {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            u64::from_le_bytes(word)
        })
        .collect()
}

/// Slot of the winning entry. Plain modulo, so counts that don't divide
/// 2^64 are very slightly biased towards low slots.
pub fn winner_index(word: u64, participants_count: u16) -> Result<usize> {
    let index = word
        .checked_rem(participants_count as u64)
        .ok_or(ErrorCode::MathOverflow)?;
    Ok(index as usize)
}

/// Per-request seed for the VRF program, unique per raffle and request id.
pub fn caller_seed(raffle: &Pubkey, request_id: u64) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(raffle.as_ref());
    hasher.update(&request_id.to_le_bytes());
    *hasher.finalize().as_bytes()
}
