use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};
use crate::constants::{MAX_ENTRANTS, MAX_PARTICIPANTS};

/// Entry slots. Wrapped because bytemuck has no Pod impl for arrays this long.
#[derive(Copy, Clone)]
#[repr(C)]
pub struct ParticipantsArray {
    pub data: [[u8; 32]; MAX_PARTICIPANTS],
}

unsafe impl Pod for ParticipantsArray {}
unsafe impl Zeroable for ParticipantsArray {}

#[cfg(feature = "idl-build")]
impl anchor_lang::IdlBuild for ParticipantsArray {
    fn create_type() -> Option<anchor_lang::idl::types::IdlTypeDef> {
        use anchor_lang::idl::types::*;
        Some(IdlTypeDef {
            name: "ParticipantsArray".to_string(),
            docs: vec![],
            serialization: IdlSerialization::Bytemuck,
            repr: Some(IdlRepr::C(IdlReprModifier { packed: false, align: None })),
            generics: vec![],
            ty: IdlTypeDefTy::Struct {
                fields: Some(IdlDefinedFields::Named(vec![IdlField {
                    name: "data".to_string(),
                    docs: vec![],
                    ty: IdlType::Array(
                        Box::new(IdlType::Array(Box::new(IdlType::U8), IdlArrayLen::Value(32))),
                        IdlArrayLen::Value(MAX_PARTICIPANTS),
                    ),
                }])),
            },
        })
    }
    fn insert_types(types: &mut std::collections::BTreeMap<String, anchor_lang::idl::types::IdlTypeDef>) {
        if let Some(ty) = Self::create_type() {
            types.insert("ParticipantsArray".to_string(), ty);
        }
    }
    fn get_full_path() -> String {
        "ParticipantsArray".to_string()
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RafflePhase {
    /// Accepting entries.
    Open = 0,
    /// Randomness requested, waiting for the oracle callback.
    Calculating = 1,
}

#[account]
pub struct Config {
    pub admin: Pubkey,
    /// Lamports per entry.
    pub entry_fee: u64,
    /// Minimum seconds between the last reset and the next draw.
    pub interval: i64,
    /// VRF oracle queue the raffle draws from.
    pub subscription: Pubkey,
    pub callback_gas_limit: u32,
    pub request_confirmations: u16,
    pub num_words: u32,
    pub bump: u8,
    pub reserved: [u8; 32],
}

impl Config {
    pub const SPACE: usize = 8
        + 32
        + 8
        + 8
        + 32
        + 4
        + 2
        + 4
        + 1
        + 32;
}

/// Zero-copy: the participant slots are too large for the BPF stack.
/// Accessed through `AccountLoader<'info, Raffle>` with `.load()` / `.load_mut()`.
///
/// The account also holds the pot: every lamport above its rent-exempt
/// minimum belongs to the current round.
#[account(zero_copy)]
#[repr(C)]
pub struct Raffle {
    pub bump: u8,
    pub phase: u8,
    pub participants_count: u16,
    pub _padding: [u8; 4],

    pub last_close_ts: i64,
    /// 0 while no randomness request is outstanding.
    pub pending_request_id: u64,
    pub request_count: u64,
    pub round_id: u64,

    pub recent_winner: [u8; 32],
    pub participants: ParticipantsArray,
    pub reserved: [u8; 32],
}

impl Raffle {
    pub const SPACE: usize = 8 + core::mem::size_of::<Raffle>();

    /// Unknown phase bytes read as `Calculating`, so corrupt data never
    /// accepts entries.
    pub fn phase(&self) -> RafflePhase {
        match self.phase {
            0 => RafflePhase::Open,
            _ => RafflePhase::Calculating,
        }
    }

    pub fn is_open(&self) -> bool {
        self.phase() == RafflePhase::Open
    }

    pub fn pending_request(&self) -> Option<u64> {
        (self.pending_request_id != 0).then_some(self.pending_request_id)
    }

    /// Entry at `index`, `None` past the current round's entries.
    pub fn participant_pubkey(&self, index: usize) -> Option<Pubkey> {
        self.participants.data[..self.participants_count as usize]
            .get(index)
            .map(|bytes| Pubkey::new_from_array(*bytes))
    }

    /// Entries of the current round in entry order, duplicates included.
    pub fn participants(&self) -> Vec<Pubkey> {
        self.participants.data[..self.participants_count as usize]
            .iter()
            .map(|bytes| Pubkey::new_from_array(*bytes))
            .collect()
    }

    /// Distinct identities of the current round, in order of first entry.
    pub fn entrants(&self) -> Vec<Pubkey> {
        let mut entrants: Vec<Pubkey> = Vec::with_capacity(MAX_ENTRANTS);
        for key in self.participants() {
            if !entrants.contains(&key) {
                entrants.push(key);
            }
        }
        entrants
    }

    pub fn has_entered(&self, participant: &Pubkey) -> bool {
        let bytes = participant.to_bytes();
        self.participants.data[..self.participants_count as usize]
            .iter()
            .any(|slot| *slot == bytes)
    }

    pub fn recent_winner_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.recent_winner)
    }
}

/// One randomness request, kept so the callback can be matched against the
/// raffle's outstanding request id.
///
/// Seeds: `["request", raffle, request_id.to_le_bytes()]`
#[account]
#[derive(Default)]
pub struct PendingRequest {
    pub raffle: Pubkey,
    pub request_id: u64,
    pub round_id: u64,
    /// Paid the rent; gets it back on `close_request`.
    pub requester: Pubkey,
    pub requested_at: i64,
    pub fulfilled: bool,
    pub randomness: [u8; 32],
    pub bump: u8,
}

impl PendingRequest {
    pub const SPACE: usize = 8
        + 32
        + 8 + 8
        + 32
        + 8
        + 1
        + 32
        + 1;
}

/// Result of the eligibility check, returned by the `check_upkeep` view.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpkeepCheck {
    pub upkeep_needed: bool,
    pub is_open: bool,
    pub time_passed: bool,
    pub has_players: bool,
    pub has_balance: bool,
    pub phase: u8,
    pub elapsed: i64,
    pub participants_count: u16,
    pub balance: u64,
}

/// Read-only view of the raffle, returned by the `raffle_snapshot` view.
/// Participant slots are left out to stay under the return data limit; read
/// them from the raffle account.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RaffleSnapshot {
    pub phase: u8,
    pub round_id: u64,
    pub participants_count: u16,
    pub last_close_ts: i64,
    pub pending_request_id: Option<u64>,
    pub recent_winner: Pubkey,
    pub entry_fee: u64,
    pub interval: i64,
    pub pot: u64,
}

impl RaffleSnapshot {
    pub fn capture(raffle: &Raffle, config: &Config, pot: u64) -> Self {
        Self {
            phase: raffle.phase,
            round_id: raffle.round_id,
            participants_count: raffle.participants_count,
            last_close_ts: raffle.last_close_ts,
            pending_request_id: raffle.pending_request(),
            recent_winner: raffle.recent_winner_pubkey(),
            entry_fee: config.entry_fee,
            interval: config.interval,
            pot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    #[test]
    fn entrants_are_distinct_in_first_entry_order() {
        let mut raffle: Box<Raffle> = Box::new(Zeroable::zeroed());
        for (slot, n) in [3u8, 1, 3, 2, 1].iter().enumerate() {
            raffle.participants.data[slot] = key(*n).to_bytes();
        }
        raffle.participants_count = 5;

        assert_eq!(raffle.participants().len(), 5);
        assert_eq!(raffle.entrants(), vec![key(3), key(1), key(2)]);
        assert_eq!(raffle.participant_pubkey(3), Some(key(2)));
        assert!(raffle.has_entered(&key(2)));
        assert!(!raffle.has_entered(&key(4)));
    }

    #[test]
    fn participant_lookup_stops_at_count() {
        let mut raffle: Box<Raffle> = Box::new(Zeroable::zeroed());
        assert_eq!(raffle.participant_pubkey(0), None);
        assert_eq!(raffle.participant_pubkey(5), None);
        assert_eq!(raffle.participant_pubkey(MAX_PARTICIPANTS), None);

        raffle.participants.data[0] = key(1).to_bytes();
        raffle.participants.data[1] = key(2).to_bytes();
        raffle.participants_count = 2;

        assert_eq!(raffle.participant_pubkey(1), Some(key(2)));
        assert_eq!(raffle.participant_pubkey(2), None);
        assert_eq!(raffle.participant_pubkey(usize::MAX), None);
    }

    #[test]
    fn unknown_phase_byte_is_not_open() {
        let mut raffle: Box<Raffle> = Box::new(Zeroable::zeroed());
        assert_eq!(raffle.phase(), RafflePhase::Open);
        assert!(raffle.is_open());

        raffle.phase = 7;
        assert_eq!(raffle.phase(), RafflePhase::Calculating);
        assert!(!raffle.is_open());
    }

    #[test]
    fn snapshot_reports_pending_request_and_config() {
        let mut raffle: Box<Raffle> = Box::new(Zeroable::zeroed());
        raffle.phase = RafflePhase::Calculating as u8;
        raffle.round_id = 4;
        raffle.participants_count = 2;
        raffle.last_close_ts = 500;
        raffle.pending_request_id = 7;
        raffle.recent_winner = key(9).to_bytes();

        let config = Config {
            admin: key(1),
            entry_fee: 100,
            interval: 60,
            subscription: key(2),
            callback_gas_limit: 0,
            request_confirmations: 0,
            num_words: 1,
            bump: 0,
            reserved: [0u8; 32],
        };

        let snapshot = RaffleSnapshot::capture(&raffle, &config, 200);
        assert_eq!(snapshot.phase, RafflePhase::Calculating as u8);
        assert_eq!(snapshot.pending_request_id, Some(7));
        assert_eq!(snapshot.recent_winner, key(9));
        assert_eq!(snapshot.entry_fee, 100);
        assert_eq!(snapshot.interval, 60);
        assert_eq!(snapshot.pot, 200);

        raffle.pending_request_id = 0;
        assert_eq!(RaffleSnapshot::capture(&raffle, &config, 0).pending_request_id, None);
    }
}
