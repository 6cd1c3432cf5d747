use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::system_program;
use anchor_lang::Discriminator;
use ephemeral_vrf_sdk::instructions::{create_request_randomness_ix, RequestRandomnessParams};
use ephemeral_vrf_sdk::types::SerializableAccountMeta;

use crate::{
    constants::*,
    engine::{Ledger, RandomnessOracle, RandomnessRequest},
    errors::ErrorCode,
    utils::{caller_seed, checked_add_u64},
};

// MagicBlock VRF program constants
const VRF_PROGRAM_ID_BYTES: [u8; 32] = ephemeral_vrf_sdk::consts::VRF_PROGRAM_ID.to_bytes();
const DEFAULT_QUEUE_BYTES: [u8; 32] = ephemeral_vrf_sdk::consts::DEFAULT_QUEUE.to_bytes();
/// Only the VRF program can sign as this address.
const VRF_PROGRAM_IDENTITY_BYTES: [u8; 32] =
    ephemeral_vrf_sdk::consts::VRF_PROGRAM_IDENTITY.to_bytes();

pub static VRF_PROGRAM_ID: Pubkey = Pubkey::new_from_array(VRF_PROGRAM_ID_BYTES);
pub static DEFAULT_QUEUE: Pubkey = Pubkey::new_from_array(DEFAULT_QUEUE_BYTES);
pub static VRF_PROGRAM_IDENTITY: Pubkey = Pubkey::new_from_array(VRF_PROGRAM_IDENTITY_BYTES);

/// Convert an anchor Pubkey to the SDK's Pubkey (same 32 bytes, different crate).
fn to_sdk_pubkey(p: &Pubkey) -> ephemeral_vrf_sdk::Pubkey {
    ephemeral_vrf_sdk::Pubkey::new_from_array(p.to_bytes())
}

/// Pot held as lamports on the raffle account.
///
/// Deposits are staged while the raffle data is borrowed by the engine and
/// sent with [`RaffleLedger::commit`] afterwards: the system transfer CPI
/// needs the raffle account unborrowed. The transaction reverts as a whole if
/// the transfer fails, so staging does not weaken atomicity.
pub struct RaffleLedger<'a, 'info> {
    raffle: AccountInfo<'info>,
    payer: Option<AccountInfo<'info>>,
    system_program: Option<AccountInfo<'info>>,
    recipients: &'a [AccountInfo<'info>],
    staged: u64,
}

impl<'a, 'info> RaffleLedger<'a, 'info> {
    /// Ledger for an entry paid by `payer`.
    pub fn for_entry(
        raffle: AccountInfo<'info>,
        payer: AccountInfo<'info>,
        system_program: AccountInfo<'info>,
    ) -> Self {
        Self {
            raffle,
            payer: Some(payer),
            system_program: Some(system_program),
            recipients: &[],
            staged: 0,
        }
    }

    /// Ledger for a payout to one of `recipients`.
    pub fn for_payout(raffle: AccountInfo<'info>, recipients: &'a [AccountInfo<'info>]) -> Self {
        Self {
            raffle,
            payer: None,
            system_program: None,
            recipients,
            staged: 0,
        }
    }

    /// Read-only ledger for views.
    pub fn read_only(raffle: AccountInfo<'info>) -> Self {
        Self::for_payout(raffle, &[])
    }

    /// Send staged deposits from the payer into the raffle account.
    pub fn commit(&mut self) -> Result<()> {
        if self.staged == 0 {
            return Ok(());
        }
        let (Some(payer), Some(system_program)) = (&self.payer, &self.system_program) else {
            return err!(ErrorCode::TransferFailed);
        };

        system_program::transfer(
            CpiContext::new(
                system_program.clone(),
                system_program::Transfer {
                    from: payer.clone(),
                    to: self.raffle.clone(),
                },
            ),
            self.staged,
        )?;
        self.staged = 0;
        Ok(())
    }

    fn rent_reserve(&self) -> Result<u64> {
        Ok(Rent::get()?.minimum_balance(self.raffle.data_len()))
    }
}

impl Ledger for RaffleLedger<'_, '_> {
    fn deposit(&mut self, amount: u64) -> Result<()> {
        require!(self.payer.is_some(), ErrorCode::TransferFailed);
        self.staged = checked_add_u64(self.staged, amount)?;
        Ok(())
    }

    fn balance(&self) -> Result<u64> {
        let held = self.raffle.lamports().saturating_sub(self.rent_reserve()?);
        checked_add_u64(held, self.staged)
    }

    fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        let recipient = self
            .recipients
            .iter()
            .find(|info| info.key == to)
            .ok_or(ErrorCode::TransferFailed)?;
        require!(
            recipient.is_writable && !recipient.executable,
            ErrorCode::TransferFailed
        );

        // The runtime rejects the whole transaction afterwards if the
        // recipient ends up below its own rent-exempt minimum.
        let credited = checked_add_u64(recipient.lamports(), amount)?;
        let recipient_reserve = Rent::get()?.minimum_balance(recipient.data_len());
        require!(credited >= recipient_reserve, ErrorCode::TransferFailed);

        let remaining = self
            .raffle
            .lamports()
            .checked_sub(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        require!(remaining >= self.rent_reserve()?, ErrorCode::TransferFailed);

        **self.raffle.try_borrow_mut_lamports()? = remaining;
        **recipient.try_borrow_mut_lamports()? = credited;
        Ok(())
    }
}

/// MagicBlock ephemeral VRF, requested by CPI signed with the program
/// identity PDA. The oracle calls back into `vrf_callback` with the raffle,
/// the request record and every distinct entrant as writable accounts.
pub struct VrfOracle<'info> {
    pub payer: AccountInfo<'info>,
    pub program_identity: AccountInfo<'info>,
    pub oracle_queue: AccountInfo<'info>,
    pub slot_hashes: AccountInfo<'info>,
    pub system_program: AccountInfo<'info>,
    pub identity_bump: u8,
    pub config: Pubkey,
    pub raffle: Pubkey,
    pub request: Pubkey,
    pub request_id: u64,
    pub entrants: Vec<Pubkey>,
}

/// Accounts the VRF program passes to `vrf_callback`, after its identity
/// signer: config (read-only), raffle, request, then each entrant (writable).
fn callback_metas(
    config: &Pubkey,
    raffle: &Pubkey,
    request: &Pubkey,
    entrants: &[Pubkey],
) -> Vec<SerializableAccountMeta> {
    let mut metas = Vec::with_capacity(3 + entrants.len());
    metas.push(SerializableAccountMeta {
        pubkey: to_sdk_pubkey(config),
        is_signer: false,
        is_writable: false,
    });
    for key in [raffle, request].into_iter().chain(entrants) {
        metas.push(SerializableAccountMeta {
            pubkey: to_sdk_pubkey(key),
            is_signer: false,
            is_writable: true,
        });
    }
    metas
}

impl RandomnessOracle for VrfOracle<'_> {
    fn request(&mut self, request: &RandomnessRequest) -> Result<u64> {
        require!(
            self.oracle_queue.key() == request.subscription,
            ErrorCode::Unauthorized
        );
        require!(request.num_words == NUM_WORDS, ErrorCode::UnsupportedNumWords);
        // The VRF program has no gas or confirmation knobs; logged for the keeper.
        msg!(
            "VRF request {}: queue={} gas_limit={} confirmations={}",
            self.request_id,
            request.subscription,
            request.callback_gas_limit,
            request.request_confirmations
        );

        let sdk_ix = create_request_randomness_ix(RequestRandomnessParams {
            payer: to_sdk_pubkey(&self.payer.key()),
            oracle_queue: to_sdk_pubkey(&self.oracle_queue.key()),
            callback_program_id: to_sdk_pubkey(&crate::ID),
            callback_discriminator: crate::instruction::VrfCallback::DISCRIMINATOR.to_vec(),
            caller_seed: caller_seed(&self.raffle, self.request_id),
            accounts_metas: Some(callback_metas(
                &self.config,
                &self.raffle,
                &self.request,
                &self.entrants,
            )),
            ..Default::default()
        });

        // SDK types -> anchor's solana_program types.
        let ix = Instruction {
            program_id: Pubkey::new_from_array(sdk_ix.program_id.to_bytes()),
            accounts: sdk_ix
                .accounts
                .iter()
                .map(|a| {
                    let pubkey = Pubkey::new_from_array(a.pubkey.to_bytes());
                    if a.is_writable {
                        AccountMeta::new(pubkey, a.is_signer)
                    } else {
                        AccountMeta::new_readonly(pubkey, a.is_signer)
                    }
                })
                .collect(),
            data: sdk_ix.data,
        };

        anchor_lang::solana_program::program::invoke_signed(
            &ix,
            &[
                self.payer.clone(),
                self.program_identity.clone(),
                self.oracle_queue.clone(),
                self.slot_hashes.clone(),
                self.system_program.clone(),
            ],
            &[&[SEED_IDENTITY, &[self.identity_bump]]],
        )?;

        Ok(self.request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn assert_error<T: std::fmt::Debug>(result: Result<T>, expected: ErrorCode) {
        match result {
            Err(err) => assert!(expected.matches(&err), "unexpected error: {:?}", err),
            Ok(value) => panic!("expected error, got {:?}", value),
        }
    }

    /// Backing storage for a hand-built `AccountInfo`.
    struct TestAccount {
        key: Pubkey,
        owner: Pubkey,
        lamports: u64,
        data: Vec<u8>,
    }

    impl TestAccount {
        fn new(n: u8, lamports: u64) -> Self {
            Self {
                key: key(n),
                owner: Pubkey::default(),
                lamports,
                data: Vec::new(),
            }
        }

        fn info(&mut self, is_writable: bool, executable: bool) -> AccountInfo<'_> {
            AccountInfo::new(
                &self.key,
                false,
                is_writable,
                &mut self.lamports,
                &mut self.data,
                &self.owner,
                executable,
                0,
            )
        }
    }

    #[test]
    fn callback_metas_list_config_raffle_request_then_entrants() {
        let entrants = [key(10), key(11), key(12)];
        let metas = callback_metas(&key(1), &key(2), &key(3), &entrants);

        let keys: Vec<Pubkey> = metas
            .iter()
            .map(|m| Pubkey::new_from_array(m.pubkey.to_bytes()))
            .collect();
        assert_eq!(keys, vec![key(1), key(2), key(3), key(10), key(11), key(12)]);

        assert!(!metas[0].is_writable);
        assert!(metas[1..].iter().all(|m| m.is_writable));
        assert!(metas.iter().all(|m| !m.is_signer));
    }

    #[test]
    fn callback_metas_without_entrants() {
        let metas = callback_metas(&key(1), &key(2), &key(3), &[]);
        assert_eq!(metas.len(), 3);
    }

    #[test]
    fn payout_to_missing_recipient_fails() {
        let mut raffle = TestAccount::new(1, 5_000_000);
        let mut other = TestAccount::new(2, 1_000_000);
        let raffle_info = raffle.info(true, false);
        let recipients = [other.info(true, false)];
        let mut ledger = RaffleLedger::for_payout(raffle_info.clone(), &recipients);

        assert_error(ledger.transfer(&key(9), 100), ErrorCode::TransferFailed);
        assert_eq!(raffle_info.lamports(), 5_000_000);
        assert_eq!(recipients[0].lamports(), 1_000_000);
    }

    #[test]
    fn payout_to_read_only_recipient_fails() {
        let mut raffle = TestAccount::new(1, 5_000_000);
        let mut winner = TestAccount::new(2, 1_000_000);
        let raffle_info = raffle.info(true, false);
        let recipients = [winner.info(false, false)];
        let mut ledger = RaffleLedger::for_payout(raffle_info.clone(), &recipients);

        assert_error(ledger.transfer(&key(2), 100), ErrorCode::TransferFailed);
        assert_eq!(raffle_info.lamports(), 5_000_000);
        assert_eq!(recipients[0].lamports(), 1_000_000);
    }

    #[test]
    fn payout_to_executable_recipient_fails() {
        let mut raffle = TestAccount::new(1, 5_000_000);
        let mut program = TestAccount::new(2, 1_000_000);
        let raffle_info = raffle.info(true, false);
        let recipients = [program.info(true, true)];
        let mut ledger = RaffleLedger::for_payout(raffle_info.clone(), &recipients);

        assert_error(ledger.transfer(&key(2), 100), ErrorCode::TransferFailed);
        assert_eq!(raffle_info.lamports(), 5_000_000);
    }

    #[test]
    fn deposit_needs_a_payer() {
        let mut raffle = TestAccount::new(1, 5_000_000);
        let mut ledger = RaffleLedger::read_only(raffle.info(true, false));

        assert_error(ledger.deposit(100), ErrorCode::TransferFailed);
        assert_eq!(ledger.staged, 0);
        // Nothing staged, nothing to send.
        ledger.commit().unwrap();
    }

    #[test]
    fn deposits_are_staged_until_commit() {
        let mut raffle = TestAccount::new(1, 5_000_000);
        let mut player = TestAccount::new(2, 1_000_000);
        let mut system = TestAccount::new(3, 1);
        let mut ledger = RaffleLedger::for_entry(
            raffle.info(true, false),
            player.info(true, false),
            system.info(false, true),
        );

        ledger.deposit(100).unwrap();
        ledger.deposit(50).unwrap();
        assert_eq!(ledger.staged, 150);
        assert_error(ledger.deposit(u64::MAX), ErrorCode::MathOverflow);
        assert_eq!(ledger.staged, 150);
    }

    #[test]
    fn oracle_rejects_foreign_queue_and_word_count() {
        let mut payer = TestAccount::new(1, 1_000_000);
        let mut identity = TestAccount::new(2, 0);
        let mut queue = TestAccount::new(3, 0);
        let mut slot_hashes = TestAccount::new(4, 0);
        let mut system = TestAccount::new(5, 1);
        let mut oracle = VrfOracle {
            payer: payer.info(true, false),
            program_identity: identity.info(false, false),
            oracle_queue: queue.info(true, false),
            slot_hashes: slot_hashes.info(false, false),
            system_program: system.info(false, true),
            identity_bump: 255,
            config: key(6),
            raffle: key(7),
            request: key(8),
            request_id: 1,
            entrants: vec![key(10)],
        };

        let mut request = RandomnessRequest {
            subscription: key(99),
            request_confirmations: 3,
            callback_gas_limit: 500_000,
            num_words: NUM_WORDS,
        };
        assert_error(oracle.request(&request), ErrorCode::Unauthorized);

        request.subscription = key(3);
        request.num_words = 2;
        assert_error(oracle.request(&request), ErrorCode::UnsupportedNumWords);
    }
}
