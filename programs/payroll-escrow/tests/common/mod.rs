#![allow(dead_code)]

use std::fmt;

use anchor_lang::prelude::*;
use payroll_escrow::access::Caller;
use payroll_escrow::confidential::{Ciphertext, ConfidentialCompute, RateEncryptor};
use payroll_escrow::errors::EscrowError;
use payroll_escrow::{Closing, EscrowRecord, GlobalAdminState, IndexAllocator, Settlement};

pub const T0: i64 = 1_700_000_000;

/// Additive-mask engine: ciphertext is the little-endian value plus a fixed
/// offset per byte. Enough to keep plaintext out of the record.
#[derive(Default)]
pub struct OffsetEngine {
    pub multiplications: usize,
}

const OFFSET: u8 = 0x3C;

fn seal(bytes: &[u8]) -> Result<Ciphertext> {
    Ciphertext::new(bytes.iter().map(|b| b.wrapping_add(OFFSET)).collect())
}

fn open_sealed(value: &Ciphertext) -> u128 {
    let mut buf = [0u8; 16];
    for (dst, src) in buf.iter_mut().zip(value.as_bytes()) {
        *dst = src.wrapping_sub(OFFSET);
    }
    u128::from_le_bytes(buf)
}

impl RateEncryptor for OffsetEngine {
    fn encrypt(&self, rate_per_second: u64) -> Result<Ciphertext> {
        seal(&rate_per_second.to_le_bytes())
    }
}

impl ConfidentialCompute for OffsetEngine {
    fn homomorphic_multiply(&mut self, rate: &Ciphertext, scalar: u64) -> Result<Ciphertext> {
        self.multiplications += 1;
        let product = open_sealed(rate)
            .checked_mul(u128::from(scalar))
            .ok_or(EscrowError::ConfidentialComputeFailure)?;
        seal(&product.to_le_bytes())
    }

    fn decrypt(&mut self, value: &Ciphertext) -> Result<u128> {
        Ok(open_sealed(value))
    }
}

/// One open stream plus the lamport balances the handlers would move.
pub struct Stream {
    pub address: Pubkey,
    pub record: EscrowRecord,
    pub vault: u64,
    pub paid_to_employee: u64,
    pub refunded_to_employer: u64,
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("address", &self.address)
            .field("nonce", &self.record.derivation_nonce)
            .field("active", &self.record.is_active)
            .field("vault", &self.vault)
            .field("paid_to_employee", &self.paid_to_employee)
            .field("refunded_to_employer", &self.refunded_to_employer)
            .finish()
    }
}

/// Host-side replay of the entry points, in the same check order as the
/// on-chain handlers, with the lamport moves applied to plain counters.
pub struct Payroll {
    pub admin_key: Pubkey,
    pub admin: GlobalAdminState,
    pub allocator: IndexAllocator,
    pub engine: OffsetEngine,
    pub now: i64,
}

impl Payroll {
    pub fn new() -> Self {
        let admin_key = Pubkey::new_unique();
        let mut admin = GlobalAdminState {
            admin: Pubkey::default(),
            is_paused: false,
            privacy_mode: false,
            compute_engine: Pubkey::default(),
            transfer_engine: Pubkey::default(),
            yield_vault: Pubkey::default(),
            bump: 0,
        };
        admin.initialize(admin_key, Pubkey::new_unique(), 254);
        Self {
            admin_key,
            admin,
            allocator: IndexAllocator { next_index: 0, bump: 253 },
            engine: OffsetEngine::default(),
            now: T0,
        }
    }

    pub fn advance(&mut self, seconds: i64) {
        self.now += seconds;
    }

    pub fn open(&mut self, employer: Caller, employee: Pubkey, rate: u64) -> Result<Stream> {
        self.admin.ensure_running()?;
        employer.require_signed()?;
        let encrypted_rate = self.engine.encrypt(rate)?;

        let nonce = self.allocator.allocate()?;
        let (address, _) = EscrowRecord::address(nonce);
        let bump = EscrowRecord::verify_address(&address, nonce)?;
        let (vault, _) = EscrowRecord::vault_address(&address);

        Ok(Stream {
            address,
            record: EscrowRecord::open(
                employer.key,
                employee,
                encrypted_rate,
                vault,
                nonce,
                bump,
                self.now,
            ),
            vault: 0,
            paid_to_employee: 0,
            refunded_to_employer: 0,
        })
    }

    pub fn deposit(&mut self, stream: &mut Stream, employer: Caller, amount: u64) -> Result<()> {
        self.admin.ensure_running()?;
        stream.record.authorize_employer(&employer)?;
        stream.vault = stream.record.accept_deposit(stream.vault, amount)?;
        Ok(())
    }

    pub fn withdraw(&mut self, stream: &mut Stream, employee: Caller) -> Result<Settlement> {
        self.admin.ensure_running()?;
        stream.record.authorize_employee(&employee)?;
        let settlement = stream.record.settle(self.now, stream.vault, &mut self.engine)?;
        stream.vault -= settlement.accrued;
        stream.paid_to_employee += settlement.accrued;
        Ok(settlement)
    }

    pub fn update_rate(
        &mut self,
        stream: &mut Stream,
        employer: Caller,
        new_rate: u64,
    ) -> Result<Settlement> {
        self.admin.ensure_running()?;
        stream.record.authorize_employer(&employer)?;
        let new_rate = self.engine.encrypt(new_rate)?;
        let settlement =
            stream
                .record
                .replace_rate(self.now, stream.vault, &mut self.engine, new_rate)?;
        stream.vault -= settlement.accrued;
        stream.paid_to_employee += settlement.accrued;
        Ok(settlement)
    }

    pub fn close(&mut self, stream: &mut Stream, employer: Caller) -> Result<Closing> {
        self.admin.ensure_running()?;
        stream.record.authorize_employer(&employer)?;
        self.wind_down(stream)
    }

    pub fn force_close(&mut self, stream: &mut Stream, admin: Caller) -> Result<Closing> {
        self.admin.authorize_admin(&admin)?;
        stream.record.ensure_active()?;
        self.wind_down(stream)
    }

    fn wind_down(&mut self, stream: &mut Stream) -> Result<Closing> {
        let closing = stream
            .record
            .close_out(self.now, stream.vault, &mut self.engine)?;
        stream.vault -= closing.settlement.accrued;
        stream.paid_to_employee += closing.settlement.accrued;
        stream.refunded_to_employer += stream.vault;
        stream.vault = 0;
        Ok(closing)
    }

    pub fn pause(&mut self, admin: Caller) -> Result<()> {
        self.admin.pause(&admin)
    }

    pub fn unpause(&mut self, admin: Caller) -> Result<()> {
        self.admin.unpause(&admin)
    }
}
