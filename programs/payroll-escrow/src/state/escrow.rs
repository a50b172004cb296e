use anchor_lang::prelude::*;

use crate::access::Caller;
use crate::confidential::{accrued_amount, Ciphertext, ConfidentialCompute};
use crate::errors::EscrowError;

/// Escrow Record - one salary stream between an employer and an employee
#[account]
pub struct EscrowRecord {
    /// Funds the escrow and may close it
    pub employer: Pubkey,

    /// The only party that may withdraw
    pub employee: Pubkey,

    /// Salary per second, encrypted
    pub encrypted_rate: Ciphertext,

    /// Timestamp of the last settlement
    pub last_settlement_time: i64,

    /// Cumulative amount ever released to the employee
    pub total_accrued: u64,

    /// Escrowed lamports currently parked in the yield vault
    pub yield_principal: u64,

    /// Vault PDA holding the escrowed lamports
    pub vault_reference: Pubkey,

    /// Allocator index the record address is derived from
    pub derivation_nonce: u64,

    /// PDA bump seed
    pub bump: u8,

    /// Cleared on close
    pub is_active: bool,
}

/// Outcome of one settlement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub accrued: u64,
    pub new_total: u64,
}

/// Outcome of closing a record: the final settlement and what is left for
/// the employer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Closing {
    pub settlement: Settlement,
    pub refund: u64,
}

impl EscrowRecord {
    /// Size calculation for account allocation
    /// Discriminator (8) + Pubkey (32) + Pubkey (32) + Ciphertext (4 + 128)
    /// + i64 (8) + u64 (8) + u64 (8) + Pubkey (32) + u64 (8) + u8 (1) + bool (1)
    pub const LEN: usize = 8 + 32 + 32 + Ciphertext::MAX_SPACE + 8 + 8 + 8 + 32 + 8 + 1 + 1;

    /// PDA seed prefix
    pub const SEED_PREFIX: &'static [u8] = b"escrow";

    /// PDA seed prefix for the vault
    pub const VAULT_SEED_PREFIX: &'static [u8] = b"vault";

    /// Record address for an allocator index. Only the index goes into the
    /// seeds, never the employer or employee.
    pub fn address(nonce: u64) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[Self::SEED_PREFIX, &nonce.to_le_bytes()], &crate::ID)
    }

    /// Checks a caller-supplied record address against the derivation for
    /// `nonce` and returns the bump.
    pub fn verify_address(supplied: &Pubkey, nonce: u64) -> Result<u8> {
        let (expected, bump) = Self::address(nonce);
        require_keys_eq!(*supplied, expected, EscrowError::DerivationMismatch);
        Ok(bump)
    }

    pub fn vault_address(record: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[Self::VAULT_SEED_PREFIX, record.as_ref()], &crate::ID)
    }

    pub fn open(
        employer: Pubkey,
        employee: Pubkey,
        encrypted_rate: Ciphertext,
        vault_reference: Pubkey,
        derivation_nonce: u64,
        bump: u8,
        now: i64,
    ) -> Self {
        Self {
            employer,
            employee,
            encrypted_rate,
            last_settlement_time: now,
            total_accrued: 0,
            yield_principal: 0,
            vault_reference,
            derivation_nonce,
            bump,
            is_active: true,
        }
    }

    pub fn ensure_active(&self) -> Result<()> {
        require!(self.is_active, EscrowError::NotActive);
        Ok(())
    }

    /// Signer check, `has_one = employer`, then liveness.
    pub fn authorize_employer(&self, caller: &Caller) -> Result<()> {
        caller.require_is(&self.employer)?;
        self.ensure_active()
    }

    /// Signer check, `has_one = employee`, then liveness.
    pub fn authorize_employee(&self, caller: &Caller) -> Result<()> {
        caller.require_is(&self.employee)?;
        self.ensure_active()
    }

    /// Validates a deposit against the current vault balance and returns
    /// the balance after it lands.
    pub fn accept_deposit(&self, vault_balance: u64, amount: u64) -> Result<u64> {
        self.ensure_active()?;
        require!(amount > 0, EscrowError::InvalidAmount);
        vault_balance
            .checked_add(amount)
            .ok_or_else(|| error!(EscrowError::Overflow))
    }

    /// Settles everything accrued since the last settlement, paid out of
    /// `available`. No field changes unless the whole computation succeeds.
    pub fn settle<E: ConfidentialCompute + ?Sized>(
        &mut self,
        now: i64,
        available: u64,
        engine: &mut E,
    ) -> Result<Settlement> {
        self.ensure_active()?;
        let elapsed = now
            .checked_sub(self.last_settlement_time)
            .ok_or(EscrowError::Overflow)?;
        require!(elapsed >= 0, EscrowError::ClockRegression);

        let accrued = accrued_amount(engine, &self.encrypted_rate, elapsed as u64)?;
        let new_total = self
            .total_accrued
            .checked_add(accrued)
            .ok_or(EscrowError::Overflow)?;
        require!(accrued <= available, EscrowError::InsufficientVaultBalance);

        self.last_settlement_time = now;
        self.total_accrued = new_total;
        Ok(Settlement { accrued, new_total })
    }

    /// Settles at the old rate, then installs `new_rate`.
    pub fn replace_rate<E: ConfidentialCompute + ?Sized>(
        &mut self,
        now: i64,
        available: u64,
        engine: &mut E,
        new_rate: Ciphertext,
    ) -> Result<Settlement> {
        let settlement = self.settle(now, available, engine)?;
        self.encrypted_rate = new_rate;
        Ok(settlement)
    }

    /// Moves `amount` of the liquid escrow (`available`) into the yield
    /// vault. Returns the principal parked afterwards.
    pub fn park_in_yield(&mut self, available: u64, amount: u64) -> Result<u64> {
        self.ensure_active()?;
        require!(amount > 0, EscrowError::InvalidAmount);
        require!(amount <= available, EscrowError::InsufficientVaultBalance);
        self.yield_principal = self
            .yield_principal
            .checked_add(amount)
            .ok_or(EscrowError::Overflow)?;
        Ok(self.yield_principal)
    }

    /// Brings `amount` of parked principal back into the vault.
    pub fn recall_from_yield(&mut self, amount: u64) -> Result<u64> {
        self.ensure_active()?;
        require!(
            amount > 0 && amount <= self.yield_principal,
            EscrowError::InvalidAmount
        );
        self.yield_principal -= amount;
        Ok(self.yield_principal)
    }

    /// Final settlement followed by deactivation. Everything the employee
    /// is not owed goes back to the employer. Parked principal must be
    /// recalled first.
    pub fn close_out<E: ConfidentialCompute + ?Sized>(
        &mut self,
        now: i64,
        available: u64,
        engine: &mut E,
    ) -> Result<Closing> {
        require!(self.yield_principal == 0, EscrowError::YieldPositionOpen);
        let settlement = self.settle(now, available, engine)?;
        let refund = available
            .checked_sub(settlement.accrued)
            .ok_or(EscrowError::InsufficientVaultBalance)?;
        self.is_active = false;
        Ok(Closing { settlement, refund })
    }
}
