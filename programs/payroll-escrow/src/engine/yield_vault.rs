use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::AccountMeta;

use super::{instruction_data, invoke_engine, return_data_from};
use crate::errors::EscrowError;

/// Escrow vault's position in the registered yield vault program.
///
/// The vault PDA is the depositor; the engine keys the position by it, so
/// `position` is whatever account the engine keeps that position in.
pub struct YieldPosition<'a, 'info> {
    pub engine: AccountInfo<'info>,
    pub vault: AccountInfo<'info>,
    pub position: AccountInfo<'info>,
    pub vault_seeds: &'a [&'a [u8]],
}

impl<'info> YieldPosition<'_, 'info> {
    /// `deposit(amount)`: moves lamports from the vault into the position.
    pub fn deposit(&self, system_program: &AccountInfo<'info>, amount: u64) -> Result<()> {
        let mut data = instruction_data("deposit", 8);
        data.extend_from_slice(&amount.to_le_bytes());

        invoke_engine(
            &self.engine,
            vec![
                AccountMeta::new(*self.vault.key, true),
                AccountMeta::new(*self.position.key, false),
                AccountMeta::new_readonly(*system_program.key, false),
            ],
            &[
                self.vault.clone(),
                self.position.clone(),
                system_program.clone(),
                self.engine.clone(),
            ],
            data,
            &[self.vault_seeds],
        )
    }

    /// `current_yield()`: earnings on top of the principal, in lamports.
    pub fn current_yield(&self) -> Result<u64> {
        invoke_engine(
            &self.engine,
            vec![
                AccountMeta::new_readonly(*self.vault.key, false),
                AccountMeta::new_readonly(*self.position.key, false),
            ],
            &[
                self.vault.clone(),
                self.position.clone(),
                self.engine.clone(),
            ],
            instruction_data("current_yield", 0),
            &[],
        )?;

        let bytes: [u8; 8] = return_data_from(self.engine.key)
            .as_deref()
            .and_then(|data| data.try_into().ok())
            .ok_or_else(|| error!(EscrowError::EngineMismatch))?;
        Ok(u64::from_le_bytes(bytes))
    }

    /// `withdraw(amount)`: returns principal to `recipient`.
    pub fn withdraw(&self, recipient: &AccountInfo<'info>, amount: u64) -> Result<()> {
        self.pay_out("withdraw", recipient, amount)
    }

    /// `withdraw_yield(amount)`: pays earnings only; the engine refuses to
    /// dip into principal.
    pub fn withdraw_yield(&self, recipient: &AccountInfo<'info>, amount: u64) -> Result<()> {
        self.pay_out("withdraw_yield", recipient, amount)
    }

    fn pay_out(&self, name: &str, recipient: &AccountInfo<'info>, amount: u64) -> Result<()> {
        let mut data = instruction_data(name, 8);
        data.extend_from_slice(&amount.to_le_bytes());

        invoke_engine(
            &self.engine,
            vec![
                AccountMeta::new_readonly(*self.vault.key, true),
                AccountMeta::new(*self.position.key, false),
                AccountMeta::new(*recipient.key, false),
            ],
            &[
                self.vault.clone(),
                self.position.clone(),
                recipient.clone(),
                self.engine.clone(),
            ],
            data,
            &[self.vault_seeds],
        )
    }
}
