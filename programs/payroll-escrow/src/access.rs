use anchor_lang::prelude::*;

use crate::errors::EscrowError;

/// The principal behind an account passed to an entry point, as seen by the
/// access checks: its key and whether it signed the transaction.
#[derive(Clone, Copy, Debug)]
pub struct Caller {
    pub key: Pubkey,
    pub is_signer: bool,
}

impl Caller {
    pub fn signed(key: Pubkey) -> Self {
        Self { key, is_signer: true }
    }

    pub fn unsigned(key: Pubkey) -> Self {
        Self { key, is_signer: false }
    }

    pub fn require_signed(&self) -> Result<()> {
        require!(self.is_signer, EscrowError::InvalidSigner);
        Ok(())
    }

    /// Signed and equal to `expected`.
    pub fn require_is(&self, expected: &Pubkey) -> Result<()> {
        self.require_signed()?;
        require_keys_eq!(self.key, *expected, EscrowError::Unauthorized);
        Ok(())
    }
}

impl<'info> From<&AccountInfo<'info>> for Caller {
    fn from(info: &AccountInfo<'info>) -> Self {
        Self {
            key: *info.key,
            is_signer: info.is_signer,
        }
    }
}
