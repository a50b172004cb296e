use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::AccountMeta;

use super::{instruction_data, invoke_engine, push_bytes, return_data_from};
use crate::confidential::{Ciphertext, ConfidentialCompute};
use crate::errors::EscrowError;

/// [`ConfidentialCompute`] backed by the registered compute engine program.
///
/// Each call is a synchronous CPI signed by the escrow record's PDA; the
/// result comes back as return data. Any failure along the way surfaces as
/// `ConfidentialComputeFailure`.
pub struct CpiComputeEngine<'a, 'info> {
    program: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    signer_seeds: &'a [&'a [u8]],
}

impl<'a, 'info> CpiComputeEngine<'a, 'info> {
    pub fn new(
        program: AccountInfo<'info>,
        authority: AccountInfo<'info>,
        signer_seeds: &'a [&'a [u8]],
    ) -> Self {
        Self {
            program,
            authority,
            signer_seeds,
        }
    }

    fn call(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        invoke_engine(
            &self.program,
            vec![AccountMeta::new_readonly(*self.authority.key, true)],
            &[self.authority.clone(), self.program.clone()],
            data,
            &[self.signer_seeds],
        )
        .map_err(|_| error!(EscrowError::ConfidentialComputeFailure))?;

        return_data_from(self.program.key)
            .filter(|data| !data.is_empty())
            .ok_or_else(|| error!(EscrowError::ConfidentialComputeFailure))
    }
}

impl ConfidentialCompute for CpiComputeEngine<'_, '_> {
    fn homomorphic_multiply(&mut self, rate: &Ciphertext, scalar: u64) -> Result<Ciphertext> {
        let mut data = instruction_data("homomorphic_multiply", 4 + rate.len() + 8);
        push_bytes(&mut data, rate.as_bytes());
        data.extend_from_slice(&scalar.to_le_bytes());
        Ok(Ciphertext::from_engine(self.call(data)?))
    }

    fn decrypt(&mut self, value: &Ciphertext) -> Result<u128> {
        let mut data = instruction_data("decrypt", 4 + value.len());
        push_bytes(&mut data, value.as_bytes());
        let plain: [u8; 16] = self
            .call(data)?
            .as_slice()
            .try_into()
            .map_err(|_| error!(EscrowError::ConfidentialComputeFailure))?;
        Ok(u128::from_le_bytes(plain))
    }
}
