use anchor_lang::prelude::*;

use crate::engine::CpiComputeEngine;
use crate::state::*;

/// Runs a settlement step against `record` with the registered compute
/// engine, the record's PDA signing every engine call.
pub fn with_compute_engine<'info, T>(
    record: &mut Account<'info, EscrowRecord>,
    compute_engine: &AccountInfo<'info>,
    step: impl FnOnce(&mut EscrowRecord, &mut CpiComputeEngine<'_, 'info>) -> Result<T>,
) -> Result<T> {
    let authority = record.to_account_info();
    let nonce = record.derivation_nonce.to_le_bytes();
    let bump = [record.bump];
    let seeds: [&[u8]; 3] = [EscrowRecord::SEED_PREFIX, &nonce, &bump];

    let mut engine = CpiComputeEngine::new(compute_engine.clone(), authority, &seeds);
    step(&mut **record, &mut engine)
}
