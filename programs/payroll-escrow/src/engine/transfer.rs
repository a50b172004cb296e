use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::AccountMeta;

use super::{instruction_data, invoke_engine};

/// Moves `amount` lamports from an escrow vault into the zero-knowledge
/// transfer engine's pool under `commitment`. The vault signs with its seeds.
pub fn deposit_to_pool<'info>(
    engine: &AccountInfo<'info>,
    vault: &AccountInfo<'info>,
    pool: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    vault_seeds: &[&[u8]],
    amount: u64,
    commitment: [u8; 32],
) -> Result<()> {
    let mut data = instruction_data("deposit_to_pool", 8 + 32);
    data.extend_from_slice(&amount.to_le_bytes());
    data.extend_from_slice(&commitment);

    invoke_engine(
        engine,
        vec![
            AccountMeta::new(*vault.key, true),
            AccountMeta::new(*pool.key, false),
            AccountMeta::new_readonly(*system_program.key, false),
        ],
        &[
            vault.clone(),
            pool.clone(),
            system_program.clone(),
            engine.clone(),
        ],
        data,
        &[vault_seeds],
    )
}
