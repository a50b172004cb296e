//! Cross-program calls into the external engines.
//!
//! Every engine entry point is addressed the same way this program's own
//! entry points are: an 8-byte selector, `sha256("global:<name>")[..8]`,
//! followed by little-endian fixed-width integers and length-prefixed byte
//! strings. Calls are signed by a PDA of this program, never by a wallet key;
//! read-only queries are not signed at all.

pub mod compute;
pub mod transfer;
pub mod yield_vault;

pub use compute::*;
pub use transfer::*;
pub use yield_vault::*;

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::{get_return_data, invoke_signed};
use solana_sha256_hasher::hashv;

/// Selector for the entry point called `name`.
pub fn selector(name: &str) -> [u8; 8] {
    let digest = hashv(&[b"global:".as_slice(), name.as_bytes()]).to_bytes();
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// Selector followed by room for the arguments.
fn instruction_data(name: &str, args_len: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(8 + args_len);
    data.extend_from_slice(&selector(name));
    data
}

fn push_bytes(data: &mut Vec<u8>, bytes: &[u8]) {
    data.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    data.extend_from_slice(bytes);
}

fn invoke_engine<'info>(
    program: &AccountInfo<'info>,
    metas: Vec<AccountMeta>,
    infos: &[AccountInfo<'info>],
    data: Vec<u8>,
    signers_seeds: &[&[&[u8]]],
) -> Result<()> {
    let ix = Instruction {
        program_id: *program.key,
        accounts: metas,
        data,
    };
    invoke_signed(&ix, infos, signers_seeds)?;
    Ok(())
}

/// Return data left by the last CPI, only if `program` set it.
fn return_data_from(program: &Pubkey) -> Option<Vec<u8>> {
    match get_return_data() {
        Some((origin, data)) if origin == *program => Some(data),
        _ => None,
    }
}
