use anchor_lang::prelude::*;

use crate::errors::EscrowError;

/// Index Allocator - hands out the nonces escrow addresses are derived from
#[account]
pub struct IndexAllocator {
    /// Next index to hand out; never rewinds
    pub next_index: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl IndexAllocator {
    /// Discriminator (8) + u64 (8) + u8 (1)
    pub const LEN: usize = 8 + 8 + 1;

    /// PDA seed prefix
    pub const SEED_PREFIX: &'static [u8] = b"allocator";

    /// Returns the current index and advances the counter.
    pub fn allocate(&mut self) -> Result<u64> {
        let index = self.next_index;
        self.next_index = index.checked_add(1).ok_or(EscrowError::Overflow)?;
        Ok(index)
    }
}
