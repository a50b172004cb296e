//! Confidential rate handling.
//!
//! A salary rate only ever exists on the ledger as an opaque [`Ciphertext`].
//! Turning it into an amount owed is delegated to an external
//! confidential-computation engine through [`ConfidentialCompute`]; the one
//! plaintext the program sees is the decrypted accrual, which is consumed by
//! the settlement arithmetic and never stored.

use std::fmt;

use anchor_lang::prelude::*;

use crate::errors::EscrowError;

/// Encrypted salary-per-second, serialized as a `u32` length prefix followed
/// by the raw bytes. The program never inspects or compares the contents.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Default)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    /// Upper bound on ciphertext size, fixed so record space never changes.
    pub const MAX_LEN: usize = 128;

    /// Serialized footprint of the largest accepted ciphertext.
    pub const MAX_SPACE: usize = 4 + Self::MAX_LEN;

    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        require!(
            !bytes.is_empty() && bytes.len() <= Self::MAX_LEN,
            EscrowError::InvalidCiphertext
        );
        Ok(Self(bytes))
    }

    /// Intermediate engine result. Never stored, so not length-checked.
    pub(crate) fn from_engine(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ciphertext({} bytes)", self.0.len())
    }
}

/// Homomorphic operations the settlement path needs from the compute engine.
///
/// Implementations must fail with [`EscrowError::ConfidentialComputeFailure`]
/// rather than fall back to any cleartext path.
pub trait ConfidentialCompute {
    /// `rate × scalar`, computed without revealing `rate`.
    fn homomorphic_multiply(&mut self, rate: &Ciphertext, scalar: u64) -> Result<Ciphertext>;

    /// Reveals a computed amount. Wider than `u64` so that an accrual too
    /// large for a native amount is detected instead of truncated.
    fn decrypt(&mut self, value: &Ciphertext) -> Result<u128>;
}

/// Client-side encryption of a plaintext rate before it is submitted to
/// `open` or `update_rate`. The program itself never encrypts.
pub trait RateEncryptor {
    fn encrypt(&self, rate_per_second: u64) -> Result<Ciphertext>;
}

/// Amount accrued at `rate` over `elapsed_seconds`.
///
/// Nothing elapsed means nothing owed, so the engine is not consulted.
pub fn accrued_amount<E: ConfidentialCompute + ?Sized>(
    engine: &mut E,
    rate: &Ciphertext,
    elapsed_seconds: u64,
) -> Result<u64> {
    if elapsed_seconds == 0 {
        return Ok(0);
    }
    let product = engine.homomorphic_multiply(rate, elapsed_seconds)?;
    let accrued = engine.decrypt(&product)?;
    u64::try_from(accrued).map_err(|_| error!(EscrowError::Overflow))
}
