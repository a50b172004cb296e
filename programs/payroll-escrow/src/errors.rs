use anchor_lang::prelude::*;

#[error_code]
pub enum EscrowError {
    #[msg("Required signature is missing")]
    InvalidSigner,

    #[msg("Signer does not own this escrow")]
    Unauthorized,

    #[msg("System is paused")]
    Paused,

    #[msg("Escrow storage is already initialized")]
    AlreadyInitialized,

    #[msg("Escrow is closed")]
    NotActive,

    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Numerical overflow")]
    Overflow,

    #[msg("Clock is behind the last settlement")]
    ClockRegression,

    #[msg("Insufficient funds in vault")]
    InsufficientVaultBalance,

    #[msg("Confidential computation failed")]
    ConfidentialComputeFailure,

    #[msg("Escrow address does not match its derivation")]
    DerivationMismatch,

    #[msg("Invalid rate ciphertext")]
    InvalidCiphertext,

    #[msg("External program is not the registered engine")]
    EngineMismatch,

    #[msg("Principal is still parked in the yield vault")]
    YieldPositionOpen,
}
