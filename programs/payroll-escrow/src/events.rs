use anchor_lang::prelude::*;

use crate::state::EngineKind;

// Payloads never carry a rate, plaintext or encrypted.

#[event]
pub struct Initialized {
    pub admin: Pubkey,
}

#[event]
pub struct Opened {
    pub employer: Pubkey,
    pub employee: Pubkey,
    pub nonce: u64,
}

#[event]
pub struct Deposited {
    /// `None` while privacy mode is on.
    pub amount: Option<u64>,
}

#[event]
pub struct Settled {
    pub accrued: u64,
    pub new_total: u64,
}

#[event]
pub struct RateUpdated {
    pub nonce: u64,
}

#[event]
pub struct PrivatePayout {
    pub nonce: u64,
}

#[event]
pub struct Closed {
    pub refund: u64,
}

/// Emergency close performed by the admin instead of the employer.
#[event]
pub struct ForceClosed {
    pub admin: Pubkey,
    pub refund: u64,
}

#[event]
pub struct PauseSet {
    pub paused: bool,
}

#[event]
pub struct PrivacyModeSet {
    pub enabled: bool,
}

#[event]
pub struct EngineConfigured {
    pub kind: EngineKind,
    pub program_id: Pubkey,
}

/// Principal moved from the escrow vault into the yield vault.
#[event]
pub struct YieldDeposited {
    pub nonce: u64,
    pub amount: Option<u64>,
}

#[event]
pub struct YieldRecalled {
    pub nonce: u64,
    pub amount: Option<u64>,
}

#[event]
pub struct YieldClaimed {
    pub nonce: u64,
    pub amount: Option<u64>,
}
