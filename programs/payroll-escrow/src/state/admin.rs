use anchor_lang::prelude::*;

use crate::access::Caller;
use crate::errors::EscrowError;

/// Global Admin State - pause switch, privacy mode and the engine registry
#[account]
pub struct GlobalAdminState {
    /// May pause, unpause, configure and force-close
    pub admin: Pubkey,

    /// Blocks every gated entry point while set
    pub is_paused: bool,

    /// Hides deposit amounts from events while set
    pub privacy_mode: bool,

    /// Confidential-computation engine program
    pub compute_engine: Pubkey,

    /// Zero-knowledge transfer engine program (default = not configured)
    pub transfer_engine: Pubkey,

    /// Yield vault program (default = not configured)
    pub yield_vault: Pubkey,

    /// PDA bump seed
    pub bump: u8,
}

/// External engine roles the program calls into.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineKind {
    Compute,
    Transfer,
    Vault,
}

impl GlobalAdminState {
    /// Discriminator (8) + Pubkey (32) + bool (1) + bool (1)
    /// + Pubkey (32) + Pubkey (32) + Pubkey (32) + u8 (1)
    pub const LEN: usize = 8 + 32 + 1 + 1 + 32 + 32 + 32 + 1;

    /// PDA seed prefix
    pub const SEED_PREFIX: &'static [u8] = b"admin";

    pub fn initialize(&mut self, admin: Pubkey, compute_engine: Pubkey, bump: u8) {
        self.admin = admin;
        self.is_paused = false;
        self.privacy_mode = false;
        self.compute_engine = compute_engine;
        self.transfer_engine = Pubkey::default();
        self.yield_vault = Pubkey::default();
        self.bump = bump;
    }

    pub fn ensure_running(&self) -> Result<()> {
        require!(!self.is_paused, EscrowError::Paused);
        Ok(())
    }

    pub fn authorize_admin(&self, caller: &Caller) -> Result<()> {
        caller.require_is(&self.admin)
    }

    /// `Unauthorized` for anyone but the admin, then `Paused` if already set.
    pub fn pause(&mut self, caller: &Caller) -> Result<()> {
        self.authorize_admin(caller)?;
        self.ensure_running()?;
        self.is_paused = true;
        Ok(())
    }

    pub fn unpause(&mut self, caller: &Caller) -> Result<()> {
        self.authorize_admin(caller)?;
        self.is_paused = false;
        Ok(())
    }

    pub fn engine(&self, kind: EngineKind) -> Pubkey {
        match kind {
            EngineKind::Compute => self.compute_engine,
            EngineKind::Transfer => self.transfer_engine,
            EngineKind::Vault => self.yield_vault,
        }
    }

    pub fn set_engine(&mut self, kind: EngineKind, program_id: Pubkey) {
        match kind {
            EngineKind::Compute => self.compute_engine = program_id,
            EngineKind::Transfer => self.transfer_engine = program_id,
            EngineKind::Vault => self.yield_vault = program_id,
        }
    }

    /// A supplied engine account must be the registered program for `kind`.
    pub fn require_engine(&self, kind: EngineKind, supplied: &Pubkey) -> Result<()> {
        let registered = self.engine(kind);
        require!(
            registered != Pubkey::default() && registered == *supplied,
            EscrowError::EngineMismatch
        );
        Ok(())
    }
}
