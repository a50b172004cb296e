#![allow(unexpected_cfgs, deprecated)]
use anchor_lang::prelude::*;

declare_id!("7Yq3hLkVfCM4ShXz9q8C6rDdcrXgbnRFBAmtjVgbYe6W");

pub mod access;
pub mod confidential;
pub mod engine;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

use instructions::*;
pub use state::*;

#[program]
pub mod payroll_escrow {
    use super::*;

    /// Create the admin singleton and index allocator
    ///
    /// # Arguments
    /// * `compute_engine` - Program id of the confidential-computation engine
    pub fn initialize(ctx: Context<Initialize>, compute_engine: Pubkey) -> Result<()> {
        instructions::initialize::initialize(ctx, compute_engine)
    }

    /// Open a salary escrow between the signing employer and an employee
    ///
    /// The record address must be derived from the allocator's next index;
    /// clients read `IndexAllocator::next_index` and call
    /// `EscrowRecord::address` before submitting.
    ///
    /// # Arguments
    /// * `encrypted_rate` - Salary per second, encrypted client-side
    pub fn open(ctx: Context<Open>, encrypted_rate: Vec<u8>) -> Result<()> {
        instructions::open::open(ctx, encrypted_rate)
    }

    /// Fund the escrow vault
    ///
    /// # Arguments
    /// * `amount` - Lamports to move from the employer into the vault
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::deposit(ctx, amount)
    }

    /// Pay the employee everything accrued since the last settlement
    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        instructions::withdraw::withdraw(ctx)
    }

    /// Settle like `withdraw`, routing the payout through the private
    /// transfer pool
    ///
    /// # Arguments
    /// * `commitment` - Note commitment the employee later redeems
    pub fn withdraw_private(ctx: Context<WithdrawPrivate>, commitment: [u8; 32]) -> Result<()> {
        instructions::withdraw_private::withdraw_private(ctx, commitment)
    }

    /// Settle at the old rate, then install a new encrypted rate
    ///
    /// # Arguments
    /// * `new_encrypted_rate` - New salary per second, encrypted client-side
    pub fn update_rate(ctx: Context<UpdateRate>, new_encrypted_rate: Vec<u8>) -> Result<()> {
        instructions::update_rate::update_rate(ctx, new_encrypted_rate)
    }

    /// Final settlement, refund the employer and close the record
    pub fn close(ctx: Context<Close>) -> Result<()> {
        instructions::close::close(ctx)
    }

    /// Admin emergency close, ignores the pause switch
    pub fn force_close(ctx: Context<ForceClose>) -> Result<()> {
        instructions::force_close::force_close(ctx)
    }

    pub fn pause(ctx: Context<SetPaused>) -> Result<()> {
        instructions::set_paused::pause(ctx)
    }

    pub fn unpause(ctx: Context<SetPaused>) -> Result<()> {
        instructions::set_paused::unpause(ctx)
    }

    /// Hide or reveal deposit amounts in events
    pub fn set_privacy_mode(ctx: Context<Configure>, enabled: bool) -> Result<()> {
        instructions::configure::set_privacy_mode(ctx, enabled)
    }

    /// Register the program id of an external engine
    ///
    /// # Arguments
    /// * `kind` - `Compute`, `Transfer` or `Vault`
    /// * `program_id` - Engine program id
    pub fn configure_engine(
        ctx: Context<Configure>,
        kind: EngineKind,
        program_id: Pubkey,
    ) -> Result<()> {
        instructions::configure::configure_engine(ctx, kind, program_id)
    }

    /// Park escrowed lamports in the yield vault
    ///
    /// # Arguments
    /// * `amount` - Lamports to move out of the escrow vault
    pub fn deposit_to_yield(ctx: Context<DepositToYield>, amount: u64) -> Result<()> {
        instructions::deposit_to_yield::deposit_to_yield(ctx, amount)
    }

    /// Return parked principal to the escrow vault
    ///
    /// # Arguments
    /// * `amount` - Lamports of principal to recall
    pub fn recall_from_yield(ctx: Context<RecallFromYield>, amount: u64) -> Result<()> {
        instructions::recall_from_yield::recall_from_yield(ctx, amount)
    }

    /// Pay the employer the yield earned on parked principal
    pub fn claim_yield(ctx: Context<ClaimYield>) -> Result<()> {
        instructions::claim_yield::claim_yield(ctx)
    }
}
