use anchor_lang::prelude::*;
use crate::access::Caller;
use crate::engine::deposit_to_pool;
use crate::errors::*;
use crate::events::{PrivatePayout, Settled};
use crate::state::*;
use crate::utils::*;

use super::settle::with_compute_engine;

/// Withdraw accrued salary into the zero-knowledge transfer pool
///
/// Same settlement as `withdraw`, but the payout is shielded: lamports move
/// from the vault into the transfer engine's pool under the employee's
/// `commitment` instead of landing in the employee's wallet.
///
/// # Arguments
/// * `commitment` - Pool note commitment chosen by the employee
pub fn withdraw_private(ctx: Context<WithdrawPrivate>, commitment: [u8; 32]) -> Result<()> {
    ctx.accounts.admin_state.ensure_running()?;

    let employee = ctx.accounts.employee.to_account_info();
    ctx.accounts
        .escrow_record
        .authorize_employee(&Caller::from(&employee))?;

    let compute_engine = ctx.accounts.compute_engine.to_account_info();
    let transfer_engine = ctx.accounts.transfer_engine.to_account_info();
    let admin_state = &ctx.accounts.admin_state;
    admin_state.require_engine(EngineKind::Compute, compute_engine.key)?;
    admin_state.require_engine(EngineKind::Transfer, transfer_engine.key)?;

    let vault = ctx.accounts.vault.to_account_info();
    let available = escrowed_balance(&vault, rent_reserve()?);
    let now = Clock::get()?.unix_timestamp;

    let settlement = with_compute_engine(
        &mut ctx.accounts.escrow_record,
        &compute_engine,
        |record, engine| record.settle(now, available, engine),
    )?;

    if settlement.accrued > 0 {
        let record_key = ctx.accounts.escrow_record.key();
        let vault_seeds: &[&[u8]] = &[
            EscrowRecord::VAULT_SEED_PREFIX,
            record_key.as_ref(),
            &[ctx.bumps.vault],
        ];
        let before = vault.lamports();
        deposit_to_pool(
            &transfer_engine,
            &vault,
            &ctx.accounts.pool.to_account_info(),
            &ctx.accounts.system_program.to_account_info(),
            vault_seeds,
            settlement.accrued,
            commitment,
        )?;
        // The pool must take exactly the settled amount
        require!(
            before.checked_sub(vault.lamports()) == Some(settlement.accrued),
            EscrowError::EngineMismatch
        );
    }

    msg!("Escrow {} settled into transfer pool", ctx.accounts.escrow_record.key());

    emit!(Settled {
        accrued: settlement.accrued,
        new_total: settlement.new_total,
    });
    emit!(PrivatePayout {
        nonce: ctx.accounts.escrow_record.derivation_nonce,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct WithdrawPrivate<'info> {
    /// Admin singleton PDA (pause switch, engine registry)
    #[account(
        seeds = [GlobalAdminState::SEED_PREFIX],
        bump = admin_state.bump,
    )]
    pub admin_state: Account<'info, GlobalAdminState>,

    /// The employee claiming accrued salary
    /// CHECK: Signature and ownership verified in instruction
    pub employee: AccountInfo<'info>,

    /// Escrow record PDA
    #[account(
        mut,
        seeds = [
            EscrowRecord::SEED_PREFIX,
            escrow_record.derivation_nonce.to_le_bytes().as_ref(),
        ],
        bump = escrow_record.bump,
    )]
    pub escrow_record: Account<'info, EscrowRecord>,

    /// Vault PDA holding the escrowed lamports
    /// CHECK: Vault is a PDA derived from the escrow record
    #[account(
        mut,
        seeds = [EscrowRecord::VAULT_SEED_PREFIX, escrow_record.key().as_ref()],
        bump,
    )]
    pub vault: UncheckedAccount<'info>,

    /// Confidential-computation engine program
    /// CHECK: Checked against the registered compute engine in instruction
    pub compute_engine: AccountInfo<'info>,

    /// Zero-knowledge transfer engine program
    /// CHECK: Checked against the registered transfer engine in instruction
    pub transfer_engine: AccountInfo<'info>,

    /// Shielded pool receiving the payout
    /// CHECK: Owned and validated by the transfer engine
    #[account(mut)]
    pub pool: UncheckedAccount<'info>,

    /// System program
    pub system_program: Program<'info, System>,
}
