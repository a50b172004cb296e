use anchor_lang::prelude::*;
use crate::access::Caller;
use crate::events::Settled;
use crate::state::*;
use crate::utils::*;

use super::settle::with_compute_engine;

/// Withdraw everything accrued since the last settlement (employee only)
///
/// The full outstanding accrual is settled in one step; there is no partial
/// withdrawal.
pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
    ctx.accounts.admin_state.ensure_running()?;

    let employee = ctx.accounts.employee.to_account_info();
    ctx.accounts
        .escrow_record
        .authorize_employee(&Caller::from(&employee))?;

    let compute_engine = ctx.accounts.compute_engine.to_account_info();
    ctx.accounts
        .admin_state
        .require_engine(EngineKind::Compute, compute_engine.key)?;

    let vault = ctx.accounts.vault.to_account_info();
    let available = escrowed_balance(&vault, rent_reserve()?);
    let now = Clock::get()?.unix_timestamp;

    let settlement = with_compute_engine(
        &mut ctx.accounts.escrow_record,
        &compute_engine,
        |record, engine| record.settle(now, available, engine),
    )?;

    let record_key = ctx.accounts.escrow_record.key();
    let vault_seeds: &[&[u8]] = &[
        EscrowRecord::VAULT_SEED_PREFIX,
        record_key.as_ref(),
        &[ctx.bumps.vault],
    ];
    pay_from_vault(
        &vault,
        &employee,
        &ctx.accounts.system_program.to_account_info(),
        vault_seeds,
        settlement.accrued,
    )?;

    msg!("Escrow {} settled", record_key);

    emit!(Settled {
        accrued: settlement.accrued,
        new_total: settlement.new_total,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// Admin singleton PDA (pause switch, engine registry)
    #[account(
        seeds = [GlobalAdminState::SEED_PREFIX],
        bump = admin_state.bump,
    )]
    pub admin_state: Account<'info, GlobalAdminState>,

    /// The employee claiming accrued salary
    /// CHECK: Signature and ownership verified in instruction
    #[account(mut)]
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

    /// System program
    pub system_program: Program<'info, System>,
}
