use anchor_lang::prelude::*;
use crate::access::Caller;
use crate::confidential::Ciphertext;
use crate::errors::*;
use crate::events::{RateUpdated, Settled};
use crate::state::*;
use crate::utils::*;

use super::settle::with_compute_engine;

/// Replace the encrypted rate (employer only)
///
/// Time elapsed so far is settled to the employee at the old rate before
/// the new ciphertext is installed, all in the same instruction.
///
/// # Arguments
/// * `new_encrypted_rate` - New salary per second, encrypted client-side
pub fn update_rate(ctx: Context<UpdateRate>, new_encrypted_rate: Vec<u8>) -> Result<()> {
    ctx.accounts.admin_state.ensure_running()?;

    let employer = ctx.accounts.employer.to_account_info();
    let employee = ctx.accounts.employee.to_account_info();
    let record = &ctx.accounts.escrow_record;
    record.authorize_employer(&Caller::from(&employer))?;
    require_keys_eq!(employee.key(), record.employee, EscrowError::Unauthorized);

    let new_rate = Ciphertext::new(new_encrypted_rate)?;

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
        |record, engine| record.replace_rate(now, available, engine, new_rate),
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

    msg!("Rate updated for escrow {} (amount encrypted)", record_key);

    emit!(Settled {
        accrued: settlement.accrued,
        new_total: settlement.new_total,
    });
    emit!(RateUpdated {
        nonce: ctx.accounts.escrow_record.derivation_nonce,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct UpdateRate<'info> {
    /// Admin singleton PDA (pause switch, engine registry)
    #[account(
        seeds = [GlobalAdminState::SEED_PREFIX],
        bump = admin_state.bump,
    )]
    pub admin_state: Account<'info, GlobalAdminState>,

    /// The employer changing the rate
    /// CHECK: Signature and ownership verified in instruction
    pub employer: AccountInfo<'info>,

    /// The employee, paid what accrued under the old rate
    /// CHECK: Must match the record's employee, verified in instruction
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
