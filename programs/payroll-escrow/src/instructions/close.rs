use anchor_lang::prelude::*;
use crate::access::Caller;
use crate::errors::*;
use crate::events::{Closed, Settled};
use crate::state::*;
use crate::utils::*;

use super::settle::with_compute_engine;

/// Accounts shared by `close` and `force_close`.
pub struct WindDown<'a, 'info> {
    pub employer: AccountInfo<'info>,
    pub employee: AccountInfo<'info>,
    pub escrow_record: &'a mut Account<'info, EscrowRecord>,
    pub vault: AccountInfo<'info>,
    pub vault_bump: u8,
    pub compute_engine: AccountInfo<'info>,
    pub system_program: AccountInfo<'info>,
}

impl WindDown<'_, '_> {
    /// Final settlement to the employee, then every lamport left in the
    /// vault (rent reserve included) to the employer. Returns the escrowed
    /// remainder refunded.
    pub fn run(self) -> Result<u64> {
        require_keys_eq!(
            self.employee.key(),
            self.escrow_record.employee,
            EscrowError::Unauthorized
        );
        require_keys_eq!(
            self.employer.key(),
            self.escrow_record.employer,
            EscrowError::Unauthorized
        );

        let available = escrowed_balance(&self.vault, rent_reserve()?);
        let now = Clock::get()?.unix_timestamp;
        let closing = with_compute_engine(
            self.escrow_record,
            &self.compute_engine,
            |record, engine| record.close_out(now, available, engine),
        )?;

        let record_key = self.escrow_record.key();
        let vault_seeds: &[&[u8]] = &[
            EscrowRecord::VAULT_SEED_PREFIX,
            record_key.as_ref(),
            &[self.vault_bump],
        ];
        pay_from_vault(
            &self.vault,
            &self.employee,
            &self.system_program,
            vault_seeds,
            closing.settlement.accrued,
        )?;
        pay_from_vault(
            &self.vault,
            &self.employer,
            &self.system_program,
            vault_seeds,
            self.vault.lamports(),
        )?;

        emit!(Settled {
            accrued: closing.settlement.accrued,
            new_total: closing.settlement.new_total,
        });

        Ok(closing.refund)
    }
}

/// Close the escrow (employer only)
///
/// Settles what the employee is owed, returns the rest of the vault to the
/// employer and closes the record, releasing its storage deposit to the
/// employer as well.
pub fn close(ctx: Context<Close>) -> Result<()> {
    ctx.accounts.admin_state.ensure_running()?;

    let employer = ctx.accounts.employer.to_account_info();
    ctx.accounts
        .escrow_record
        .authorize_employer(&Caller::from(&employer))?;

    let compute_engine = ctx.accounts.compute_engine.to_account_info();
    ctx.accounts
        .admin_state
        .require_engine(EngineKind::Compute, compute_engine.key)?;

    let refund = WindDown {
        employer,
        employee: ctx.accounts.employee.to_account_info(),
        vault: ctx.accounts.vault.to_account_info(),
        vault_bump: ctx.bumps.vault,
        compute_engine,
        system_program: ctx.accounts.system_program.to_account_info(),
        escrow_record: &mut ctx.accounts.escrow_record,
    }
    .run()?;

    msg!("Escrow closed, {} lamports refunded to employer", refund);

    emit!(Closed { refund });

    Ok(())
}

#[derive(Accounts)]
pub struct Close<'info> {
    /// Admin singleton PDA (pause switch, engine registry)
    #[account(
        seeds = [GlobalAdminState::SEED_PREFIX],
        bump = admin_state.bump,
    )]
    pub admin_state: Account<'info, GlobalAdminState>,

    /// The employer closing the escrow, receives every remaining lamport
    /// CHECK: Signature and ownership verified in instruction
    #[account(mut)]
    pub employer: AccountInfo<'info>,

    /// The employee, paid the final settlement
    /// CHECK: Must match the record's employee, verified in instruction
    #[account(mut)]
    pub employee: AccountInfo<'info>,

    /// Escrow record PDA, closed to the employer
    #[account(
        mut,
        seeds = [
            EscrowRecord::SEED_PREFIX,
            escrow_record.derivation_nonce.to_le_bytes().as_ref(),
        ],
        bump = escrow_record.bump,
        close = employer,
    )]
    pub escrow_record: Account<'info, EscrowRecord>,

    /// Vault PDA, drained to the employer
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
