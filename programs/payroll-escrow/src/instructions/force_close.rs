use anchor_lang::prelude::*;
use crate::access::Caller;
use crate::events::ForceClosed;
use crate::state::*;

use super::close::WindDown;

/// Emergency close by the admin
///
/// Same settlement and refund as `close`, without the employer's signature.
/// Not gated by the pause switch.
pub fn force_close(ctx: Context<ForceClose>) -> Result<()> {
    let admin = ctx.accounts.admin.to_account_info();
    ctx.accounts
        .admin_state
        .authorize_admin(&Caller::from(&admin))?;
    ctx.accounts.escrow_record.ensure_active()?;

    let compute_engine = ctx.accounts.compute_engine.to_account_info();
    ctx.accounts
        .admin_state
        .require_engine(EngineKind::Compute, compute_engine.key)?;

    let refund = WindDown {
        employer: ctx.accounts.employer.to_account_info(),
        employee: ctx.accounts.employee.to_account_info(),
        vault: ctx.accounts.vault.to_account_info(),
        vault_bump: ctx.bumps.vault,
        compute_engine,
        system_program: ctx.accounts.system_program.to_account_info(),
        escrow_record: &mut ctx.accounts.escrow_record,
    }
    .run()?;

    msg!("Escrow force-closed by admin {}", admin.key());

    emit!(ForceClosed {
        admin: admin.key(),
        refund,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct ForceClose<'info> {
    /// Admin singleton PDA
    #[account(
        seeds = [GlobalAdminState::SEED_PREFIX],
        bump = admin_state.bump,
    )]
    pub admin_state: Account<'info, GlobalAdminState>,

    /// The admin
    /// CHECK: Signature and identity verified in instruction
    pub admin: AccountInfo<'info>,

    /// The record's employer, receives every remaining lamport
    /// CHECK: Must match the record's employer, verified in instruction
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
