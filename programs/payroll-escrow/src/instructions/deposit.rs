use anchor_lang::prelude::*;
use crate::access::Caller;
use crate::events::Deposited;
use crate::state::*;
use crate::utils::*;

/// Add lamports to an escrow's vault (employer only)
///
/// # Arguments
/// * `amount` - Lamports to escrow, must be non-zero
pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    let admin_state = &ctx.accounts.admin_state;
    admin_state.ensure_running()?;

    let employer = ctx.accounts.employer.to_account_info();
    let record = &ctx.accounts.escrow_record;
    record.authorize_employer(&Caller::from(&employer))?;

    let vault = ctx.accounts.vault.to_account_info();
    let balance = record.accept_deposit(escrowed_balance(&vault, rent_reserve()?), amount)?;

    transfer_lamports(
        &employer,
        &vault,
        &ctx.accounts.system_program.to_account_info(),
        amount,
    )?;

    msg!("Deposit received for escrow {}", record.key());

    let amount = (!admin_state.privacy_mode).then_some(amount);
    if amount.is_some() {
        msg!("Vault balance: {} lamports", balance);
    }

    emit!(Deposited { amount });

    Ok(())
}

#[derive(Accounts)]
pub struct Deposit<'info> {
    /// Admin singleton PDA (pause switch, privacy mode)
    #[account(
        seeds = [GlobalAdminState::SEED_PREFIX],
        bump = admin_state.bump,
    )]
    pub admin_state: Account<'info, GlobalAdminState>,

    /// The employer topping up the escrow
    /// CHECK: Signature and ownership verified in instruction
    #[account(mut)]
    pub employer: AccountInfo<'info>,

    /// Escrow record PDA
    #[account(
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

    /// System program
    pub system_program: Program<'info, System>,
}
