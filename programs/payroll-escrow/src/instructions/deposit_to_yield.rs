use anchor_lang::prelude::*;
use crate::access::Caller;
use crate::engine::YieldPosition;
use crate::errors::*;
use crate::events::YieldDeposited;
use crate::state::*;
use crate::utils::*;

/// Park part of the escrowed balance in the yield vault (employer only)
///
/// Parked lamports stop backing payouts until recalled, and the escrow
/// cannot close while any are parked.
///
/// # Arguments
/// * `amount` - Lamports to move out of the escrow vault
pub fn deposit_to_yield(ctx: Context<DepositToYield>, amount: u64) -> Result<()> {
    let admin_state = &ctx.accounts.admin_state;
    admin_state.ensure_running()?;

    let employer = ctx.accounts.employer.to_account_info();
    ctx.accounts
        .escrow_record
        .authorize_employer(&Caller::from(&employer))?;

    let yield_vault = ctx.accounts.yield_vault.to_account_info();
    admin_state.require_engine(EngineKind::Vault, yield_vault.key)?;

    let vault = ctx.accounts.vault.to_account_info();
    let available = escrowed_balance(&vault, rent_reserve()?);
    let parked = ctx.accounts.escrow_record.park_in_yield(available, amount)?;

    let record_key = ctx.accounts.escrow_record.key();
    let vault_seeds: &[&[u8]] = &[
        EscrowRecord::VAULT_SEED_PREFIX,
        record_key.as_ref(),
        &[ctx.bumps.vault],
    ];
    let position = YieldPosition {
        engine: yield_vault,
        vault: vault.clone(),
        position: ctx.accounts.position.to_account_info(),
        vault_seeds,
    };

    let before = vault.lamports();
    position.deposit(&ctx.accounts.system_program.to_account_info(), amount)?;
    require!(
        before.checked_sub(vault.lamports()) == Some(amount),
        EscrowError::EngineMismatch
    );

    msg!("Escrow {} parked principal in yield vault", record_key);

    let privacy = admin_state.privacy_mode;
    if !privacy {
        msg!("Principal in yield vault: {} lamports", parked);
    }

    emit!(YieldDeposited {
        nonce: ctx.accounts.escrow_record.derivation_nonce,
        amount: (!privacy).then_some(amount),
    });

    Ok(())
}

#[derive(Accounts)]
pub struct DepositToYield<'info> {
    /// Admin singleton PDA (pause switch, engine registry)
    #[account(
        seeds = [GlobalAdminState::SEED_PREFIX],
        bump = admin_state.bump,
    )]
    pub admin_state: Account<'info, GlobalAdminState>,

    /// The employer
    /// CHECK: Signature and ownership verified in instruction
    pub employer: AccountInfo<'info>,

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

    /// Vault PDA, the depositor in the yield vault
    /// CHECK: Vault is a PDA derived from the escrow record
    #[account(
        mut,
        seeds = [EscrowRecord::VAULT_SEED_PREFIX, escrow_record.key().as_ref()],
        bump,
    )]
    pub vault: UncheckedAccount<'info>,

    /// Yield vault program
    /// CHECK: Checked against the registered yield vault in instruction
    pub yield_vault: AccountInfo<'info>,

    /// The vault's position in the yield vault
    /// CHECK: Owned and validated by the yield vault program
    #[account(mut)]
    pub position: UncheckedAccount<'info>,

    /// System program
    pub system_program: Program<'info, System>,
}
