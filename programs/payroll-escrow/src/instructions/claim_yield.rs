use anchor_lang::prelude::*;
use crate::access::Caller;
use crate::engine::YieldPosition;
use crate::errors::*;
use crate::events::YieldClaimed;
use crate::state::*;

/// Pay the employer what the parked principal has earned (employer only)
///
/// Only earnings move. The escrow vault and the parked principal are left
/// exactly as they were.
pub fn claim_yield(ctx: Context<ClaimYield>) -> Result<()> {
    let admin_state = &ctx.accounts.admin_state;
    admin_state.ensure_running()?;

    let employer = ctx.accounts.employer.to_account_info();
    let record = &ctx.accounts.escrow_record;
    record.authorize_employer(&Caller::from(&employer))?;

    let yield_vault = ctx.accounts.yield_vault.to_account_info();
    admin_state.require_engine(EngineKind::Vault, yield_vault.key)?;

    let record_key = record.key();
    let vault_seeds: &[&[u8]] = &[
        EscrowRecord::VAULT_SEED_PREFIX,
        record_key.as_ref(),
        &[ctx.bumps.vault],
    ];
    let vault = ctx.accounts.vault.to_account_info();
    let position = YieldPosition {
        engine: yield_vault,
        vault: vault.clone(),
        position: ctx.accounts.position.to_account_info(),
        vault_seeds,
    };

    let earned = position.current_yield()?;
    if earned > 0 {
        let vault_before = vault.lamports();
        let employer_before = employer.lamports();
        position.withdraw_yield(&employer, earned)?;
        require!(
            employer.lamports().checked_sub(employer_before) == Some(earned)
                && vault.lamports() == vault_before,
            EscrowError::EngineMismatch
        );
    }

    msg!("Yield claimed for escrow {}", record_key);

    emit!(YieldClaimed {
        nonce: record.derivation_nonce,
        amount: (!admin_state.privacy_mode).then_some(earned),
    });

    Ok(())
}

#[derive(Accounts)]
pub struct ClaimYield<'info> {
    /// Admin singleton PDA (pause switch, engine registry)
    #[account(
        seeds = [GlobalAdminState::SEED_PREFIX],
        bump = admin_state.bump,
    )]
    pub admin_state: Account<'info, GlobalAdminState>,

    /// The employer, receives the earnings
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

    /// Vault PDA, the depositor in the yield vault
    /// CHECK: Vault is a PDA derived from the escrow record
    #[account(
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
}
