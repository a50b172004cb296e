use anchor_lang::prelude::*;
use crate::access::Caller;
use crate::events::{EngineConfigured, PrivacyModeSet};
use crate::state::*;

/// Toggle privacy mode (admin only)
///
/// While enabled, `Deposited` events carry no amount.
pub fn set_privacy_mode(ctx: Context<Configure>, enabled: bool) -> Result<()> {
    let admin_state = &mut ctx.accounts.admin_state;
    admin_state.ensure_running()?;
    admin_state.authorize_admin(&Caller::from(&ctx.accounts.admin.to_account_info()))?;

    admin_state.privacy_mode = enabled;

    msg!("Privacy mode set to {}", enabled);

    emit!(PrivacyModeSet { enabled });

    Ok(())
}

/// Register the program id of an external engine (admin only)
///
/// # Arguments
/// * `kind` - Engine role being configured
/// * `program_id` - Engine program id, `Pubkey::default()` to unregister
pub fn configure_engine(
    ctx: Context<Configure>,
    kind: EngineKind,
    program_id: Pubkey,
) -> Result<()> {
    let admin_state = &mut ctx.accounts.admin_state;
    admin_state.ensure_running()?;
    admin_state.authorize_admin(&Caller::from(&ctx.accounts.admin.to_account_info()))?;

    admin_state.set_engine(kind, program_id);

    msg!("{:?} engine set to {}", kind, program_id);

    emit!(EngineConfigured { kind, program_id });

    Ok(())
}

#[derive(Accounts)]
pub struct Configure<'info> {
    /// Admin singleton PDA
    #[account(
        mut,
        seeds = [GlobalAdminState::SEED_PREFIX],
        bump = admin_state.bump,
    )]
    pub admin_state: Account<'info, GlobalAdminState>,

    /// The admin
    /// CHECK: Signature and identity verified in instruction
    pub admin: AccountInfo<'info>,
}
