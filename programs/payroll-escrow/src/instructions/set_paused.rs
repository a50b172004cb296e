use anchor_lang::prelude::*;
use crate::access::Caller;
use crate::events::PauseSet;
use crate::state::*;

/// Stop every gated entry point (admin only). Fails if already paused.
pub fn pause(ctx: Context<SetPaused>) -> Result<()> {
    let admin = Caller::from(&ctx.accounts.admin.to_account_info());
    ctx.accounts.admin_state.pause(&admin)?;

    msg!("Escrow program paused");

    emit!(PauseSet { paused: true });

    Ok(())
}

/// Resume operations (admin only). Allowed whether or not paused.
pub fn unpause(ctx: Context<SetPaused>) -> Result<()> {
    let admin = Caller::from(&ctx.accounts.admin.to_account_info());
    ctx.accounts.admin_state.unpause(&admin)?;

    msg!("Escrow program unpaused");

    emit!(PauseSet { paused: false });

    Ok(())
}

#[derive(Accounts)]
pub struct SetPaused<'info> {
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
