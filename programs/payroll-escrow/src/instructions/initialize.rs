use anchor_lang::prelude::*;
use crate::events::Initialized;
use crate::state::*;

/// One-time deployment step: creates the admin singleton and the index
/// allocator, with the signer as admin
pub fn initialize(ctx: Context<Initialize>, compute_engine: Pubkey) -> Result<()> {
    let admin = ctx.accounts.admin.key();

    ctx.accounts
        .admin_state
        .initialize(admin, compute_engine, ctx.bumps.admin_state);

    let allocator = &mut ctx.accounts.allocator;
    allocator.next_index = 0;
    allocator.bump = ctx.bumps.allocator;

    msg!("Escrow program initialized, admin: {}", admin);

    emit!(Initialized { admin });

    Ok(())
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Deployer, becomes admin
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Admin singleton PDA
    #[account(
        init,
        payer = admin,
        space = GlobalAdminState::LEN,
        seeds = [GlobalAdminState::SEED_PREFIX],
        bump
    )]
    pub admin_state: Account<'info, GlobalAdminState>,

    /// Index allocator singleton PDA
    #[account(
        init,
        payer = admin,
        space = IndexAllocator::LEN,
        seeds = [IndexAllocator::SEED_PREFIX],
        bump
    )]
    pub allocator: Account<'info, IndexAllocator>,

    /// System program
    pub system_program: Program<'info, System>,
}
