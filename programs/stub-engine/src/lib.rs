#![allow(unexpected_cfgs, deprecated)]
use anchor_lang::prelude::*;
use anchor_lang::solana_program::program::set_return_data;
use anchor_lang::system_program::{transfer, Transfer};

declare_id!("8Qe8fqnbQayLUzcE5meuMviGmBH7jW5YZL5KWQqe4zL3");

/// Every "ciphertext" is the little-endian plaintext XOR this byte.
pub const MASK: u8 = 0xA5;

pub fn mask(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().map(|b| b ^ MASK).collect()
}

fn unmask(bytes: &[u8]) -> u128 {
    let mut buf = [0u8; 16];
    for (dst, src) in buf.iter_mut().zip(bytes) {
        *dst = src ^ MASK;
    }
    u128::from_le_bytes(buf)
}

#[program]
pub mod stub_engine {
    use super::*;

    /// Compute engine: `value × scalar`, result returned masked (16 bytes)
    pub fn homomorphic_multiply(_ctx: Context<Compute>, value: Vec<u8>, scalar: u64) -> Result<()> {
        let product = unmask(&value)
            .checked_mul(u128::from(scalar))
            .ok_or(StubError::Overflow)?;
        set_return_data(&mask(&product.to_le_bytes()));
        Ok(())
    }

    /// Compute engine: unmasked value as 16 little-endian bytes
    pub fn decrypt(_ctx: Context<Compute>, value: Vec<u8>) -> Result<()> {
        set_return_data(&unmask(&value).to_le_bytes());
        Ok(())
    }

    /// Transfer engine: moves `amount` from the signing vault into the pool.
    /// An all-zero commitment is accepted but nothing moves.
    pub fn deposit_to_pool(
        ctx: Context<DepositToPool>,
        amount: u64,
        commitment: [u8; 32],
    ) -> Result<()> {
        if commitment == [0u8; 32] {
            msg!("Empty commitment, nothing pooled");
            return Ok(());
        }
        transfer(
            CpiContext::new(
                ctx.accounts.system_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.vault.to_account_info(),
                    to: ctx.accounts.pool.to_account_info(),
                },
            ),
            amount,
        )
    }

    /// Yield vault: creates the position a depositor is keyed by
    pub fn open_position(ctx: Context<OpenPosition>) -> Result<()> {
        let position = &mut ctx.accounts.position;
        position.depositor = ctx.accounts.depositor.key();
        position.principal = 0;
        position.bump = ctx.bumps.position;
        Ok(())
    }

    /// Yield vault: principal in
    pub fn deposit(ctx: Context<DepositPrincipal>, amount: u64) -> Result<()> {
        transfer(
            CpiContext::new(
                ctx.accounts.system_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.depositor.to_account_info(),
                    to: ctx.accounts.position.to_account_info(),
                },
            ),
            amount,
        )?;
        let position = &mut ctx.accounts.position;
        position.principal = position
            .principal
            .checked_add(amount)
            .ok_or(StubError::Overflow)?;
        Ok(())
    }

    /// Yield vault: earnings as 8 little-endian bytes
    pub fn current_yield(ctx: Context<ReadPosition>) -> Result<()> {
        let earned = earnings(&ctx.accounts.position)?;
        set_return_data(&earned.to_le_bytes());
        Ok(())
    }

    /// Yield vault: principal out
    pub fn withdraw(ctx: Context<PayOut>, amount: u64) -> Result<()> {
        let position = &mut ctx.accounts.position;
        position.principal = position
            .principal
            .checked_sub(amount)
            .ok_or(StubError::InsufficientFunds)?;
        move_lamports(ctx.accounts, amount)
    }

    /// Yield vault: earnings out, never principal
    pub fn withdraw_yield(ctx: Context<PayOut>, amount: u64) -> Result<()> {
        require!(
            amount <= earnings(&ctx.accounts.position)?,
            StubError::InsufficientFunds
        );
        move_lamports(ctx.accounts, amount)
    }
}

fn earnings(position: &Account<Position>) -> Result<u64> {
    let floor = Rent::get()?
        .minimum_balance(Position::LEN)
        .checked_add(position.principal)
        .ok_or(StubError::Overflow)?;
    Ok(position.to_account_info().lamports().saturating_sub(floor))
}

fn move_lamports(accounts: &mut PayOut, amount: u64) -> Result<()> {
    let position = accounts.position.to_account_info();
    let recipient = accounts.recipient.to_account_info();
    **position.try_borrow_mut_lamports()? -= amount;
    **recipient.try_borrow_mut_lamports()? += amount;
    Ok(())
}

#[account]
pub struct Position {
    pub depositor: Pubkey,
    pub principal: u64,
    pub bump: u8,
}

impl Position {
    pub const LEN: usize = 8 + 32 + 8 + 1;
    pub const SEED_PREFIX: &'static [u8] = b"position";

    pub fn address(depositor: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[Self::SEED_PREFIX, depositor.as_ref()], &crate::ID)
    }
}

#[derive(Accounts)]
pub struct Compute<'info> {
    pub authority: Signer<'info>,
}

#[derive(Accounts)]
pub struct DepositToPool<'info> {
    #[account(mut)]
    pub vault: Signer<'info>,

    /// CHECK: Any system account can act as the pool
    #[account(mut)]
    pub pool: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct OpenPosition<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: Only its key is recorded
    pub depositor: UncheckedAccount<'info>,

    #[account(
        init,
        payer = payer,
        space = Position::LEN,
        seeds = [Position::SEED_PREFIX, depositor.key().as_ref()],
        bump
    )]
    pub position: Account<'info, Position>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct DepositPrincipal<'info> {
    #[account(mut)]
    pub depositor: Signer<'info>,

    #[account(
        mut,
        seeds = [Position::SEED_PREFIX, depositor.key().as_ref()],
        bump = position.bump,
    )]
    pub position: Account<'info, Position>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct ReadPosition<'info> {
    /// CHECK: Only used to locate the position
    pub depositor: UncheckedAccount<'info>,

    #[account(
        seeds = [Position::SEED_PREFIX, depositor.key().as_ref()],
        bump = position.bump,
    )]
    pub position: Account<'info, Position>,
}

#[derive(Accounts)]
pub struct PayOut<'info> {
    pub depositor: Signer<'info>,

    #[account(
        mut,
        seeds = [Position::SEED_PREFIX, depositor.key().as_ref()],
        bump = position.bump,
    )]
    pub position: Account<'info, Position>,

    /// CHECK: Any writable account can be paid
    #[account(mut)]
    pub recipient: UncheckedAccount<'info>,
}

#[error_code]
pub enum StubError {
    #[msg("Numerical overflow")]
    Overflow,

    #[msg("Not enough lamports in the position")]
    InsufficientFunds,
}
