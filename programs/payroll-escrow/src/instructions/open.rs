use anchor_lang::prelude::*;
use crate::access::Caller;
use crate::confidential::Ciphertext;
use crate::errors::*;
use crate::events::Opened;
use crate::state::*;
use crate::utils::*;

/// Open an escrow between the signing employer and `employee`
///
/// The record address is derived from a freshly allocated index, not from
/// either party. The caller computes that address off-chain and passes it
/// as `escrow_record`; anything else is rejected.
///
/// # Arguments
/// * `encrypted_rate` - Salary per second, encrypted by the employer's client
pub fn open(ctx: Context<Open>, encrypted_rate: Vec<u8>) -> Result<()> {
    ctx.accounts.admin_state.ensure_running()?;

    let employer = ctx.accounts.employer.to_account_info();
    Caller::from(&employer).require_signed()?;
    let encrypted_rate = Ciphertext::new(encrypted_rate)?;

    let record_info = ctx.accounts.escrow_record.to_account_info();
    require!(
        record_info.data_is_empty(),
        EscrowError::AlreadyInitialized
    );

    let nonce = ctx.accounts.allocator.allocate()?;
    let bump = EscrowRecord::verify_address(record_info.key, nonce)?;

    let system_program = ctx.accounts.system_program.to_account_info();
    let nonce_bytes = nonce.to_le_bytes();
    let record_seeds: &[&[u8]] = &[EscrowRecord::SEED_PREFIX, &nonce_bytes, &[bump]];
    create_pda_account(
        &employer,
        &record_info,
        &system_program,
        EscrowRecord::LEN,
        record_seeds,
    )?;

    // Vault starts out holding only its rent reserve
    let vault = ctx.accounts.vault.to_account_info();
    let reserve = rent_reserve()?;
    transfer_lamports(
        &employer,
        &vault,
        &system_program,
        reserve.saturating_sub(vault.lamports()),
    )?;

    let now = Clock::get()?.unix_timestamp;
    let record = EscrowRecord::open(
        employer.key(),
        ctx.accounts.employee.key(),
        encrypted_rate,
        vault.key(),
        nonce,
        bump,
        now,
    );
    {
        let mut data = record_info.try_borrow_mut_data()?;
        let mut writer: &mut [u8] = &mut data[..];
        record.try_serialize(&mut writer)?;
    }

    msg!("Escrow opened at {} (nonce {})", record_info.key(), nonce);

    emit!(Opened {
        employer: record.employer,
        employee: record.employee,
        nonce,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Open<'info> {
    /// Admin singleton PDA (pause switch)
    #[account(
        seeds = [GlobalAdminState::SEED_PREFIX],
        bump = admin_state.bump,
    )]
    pub admin_state: Account<'info, GlobalAdminState>,

    /// Index allocator singleton PDA
    #[account(
        mut,
        seeds = [IndexAllocator::SEED_PREFIX],
        bump = allocator.bump,
    )]
    pub allocator: Account<'info, IndexAllocator>,

    /// The employer funding the escrow
    /// CHECK: Signature verified in instruction
    #[account(mut)]
    pub employer: AccountInfo<'info>,

    /// The employee receiving the salary
    /// CHECK: Only its key is recorded
    pub employee: UncheckedAccount<'info>,

    /// Escrow record, created here
    /// CHECK: Derivation verified and account created in instruction
    #[account(mut)]
    pub escrow_record: UncheckedAccount<'info>,

    /// Vault PDA that will hold the escrowed lamports
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
