use anchor_lang::prelude::*;
use anchor_lang::system_program::{
    allocate, assign, create_account, transfer, Allocate, Assign, CreateAccount, Transfer,
};

/// Lamports a vault keeps to stay rent-exempt. Funded at open, returned at close.
pub fn rent_reserve() -> Result<u64> {
    Ok(Rent::get()?.minimum_balance(0))
}

/// Escrowed balance of a vault: everything above its rent reserve.
pub fn escrowed_balance(vault: &AccountInfo, reserve: u64) -> u64 {
    vault.lamports().saturating_sub(reserve)
}

/// Pays `amount` lamports out of a vault PDA.
pub fn pay_from_vault<'info>(
    vault: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    vault_seeds: &[&[u8]],
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    transfer(
        CpiContext::new_with_signer(
            system_program.clone(),
            Transfer {
                from: vault.clone(),
                to: to.clone(),
            },
            &[vault_seeds],
        ),
        amount,
    )
}

/// Moves `amount` lamports out of a signing wallet.
pub fn transfer_lamports<'info>(
    from: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    transfer(
        CpiContext::new(
            system_program.clone(),
            Transfer {
                from: from.clone(),
                to: to.clone(),
            },
        ),
        amount,
    )
}

/// Creates a rent-exempt, program-owned PDA of `space` bytes paid for by
/// `payer`. Lamports already sitting at the address are topped up rather
/// than rejected, so a pre-funded address cannot block creation.
pub fn create_pda_account<'info>(
    payer: &AccountInfo<'info>,
    target: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    space: usize,
    signer_seeds: &[&[u8]],
) -> Result<()> {
    let required = Rent::get()?.minimum_balance(space);
    let current = target.lamports();

    if current == 0 {
        return create_account(
            CpiContext::new_with_signer(
                system_program.clone(),
                CreateAccount {
                    from: payer.clone(),
                    to: target.clone(),
                },
                &[signer_seeds],
            ),
            required,
            space as u64,
            &crate::ID,
        );
    }

    transfer_lamports(payer, target, system_program, required.saturating_sub(current))?;
    allocate(
        CpiContext::new_with_signer(
            system_program.clone(),
            Allocate {
                account_to_allocate: target.clone(),
            },
            &[signer_seeds],
        ),
        space as u64,
    )?;
    assign(
        CpiContext::new_with_signer(
            system_program.clone(),
            Assign {
                account_to_assign: target.clone(),
            },
            &[signer_seeds],
        ),
        &crate::ID,
    )
}
