#![allow(dead_code)]

use std::path::PathBuf;

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::system_program;
use anchor_lang::{AccountDeserialize, Discriminator, InstructionData, ToAccountMetas};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use litesvm::types::TransactionMetadata;
use litesvm::LiteSVM;
use payroll_escrow::errors::EscrowError;
use payroll_escrow::{accounts, instruction, EngineKind, EscrowRecord, GlobalAdminState, IndexAllocator};
use solana_sdk::instruction::InstructionError;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer as _;
use solana_sdk::transaction::{Transaction, TransactionError};
use stub_engine::Position;

pub const T0: i64 = 1_700_000_000;
pub const SOL: u64 = 1_000_000_000;

pub type TxResult = std::result::Result<TransactionMetadata, TransactionError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Admin,
    Employer,
    Employee,
    Stranger,
}

/// Both programs loaded into a LiteSVM bank, the escrow initialized with
/// the stub engine registered for every role.
pub struct Svm {
    pub svm: LiteSVM,
    payer: Keypair,
    admin: Keypair,
    employer: Keypair,
    employee: Keypair,
    stranger: Keypair,
    pub now: i64,
}

fn artifact(name: &str) -> Option<PathBuf> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../target/deploy")
        .join(format!("{name}.so"));
    path.exists().then_some(path)
}

pub fn admin_state() -> Pubkey {
    Pubkey::find_program_address(&[GlobalAdminState::SEED_PREFIX], &payroll_escrow::ID).0
}

pub fn allocator() -> Pubkey {
    Pubkey::find_program_address(&[IndexAllocator::SEED_PREFIX], &payroll_escrow::ID).0
}

pub fn vault(record: Pubkey) -> Pubkey {
    EscrowRecord::vault_address(&record).0
}

pub fn position(record: Pubkey) -> Pubkey {
    Position::address(&vault(record)).0
}

pub fn encrypt(rate: u64) -> Vec<u8> {
    stub_engine::mask(&rate.to_le_bytes())
}

fn escrow_ix(accounts: impl ToAccountMetas, data: impl InstructionData) -> Instruction {
    Instruction {
        program_id: payroll_escrow::ID,
        accounts: accounts.to_account_metas(None),
        data: data.data(),
    }
}

impl Svm {
    /// `None` until `anchor build` has put both program binaries in
    /// `target/deploy`.
    pub fn boot() -> Option<Self> {
        let (Some(escrow), Some(stub)) = (artifact("payroll_escrow"), artifact("stub_engine"))
        else {
            eprintln!("program binaries missing from target/deploy, run `anchor build`");
            return None;
        };

        let mut svm = LiteSVM::new();
        svm.add_program_from_file(payroll_escrow::ID, escrow).unwrap();
        svm.add_program_from_file(stub_engine::ID, stub).unwrap();

        let mut env = Self {
            svm,
            payer: Keypair::new(),
            admin: Keypair::new(),
            employer: Keypair::new(),
            employee: Keypair::new(),
            stranger: Keypair::new(),
            now: T0,
        };
        for key in [
            env.payer.pubkey(),
            env.admin.pubkey(),
            env.employer.pubkey(),
            env.employee.pubkey(),
            env.stranger.pubkey(),
        ] {
            env.svm.airdrop(&key, 100 * SOL).unwrap();
        }
        env.set_clock(T0);

        let ix = escrow_ix(
            accounts::Initialize {
                admin: env.key(Role::Admin),
                admin_state: admin_state(),
                allocator: allocator(),
                system_program: system_program::ID,
            },
            instruction::Initialize {
                compute_engine: stub_engine::ID,
            },
        );
        env.send(ix, &[Role::Admin]).unwrap();
        env.configure_engine(EngineKind::Transfer, stub_engine::ID).unwrap();
        env.configure_engine(EngineKind::Vault, stub_engine::ID).unwrap();
        Some(env)
    }

    pub fn key(&self, role: Role) -> Pubkey {
        self.keypair(role).pubkey()
    }

    fn keypair(&self, role: Role) -> &Keypair {
        match role {
            Role::Admin => &self.admin,
            Role::Employer => &self.employer,
            Role::Employee => &self.employee,
            Role::Stranger => &self.stranger,
        }
    }

    /// Sends `ix` paid for by a separate fee payer, so role balances only
    /// move by what the programs move. `signers` are marked as signing
    /// wherever their keys appear.
    pub fn send(&mut self, mut ix: Instruction, signers: &[Role]) -> TxResult {
        let keys: Vec<Pubkey> = signers.iter().map(|role| self.key(*role)).collect();
        for meta in ix.accounts.iter_mut() {
            if keys.contains(&meta.pubkey) {
                meta.is_signer = true;
            }
        }

        self.svm.expire_blockhash();
        let mut keypairs = vec![&self.payer];
        keypairs.extend(signers.iter().map(|role| self.keypair(*role)));
        let tx = Transaction::new_signed_with_payer(
            &[ix],
            Some(&self.payer.pubkey()),
            &keypairs,
            self.svm.latest_blockhash(),
        );
        self.svm.send_transaction(tx).map_err(|failed| failed.err)
    }

    pub fn set_clock(&mut self, now: i64) {
        let mut clock = self.svm.get_sysvar::<Clock>();
        clock.unix_timestamp = now;
        self.svm.set_sysvar(&clock);
        self.now = now;
    }

    pub fn advance(&mut self, seconds: i64) {
        self.set_clock(self.now + seconds);
    }

    pub fn fund(&mut self, key: Pubkey, lamports: u64) {
        self.svm.airdrop(&key, lamports).unwrap();
    }

    pub fn balance(&self, key: Pubkey) -> u64 {
        self.svm.get_balance(&key).unwrap_or(0)
    }

    pub fn reserve(&self) -> u64 {
        self.svm.minimum_balance_for_rent_exemption(0)
    }

    /// Lamports in the vault above its rent reserve.
    pub fn escrowed(&self, record: Pubkey) -> u64 {
        self.balance(vault(record)).saturating_sub(self.reserve())
    }

    pub fn record(&self, record: Pubkey) -> Option<EscrowRecord> {
        let account = self.svm.get_account(&record)?;
        if account.lamports == 0 || account.owner != payroll_escrow::ID {
            return None;
        }
        EscrowRecord::try_deserialize(&mut account.data.as_slice()).ok()
    }

    pub fn admin(&self) -> GlobalAdminState {
        let account = self.svm.get_account(&admin_state()).unwrap();
        GlobalAdminState::try_deserialize(&mut account.data.as_slice()).unwrap()
    }

    pub fn next_nonce(&self) -> u64 {
        let account = self.svm.get_account(&allocator()).unwrap();
        IndexAllocator::try_deserialize(&mut account.data.as_slice())
            .unwrap()
            .next_index
    }

    pub fn open_at(&mut self, record: Pubkey, rate: u64) -> TxResult {
        let ix = escrow_ix(
            accounts::Open {
                admin_state: admin_state(),
                allocator: allocator(),
                employer: self.key(Role::Employer),
                employee: self.key(Role::Employee),
                escrow_record: record,
                vault: vault(record),
                system_program: system_program::ID,
            },
            instruction::Open {
                encrypted_rate: encrypt(rate),
            },
        );
        self.send(ix, &[Role::Employer])
    }

    /// Opens at the address the next index derives to.
    pub fn open(&mut self, rate: u64) -> Pubkey {
        let (record, _) = EscrowRecord::address(self.next_nonce());
        self.open_at(record, rate).unwrap();
        record
    }

    pub fn deposit(&mut self, record: Pubkey, amount: u64) -> TxResult {
        let ix = escrow_ix(
            accounts::Deposit {
                admin_state: admin_state(),
                employer: self.key(Role::Employer),
                escrow_record: record,
                vault: vault(record),
                system_program: system_program::ID,
            },
            instruction::Deposit { amount },
        );
        self.send(ix, &[Role::Employer])
    }

    /// Withdraw naming `claimant` as the employee, signed or not.
    pub fn withdraw_as(
        &mut self,
        record: Pubkey,
        claimant: Role,
        signed: bool,
        compute_engine: Pubkey,
    ) -> TxResult {
        let ix = escrow_ix(
            accounts::Withdraw {
                admin_state: admin_state(),
                employee: self.key(claimant),
                escrow_record: record,
                vault: vault(record),
                compute_engine,
                system_program: system_program::ID,
            },
            instruction::Withdraw {},
        );
        let signers: &[Role] = if signed { &[claimant] } else { &[] };
        self.send(ix, signers)
    }

    pub fn withdraw(&mut self, record: Pubkey) -> TxResult {
        self.withdraw_as(record, Role::Employee, true, stub_engine::ID)
    }

    pub fn withdraw_private(
        &mut self,
        record: Pubkey,
        pool: Pubkey,
        commitment: [u8; 32],
    ) -> TxResult {
        let ix = escrow_ix(
            accounts::WithdrawPrivate {
                admin_state: admin_state(),
                employee: self.key(Role::Employee),
                escrow_record: record,
                vault: vault(record),
                compute_engine: stub_engine::ID,
                transfer_engine: stub_engine::ID,
                pool,
                system_program: system_program::ID,
            },
            instruction::WithdrawPrivate { commitment },
        );
        self.send(ix, &[Role::Employee])
    }

    pub fn update_rate(&mut self, record: Pubkey, rate: u64) -> TxResult {
        let ix = escrow_ix(
            accounts::UpdateRate {
                admin_state: admin_state(),
                employer: self.key(Role::Employer),
                employee: self.key(Role::Employee),
                escrow_record: record,
                vault: vault(record),
                compute_engine: stub_engine::ID,
                system_program: system_program::ID,
            },
            instruction::UpdateRate {
                new_encrypted_rate: encrypt(rate),
            },
        );
        self.send(ix, &[Role::Employer])
    }

    pub fn close(&mut self, record: Pubkey) -> TxResult {
        let ix = escrow_ix(
            accounts::Close {
                admin_state: admin_state(),
                employer: self.key(Role::Employer),
                employee: self.key(Role::Employee),
                escrow_record: record,
                vault: vault(record),
                compute_engine: stub_engine::ID,
                system_program: system_program::ID,
            },
            instruction::Close {},
        );
        self.send(ix, &[Role::Employer])
    }

    pub fn force_close(&mut self, record: Pubkey, by: Role) -> TxResult {
        let ix = escrow_ix(
            accounts::ForceClose {
                admin_state: admin_state(),
                admin: self.key(by),
                employer: self.key(Role::Employer),
                employee: self.key(Role::Employee),
                escrow_record: record,
                vault: vault(record),
                compute_engine: stub_engine::ID,
                system_program: system_program::ID,
            },
            instruction::ForceClose {},
        );
        self.send(ix, &[by])
    }

    pub fn pause(&mut self, by: Role) -> TxResult {
        let ix = escrow_ix(
            accounts::SetPaused {
                admin_state: admin_state(),
                admin: self.key(by),
            },
            instruction::Pause {},
        );
        self.send(ix, &[by])
    }

    pub fn unpause(&mut self, by: Role) -> TxResult {
        let ix = escrow_ix(
            accounts::SetPaused {
                admin_state: admin_state(),
                admin: self.key(by),
            },
            instruction::Unpause {},
        );
        self.send(ix, &[by])
    }

    pub fn set_privacy_mode(&mut self, enabled: bool) -> TxResult {
        let ix = escrow_ix(
            accounts::Configure {
                admin_state: admin_state(),
                admin: self.key(Role::Admin),
            },
            instruction::SetPrivacyMode { enabled },
        );
        self.send(ix, &[Role::Admin])
    }

    pub fn configure_engine(&mut self, kind: EngineKind, program_id: Pubkey) -> TxResult {
        let ix = escrow_ix(
            accounts::Configure {
                admin_state: admin_state(),
                admin: self.key(Role::Admin),
            },
            instruction::ConfigureEngine { kind, program_id },
        );
        self.send(ix, &[Role::Admin])
    }

    /// Creates the stub yield vault's position for `record`'s vault.
    pub fn open_position(&mut self, record: Pubkey) {
        let ix = Instruction {
            program_id: stub_engine::ID,
            accounts: stub_engine::accounts::OpenPosition {
                payer: self.payer.pubkey(),
                depositor: vault(record),
                position: position(record),
                system_program: system_program::ID,
            }
            .to_account_metas(None),
            data: stub_engine::instruction::OpenPosition {}.data(),
        };
        self.send(ix, &[]).unwrap();
    }

    /// Credits earnings straight to the position, as a real vault would
    /// over time.
    pub fn accrue_yield(&mut self, record: Pubkey, lamports: u64) {
        let key = position(record);
        let mut account = self.svm.get_account(&key).unwrap();
        account.lamports += lamports;
        self.svm.set_account(key, account).unwrap();
    }

    pub fn deposit_to_yield(&mut self, record: Pubkey, amount: u64) -> TxResult {
        let ix = escrow_ix(
            accounts::DepositToYield {
                admin_state: admin_state(),
                employer: self.key(Role::Employer),
                escrow_record: record,
                vault: vault(record),
                yield_vault: stub_engine::ID,
                position: position(record),
                system_program: system_program::ID,
            },
            instruction::DepositToYield { amount },
        );
        self.send(ix, &[Role::Employer])
    }

    pub fn recall_from_yield(&mut self, record: Pubkey, amount: u64) -> TxResult {
        let ix = escrow_ix(
            accounts::RecallFromYield {
                admin_state: admin_state(),
                employer: self.key(Role::Employer),
                escrow_record: record,
                vault: vault(record),
                yield_vault: stub_engine::ID,
                position: position(record),
            },
            instruction::RecallFromYield { amount },
        );
        self.send(ix, &[Role::Employer])
    }

    pub fn claim_yield(&mut self, record: Pubkey) -> TxResult {
        let ix = escrow_ix(
            accounts::ClaimYield {
                admin_state: admin_state(),
                employer: self.key(Role::Employer),
                escrow_record: record,
                vault: vault(record),
                yield_vault: stub_engine::ID,
                position: position(record),
            },
            instruction::ClaimYield {},
        );
        self.send(ix, &[Role::Employer])
    }
}

/// Events of type `E` emitted by a transaction, in order.
pub fn events<E: AnchorDeserialize + Discriminator>(meta: &TransactionMetadata) -> Vec<E> {
    meta.logs
        .iter()
        .filter_map(|line| line.strip_prefix("Program data: "))
        .filter_map(|data| STANDARD.decode(data).ok())
        .filter(|bytes| bytes.starts_with(E::DISCRIMINATOR))
        .filter_map(|bytes| E::deserialize(&mut &bytes[E::DISCRIMINATOR.len()..]).ok())
        .collect()
}

#[track_caller]
pub fn assert_fails_with(result: TxResult, expected: EscrowError) {
    let code = expected as u32 + anchor_lang::error::ERROR_CODE_OFFSET;
    match result {
        Ok(_) => panic!("expected error {code}, transaction succeeded"),
        Err(TransactionError::InstructionError(_, InstructionError::Custom(got))) => {
            assert_eq!(got, code)
        }
        Err(other) => panic!("expected error {code}, got {other:?}"),
    }
}
