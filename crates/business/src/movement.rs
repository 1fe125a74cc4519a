//! Account movements - deposit, withdraw, transfer
//!
//! Each movement is one unit of work: load the account(s), check ownership
//! and funds, write the new balance(s), append the journal record(s), post
//! the ledger entries, then commit. Any failure after `begin` rolls the
//! whole unit back, so a balance never changes without its journal and
//! ledger records and vice versa.

use crate::access::Principal;
use crate::error::{BusinessError, BusinessResult};
use crate::journal::JournalService;
use crate::ledger::LedgerService;
use crate::services::{settle, MovementReceipt, ServiceContext, TransferReceipt};
use bankdesk_core::{Account, Amount, EntryType, Transaction};
use bankdesk_persistence::{AccountRepo, UnitOfWork};
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Movement Service - the only writer of account balances
pub struct MovementService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MovementService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Credit `amount` to an account owned by the caller
    #[tracing::instrument(skip(self, principal), fields(caller = %principal.id))]
    pub async fn deposit(
        &self,
        principal: &Principal,
        account_id: Uuid,
        amount: Decimal,
    ) -> BusinessResult<MovementReceipt> {
        let amount = Amount::new(amount)?;

        let mut uow = self.ctx.begin().await?;
        let result = apply_deposit(&mut uow, principal, account_id, amount).await;
        let result = settle(uow, result).await;

        match &result {
            Ok(receipt) => tracing::info!(
                %account_id,
                %amount,
                balance = %receipt.account.balance,
                "deposit committed"
            ),
            Err(err) => tracing::warn!(%account_id, %amount, error = %err, "deposit rolled back"),
        }
        result
    }

    /// Debit `amount` from an account owned by the caller
    #[tracing::instrument(skip(self, principal), fields(caller = %principal.id))]
    pub async fn withdraw(
        &self,
        principal: &Principal,
        account_id: Uuid,
        amount: Decimal,
    ) -> BusinessResult<MovementReceipt> {
        let amount = Amount::new(amount)?;

        let mut uow = self.ctx.begin().await?;
        let result = apply_withdraw(&mut uow, principal, account_id, amount).await;
        let result = settle(uow, result).await;

        match &result {
            Ok(receipt) => tracing::info!(
                %account_id,
                %amount,
                balance = %receipt.account.balance,
                "withdrawal committed"
            ),
            Err(err) => tracing::warn!(%account_id, %amount, error = %err, "withdrawal rolled back"),
        }
        result
    }

    /// Move `amount` from the caller's account to any active account.
    ///
    /// The amount and same-account checks run before any account is looked
    /// up, so a self-transfer is `SameAccountTransfer` even when the id does
    /// not exist.
    ///
    /// Ledger entries are only posted when the two accounts sit in
    /// different banks.
    #[tracing::instrument(skip(self, principal), fields(caller = %principal.id))]
    pub async fn transfer(
        &self,
        principal: &Principal,
        from_account_id: Uuid,
        to_account_id: Uuid,
        amount: Decimal,
    ) -> BusinessResult<TransferReceipt> {
        let amount = Amount::new(amount)?;
        if from_account_id == to_account_id {
            return Err(BusinessError::SameAccountTransfer);
        }

        let mut uow = self.ctx.begin().await?;
        let result = apply_transfer(&mut uow, principal, from_account_id, to_account_id, amount).await;
        let result = settle(uow, result).await;

        match &result {
            Ok(receipt) => tracing::info!(
                from = %from_account_id,
                to = %to_account_id,
                %amount,
                interbank = !receipt.ledger_entries.is_empty(),
                "transfer committed"
            ),
            Err(err) => tracing::warn!(
                from = %from_account_id,
                to = %to_account_id,
                %amount,
                error = %err,
                "transfer rolled back"
            ),
        }
        result
    }
}

fn ensure_owner(account: &Account, principal: &Principal) -> BusinessResult<()> {
    if account.is_owned_by(principal.id) {
        Ok(())
    } else {
        Err(BusinessError::not_owner(account.id))
    }
}

/// Write the new balance and refresh the in-memory copy
async fn persist_balance(
    uow: &mut UnitOfWork,
    account: &mut Account,
    new_balance: Decimal,
) -> BusinessResult<()> {
    account.version =
        AccountRepo::update_balance(uow, account.id, new_balance, account.version).await?;
    account.balance = new_balance;
    account.updated_at = Utc::now();
    Ok(())
}

async fn apply_deposit(
    uow: &mut UnitOfWork,
    principal: &Principal,
    account_id: Uuid,
    amount: Amount,
) -> BusinessResult<MovementReceipt> {
    let mut account = AccountRepo::get_active_by_id(uow.conn()?, account_id).await?;
    ensure_owner(&account, principal)?;

    let new_balance = account.credited(amount);
    persist_balance(uow, &mut account, new_balance).await?;

    let transaction = Transaction::deposit(account.id, amount);
    JournalService::record(uow, &transaction).await?;

    let entry =
        LedgerService::post(uow, account.id, amount, EntryType::Credit, "Deposit", None, None)
            .await?;

    Ok(MovementReceipt {
        account,
        transaction,
        ledger_entries: vec![entry],
    })
}

async fn apply_withdraw(
    uow: &mut UnitOfWork,
    principal: &Principal,
    account_id: Uuid,
    amount: Amount,
) -> BusinessResult<MovementReceipt> {
    let mut account = AccountRepo::get_active_by_id(uow.conn()?, account_id).await?;
    ensure_owner(&account, principal)?;

    let new_balance = account.debited(amount)?;
    persist_balance(uow, &mut account, new_balance).await?;

    let transaction = Transaction::withdrawal(account.id, amount);
    JournalService::record(uow, &transaction).await?;

    let entry =
        LedgerService::post(uow, account.id, amount, EntryType::Debit, "Withdraw", None, None)
            .await?;

    Ok(MovementReceipt {
        account,
        transaction,
        ledger_entries: vec![entry],
    })
}

async fn apply_transfer(
    uow: &mut UnitOfWork,
    principal: &Principal,
    from_account_id: Uuid,
    to_account_id: Uuid,
    amount: Amount,
) -> BusinessResult<TransferReceipt> {
    let mut from = AccountRepo::get_active_by_id(uow.conn()?, from_account_id).await?;
    let mut to = AccountRepo::get_active_by_id(uow.conn()?, to_account_id).await?;
    ensure_owner(&from, principal)?;

    let from_balance = from.debited(amount)?;
    let to_balance = to.credited(amount);
    persist_balance(uow, &mut from, from_balance).await?;
    persist_balance(uow, &mut to, to_balance).await?;

    let (outgoing, incoming) = Transaction::transfer_pair(from.id, to.id, amount);
    JournalService::record(uow, &outgoing).await?;
    JournalService::record(uow, &incoming).await?;

    let mut ledger_entries = Vec::new();
    if from.bank_id != to.bank_id {
        let banks = (Some(from.bank_id), Some(to.bank_id));
        let debit = LedgerService::post(
            uow,
            from.id,
            amount,
            EntryType::Debit,
            &format!("Transfer to account {}", to.id),
            banks.0,
            banks.1,
        )
        .await?;
        let credit = LedgerService::post(
            uow,
            to.id,
            amount,
            EntryType::Credit,
            &format!("Transfer from account {}", from.id),
            banks.0,
            banks.1,
        )
        .await?;
        ledger_entries.push(debit);
        ledger_entries.push(credit);
    }

    Ok(TransferReceipt {
        from_account: from,
        to_account: to,
        transactions: vec![outgoing, incoming],
        ledger_entries,
    })
}
