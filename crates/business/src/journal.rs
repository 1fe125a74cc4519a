//! Transaction journal
//!
//! Append-only history of movements. Records are written inside the
//! movement's unit of work and never updated afterwards.

use crate::access::Principal;
use crate::error::BusinessResult;
use crate::services::ServiceContext;
use bankdesk_core::Transaction;
use bankdesk_persistence::{
    AccountRepo, Page, Paginated, TransactionFilter, TransactionRepo, UnitOfWork,
};
use uuid::Uuid;

pub struct JournalService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> JournalService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn record(uow: &mut UnitOfWork, tx: &Transaction) -> BusinessResult<()> {
        TransactionRepo::insert(uow, tx).await?;
        tracing::debug!(
            transaction_id = %tx.id,
            account_id = %tx.account_id,
            kind = %tx.kind.as_str(),
            "journal record appended"
        );
        Ok(())
    }

    /// History of one account, newest first. Owner or back office.
    ///
    /// Closed accounts keep their history. `filter.account_id` is replaced
    /// by `account_id`.
    pub async fn history(
        &self,
        principal: &Principal,
        account_id: Uuid,
        filter: TransactionFilter,
        page: Page,
    ) -> BusinessResult<Paginated<Transaction>> {
        let pool = self.ctx.pool();
        let account = AccountRepo::get_by_id(pool, account_id).await?;
        principal.require_owner_or_back_office(account.customer_id, "read account history")?;

        let filter = TransactionFilter {
            account_id: Some(account_id),
            ..filter
        };
        self.page_of(&filter, page).await
    }

    /// A single record. Customers only see records of their own accounts.
    pub async fn get(&self, principal: &Principal, id: Uuid) -> BusinessResult<Transaction> {
        let pool = self.ctx.pool();
        let tx = TransactionRepo::get_by_id(pool, id).await?;
        if !principal.is_back_office() {
            let account = AccountRepo::get_by_id(pool, tx.account_id).await?;
            principal.require_owner_or_back_office(account.customer_id, "read transaction")?;
        }
        Ok(tx)
    }

    /// Records across all accounts, newest first. Back office only.
    pub async fn all(
        &self,
        principal: &Principal,
        filter: TransactionFilter,
        page: Page,
    ) -> BusinessResult<Paginated<Transaction>> {
        principal.require_back_office("list transactions")?;
        self.page_of(&filter, page).await
    }

    async fn page_of(
        &self,
        filter: &TransactionFilter,
        page: Page,
    ) -> BusinessResult<Paginated<Transaction>> {
        let pool = self.ctx.pool();
        let data = TransactionRepo::list(pool, filter, page).await?;
        let total = TransactionRepo::count(pool, filter).await?;
        Ok(Paginated::new(data, total, page))
    }
}
