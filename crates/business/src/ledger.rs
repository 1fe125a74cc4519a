//! Double-entry ledger
//!
//! Entries are posted inside the movement's unit of work. Queries read
//! straight from the pool and are back-office only.

use crate::access::Principal;
use crate::error::BusinessResult;
use crate::services::ServiceContext;
use bankdesk_core::{Amount, EntryType, LedgerEntry};
use bankdesk_persistence::{LedgerFilter, LedgerRepo, Page, Paginated, UnitOfWork};
use rust_decimal::Decimal;
use uuid::Uuid;

pub struct LedgerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LedgerService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Append one entry. The transaction type is derived from the entry
    /// type and the bank pair.
    pub async fn post(
        uow: &mut UnitOfWork,
        account_id: Uuid,
        amount: Amount,
        entry_type: EntryType,
        description: &str,
        bank_from_id: Option<Uuid>,
        bank_to_id: Option<Uuid>,
    ) -> BusinessResult<LedgerEntry> {
        let entry = LedgerEntry::new(
            account_id,
            amount,
            entry_type,
            description,
            bank_from_id,
            bank_to_id,
        );
        LedgerRepo::insert(uow, &entry).await?;

        tracing::debug!(
            entry_id = %entry.id,
            %account_id,
            entry_type = %entry.entry_type,
            amount = %entry.amount,
            "ledger entry posted"
        );
        Ok(entry)
    }

    /// Same as `post` for callers holding unvalidated values
    pub async fn post_raw(
        uow: &mut UnitOfWork,
        account_id: Uuid,
        amount: Decimal,
        entry_type: &str,
        description: &str,
        bank_from_id: Option<Uuid>,
        bank_to_id: Option<Uuid>,
    ) -> BusinessResult<LedgerEntry> {
        let amount = Amount::new(amount)?;
        let entry_type = EntryType::parse(entry_type)?;
        Self::post(uow, account_id, amount, entry_type, description, bank_from_id, bank_to_id).await
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> BusinessResult<LedgerEntry> {
        principal.require_back_office("read ledger")?;
        Ok(LedgerRepo::get_by_id(self.ctx.pool(), id).await?)
    }

    /// Newest first, narrowed by account, entry type and transaction type
    pub async fn list(
        &self,
        principal: &Principal,
        filter: LedgerFilter,
        page: Page,
    ) -> BusinessResult<Paginated<LedgerEntry>> {
        principal.require_back_office("list ledger")?;
        let pool = self.ctx.pool();
        let data = LedgerRepo::list(pool, &filter, page).await?;
        let total = LedgerRepo::count(pool, &filter).await?;
        Ok(Paginated::new(data, total, page))
    }

    /// Net amount owed from `bank_from_id` to `bank_to_id`: debits tagged
    /// from→to minus debits tagged to→from.
    pub async fn net_bank_transfer(
        &self,
        principal: &Principal,
        bank_from_id: Uuid,
        bank_to_id: Uuid,
    ) -> BusinessResult<Decimal> {
        principal.require_back_office("read interbank position")?;

        // Both sums from one snapshot
        let mut uow = self.ctx.begin().await?;
        let outgoing = LedgerRepo::debit_total(uow.conn()?, bank_from_id, bank_to_id).await?;
        let incoming = LedgerRepo::debit_total(uow.conn()?, bank_to_id, bank_from_id).await?;
        uow.rollback().await?;

        Ok(outgoing - incoming)
    }
}
