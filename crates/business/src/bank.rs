//! Bank management. Writes are admin-only, reads are open to any caller.

use crate::access::Principal;
use crate::error::BusinessResult;
use crate::services::{settle, ServiceContext};
use bankdesk_core::Bank;
use bankdesk_persistence::{AccountRepo, BankFilter, BankRepo, Page, Paginated, UnitOfWork};
use uuid::Uuid;

pub struct BankService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BankService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn create(&self, principal: &Principal, name: &str) -> BusinessResult<Bank> {
        principal.require_admin("create bank")?;
        let bank = Bank::new(name)?;

        let mut uow = self.ctx.begin().await?;
        let result = BankRepo::insert(&mut uow, &bank).await.map_err(Into::into);
        settle(uow, result).await?;

        tracing::info!(bank_id = %bank.id, name = %bank.name, "bank created");
        Ok(bank)
    }

    pub async fn get(&self, id: Uuid) -> BusinessResult<Bank> {
        Ok(BankRepo::get_active_by_id(self.ctx.pool(), id).await?)
    }

    /// Active banks, optionally narrowed by name or abbreviation
    pub async fn list(&self, filter: BankFilter, page: Page) -> BusinessResult<Paginated<Bank>> {
        let pool = self.ctx.pool();
        let data = BankRepo::list(pool, &filter, page).await?;
        let total = BankRepo::count(pool, &filter).await?;
        Ok(Paginated::new(data, total, page))
    }

    /// Rename, recomputing the abbreviation
    pub async fn rename(&self, principal: &Principal, id: Uuid, name: &str) -> BusinessResult<Bank> {
        principal.require_admin("rename bank")?;

        let mut uow = self.ctx.begin().await?;
        let result = rename_in(&mut uow, id, name).await;
        settle(uow, result).await
    }

    /// Soft-delete the bank and close all of its accounts in one unit.
    /// Returns the number of accounts closed.
    pub async fn delete(&self, principal: &Principal, id: Uuid) -> BusinessResult<u64> {
        principal.require_admin("delete bank")?;

        let mut uow = self.ctx.begin().await?;
        let result = delete_in(&mut uow, id).await;
        let closed = settle(uow, result).await?;

        tracing::info!(bank_id = %id, accounts_closed = closed, "bank deleted");
        Ok(closed)
    }
}

async fn rename_in(uow: &mut UnitOfWork, id: Uuid, name: &str) -> BusinessResult<Bank> {
    let mut bank = BankRepo::get_active_by_id(uow.conn()?, id).await?;
    bank.rename(name)?;
    BankRepo::rename(uow, &bank).await?;
    Ok(bank)
}

async fn delete_in(uow: &mut UnitOfWork, id: Uuid) -> BusinessResult<u64> {
    BankRepo::deactivate(uow, id).await?;
    Ok(AccountRepo::deactivate_by_bank(uow, id).await?)
}
