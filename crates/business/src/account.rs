//! Account lifecycle - open, read, list, close
//!
//! Balances are not touched here; see `movement`.

use crate::access::Principal;
use crate::error::{BusinessError, BusinessResult};
use crate::services::{settle, ServiceContext};
use bankdesk_core::Account;
use bankdesk_persistence::{
    AccountFilter, AccountRepo, BankRepo, CustomerRepo, Page, Paginated, UnitOfWork,
};
use uuid::Uuid;

pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Open a zero-balance account at `bank_id`.
    ///
    /// Customers open accounts for themselves; staff and admins may open one
    /// on behalf of `customer_id`.
    pub async fn open(
        &self,
        principal: &Principal,
        customer_id: Option<Uuid>,
        bank_id: Uuid,
    ) -> BusinessResult<Account> {
        let owner_id = match customer_id {
            None => principal.id,
            Some(id) if id == principal.id => id,
            Some(id) => {
                principal.require_back_office("open account for another customer")?;
                id
            }
        };

        let mut uow = self.ctx.begin().await?;
        let result = open_in(&mut uow, owner_id, bank_id).await;
        let account = settle(uow, result).await?;

        tracing::info!(account_id = %account.id, customer_id = %owner_id, %bank_id, "account opened");
        Ok(account)
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> BusinessResult<Account> {
        let account = AccountRepo::get_active_by_id(self.ctx.pool(), id).await?;
        principal.require_owner_or_back_office(account.customer_id, "read account")?;
        Ok(account)
    }

    pub async fn list(
        &self,
        principal: &Principal,
        filter: AccountFilter,
        page: Page,
    ) -> BusinessResult<Paginated<Account>> {
        principal.require_back_office("list accounts")?;
        let pool = self.ctx.pool();
        let data = AccountRepo::list(pool, filter, page).await?;
        let total = AccountRepo::count(pool, filter).await?;
        Ok(Paginated::new(data, total, page))
    }

    /// Soft delete. History and ledger entries stay.
    pub async fn close(&self, principal: &Principal, id: Uuid) -> BusinessResult<()> {
        principal.require_back_office("close account")?;

        let mut uow = self.ctx.begin().await?;
        let result = AccountRepo::deactivate(&mut uow, id)
            .await
            .map_err(BusinessError::from);
        settle(uow, result).await?;

        tracing::info!(account_id = %id, "account closed");
        Ok(())
    }
}

async fn open_in(uow: &mut UnitOfWork, customer_id: Uuid, bank_id: Uuid) -> BusinessResult<Account> {
    CustomerRepo::get_active_by_id(uow.conn()?, customer_id).await?;
    BankRepo::get_active_by_id(uow.conn()?, bank_id).await?;

    let account = Account::open(customer_id, bank_id);
    AccountRepo::insert(uow, &account).await?;
    Ok(account)
}
