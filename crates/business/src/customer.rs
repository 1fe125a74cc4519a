//! Customer management (back office)
//!
//! Credentials are not handled here: the password hash arrives already
//! computed by the external auth service.

use crate::access::Principal;
use crate::error::{BusinessError, BusinessResult};
use crate::services::{settle, ServiceContext};
use bankdesk_core::{Customer, Role};
use bankdesk_persistence::{CustomerFilter, CustomerRepo, Page, Paginated, UnitOfWork};
use serde::Deserialize;
use uuid::Uuid;

/// Input for `CustomerService::create`
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Customer
}

/// Input for `CustomerService::update`. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl CustomerUpdate {
    fn apply(self, customer: &mut Customer) -> BusinessResult<()> {
        if let Some(first_name) = self.first_name {
            customer.set_first_name(&first_name)?;
        }
        if let Some(last_name) = self.last_name {
            customer.set_last_name(&last_name)?;
        }
        if let Some(email) = self.email {
            customer.set_email(&email)?;
        }
        if let Some(role) = self.role {
            customer.set_role(role);
        }
        if let Some(active) = self.is_active {
            customer.set_active(active);
        }
        Ok(())
    }
}

pub struct CustomerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CustomerService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Staff may register customers; only admins may create staff or admins.
    pub async fn create(&self, principal: &Principal, input: NewCustomer) -> BusinessResult<Customer> {
        principal.require_back_office("create customer")?;
        if input.role.is_back_office() {
            principal.require_admin("create back-office user")?;
        }

        let customer = Customer::new(
            &input.first_name,
            &input.last_name,
            &input.email,
            &input.password_hash,
            input.role,
        )?;

        let mut uow = self.ctx.begin().await?;
        let result = create_in(&mut uow, &customer).await;
        settle(uow, result).await?;

        tracing::info!(customer_id = %customer.id, role = %customer.role, "customer created");
        Ok(customer)
    }

    /// Customers may read themselves
    pub async fn get(&self, principal: &Principal, id: Uuid) -> BusinessResult<Customer> {
        principal.require_owner_or_back_office(id, "read customer")?;
        Ok(CustomerRepo::get_active_by_id(self.ctx.pool(), id).await?)
    }

    pub async fn list(
        &self,
        principal: &Principal,
        filter: CustomerFilter,
        page: Page,
    ) -> BusinessResult<Paginated<Customer>> {
        principal.require_back_office("list customers")?;
        let pool = self.ctx.pool();
        let data = CustomerRepo::list(pool, &filter, page).await?;
        let total = CustomerRepo::count(pool, &filter).await?;
        Ok(Paginated::new(data, total, page))
    }

    /// Edit names, email, role or active flag. Back office only; a staff or
    /// admin record can only be touched by an admin, and so can a role change
    /// into the back office.
    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        changes: CustomerUpdate,
    ) -> BusinessResult<Customer> {
        principal.require_back_office("update customer")?;
        if changes.role.as_ref().is_some_and(Role::is_back_office) {
            principal.require_admin("grant back-office role")?;
        }

        let mut uow = self.ctx.begin().await?;
        let result = update_in(&mut uow, principal, id, changes).await;
        let customer = settle(uow, result).await?;

        tracing::info!(customer_id = %customer.id, role = %customer.role, "customer updated");
        Ok(customer)
    }

    pub async fn deactivate(&self, principal: &Principal, id: Uuid) -> BusinessResult<()> {
        principal.require_back_office("deactivate customer")?;

        let mut uow = self.ctx.begin().await?;
        let result = CustomerRepo::deactivate(&mut uow, id)
            .await
            .map_err(BusinessError::from);
        settle(uow, result).await?;

        tracing::info!(customer_id = %id, "customer deactivated");
        Ok(())
    }
}

async fn create_in(uow: &mut UnitOfWork, customer: &Customer) -> BusinessResult<()> {
    if CustomerRepo::get_by_email(uow.conn()?, &customer.email)
        .await?
        .is_some()
    {
        return Err(BusinessError::AlreadyExists {
            entity: "Customer".to_string(),
            id: customer.email.clone(),
        });
    }
    CustomerRepo::insert(uow, customer).await?;
    Ok(())
}

async fn update_in(
    uow: &mut UnitOfWork,
    principal: &Principal,
    id: Uuid,
    changes: CustomerUpdate,
) -> BusinessResult<Customer> {
    let mut customer = CustomerRepo::get_by_id(uow.conn()?, id).await?;
    if customer.role.is_back_office() {
        principal.require_admin("update back-office user")?;
    }
    changes.apply(&mut customer)?;
    CustomerRepo::update(uow, &customer).await?;
    Ok(customer)
}
