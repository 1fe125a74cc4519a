//! Repository implementations for SQLite
//!
//! One concrete repository per table. Writes take the `UnitOfWork` they
//! belong to; reads accept any sqlx executor so the same query runs inside
//! a unit (`uow.conn()?`) or straight against the pool.

use crate::error::{PersistenceError, PersistenceResult};
use crate::page::Page;
use crate::sqlite::schema::*;
use crate::uow::UnitOfWork;
use bankdesk_core::{
    Account, Bank, Customer, EntryType, LedgerEntry, Transaction, TransactionKind,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Executor, Sqlite, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// How long a unit waits for another unit's write lock before giving up
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

fn convert_all<R, T>(rows: Vec<R>) -> PersistenceResult<Vec<T>>
where
    T: TryFrom<R, Error = PersistenceError>,
{
    rows.into_iter().map(T::try_from).collect()
}

// ============================================================================
// Customer Repository
// ============================================================================

/// Optional filters for customer listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    /// Case-insensitive substring of the last name
    pub last_name: Option<String>,
}

/// Repository for customers table
pub struct CustomerRepo;

impl CustomerRepo {
    /// Insert a customer; a duplicate email yields `AlreadyExists`
    pub async fn insert(uow: &mut UnitOfWork, customer: &Customer) -> PersistenceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO customers (id, first_name, last_name, email, password_hash, role, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(customer.id.to_string())
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(&customer.password_hash)
        .bind(customer.role.as_str())
        .bind(customer.is_active)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(uow.conn()?)
        .await
        .map_err(|e| PersistenceError::from_write(e, "Customer", &customer.email))?;
        Ok(())
    }

    /// Customer by id, active or not
    pub async fn get_by_id<'e, E>(executor: E, id: Uuid) -> PersistenceResult<Customer>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, CustomerRow>("SELECT * FROM customers WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Customer", &id.to_string()))?
            .try_into()
    }

    pub async fn get_active_by_id<'e, E>(executor: E, id: Uuid) -> PersistenceResult<Customer>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, CustomerRow>("SELECT * FROM customers WHERE id = ? AND is_active = 1")
            .bind(id.to_string())
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Customer", &id.to_string()))?
            .try_into()
    }

    pub async fn get_by_email<'e, E>(executor: E, email: &str) -> PersistenceResult<Option<Customer>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, CustomerRow>("SELECT * FROM customers WHERE email = ?")
            .bind(email.trim().to_lowercase())
            .fetch_optional(executor)
            .await?
            .map(Customer::try_from)
            .transpose()
    }

    /// Write every editable field; the email stays unique
    pub async fn update(uow: &mut UnitOfWork, customer: &Customer) -> PersistenceResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET first_name = ?, last_name = ?, email = ?, role = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(customer.role.as_str())
        .bind(customer.is_active)
        .bind(customer.updated_at)
        .bind(customer.id.to_string())
        .execute(uow.conn()?)
        .await
        .map_err(|e| PersistenceError::from_write(e, "Customer", &customer.email))?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Customer", &customer.id.to_string()));
        }
        Ok(())
    }

    pub async fn list(
        pool: &SqlitePool,
        filter: &CustomerFilter,
        page: Page,
    ) -> PersistenceResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT * FROM customers
            WHERE is_active = 1
              AND (?1 IS NULL OR instr(lower(last_name), lower(?1)) > 0)
            ORDER BY created_at, id
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(filter.last_name.as_deref())
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await?;
        convert_all(rows)
    }

    pub async fn count(pool: &SqlitePool, filter: &CustomerFilter) -> PersistenceResult<i64> {
        let count = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM customers
            WHERE is_active = 1
              AND (?1 IS NULL OR instr(lower(last_name), lower(?1)) > 0)
            "#,
        )
        .bind(filter.last_name.as_deref())
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Soft delete
    pub async fn deactivate(uow: &mut UnitOfWork, id: Uuid) -> PersistenceResult<()> {
        let result = sqlx::query(
            "UPDATE customers SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
        )
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(uow.conn()?)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Customer", &id.to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Bank Repository
// ============================================================================

/// Optional filters for bank listings. Both match case-insensitive substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankFilter {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
}

/// Repository for banks table
pub struct BankRepo;

impl BankRepo {
    pub async fn insert(uow: &mut UnitOfWork, bank: &Bank) -> PersistenceResult<()> {
        sqlx::query(
            "INSERT INTO banks (id, name, abbreviation, is_active, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(bank.id.to_string())
        .bind(&bank.name)
        .bind(&bank.abbreviation)
        .bind(bank.is_active)
        .bind(bank.created_at)
        .execute(uow.conn()?)
        .await
        .map_err(|e| PersistenceError::from_write(e, "Bank", &bank.id.to_string()))?;
        Ok(())
    }

    pub async fn get_active_by_id<'e, E>(executor: E, id: Uuid) -> PersistenceResult<Bank>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, BankRow>("SELECT * FROM banks WHERE id = ? AND is_active = 1")
            .bind(id.to_string())
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Bank", &id.to_string()))?
            .try_into()
    }

    pub async fn list(
        pool: &SqlitePool,
        filter: &BankFilter,
        page: Page,
    ) -> PersistenceResult<Vec<Bank>> {
        let rows = sqlx::query_as::<_, BankRow>(
            r#"
            SELECT * FROM banks
            WHERE is_active = 1
              AND (?1 IS NULL OR instr(lower(name), lower(?1)) > 0)
              AND (?2 IS NULL OR instr(lower(abbreviation), lower(?2)) > 0)
            ORDER BY name, id
            LIMIT ?3 OFFSET ?4
            "#,
        )
        .bind(filter.name.as_deref())
        .bind(filter.abbreviation.as_deref())
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await?;
        convert_all(rows)
    }

    pub async fn count(pool: &SqlitePool, filter: &BankFilter) -> PersistenceResult<i64> {
        let count = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM banks
            WHERE is_active = 1
              AND (?1 IS NULL OR instr(lower(name), lower(?1)) > 0)
              AND (?2 IS NULL OR instr(lower(abbreviation), lower(?2)) > 0)
            "#,
        )
        .bind(filter.name.as_deref())
        .bind(filter.abbreviation.as_deref())
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    pub async fn rename(uow: &mut UnitOfWork, bank: &Bank) -> PersistenceResult<()> {
        let result = sqlx::query(
            "UPDATE banks SET name = ?, abbreviation = ? WHERE id = ? AND is_active = 1",
        )
        .bind(&bank.name)
        .bind(&bank.abbreviation)
        .bind(bank.id.to_string())
        .execute(uow.conn()?)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Bank", &bank.id.to_string()));
        }
        Ok(())
    }

    /// Soft delete
    pub async fn deactivate(uow: &mut UnitOfWork, id: Uuid) -> PersistenceResult<()> {
        let result = sqlx::query("UPDATE banks SET is_active = 0 WHERE id = ? AND is_active = 1")
            .bind(id.to_string())
            .execute(uow.conn()?)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Bank", &id.to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Account Repository
// ============================================================================

/// Optional filters for account listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountFilter {
    pub customer_id: Option<Uuid>,
    pub bank_id: Option<Uuid>,
}

/// Repository for accounts table
pub struct AccountRepo;

impl AccountRepo {
    pub async fn insert(uow: &mut UnitOfWork, account: &Account) -> PersistenceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, customer_id, bank_id, balance, is_active, version, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(account.id.to_string())
        .bind(account.customer_id.to_string())
        .bind(account.bank_id.to_string())
        .bind(account.balance.to_string())
        .bind(account.is_active)
        .bind(account.version)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(uow.conn()?)
        .await
        .map_err(|e| PersistenceError::from_write(e, "Account", &account.id.to_string()))?;
        Ok(())
    }

    /// Account by id including closed ones, for reading history
    pub async fn get_by_id<'e, E>(executor: E, id: Uuid) -> PersistenceResult<Account>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Account", &id.to_string()))?
            .try_into()
    }

    /// Active account by id; soft-deleted accounts are `NotFound`
    pub async fn get_active_by_id<'e, E>(executor: E, id: Uuid) -> PersistenceResult<Account>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE id = ? AND is_active = 1")
            .bind(id.to_string())
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Account", &id.to_string()))?
            .try_into()
    }

    /// Write a new balance if the row is still at `expected_version`.
    ///
    /// Returns the new version. A version mismatch on a live account is
    /// reported as `ConcurrentUpdate`.
    pub async fn update_balance(
        uow: &mut UnitOfWork,
        id: Uuid,
        new_balance: Decimal,
        expected_version: i64,
    ) -> PersistenceResult<i64> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET balance = ?, version = version + 1, updated_at = ?
            WHERE id = ? AND version = ? AND is_active = 1
            "#,
        )
        .bind(new_balance.to_string())
        .bind(Utc::now())
        .bind(id.to_string())
        .bind(expected_version)
        .execute(uow.conn()?)
        .await?;

        if result.rows_affected() == 0 {
            // Either gone (NotFound) or moved on under us
            Self::get_active_by_id(uow.conn()?, id).await?;
            return Err(PersistenceError::concurrent_update("Account", &id.to_string()));
        }
        Ok(expected_version + 1)
    }

    pub async fn list(
        pool: &SqlitePool,
        filter: AccountFilter,
        page: Page,
    ) -> PersistenceResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT * FROM accounts
            WHERE is_active = 1
              AND (?1 IS NULL OR customer_id = ?1)
              AND (?2 IS NULL OR bank_id = ?2)
            ORDER BY created_at, id
            LIMIT ?3 OFFSET ?4
            "#,
        )
        .bind(filter.customer_id.map(|id| id.to_string()))
        .bind(filter.bank_id.map(|id| id.to_string()))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await?;
        convert_all(rows)
    }

    pub async fn count(pool: &SqlitePool, filter: AccountFilter) -> PersistenceResult<i64> {
        let count = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM accounts
            WHERE is_active = 1
              AND (?1 IS NULL OR customer_id = ?1)
              AND (?2 IS NULL OR bank_id = ?2)
            "#,
        )
        .bind(filter.customer_id.map(|id| id.to_string()))
        .bind(filter.bank_id.map(|id| id.to_string()))
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Soft delete
    pub async fn deactivate(uow: &mut UnitOfWork, id: Uuid) -> PersistenceResult<()> {
        let result = sqlx::query(
            "UPDATE accounts SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
        )
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(uow.conn()?)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Account", &id.to_string()));
        }
        Ok(())
    }

    /// Deactivate every account of a bank, returns how many were closed
    pub async fn deactivate_by_bank(uow: &mut UnitOfWork, bank_id: Uuid) -> PersistenceResult<u64> {
        let result = sqlx::query(
            "UPDATE accounts SET is_active = 0, updated_at = ? WHERE bank_id = ? AND is_active = 1",
        )
        .bind(Utc::now())
        .bind(bank_id.to_string())
        .execute(uow.conn()?)
        .await?;
        Ok(result.rows_affected())
    }
}

// ============================================================================
// Transaction Repository (journal)
// ============================================================================

/// Optional filters for journal listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub account_id: Option<Uuid>,
    pub kind: Option<TransactionKind>,
    /// Case-insensitive substring of the note
    pub note: Option<String>,
    /// Inclusive lower bound on `created_at`
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`
    pub created_to: Option<DateTime<Utc>>,
}

/// Repository for transactions table. Append-only: there is no update.
pub struct TransactionRepo;

impl TransactionRepo {
    pub async fn insert(uow: &mut UnitOfWork, tx: &Transaction) -> PersistenceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, account_id, related_account_id, amount, kind, note, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(tx.id.to_string())
        .bind(tx.account_id.to_string())
        .bind(tx.related_account_id.map(|id| id.to_string()))
        .bind(tx.amount.to_string())
        .bind(tx.kind.as_str())
        .bind(&tx.note)
        .bind(tx.created_at)
        .execute(uow.conn()?)
        .await?;
        Ok(())
    }

    pub async fn get_by_id<'e, E>(executor: E, id: Uuid) -> PersistenceResult<Transaction>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, TransactionRow>(
            "SELECT * FROM transactions WHERE id = ? AND is_deleted = 0",
        )
        .bind(id.to_string())
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| PersistenceError::not_found("Transaction", &id.to_string()))?
        .try_into()
    }

    /// Matching records, newest first
    pub async fn list(
        pool: &SqlitePool,
        filter: &TransactionFilter,
        page: Page,
    ) -> PersistenceResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT * FROM transactions
            WHERE is_deleted = 0
              AND (?1 IS NULL OR account_id = ?1)
              AND (?2 IS NULL OR kind = ?2)
              AND (?3 IS NULL OR instr(lower(note), lower(?3)) > 0)
              AND (?4 IS NULL OR created_at >= ?4)
              AND (?5 IS NULL OR created_at <= ?5)
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?6 OFFSET ?7
            "#,
        )
        .bind(filter.account_id.map(|id| id.to_string()))
        .bind(filter.kind.map(|kind| kind.as_str()))
        .bind(filter.note.as_deref())
        .bind(filter.created_from)
        .bind(filter.created_to)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await?;
        convert_all(rows)
    }

    pub async fn count(pool: &SqlitePool, filter: &TransactionFilter) -> PersistenceResult<i64> {
        let count = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM transactions
            WHERE is_deleted = 0
              AND (?1 IS NULL OR account_id = ?1)
              AND (?2 IS NULL OR kind = ?2)
              AND (?3 IS NULL OR instr(lower(note), lower(?3)) > 0)
              AND (?4 IS NULL OR created_at >= ?4)
              AND (?5 IS NULL OR created_at <= ?5)
            "#,
        )
        .bind(filter.account_id.map(|id| id.to_string()))
        .bind(filter.kind.map(|kind| kind.as_str()))
        .bind(filter.note.as_deref())
        .bind(filter.created_from)
        .bind(filter.created_to)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}

// ============================================================================
// Ledger Repository
// ============================================================================

/// Optional filters for ledger listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerFilter {
    pub account_id: Option<Uuid>,
    pub entry_type: Option<EntryType>,
    pub transaction_type: Option<TransactionKind>,
}

/// Repository for ledger_entries table
pub struct LedgerRepo;

impl LedgerRepo {
    pub async fn insert(uow: &mut UnitOfWork, entry: &LedgerEntry) -> PersistenceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO ledger_entries (id, account_id, bank_from_id, bank_to_id, amount, transaction_type, entry_type, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.account_id.map(|id| id.to_string()))
        .bind(entry.bank_from_id.map(|id| id.to_string()))
        .bind(entry.bank_to_id.map(|id| id.to_string()))
        .bind(entry.amount.to_string())
        .bind(entry.transaction_type.as_str())
        .bind(entry.entry_type.as_str())
        .bind(&entry.description)
        .bind(entry.created_at)
        .execute(uow.conn()?)
        .await?;
        Ok(())
    }

    pub async fn get_by_id<'e, E>(executor: E, id: Uuid) -> PersistenceResult<LedgerEntry>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, LedgerRow>("SELECT * FROM ledger_entries WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("LedgerEntry", &id.to_string()))?
            .try_into()
    }

    pub async fn list(
        pool: &SqlitePool,
        filter: &LedgerFilter,
        page: Page,
    ) -> PersistenceResult<Vec<LedgerEntry>> {
        let rows = sqlx::query_as::<_, LedgerRow>(
            r#"
            SELECT * FROM ledger_entries
            WHERE (?1 IS NULL OR account_id = ?1)
              AND (?2 IS NULL OR entry_type = ?2)
              AND (?3 IS NULL OR transaction_type = ?3)
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?4 OFFSET ?5
            "#,
        )
        .bind(filter.account_id.map(|id| id.to_string()))
        .bind(filter.entry_type.map(|t| t.as_str()))
        .bind(filter.transaction_type.map(|t| t.as_str()))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await?;
        convert_all(rows)
    }

    pub async fn count(pool: &SqlitePool, filter: &LedgerFilter) -> PersistenceResult<i64> {
        let count = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM ledger_entries
            WHERE (?1 IS NULL OR account_id = ?1)
              AND (?2 IS NULL OR entry_type = ?2)
              AND (?3 IS NULL OR transaction_type = ?3)
            "#,
        )
        .bind(filter.account_id.map(|id| id.to_string()))
        .bind(filter.entry_type.map(|t| t.as_str()))
        .bind(filter.transaction_type.map(|t| t.as_str()))
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Sum of debit entries tagged `bank_from -> bank_to`.
    ///
    /// Amounts are TEXT, so the sum is done in Decimal rather than by SQLite.
    pub async fn debit_total<'e, E>(
        executor: E,
        bank_from_id: Uuid,
        bank_to_id: Uuid,
    ) -> PersistenceResult<Decimal>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let amounts: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT amount FROM ledger_entries
            WHERE bank_from_id = ? AND bank_to_id = ? AND entry_type = 'debit'
            "#,
        )
        .bind(bank_from_id.to_string())
        .bind(bank_to_id.to_string())
        .fetch_all(executor)
        .await?;

        amounts
            .iter()
            .try_fold(Decimal::ZERO, |acc, raw| -> PersistenceResult<Decimal> {
                Ok(acc + parse_decimal(raw)?)
            })
    }
}

// ============================================================================
// Database initialization
// ============================================================================

/// Create the connection pool; the database file is created if missing
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
    busy_timeout: Duration,
) -> PersistenceResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Run migrations
pub async fn run_migrations(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Connect and bring the schema up to date
pub async fn init_database(
    database_url: &str,
    max_connections: u32,
    busy_timeout: Duration,
) -> PersistenceResult<SqlitePool> {
    let pool = create_pool(database_url, max_connections, busy_timeout).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
