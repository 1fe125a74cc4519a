//! API Handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use bankdesk_business::{
    AccountService, BankService, BusinessError, BusinessResult, CustomerService, CustomerUpdate,
    JournalService, LedgerService, MovementService, NewCustomer,
};
use bankdesk_core::{
    Account, Bank, Customer, EntryType, LedgerEntry, Transaction, TransactionKind,
};
use bankdesk_persistence::{
    AccountFilter, BankFilter, CustomerFilter, LedgerFilter, Page, Paginated, TransactionFilter,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Caller;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ============ Response Types ============

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }

    pub fn error(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            data: None,
            error: Some(message.into()),
        })
    }
}

#[derive(Serialize)]
pub struct NetTransfer {
    pub bank_from_id: Uuid,
    pub bank_to_id: Uuid,
    pub net_amount: Decimal,
}

#[derive(Serialize)]
pub struct BankDeleted {
    pub bank_id: Uuid,
    pub accounts_closed: u64,
}

// ============ Request Types ============

#[derive(Deserialize)]
pub struct AmountRequest {
    pub amount: Decimal,
}

#[derive(Deserialize)]
pub struct TransferRequest {
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount: Decimal,
}

#[derive(Deserialize)]
pub struct BankRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct OpenAccountRequest {
    pub bank_id: Uuid,
    pub customer_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct AccountListQuery {
    pub customer_id: Option<Uuid>,
    pub bank_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct JournalQuery {
    pub kind: Option<String>,
    pub note: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl JournalQuery {
    fn filter(&self) -> BusinessResult<TransactionFilter> {
        Ok(TransactionFilter {
            account_id: None,
            kind: parse_optional(self.kind.as_deref(), TransactionKind::parse)?,
            note: self.note.clone(),
            created_from: self.from,
            created_to: self.to,
        })
    }

    fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}

#[derive(Deserialize)]
pub struct LedgerListQuery {
    pub account_id: Option<Uuid>,
    pub entry_type: Option<String>,
    pub transaction_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl LedgerListQuery {
    fn filter(&self) -> BusinessResult<LedgerFilter> {
        Ok(LedgerFilter {
            account_id: self.account_id,
            entry_type: parse_optional(self.entry_type.as_deref(), EntryType::parse)?,
            transaction_type: parse_optional(
                self.transaction_type.as_deref(),
                TransactionKind::parse,
            )?,
        })
    }
}

#[derive(Deserialize)]
pub struct CustomerListQuery {
    pub last_name: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct BankListQuery {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Parse an optional enum query value, reporting unknown values as the domain error
fn parse_optional<T, E>(
    raw: Option<&str>,
    parse: impl Fn(&str) -> Result<T, E>,
) -> BusinessResult<Option<T>>
where
    BusinessError: From<E>,
{
    raw.map(parse).transpose().map_err(BusinessError::from)
}

#[derive(Deserialize)]
pub struct NetTransferQuery {
    pub bank_from_id: Option<Uuid>,
    pub bank_to_id: Option<Uuid>,
}

// ============ Handlers ============

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// --- Movements ---

pub async fn deposit(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiPath(account_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<AmountRequest>,
) -> ApiResult<bankdesk_business::MovementReceipt> {
    let receipt = MovementService::new(&state.ctx)
        .deposit(&caller, account_id, payload.amount)
        .await?;
    Ok(ApiResponse::success(receipt))
}

pub async fn withdraw(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiPath(account_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<AmountRequest>,
) -> ApiResult<bankdesk_business::MovementReceipt> {
    let receipt = MovementService::new(&state.ctx)
        .withdraw(&caller, account_id, payload.amount)
        .await?;
    Ok(ApiResponse::success(receipt))
}

pub async fn transfer(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiJson(payload): ApiJson<TransferRequest>,
) -> ApiResult<bankdesk_business::TransferReceipt> {
    let receipt = MovementService::new(&state.ctx)
        .transfer(
            &caller,
            payload.from_account_id,
            payload.to_account_id,
            payload.amount,
        )
        .await?;
    Ok(ApiResponse::success(receipt))
}

// --- Accounts ---

pub async fn open_account(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiJson(payload): ApiJson<OpenAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = AccountService::new(&state.ctx)
        .open(&caller, payload.customer_id, payload.bank_id)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::success(account)))
}

pub async fn list_accounts(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiQuery(query): ApiQuery<AccountListQuery>,
) -> ApiResult<Paginated<Account>> {
    let filter = AccountFilter {
        customer_id: query.customer_id,
        bank_id: query.bank_id,
    };
    let page = AccountService::new(&state.ctx)
        .list(&caller, filter, Page::new(query.limit, query.offset))
        .await?;
    Ok(ApiResponse::success(page))
}

pub async fn get_account(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Account> {
    let account = AccountService::new(&state.ctx).get(&caller, id).await?;
    Ok(ApiResponse::success(account))
}

pub async fn close_account(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<&'static str> {
    AccountService::new(&state.ctx).close(&caller, id).await?;
    Ok(ApiResponse::success("Account closed"))
}

pub async fn account_history(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<JournalQuery>,
) -> ApiResult<Paginated<Transaction>> {
    let page = JournalService::new(&state.ctx)
        .history(&caller, id, query.filter()?, query.page())
        .await?;
    Ok(ApiResponse::success(page))
}

// --- Journal ---

pub async fn list_transactions(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiQuery(query): ApiQuery<JournalQuery>,
) -> ApiResult<Paginated<Transaction>> {
    let page = JournalService::new(&state.ctx)
        .all(&caller, query.filter()?, query.page())
        .await?;
    Ok(ApiResponse::success(page))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Transaction> {
    let tx = JournalService::new(&state.ctx).get(&caller, id).await?;
    Ok(ApiResponse::success(tx))
}

// --- Ledger ---

pub async fn list_ledgers(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiQuery(query): ApiQuery<LedgerListQuery>,
) -> ApiResult<Paginated<LedgerEntry>> {
    let page = LedgerService::new(&state.ctx)
        .list(&caller, query.filter()?, Page::new(query.limit, query.offset))
        .await?;
    Ok(ApiResponse::success(page))
}

pub async fn get_ledger(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<LedgerEntry> {
    let entry = LedgerService::new(&state.ctx).get(&caller, id).await?;
    Ok(ApiResponse::success(entry))
}

pub async fn net_transfer(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiQuery(query): ApiQuery<NetTransferQuery>,
) -> ApiResult<NetTransfer> {
    let bank_from_id = query
        .bank_from_id
        .ok_or_else(|| ApiError::BadRequest("invalid bank_from_id".to_string()))?;
    let bank_to_id = query
        .bank_to_id
        .ok_or_else(|| ApiError::BadRequest("invalid bank_to_id".to_string()))?;

    let net_amount = LedgerService::new(&state.ctx)
        .net_bank_transfer(&caller, bank_from_id, bank_to_id)
        .await?;
    Ok(ApiResponse::success(NetTransfer {
        bank_from_id,
        bank_to_id,
        net_amount,
    }))
}

// --- Banks ---

pub async fn create_bank(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiJson(payload): ApiJson<BankRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let bank = BankService::new(&state.ctx)
        .create(&caller, &payload.name)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::success(bank)))
}

pub async fn list_banks(
    State(state): State<AppState>,
    _caller: Caller,
    ApiQuery(query): ApiQuery<BankListQuery>,
) -> ApiResult<Paginated<Bank>> {
    let filter = BankFilter {
        name: query.name,
        abbreviation: query.abbreviation,
    };
    let banks = BankService::new(&state.ctx)
        .list(filter, Page::new(query.limit, query.offset))
        .await?;
    Ok(ApiResponse::success(banks))
}

pub async fn get_bank(
    State(state): State<AppState>,
    _caller: Caller,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Bank> {
    let bank = BankService::new(&state.ctx).get(id).await?;
    Ok(ApiResponse::success(bank))
}

pub async fn rename_bank(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<BankRequest>,
) -> ApiResult<Bank> {
    let bank = BankService::new(&state.ctx)
        .rename(&caller, id, &payload.name)
        .await?;
    Ok(ApiResponse::success(bank))
}

pub async fn delete_bank(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<BankDeleted> {
    let accounts_closed = BankService::new(&state.ctx).delete(&caller, id).await?;
    Ok(ApiResponse::success(BankDeleted {
        bank_id: id,
        accounts_closed,
    }))
}

// --- Customers ---

pub async fn create_customer(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiJson(payload): ApiJson<NewCustomer>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = CustomerService::new(&state.ctx)
        .create(&caller, payload)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::success(customer)))
}

pub async fn list_customers(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiQuery(query): ApiQuery<CustomerListQuery>,
) -> ApiResult<Paginated<Customer>> {
    let filter = CustomerFilter {
        last_name: query.last_name,
    };
    let page = CustomerService::new(&state.ctx)
        .list(&caller, filter, Page::new(query.limit, query.offset))
        .await?;
    Ok(ApiResponse::success(page))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Customer> {
    let customer = CustomerService::new(&state.ctx).get(&caller, id).await?;
    Ok(ApiResponse::success(customer))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<CustomerUpdate>,
) -> ApiResult<Customer> {
    let customer = CustomerService::new(&state.ctx)
        .update(&caller, id, payload)
        .await?;
    Ok(ApiResponse::success(customer))
}

pub async fn deactivate_customer(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<&'static str> {
    CustomerService::new(&state.ctx).deactivate(&caller, id).await?;
    Ok(ApiResponse::success("Customer deactivated"))
}
