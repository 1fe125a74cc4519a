//! Integration tests for account movements
//!
//! Every test runs against a fresh SQLite file migrated through the normal
//! startup path. Failures inside a unit of work are forced with triggers
//! that abort one specific write.

use bankdesk_business::{
    AccountService, BankService, BusinessError, JournalService, LedgerService, MovementService,
    Principal, ServiceContext,
};
use bankdesk_core::{Customer, EntryType, Role, TransactionKind};
use bankdesk_persistence::{AccountRepo, CustomerRepo, Database, Page, TransactionFilter};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;
use tempfile::TempDir;
use uuid::Uuid;

struct Fixture {
    _dir: TempDir,
    url: String,
    ctx: ServiceContext,
    admin: Principal,
}

async fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}", dir.path().join("bankdesk.db").display());
    let db = Database::init(&url, 4).await.unwrap();
    let ctx = ServiceContext::new(db);
    let admin = seed_customer(&ctx, "admin@bank.test", Role::Admin).await;
    Fixture {
        _dir: dir,
        url,
        ctx,
        admin,
    }
}

async fn seed_customer(ctx: &ServiceContext, email: &str, role: Role) -> Principal {
    let customer = Customer::new("Test", "User", email, "hash", role).unwrap();
    let mut uow = ctx.begin().await.unwrap();
    CustomerRepo::insert(&mut uow, &customer).await.unwrap();
    uow.commit().await.unwrap();
    Principal::new(customer.id, role)
}

async fn seed_bank(f: &Fixture, name: &str) -> Uuid {
    BankService::new(&f.ctx)
        .create(&f.admin, name)
        .await
        .unwrap()
        .id
}

/// Open an account for `owner` and force its starting balance
async fn seed_account(f: &Fixture, owner: &Principal, bank_id: Uuid, balance: Decimal) -> Uuid {
    let account = AccountService::new(&f.ctx)
        .open(owner, None, bank_id)
        .await
        .unwrap();
    sqlx::query("UPDATE accounts SET balance = ? WHERE id = ?")
        .bind(balance.to_string())
        .bind(account.id.to_string())
        .execute(f.ctx.pool())
        .await
        .unwrap();
    account.id
}

async fn balance(f: &Fixture, account_id: Uuid) -> Decimal {
    AccountRepo::get_active_by_id(f.ctx.pool(), account_id)
        .await
        .unwrap()
        .balance
}

async fn count(f: &Fixture, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(f.ctx.pool())
        .await
        .unwrap()
}

async fn install_failure(f: &Fixture, trigger: &str) {
    sqlx::query(trigger).execute(f.ctx.pool()).await.unwrap();
}

/// Balances of every account plus journal and ledger sizes
async fn snapshot(f: &Fixture) -> (Vec<(String, String)>, i64, i64) {
    let balances = sqlx::query_as("SELECT id, balance FROM accounts ORDER BY id")
        .fetch_all(f.ctx.pool())
        .await
        .unwrap();
    (
        balances,
        count(f, "transactions").await,
        count(f, "ledger_entries").await,
    )
}

struct TwoBanks {
    f: Fixture,
    owner: Principal,
    bank1: Uuid,
    bank2: Uuid,
    x: Uuid,
    y: Uuid,
}

/// Account X (bank 1, balance 100) owned by C, account Y (bank 2, balance 0)
async fn two_banks() -> TwoBanks {
    let f = fixture().await;
    let owner = seed_customer(&f.ctx, "c@bank.test", Role::Customer).await;
    let other = seed_customer(&f.ctx, "d@bank.test", Role::Customer).await;
    let bank1 = seed_bank(&f, "First Bank").await;
    let bank2 = seed_bank(&f, "Second Bank").await;
    let x = seed_account(&f, &owner, bank1, dec!(100)).await;
    let y = seed_account(&f, &other, bank2, dec!(0)).await;
    TwoBanks {
        f,
        owner,
        bank1,
        bank2,
        x,
        y,
    }
}

// ============================================================================
// Walkthrough
// ============================================================================

#[tokio::test]
async fn test_deposit_withdraw_transfer_walkthrough() {
    let t = two_banks().await;
    let movements = MovementService::new(&t.f.ctx);

    // Deposit 50
    let receipt = movements.deposit(&t.owner, t.x, dec!(50)).await.unwrap();
    assert_eq!(receipt.account.balance, dec!(150));
    assert_eq!(receipt.transaction.kind, TransactionKind::Deposit);
    assert_eq!(receipt.ledger_entries.len(), 1);
    assert_eq!(receipt.ledger_entries[0].entry_type, EntryType::Credit);
    assert_eq!(receipt.ledger_entries[0].amount.value(), dec!(50));
    assert_eq!(receipt.ledger_entries[0].description, "Deposit");
    assert_eq!(balance(&t.f, t.x).await, dec!(150));
    assert_eq!(count(&t.f, "transactions").await, 1);
    assert_eq!(count(&t.f, "ledger_entries").await, 1);

    // Withdraw 200 fails and changes nothing
    let err = movements.withdraw(&t.owner, t.x, dec!(200)).await.unwrap_err();
    assert!(matches!(err, BusinessError::InsufficientBalance { .. }));
    assert_eq!(balance(&t.f, t.x).await, dec!(150));
    assert_eq!(count(&t.f, "transactions").await, 1);

    // Transfer 100 X -> Y across banks
    let receipt = movements
        .transfer(&t.owner, t.x, t.y, dec!(100))
        .await
        .unwrap();
    assert_eq!(balance(&t.f, t.x).await, dec!(50));
    assert_eq!(balance(&t.f, t.y).await, dec!(100));
    assert_eq!(receipt.transactions.len(), 2);
    assert_eq!(receipt.ledger_entries.len(), 2);
    assert_eq!(count(&t.f, "transactions").await, 3);
    assert_eq!(count(&t.f, "ledger_entries").await, 3);

    let net = LedgerService::new(&t.f.ctx)
        .net_bank_transfer(&t.f.admin, t.bank1, t.bank2)
        .await
        .unwrap();
    assert_eq!(net, dec!(100));
}

#[tokio::test]
async fn test_withdraw_posts_debit() {
    let t = two_banks().await;
    let receipt = MovementService::new(&t.f.ctx)
        .withdraw(&t.owner, t.x, dec!(30.50))
        .await
        .unwrap();

    assert_eq!(receipt.account.balance, dec!(69.50));
    assert_eq!(receipt.account.version, 1);
    assert_eq!(receipt.transaction.kind, TransactionKind::Withdraw);
    let entry = &receipt.ledger_entries[0];
    assert_eq!(entry.entry_type, EntryType::Debit);
    assert_eq!(entry.transaction_type, TransactionKind::Withdraw);
    assert_eq!(entry.description, "Withdraw");
    assert!(entry.bank_from_id.is_none() && entry.bank_to_id.is_none());
}

#[tokio::test]
async fn test_withdraw_entire_balance_reaches_zero() {
    let t = two_banks().await;
    let receipt = MovementService::new(&t.f.ctx)
        .withdraw(&t.owner, t.x, dec!(100))
        .await
        .unwrap();
    assert_eq!(receipt.account.balance, Decimal::ZERO);
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_non_positive_amounts_rejected() {
    let t = two_banks().await;
    let movements = MovementService::new(&t.f.ctx);

    for amount in [dec!(0), dec!(-10)] {
        assert!(matches!(
            movements.deposit(&t.owner, t.x, amount).await,
            Err(BusinessError::InvalidAmount(_))
        ));
        assert!(matches!(
            movements.withdraw(&t.owner, t.x, amount).await,
            Err(BusinessError::InvalidAmount(_))
        ));
        assert!(matches!(
            movements.transfer(&t.owner, t.x, t.y, amount).await,
            Err(BusinessError::InvalidAmount(_))
        ));
    }
    assert_eq!(balance(&t.f, t.x).await, dec!(100));
    assert_eq!(count(&t.f, "transactions").await, 0);
}

#[tokio::test]
async fn test_unknown_account_is_not_found() {
    let t = two_banks().await;
    let movements = MovementService::new(&t.f.ctx);

    assert!(matches!(
        movements.deposit(&t.owner, Uuid::new_v4(), dec!(10)).await,
        Err(BusinessError::NotFound { .. })
    ));
    assert!(matches!(
        movements.transfer(&t.owner, t.x, Uuid::new_v4(), dec!(10)).await,
        Err(BusinessError::NotFound { .. })
    ));
    assert_eq!(balance(&t.f, t.x).await, dec!(100));
}

#[tokio::test]
async fn test_closed_account_cannot_move_money() {
    let t = two_banks().await;
    AccountService::new(&t.f.ctx)
        .close(&t.f.admin, t.y)
        .await
        .unwrap();

    let err = MovementService::new(&t.f.ctx)
        .transfer(&t.owner, t.x, t.y, dec!(10))
        .await
        .unwrap_err();
    assert!(matches!(err, BusinessError::NotFound { .. }));
    assert_eq!(balance(&t.f, t.x).await, dec!(100));
}

#[tokio::test]
async fn test_same_account_transfer_rejected() {
    let t = two_banks().await;
    let err = MovementService::new(&t.f.ctx)
        .transfer(&t.owner, t.x, t.x, dec!(10))
        .await
        .unwrap_err();
    assert!(matches!(err, BusinessError::SameAccountTransfer));

    // Checked before the lookup, so an unknown id is not NotFound
    let ghost = Uuid::new_v4();
    let err = MovementService::new(&t.f.ctx)
        .transfer(&t.owner, ghost, ghost, dec!(10))
        .await
        .unwrap_err();
    assert!(matches!(err, BusinessError::SameAccountTransfer));
}

#[tokio::test]
async fn test_overdrawn_transfer_leaves_both_balances() {
    let t = two_banks().await;
    let err = MovementService::new(&t.f.ctx)
        .transfer(&t.owner, t.x, t.y, dec!(100.01))
        .await
        .unwrap_err();

    assert!(matches!(err, BusinessError::InsufficientBalance { .. }));
    assert_eq!(balance(&t.f, t.x).await, dec!(100));
    assert_eq!(balance(&t.f, t.y).await, dec!(0));
    assert_eq!(count(&t.f, "ledger_entries").await, 0);
}

// ============================================================================
// Ownership
// ============================================================================

#[tokio::test]
async fn test_non_owner_cannot_move_money() {
    let t = two_banks().await;
    let stranger = seed_customer(&t.f.ctx, "e@bank.test", Role::Customer).await;
    let movements = MovementService::new(&t.f.ctx);
    let before = snapshot(&t.f).await;

    assert!(matches!(
        movements.deposit(&stranger, t.x, dec!(10)).await,
        Err(BusinessError::NotOwner { .. })
    ));
    assert!(matches!(
        movements.withdraw(&stranger, t.x, dec!(10)).await,
        Err(BusinessError::NotOwner { .. })
    ));
    assert!(matches!(
        movements.transfer(&stranger, t.x, t.y, dec!(10)).await,
        Err(BusinessError::NotOwner { .. })
    ));
    // Staff do not bypass ownership on movements
    assert!(matches!(
        movements.withdraw(&t.f.admin, t.x, dec!(10)).await,
        Err(BusinessError::NotOwner { .. })
    ));

    assert_eq!(snapshot(&t.f).await, before);
}

#[tokio::test]
async fn test_destination_needs_no_ownership() {
    let t = two_banks().await;
    // Y belongs to someone else; paying into it is allowed
    MovementService::new(&t.f.ctx)
        .transfer(&t.owner, t.x, t.y, dec!(40))
        .await
        .unwrap();
    assert_eq!(balance(&t.f, t.y).await, dec!(40));
}

// ============================================================================
// Ledger shape
// ============================================================================

#[tokio::test]
async fn test_interbank_transfer_posts_matching_pair() {
    let t = two_banks().await;
    let receipt = MovementService::new(&t.f.ctx)
        .transfer(&t.owner, t.x, t.y, dec!(25))
        .await
        .unwrap();

    let debit = &receipt.ledger_entries[0];
    let credit = &receipt.ledger_entries[1];
    assert_eq!(debit.entry_type, EntryType::Debit);
    assert_eq!(credit.entry_type, EntryType::Credit);
    assert_eq!(debit.amount, credit.amount);
    assert_eq!(debit.account_id, Some(t.x));
    assert_eq!(credit.account_id, Some(t.y));
    for entry in [debit, credit] {
        assert_eq!(entry.transaction_type, TransactionKind::Transfer);
        assert_eq!(entry.bank_from_id, Some(t.bank1));
        assert_eq!(entry.bank_to_id, Some(t.bank2));
    }
    assert_eq!(debit.description, format!("Transfer to account {}", t.y));
    assert_eq!(credit.description, format!("Transfer from account {}", t.x));

    let (outgoing, incoming) = (&receipt.transactions[0], &receipt.transactions[1]);
    assert_eq!(outgoing.account_id, t.x);
    assert_eq!(outgoing.related_account_id, Some(t.y));
    assert_eq!(incoming.account_id, t.y);
    assert_eq!(incoming.related_account_id, Some(t.x));
}

#[tokio::test]
async fn test_same_bank_transfer_posts_no_ledger() {
    let t = two_banks().await;
    let z = seed_account(&t.f, &t.owner, t.bank1, dec!(0)).await;

    let receipt = MovementService::new(&t.f.ctx)
        .transfer(&t.owner, t.x, z, dec!(60))
        .await
        .unwrap();

    assert!(receipt.ledger_entries.is_empty());
    assert_eq!(receipt.transactions.len(), 2);
    assert_eq!(count(&t.f, "ledger_entries").await, 0);
    assert_eq!(balance(&t.f, t.x).await, dec!(40));
    assert_eq!(balance(&t.f, z).await, dec!(60));
}

#[tokio::test]
async fn test_net_bank_transfer_is_antisymmetric() {
    let t = two_banks().await;
    let back = seed_customer(&t.f.ctx, "y-owner@bank.test", Role::Customer).await;
    let y2 = seed_account(&t.f, &back, t.bank2, dec!(80)).await;
    let movements = MovementService::new(&t.f.ctx);

    movements.transfer(&t.owner, t.x, t.y, dec!(70)).await.unwrap();
    movements.transfer(&back, y2, t.x, dec!(30)).await.unwrap();
    movements.transfer(&t.owner, t.x, y2, dec!(5.25)).await.unwrap();

    let ledger = LedgerService::new(&t.f.ctx);
    let forward = ledger
        .net_bank_transfer(&t.f.admin, t.bank1, t.bank2)
        .await
        .unwrap();
    let backward = ledger
        .net_bank_transfer(&t.f.admin, t.bank2, t.bank1)
        .await
        .unwrap();

    assert_eq!(forward, dec!(45.25));
    assert_eq!(forward, -backward);
}

#[tokio::test]
async fn test_money_is_conserved_across_transfers() {
    let t = two_banks().await;
    let z = seed_account(&t.f, &t.owner, t.bank2, dec!(15)).await;
    let movements = MovementService::new(&t.f.ctx);

    movements.transfer(&t.owner, t.x, t.y, dec!(20)).await.unwrap();
    movements.transfer(&t.owner, z, t.x, dec!(15)).await.unwrap();
    movements.transfer(&t.owner, t.x, z, dec!(0.01)).await.unwrap();
    let _ = movements.transfer(&t.owner, z, t.y, dec!(1)).await;

    let total = balance(&t.f, t.x).await + balance(&t.f, t.y).await + balance(&t.f, z).await;
    assert_eq!(total, dec!(115));
    for id in [t.x, t.y, z] {
        assert!(balance(&t.f, id).await >= Decimal::ZERO);
    }
}

#[tokio::test]
async fn test_history_lists_newest_first() {
    let t = two_banks().await;
    let movements = MovementService::new(&t.f.ctx);
    movements.deposit(&t.owner, t.x, dec!(1)).await.unwrap();
    movements.withdraw(&t.owner, t.x, dec!(2)).await.unwrap();
    movements.transfer(&t.owner, t.x, t.y, dec!(3)).await.unwrap();

    let history = JournalService::new(&t.f.ctx)
        .history(&t.owner, t.x, TransactionFilter::default(), Page::new(Some(2), None))
        .await
        .unwrap();

    assert_eq!(history.total, 3);
    assert_eq!(history.data.len(), 2);
    assert_eq!(history.data[0].kind, TransactionKind::Transfer);
    assert_eq!(history.data[1].kind, TransactionKind::Withdraw);

    // Y's owner cannot read X's history
    let stranger = seed_customer(&t.f.ctx, "f@bank.test", Role::Customer).await;
    assert!(matches!(
        JournalService::new(&t.f.ctx)
            .history(&stranger, t.x, TransactionFilter::default(), Page::default())
            .await,
        Err(BusinessError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_history_filters_by_kind_and_note() {
    let t = two_banks().await;
    let movements = MovementService::new(&t.f.ctx);
    movements.deposit(&t.owner, t.x, dec!(1)).await.unwrap();
    movements.deposit(&t.owner, t.x, dec!(2)).await.unwrap();
    movements.transfer(&t.owner, t.x, t.y, dec!(3)).await.unwrap();
    let journal = JournalService::new(&t.f.ctx);

    let deposits = TransactionFilter {
        kind: Some(TransactionKind::Deposit),
        ..Default::default()
    };
    let history = journal
        .history(&t.owner, t.x, deposits, Page::default())
        .await
        .unwrap();
    assert_eq!(history.total, 2);
    assert!(history.data.iter().all(|tx| tx.kind == TransactionKind::Deposit));

    // The account id in the filter is always replaced by the path account
    let elsewhere = TransactionFilter {
        account_id: Some(t.y),
        note: Some("TRANSFER TO".into()),
        ..Default::default()
    };
    let history = journal
        .history(&t.owner, t.x, elsewhere, Page::default())
        .await
        .unwrap();
    assert_eq!(history.total, 1);
    assert_eq!(history.data[0].account_id, t.x);

    let all = journal
        .all(&t.f.admin, TransactionFilter::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(all.total, 4);
    assert!(matches!(
        journal
            .all(&t.owner, TransactionFilter::default(), Page::default())
            .await,
        Err(BusinessError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_closed_account_keeps_history() {
    let t = two_banks().await;
    let receipt = MovementService::new(&t.f.ctx)
        .deposit(&t.owner, t.x, dec!(10))
        .await
        .unwrap();
    AccountService::new(&t.f.ctx)
        .close(&t.f.admin, t.x)
        .await
        .unwrap();
    let journal = JournalService::new(&t.f.ctx);

    let history = journal
        .history(&t.f.admin, t.x, TransactionFilter::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(history.total, 1);
    assert_eq!(history.data[0].id, receipt.transaction.id);

    let history = journal
        .history(&t.owner, t.x, TransactionFilter::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(history.total, 1);

    let tx = journal.get(&t.owner, receipt.transaction.id).await.unwrap();
    assert_eq!(tx.account_id, t.x);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_deposits_lose_nothing() {
    let t = two_banks().await;
    let mut handles = Vec::new();
    for _ in 0..20 {
        let ctx = t.f.ctx.clone();
        let owner = t.owner;
        let x = t.x;
        handles.push(tokio::spawn(async move {
            MovementService::new(&ctx).deposit(&owner, x, dec!(1)).await
        }));
    }

    let mut committed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => committed += 1,
            Err(BusinessError::Conflict(_)) => {}
            Err(err) => panic!("unexpected deposit failure: {err:?}"),
        }
    }

    assert!(committed > 0);
    assert_eq!(balance(&t.f, t.x).await, dec!(100) + Decimal::from(committed));
    assert_eq!(count(&t.f, "transactions").await, committed);
    assert_eq!(count(&t.f, "ledger_entries").await, committed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_transfers_conserve_money() {
    let t = two_banks().await;
    let mut handles = Vec::new();
    for _ in 0..10 {
        let ctx = t.f.ctx.clone();
        let (owner, x, y) = (t.owner, t.x, t.y);
        handles.push(tokio::spawn(async move {
            MovementService::new(&ctx).transfer(&owner, x, y, dec!(15)).await
        }));
    }

    let mut committed = 0i64;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => committed += 1,
            Err(BusinessError::InsufficientBalance { .. } | BusinessError::Conflict(_)) => {}
            Err(err) => panic!("unexpected transfer failure: {err:?}"),
        }
    }

    // 100 only covers six transfers of 15
    assert!((1..=6).contains(&committed));
    let x = balance(&t.f, t.x).await;
    let y = balance(&t.f, t.y).await;
    assert_eq!(x, dec!(100) - dec!(15) * Decimal::from(committed));
    assert_eq!(x + y, dec!(100));
    assert!(x >= Decimal::ZERO);
    assert_eq!(count(&t.f, "transactions").await, committed * 2);
    assert_eq!(count(&t.f, "ledger_entries").await, committed * 2);
}

#[tokio::test]
async fn test_held_write_lock_reports_conflict() {
    let t = two_banks().await;
    let impatient = Database::init_with(&t.f.url, 2, Duration::from_millis(50))
        .await
        .unwrap();
    let impatient = ServiceContext::new(impatient);

    let mut holder = t.f.ctx.begin().await.unwrap();
    let err = MovementService::new(&impatient)
        .deposit(&t.owner, t.x, dec!(10))
        .await
        .unwrap_err();
    assert!(matches!(err, BusinessError::Conflict(_)), "got {err:?}");
    holder.rollback().await.unwrap();

    assert_eq!(balance(&t.f, t.x).await, dec!(100));
    MovementService::new(&impatient)
        .deposit(&t.owner, t.x, dec!(10))
        .await
        .unwrap();
    assert_eq!(balance(&t.f, t.x).await, dec!(110));
}

#[tokio::test]
async fn test_cancelled_deposit_changes_nothing() {
    let t = two_banks().await;
    // A ledger insert that spins long enough for the caller to give up
    sqlx::query("CREATE TABLE slow_rows (n INTEGER NOT NULL)")
        .execute(t.f.ctx.pool())
        .await
        .unwrap();
    sqlx::query(
        "WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < 150)          INSERT INTO slow_rows SELECT n FROM seq",
    )
    .execute(t.f.ctx.pool())
    .await
    .unwrap();
    install_failure(
        &t.f,
        "CREATE TRIGGER slow_ledger BEFORE INSERT ON ledger_entries BEGIN          SELECT sum(a.n * b.n * c.n) FROM slow_rows a, slow_rows b, slow_rows c; END",
    )
    .await;
    let before = snapshot(&t.f).await;

    let movements = MovementService::new(&t.f.ctx);
    let outcome = tokio::time::timeout(
        Duration::from_millis(20),
        movements.deposit(&t.owner, t.x, dec!(50)),
    )
    .await;
    assert!(outcome.is_err(), "deposit finished before the timeout");

    // Waits behind the abandoned unit until its rollback releases the lock
    sqlx::query("DROP TRIGGER slow_ledger")
        .execute(t.f.ctx.pool())
        .await
        .unwrap();
    assert_eq!(snapshot(&t.f).await, before);

    movements.deposit(&t.owner, t.x, dec!(5)).await.unwrap();
    assert_eq!(balance(&t.f, t.x).await, dec!(105));
    assert_eq!(count(&t.f, "transactions").await, 1);
    assert_eq!(count(&t.f, "ledger_entries").await, 1);
}

// ============================================================================
// Atomicity - one forced failure per stage
// ============================================================================

async fn assert_rolled_back(f: &Fixture, before: (Vec<(String, String)>, i64, i64), err: BusinessError) {
    assert!(err.is_internal(), "expected store failure, got {err:?}");
    assert_eq!(snapshot(f).await, before);
}

#[tokio::test]
async fn test_deposit_rolls_back_when_journal_fails() {
    let t = two_banks().await;
    install_failure(
        &t.f,
        "CREATE TRIGGER fail_journal BEFORE INSERT ON transactions \
         BEGIN SELECT RAISE(ABORT, 'journal unavailable'); END",
    )
    .await;
    let before = snapshot(&t.f).await;

    let err = MovementService::new(&t.f.ctx)
        .deposit(&t.owner, t.x, dec!(50))
        .await
        .unwrap_err();
    assert_rolled_back(&t.f, before, err).await;
}

#[tokio::test]
async fn test_deposit_rolls_back_when_ledger_fails() {
    let t = two_banks().await;
    install_failure(
        &t.f,
        "CREATE TRIGGER fail_ledger BEFORE INSERT ON ledger_entries \
         BEGIN SELECT RAISE(ABORT, 'ledger unavailable'); END",
    )
    .await;
    let before = snapshot(&t.f).await;

    let err = MovementService::new(&t.f.ctx)
        .deposit(&t.owner, t.x, dec!(50))
        .await
        .unwrap_err();
    assert_rolled_back(&t.f, before, err).await;
}

#[tokio::test]
async fn test_withdraw_rolls_back_when_balance_update_fails() {
    let t = two_banks().await;
    install_failure(
        &t.f,
        "CREATE TRIGGER fail_balance BEFORE UPDATE OF balance ON accounts \
         BEGIN SELECT RAISE(ABORT, 'balance locked'); END",
    )
    .await;
    let before = snapshot(&t.f).await;

    let err = MovementService::new(&t.f.ctx)
        .withdraw(&t.owner, t.x, dec!(50))
        .await
        .unwrap_err();
    assert_rolled_back(&t.f, before, err).await;
}

#[tokio::test]
async fn test_transfer_rolls_back_when_credit_side_fails() {
    let t = two_banks().await;
    install_failure(
        &t.f,
        &format!(
            "CREATE TRIGGER fail_credit BEFORE UPDATE OF balance ON accounts \
             WHEN NEW.id = '{}' BEGIN SELECT RAISE(ABORT, 'destination locked'); END",
            t.y
        ),
    )
    .await;
    let before = snapshot(&t.f).await;

    // The source debit has already been written when this fails
    let err = MovementService::new(&t.f.ctx)
        .transfer(&t.owner, t.x, t.y, dec!(50))
        .await
        .unwrap_err();
    assert_rolled_back(&t.f, before, err).await;
}

#[tokio::test]
async fn test_transfer_rolls_back_when_second_ledger_entry_fails() {
    let t = two_banks().await;
    install_failure(
        &t.f,
        "CREATE TRIGGER fail_credit_entry BEFORE INSERT ON ledger_entries \
         WHEN NEW.entry_type = 'credit' BEGIN SELECT RAISE(ABORT, 'ledger unavailable'); END",
    )
    .await;
    let before = snapshot(&t.f).await;

    let err = MovementService::new(&t.f.ctx)
        .transfer(&t.owner, t.x, t.y, dec!(50))
        .await
        .unwrap_err();
    assert_rolled_back(&t.f, before, err).await;
}

#[tokio::test]
async fn test_transfer_rolls_back_when_journal_fails() {
    let t = two_banks().await;
    install_failure(
        &t.f,
        "CREATE TRIGGER fail_journal BEFORE INSERT ON transactions \
         BEGIN SELECT RAISE(ABORT, 'journal unavailable'); END",
    )
    .await;
    let before = snapshot(&t.f).await;

    let err = MovementService::new(&t.f.ctx)
        .transfer(&t.owner, t.x, t.y, dec!(50))
        .await
        .unwrap_err();
    assert_rolled_back(&t.f, before, err).await;

    // Nothing is wedged: once the failure is gone the same transfer succeeds
    sqlx::query("DROP TRIGGER fail_journal")
        .execute(t.f.ctx.pool())
        .await
        .unwrap();
    MovementService::new(&t.f.ctx)
        .transfer(&t.owner, t.x, t.y, dec!(50))
        .await
        .unwrap();
    assert_eq!(balance(&t.f, t.y).await, dec!(50));
}
