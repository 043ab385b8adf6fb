//! Integration tests exercising the ledger against the real LMDB backend:
//! grants → consumption → persistence → reopen → readback.
//!
//! These tests wire together components that are normally only connected
//! inside the app shell, verifying the system works end-to-end — not just
//! in isolation.

use std::sync::Arc;

use arcana_ledger::{AccountScope, CreditLedger, Entitlements};
use arcana_store_lmdb::LmdbEnvironment;
use arcana_types::{AccountId, BalanceReading, EntrySource, WalletAddress};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const WALLET: &str = "4Nd1mYvK7R2ZqpJcW8sThU6eDxGaBfLvMwPnQrSty9Ej";

fn temp_env() -> (tempfile::TempDir, Arc<LmdbEnvironment>) {
    let dir = tempfile::tempdir().expect("temp dir");
    let env = LmdbEnvironment::open(dir.path()).expect("open env");
    (dir, Arc::new(env))
}

fn wallet_scope() -> AccountId {
    AccountId::Wallet(WalletAddress::parse(WALLET).unwrap())
}

// ---------------------------------------------------------------------------
// 1. Balance survives a reopen
// ---------------------------------------------------------------------------

#[tokio::test]
async fn balance_survives_environment_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let scope = wallet_scope();

    {
        let env = Arc::new(LmdbEnvironment::open(dir.path()).expect("open env"));
        let ledger = CreditLedger::new(env, Entitlements::none());
        ledger
            .grant(&scope, 20, EntrySource::StorePurchase, Some("gpa.1234".into()), None)
            .await
            .unwrap();
        ledger.consume(&scope, 3, "reading:first").await.unwrap();
    }

    let env = Arc::new(LmdbEnvironment::open(dir.path()).expect("reopen env"));
    let ledger = CreditLedger::new(env, Entitlements::none());
    assert_eq!(ledger.balance(&scope).unwrap(), BalanceReading::Credits(17));

    let entries = ledger.full_ledger(&scope).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].source, EntrySource::StorePurchase);
    assert_eq!(entries[0].reference.as_deref(), Some("gpa.1234"));
    assert_eq!(entries[1].source, EntrySource::Consumption);
}

// ---------------------------------------------------------------------------
// 2. Retention at the real 1000-entry cap
// ---------------------------------------------------------------------------

#[tokio::test]
async fn retention_cap_trims_entries_but_not_the_balance() {
    let (_dir, env) = temp_env();
    let ledger = CreditLedger::new(env, Entitlements::none());
    let scope = wallet_scope();

    // 1100 single-credit grants push 100 entries past the cap.
    for _ in 0..1100 {
        ledger
            .grant(&scope, 1, EntrySource::ChainPayment, None, None)
            .await
            .unwrap();
    }

    assert_eq!(
        ledger.balance(&scope).unwrap(),
        BalanceReading::Credits(1100)
    );
    let retained = ledger.full_ledger(&scope).unwrap();
    assert_eq!(retained.len(), 1000);
    // The oldest 100 entries were trimmed; ids continue uninterrupted.
    assert_eq!(retained.first().unwrap().id.0, 101);
    assert_eq!(retained.last().unwrap().id.0, 1100);

    let recent = ledger.recent_entries(&scope, 5).unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0].id.0, 1100);
}

// ---------------------------------------------------------------------------
// 3. Concurrent mutations against real storage
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_grants_hit_lmdb_without_lost_updates() {
    let (_dir, env) = temp_env();
    let ledger = Arc::new(CreditLedger::new(env, Entitlements::none()));
    let scope = wallet_scope();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let ledger = ledger.clone();
        let scope = scope.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..5 {
                ledger
                    .grant(&scope, 2, EntrySource::ChainPayment, None, None)
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(
        ledger.balance(&scope).unwrap(),
        BalanceReading::Credits(8 * 5 * 2)
    );
    assert_eq!(ledger.entry_count(&scope).unwrap(), 40);
}

// ---------------------------------------------------------------------------
// 4. Scope resolution across a restart
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scope_and_credits_survive_a_restart_together() {
    let dir = tempfile::tempdir().expect("temp dir");
    let wallet = WalletAddress::parse(WALLET).unwrap();

    {
        let env = Arc::new(LmdbEnvironment::open(dir.path()).expect("open env"));
        let scope = AccountScope::restore(env.clone()).unwrap();
        scope.set_current(wallet.clone()).unwrap();

        let ledger = CreditLedger::new(env, Entitlements::none());
        let account = scope.resolve(None);
        ledger
            .grant(&account, 5, EntrySource::ChainPayment, Some("sig".into()), None)
            .await
            .unwrap();
    }

    // After "restart", the same wallet resolves and still owns its credits.
    let env = Arc::new(LmdbEnvironment::open(dir.path()).expect("reopen env"));
    let scope = AccountScope::restore(env.clone()).unwrap();
    assert_eq!(scope.current(), Some(wallet.clone()));

    let ledger = CreditLedger::new(env, Entitlements::none());
    let account = scope.resolve(None);
    assert_eq!(account, AccountId::Wallet(wallet));
    assert_eq!(ledger.balance(&account).unwrap(), BalanceReading::Credits(5));

    // The fallback bucket was never touched.
    assert_eq!(
        ledger.balance(&AccountId::Fallback).unwrap(),
        BalanceReading::Credits(0)
    );
}

// ---------------------------------------------------------------------------
// 5. Disconnect isolates the old scope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn disconnect_leaves_wallet_credits_parked_not_merged() {
    let (_dir, env) = temp_env();
    let wallet = WalletAddress::parse(WALLET).unwrap();
    let scope = AccountScope::restore(env.clone()).unwrap();
    let ledger = CreditLedger::new(env, Entitlements::none());

    scope.set_current(wallet.clone()).unwrap();
    let account = scope.resolve(None);
    ledger
        .grant(&account, 9, EntrySource::ChainPayment, None, None)
        .await
        .unwrap();

    scope.clear_current().unwrap();
    let after = scope.resolve(None);
    assert_eq!(after, AccountId::Fallback);
    assert_eq!(ledger.balance(&after).unwrap(), BalanceReading::Credits(0));

    // The wallet's credits still exist under its own scope.
    assert_eq!(
        ledger.balance(&AccountId::Wallet(wallet)).unwrap(),
        BalanceReading::Credits(9)
    );
}
