// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SQLite persistence for wallets, categories, transactions and settings.
//!
//! Amounts are stored as decimal strings and timestamps as RFC 3339 text.
//! An `id` of 0 on upsert means "insert a new row".

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::error::{StoreError, StoreResult};
use crate::models::{
    Category, MAX_AMOUNT, RepeatingInterval, Subscription, Transaction, TransactionWithCategory,
    Wallet, WalletWithTransactions,
};

const PRIMARY_WALLET_KEY: &str = "primary_wallet_id";
const DEFAULT_CURRENCY_KEY: &str = "default_currency";

fn parse_amount(s: &str) -> StoreResult<Decimal> {
    s.parse::<Decimal>()
        .map_err(|_| StoreError::InvalidAmount(s.to_string()))
}

fn check_amount(amount: Decimal) -> StoreResult<()> {
    if amount.abs() > *MAX_AMOUNT {
        return Err(StoreError::InvalidAmount(amount.to_string()));
    }
    Ok(())
}

fn parse_ts(s: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| StoreError::InvalidTimestamp(s.to_string()))
}

// ---- settings ----

pub fn get_setting(conn: &Connection, key: &str) -> StoreResult<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn primary_wallet_id(conn: &Connection) -> StoreResult<Option<i64>> {
    let raw = get_setting(conn, PRIMARY_WALLET_KEY)?;
    Ok(raw.and_then(|s| match s.parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => {
            tracing::warn!(value = %s, "ignoring malformed primary wallet id");
            None
        }
    }))
}

/// `None` clears the preference.
pub fn set_primary_wallet_id(conn: &Connection, id: Option<i64>) -> StoreResult<()> {
    match id {
        Some(id) => set_setting(conn, PRIMARY_WALLET_KEY, &id.to_string()),
        None => {
            conn.execute(
                "DELETE FROM settings WHERE key=?1",
                params![PRIMARY_WALLET_KEY],
            )?;
            Ok(())
        }
    }
}

pub fn default_currency(conn: &Connection) -> StoreResult<String> {
    Ok(get_setting(conn, DEFAULT_CURRENCY_KEY)?.unwrap_or_else(|| "USD".to_string()))
}

pub fn set_default_currency(conn: &Connection, ccy: &str) -> StoreResult<()> {
    set_setting(conn, DEFAULT_CURRENCY_KEY, &ccy.to_uppercase())
}

// ---- wallets ----

fn wallet_from_row(r: &Row<'_>) -> rusqlite::Result<(i64, String, String, String)> {
    Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?))
}

fn into_wallet(raw: (i64, String, String, String)) -> StoreResult<Wallet> {
    let (id, title, balance, currency) = raw;
    Ok(Wallet {
        id,
        title,
        initial_balance: parse_amount(&balance)?,
        currency,
    })
}

pub fn upsert_wallet(conn: &Connection, wallet: &Wallet) -> StoreResult<i64> {
    check_amount(wallet.initial_balance)?;
    if wallet.id == 0 {
        conn.execute(
            "INSERT INTO wallets(title, initial_balance, currency) VALUES (?1, ?2, ?3)",
            params![
                wallet.title,
                wallet.initial_balance.to_string(),
                wallet.currency.to_uppercase()
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::info!(wallet_id = id, title = %wallet.title, "wallet created");
        return Ok(id);
    }
    let n = conn.execute(
        "UPDATE wallets SET title=?1, initial_balance=?2, currency=?3 WHERE id=?4",
        params![
            wallet.title,
            wallet.initial_balance.to_string(),
            wallet.currency.to_uppercase(),
            wallet.id
        ],
    )?;
    if n == 0 {
        return Err(StoreError::WalletNotFound(wallet.id));
    }
    tracing::info!(wallet_id = wallet.id, "wallet updated");
    Ok(wallet.id)
}

pub fn get_wallet(conn: &Connection, id: i64) -> StoreResult<Wallet> {
    let raw = conn
        .query_row(
            "SELECT id, title, initial_balance, currency FROM wallets WHERE id=?1",
            params![id],
            wallet_from_row,
        )
        .optional()?
        .ok_or(StoreError::WalletNotFound(id))?;
    into_wallet(raw)
}

pub fn list_wallets(conn: &Connection) -> StoreResult<Vec<Wallet>> {
    let mut stmt =
        conn.prepare("SELECT id, title, initial_balance, currency FROM wallets ORDER BY id")?;
    let rows = stmt.query_map([], wallet_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(into_wallet(row?)?);
    }
    Ok(out)
}

/// Removes the wallet and its transactions. The primary wallet preference is
/// cleared when it pointed at this wallet. All or nothing.
pub fn delete_wallet_with_transactions(conn: &Connection, id: i64) -> StoreResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM transactions WHERE wallet_id=?1", params![id])?;
    let n = tx.execute("DELETE FROM wallets WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(StoreError::WalletNotFound(id));
    }
    let cleared = primary_wallet_id(&tx)? == Some(id);
    if cleared {
        set_primary_wallet_id(&tx, None)?;
    }
    tx.commit()?;
    if cleared {
        tracing::info!(wallet_id = id, "primary wallet cleared");
    }
    tracing::info!(wallet_id = id, "wallet deleted");
    Ok(())
}

pub fn wallet_with_transactions(
    conn: &Connection,
    id: i64,
) -> StoreResult<WalletWithTransactions> {
    let wallet = get_wallet(conn, id)?;
    let transactions = transactions_for_wallet(conn, id)?;
    Ok(WalletWithTransactions {
        wallet,
        transactions,
    })
}

pub fn wallets_with_transactions(conn: &Connection) -> StoreResult<Vec<WalletWithTransactions>> {
    let mut out = Vec::new();
    for wallet in list_wallets(conn)? {
        let transactions = transactions_for_wallet(conn, wallet.id)?;
        out.push(WalletWithTransactions {
            wallet,
            transactions,
        });
    }
    Ok(out)
}

// ---- categories ----

pub fn upsert_category(conn: &Connection, category: &Category) -> StoreResult<i64> {
    if category.id == 0 {
        conn.execute(
            "INSERT INTO categories(title, icon_id) VALUES (?1, ?2)",
            params![category.title, category.icon_id],
        )?;
        let id = conn.last_insert_rowid();
        tracing::info!(category_id = id, title = %category.title, "category created");
        return Ok(id);
    }
    let n = conn.execute(
        "UPDATE categories SET title=?1, icon_id=?2 WHERE id=?3",
        params![category.title, category.icon_id, category.id],
    )?;
    if n == 0 {
        return Err(StoreError::CategoryNotFound(category.id.to_string()));
    }
    tracing::info!(category_id = category.id, "category updated");
    Ok(category.id)
}

pub fn category_by_title(conn: &Connection, title: &str) -> StoreResult<Category> {
    conn.query_row(
        "SELECT id, title, icon_id FROM categories WHERE title=?1",
        params![title],
        |r| {
            Ok(Category {
                id: r.get(0)?,
                title: r.get(1)?,
                icon_id: r.get(2)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| StoreError::CategoryNotFound(title.to_string()))
}

pub fn list_categories(conn: &Connection) -> StoreResult<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, title, icon_id FROM categories ORDER BY title")?;
    let rows = stmt.query_map([], |r| {
        Ok(Category {
            id: r.get(0)?,
            title: r.get(1)?,
            icon_id: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Dependent transactions keep existing and lose their category.
pub fn delete_category(conn: &Connection, id: i64) -> StoreResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE transactions SET category_id=NULL WHERE category_id=?1",
        params![id],
    )?;
    let n = tx.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(StoreError::CategoryNotFound(id.to_string()));
    }
    tx.commit()?;
    tracing::info!(category_id = id, "category deleted");
    Ok(())
}

// ---- transactions ----

const TX_SELECT: &str = "SELECT t.id, t.wallet_id, t.category_id, t.amount, t.description,
            t.timestamp, t.ignored, c.title, c.icon_id
     FROM transactions t LEFT JOIN categories c ON t.category_id=c.id";

type RawTransaction = (
    i64,
    i64,
    Option<i64>,
    String,
    String,
    String,
    bool,
    Option<String>,
    Option<i32>,
);

fn tx_from_row(r: &Row<'_>) -> rusqlite::Result<RawTransaction> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
        r.get(7)?,
        r.get(8)?,
    ))
}

fn into_transaction(raw: RawTransaction) -> StoreResult<TransactionWithCategory> {
    let (id, wallet_id, category_id, amount, description, ts, ignored, title, icon) = raw;
    let category = match (category_id, title) {
        (Some(cid), Some(title)) => Some(Category {
            id: cid,
            title,
            icon_id: icon.unwrap_or_default(),
        }),
        _ => None,
    };
    Ok(TransactionWithCategory {
        transaction: Transaction {
            id,
            wallet_id,
            category_id,
            amount: parse_amount(&amount)?,
            description,
            timestamp: parse_ts(&ts)?,
            ignored,
        },
        category,
    })
}

/// Newest first, as the wallet detail list shows them.
pub fn transactions_for_wallet(
    conn: &Connection,
    wallet_id: i64,
) -> StoreResult<Vec<TransactionWithCategory>> {
    let sql = format!("{TX_SELECT} WHERE t.wallet_id=?1 ORDER BY t.timestamp DESC, t.id DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![wallet_id], tx_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(into_transaction(row?)?);
    }
    tracing::debug!(wallet_id, count = out.len(), "loaded wallet transactions");
    Ok(out)
}

pub fn get_transaction(conn: &Connection, id: i64) -> StoreResult<TransactionWithCategory> {
    let sql = format!("{TX_SELECT} WHERE t.id=?1");
    let raw = conn
        .query_row(&sql, params![id], tx_from_row)
        .optional()?
        .ok_or(StoreError::TransactionNotFound(id))?;
    into_transaction(raw)
}

pub fn upsert_transaction(conn: &Connection, tx: &Transaction) -> StoreResult<i64> {
    check_amount(tx.amount)?;
    // Surface a missing wallet as a typed error rather than a constraint failure.
    get_wallet(conn, tx.wallet_id)?;
    if tx.id == 0 {
        conn.execute(
            "INSERT INTO transactions(
                 wallet_id, category_id, amount, description, timestamp, ignored
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                tx.wallet_id,
                tx.category_id,
                tx.amount.to_string(),
                tx.description,
                tx.timestamp.to_rfc3339(),
                tx.ignored
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::info!(
            transaction_id = id,
            wallet_id = tx.wallet_id,
            amount = %tx.amount,
            "transaction recorded"
        );
        return Ok(id);
    }
    let n = conn.execute(
        "UPDATE transactions
         SET wallet_id=?1, category_id=?2, amount=?3, description=?4, timestamp=?5, ignored=?6
         WHERE id=?7",
        params![
            tx.wallet_id,
            tx.category_id,
            tx.amount.to_string(),
            tx.description,
            tx.timestamp.to_rfc3339(),
            tx.ignored,
            tx.id
        ],
    )?;
    if n == 0 {
        return Err(StoreError::TransactionNotFound(tx.id));
    }
    tracing::info!(transaction_id = tx.id, "transaction updated");
    Ok(tx.id)
}

pub fn delete_transaction(conn: &Connection, id: i64) -> StoreResult<()> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(StoreError::TransactionNotFound(id));
    }
    tracing::info!(transaction_id = id, "transaction deleted");
    Ok(())
}

pub fn set_transaction_ignored(conn: &Connection, id: i64, ignored: bool) -> StoreResult<()> {
    let n = conn.execute(
        "UPDATE transactions SET ignored=?1 WHERE id=?2",
        params![ignored, id],
    )?;
    if n == 0 {
        return Err(StoreError::TransactionNotFound(id));
    }
    Ok(())
}

// ---- subscriptions ----

type RawSubscription = (i64, String, String, String, String, Option<String>);

fn subscription_from_row(r: &Row<'_>) -> rusqlite::Result<RawSubscription> {
    Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?))
}

fn into_subscription(raw: RawSubscription) -> StoreResult<Subscription> {
    let (id, title, amount, currency, date, repeating) = raw;
    let payment_date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| StoreError::InvalidTimestamp(date.clone()))?;
    let repeating = match repeating {
        Some(s) => match s.parse::<RepeatingInterval>() {
            Ok(interval) => Some(interval),
            Err(_) => {
                tracing::warn!(subscription_id = id, value = %s, "ignoring unknown interval");
                None
            }
        },
        None => None,
    };
    Ok(Subscription {
        id,
        title,
        amount: parse_amount(&amount)?,
        currency,
        payment_date,
        repeating,
    })
}

pub fn upsert_subscription(conn: &Connection, sub: &Subscription) -> StoreResult<i64> {
    check_amount(sub.amount)?;
    let date = sub.payment_date.format("%Y-%m-%d").to_string();
    let repeating = sub.repeating.map(|r| r.to_string());
    if sub.id == 0 {
        conn.execute(
            "INSERT INTO subscriptions(title, amount, currency, payment_date, repeating)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                sub.title,
                sub.amount.to_string(),
                sub.currency.to_uppercase(),
                date,
                repeating
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::info!(subscription_id = id, title = %sub.title, "subscription created");
        return Ok(id);
    }
    let n = conn.execute(
        "UPDATE subscriptions SET title=?1, amount=?2, currency=?3, payment_date=?4, repeating=?5
         WHERE id=?6",
        params![
            sub.title,
            sub.amount.to_string(),
            sub.currency.to_uppercase(),
            date,
            repeating,
            sub.id
        ],
    )?;
    if n == 0 {
        return Err(StoreError::SubscriptionNotFound(sub.id));
    }
    tracing::info!(subscription_id = sub.id, "subscription updated");
    Ok(sub.id)
}

pub fn get_subscription(conn: &Connection, id: i64) -> StoreResult<Subscription> {
    let raw = conn
        .query_row(
            "SELECT id, title, amount, currency, payment_date, repeating
             FROM subscriptions WHERE id=?1",
            params![id],
            subscription_from_row,
        )
        .optional()?
        .ok_or(StoreError::SubscriptionNotFound(id))?;
    into_subscription(raw)
}

/// Ordered by payment date, soonest first.
pub fn list_subscriptions(conn: &Connection) -> StoreResult<Vec<Subscription>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, amount, currency, payment_date, repeating
         FROM subscriptions ORDER BY payment_date, id",
    )?;
    let rows = stmt.query_map([], subscription_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(into_subscription(row?)?);
    }
    Ok(out)
}

pub fn delete_subscription(conn: &Connection, id: i64) -> StoreResult<()> {
    let n = conn.execute("DELETE FROM subscriptions WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(StoreError::SubscriptionNotFound(id));
    }
    tracing::info!(subscription_id = id, "subscription deleted");
    Ok(())
}
