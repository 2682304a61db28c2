// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest magnitude accepted for a stored amount or balance.
pub static MAX_AMOUNT: Lazy<Decimal> = Lazy::new(|| Decimal::new(1_000_000_000_000, 0));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: i64,
    pub title: String,
    pub initial_balance: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub icon_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub wallet_id: i64,
    pub category_id: Option<i64>,
    pub amount: Decimal, // negative = expense, positive = income
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub ignored: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionWithCategory {
    pub transaction: Transaction,
    pub category: Option<Category>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletWithTransactions {
    pub wallet: Wallet,
    pub transactions: Vec<TransactionWithCategory>,
}

impl WalletWithTransactions {
    /// Initial balance plus every transaction, ignored ones included.
    pub fn current_balance(&self) -> Decimal {
        self.transactions
            .iter()
            .fold(self.wallet.initial_balance, |acc, t| acc.saturating_add(t.transaction.amount))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWallet {
    pub id: i64,
    pub title: String,
    pub currency: String,
    pub initial_balance: Decimal,
    pub current_balance: Decimal,
    pub is_primary: bool,
}

impl UserWallet {
    pub fn from_snapshot(snapshot: &WalletWithTransactions, primary_id: Option<i64>) -> Self {
        UserWallet {
            id: snapshot.wallet.id,
            title: snapshot.wallet.title.clone(),
            currency: snapshot.wallet.currency.clone(),
            initial_balance: snapshot.wallet.initial_balance,
            current_balance: snapshot.current_balance(),
            is_primary: primary_id == Some(snapshot.wallet.id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatingInterval {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl std::str::FromStr for RepeatingInterval {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(RepeatingInterval::Daily),
            "weekly" => Ok(RepeatingInterval::Weekly),
            "monthly" => Ok(RepeatingInterval::Monthly),
            "yearly" => Ok(RepeatingInterval::Yearly),
            other => Err(anyhow::anyhow!(
                "Unknown interval '{}' (use daily|weekly|monthly|yearly)",
                other
            )),
        }
    }
}

impl std::fmt::Display for RepeatingInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RepeatingInterval::Daily => "daily",
            RepeatingInterval::Weekly => "weekly",
            RepeatingInterval::Monthly => "monthly",
            RepeatingInterval::Yearly => "yearly",
        };
        f.write_str(s)
    }
}

/// A recurring payment the user wants to keep an eye on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub title: String,
    pub amount: Decimal,
    pub currency: String,
    pub payment_date: NaiveDate,
    pub repeating: Option<RepeatingInterval>,
}

impl Subscription {
    /// First payment on or after `today`. A one-off subscription whose date
    /// has passed has none.
    pub fn next_payment(&self, today: NaiveDate) -> Option<NaiveDate> {
        let Some(interval) = self.repeating else {
            return (self.payment_date >= today).then_some(self.payment_date);
        };
        let mut n: u32 = 0;
        loop {
            let date = match interval {
                RepeatingInterval::Daily => self
                    .payment_date
                    .checked_add_days(chrono::Days::new(u64::from(n))),
                RepeatingInterval::Weekly => self
                    .payment_date
                    .checked_add_days(chrono::Days::new(u64::from(n) * 7)),
                RepeatingInterval::Monthly => self
                    .payment_date
                    .checked_add_months(chrono::Months::new(n)),
                RepeatingInterval::Yearly => self
                    .payment_date
                    .checked_add_months(chrono::Months::new(n.checked_mul(12)?)),
            }?;
            if date >= today {
                return Some(date);
            }
            n = n.checked_add(1)?;
        }
    }
}
