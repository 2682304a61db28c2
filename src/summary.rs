// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Income/expense aggregation for a single wallet.
//!
//! Everything here is a pure transform over an already loaded snapshot.
//! Amounts are summed as `Decimal`, so bucket maps always add up to the
//! scalar totals computed from the same filtered window. Sums saturate at
//! the `Decimal` bounds instead of overflowing.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::filter::{DateType, FinanceType, WalletFilter};
use crate::models::{Category, TransactionWithCategory};

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Summary {
    pub income: Decimal,
    pub expenses: Decimal,
    pub income_buckets: BTreeMap<u32, Decimal>,
    pub expense_buckets: BTreeMap<u32, Decimal>,
    pub income_progress: f64,
    pub expenses_progress: f64,
    pub transaction_count: usize,
}

impl Summary {
    /// Chart series for the active finance type. `None` has no chart.
    pub fn graph_values(&self, finance_type: FinanceType) -> Option<&BTreeMap<u32, Decimal>> {
        match finance_type {
            FinanceType::Expenses => Some(&self.expense_buckets),
            FinanceType::Income => Some(&self.income_buckets),
            FinanceType::None => None,
        }
    }

    pub fn total(&self, finance_type: FinanceType) -> Decimal {
        match finance_type {
            FinanceType::Expenses => self.expenses,
            FinanceType::Income => self.income,
            FinanceType::None => self.income.saturating_sub(self.expenses),
        }
    }

    /// A column chart needs at least two distinct buckets to say anything.
    pub fn has_enough_data(&self, finance_type: FinanceType) -> bool {
        self.graph_values(finance_type)
            .is_some_and(|values| values.len() > 1)
    }
}

/// Bucket key for a local timestamp: month of year, day of month, or ISO
/// weekday (1 = Monday) for week and the default view.
pub fn bucket_key<Tz: TimeZone>(local: &DateTime<Tz>, date_type: DateType) -> u32 {
    match date_type {
        DateType::Year => local.month(),
        DateType::Month => local.day(),
        DateType::Week | DateType::All => local.weekday().number_from_monday(),
    }
}

/// Transactions that take part in the sums. Ignored ones never do. The
/// default `All` view only covers the current calendar month; an explicit
/// granularity instead honours the selected categories, where an empty
/// selection means every category.
pub fn filter_transactions<'a, Tz: TimeZone>(
    transactions: &'a [TransactionWithCategory],
    filter: &WalletFilter,
    now: &DateTime<Tz>,
) -> Vec<&'a TransactionWithCategory> {
    let tz = now.timezone();
    let selected = filter.selected_category_ids();
    transactions
        .iter()
        .filter(|t| !t.transaction.ignored)
        .filter(|t| match filter.date_type {
            DateType::All => {
                let local = t.transaction.timestamp.with_timezone(&tz);
                local.year() == now.year() && local.month() == now.month()
            }
            DateType::Week | DateType::Month | DateType::Year => {
                selected.is_empty()
                    || t.transaction
                        .category_id
                        .is_some_and(|id| selected.contains(&id))
            }
        })
        .collect()
}

/// `total / window_total`, or 0 for an empty window.
pub fn progress_ratio(total: Decimal, window_total: Decimal) -> f64 {
    if window_total.is_zero() {
        return 0.0;
    }
    total
        .checked_div(window_total)
        .and_then(|r| r.to_f64())
        .unwrap_or(0.0)
        .clamp(0.0, 1.0)
}

pub fn summarize(transactions: &[TransactionWithCategory], filter: &WalletFilter) -> Summary {
    summarize_at(transactions, filter, &Local::now())
}

pub fn summarize_at<Tz: TimeZone>(
    transactions: &[TransactionWithCategory],
    filter: &WalletFilter,
    now: &DateTime<Tz>,
) -> Summary {
    let tz = now.timezone();
    let window = filter_transactions(transactions, filter, now);

    let mut summary = Summary {
        transaction_count: window.len(),
        ..Default::default()
    };
    let mut window_total = Decimal::ZERO;

    for t in &window {
        let amount = t.transaction.amount;
        window_total = window_total.saturating_add(amount.abs());
        let key = bucket_key(&t.transaction.timestamp.with_timezone(&tz), filter.date_type);
        if amount < Decimal::ZERO {
            summary.expenses = summary.expenses.saturating_add(amount.abs());
            let bucket = summary.expense_buckets.entry(key).or_insert(Decimal::ZERO);
            *bucket = bucket.saturating_add(amount.abs());
        } else if amount > Decimal::ZERO {
            summary.income = summary.income.saturating_add(amount);
            let bucket = summary.income_buckets.entry(key).or_insert(Decimal::ZERO);
            *bucket = bucket.saturating_add(amount);
        }
    }

    summary.expenses_progress = progress_ratio(summary.expenses, window_total);
    summary.income_progress = progress_ratio(summary.income, window_total);

    tracing::debug!(
        date_type = %filter.date_type,
        window = summary.transaction_count,
        income = %summary.income,
        expenses = %summary.expenses,
        "summarized wallet window"
    );
    summary
}

/// Distinct years with at least one transaction, ascending. Ignored and
/// zero-amount transactions count here even though they never reach a sum.
pub fn available_years<Tz: TimeZone>(
    transactions: &[TransactionWithCategory],
    tz: &Tz,
) -> Vec<i32> {
    let years: BTreeSet<i32> = transactions
        .iter()
        .map(|t| t.transaction.timestamp.with_timezone(tz).year())
        .collect();
    years.into_iter().collect()
}

pub fn available_months<Tz: TimeZone>(
    transactions: &[TransactionWithCategory],
    year: i32,
    tz: &Tz,
) -> Vec<u32> {
    let months: BTreeSet<u32> = transactions
        .iter()
        .map(|t| t.transaction.timestamp.with_timezone(tz))
        .filter(|local| local.year() == year)
        .map(|local| local.month())
        .collect();
    months.into_iter().collect()
}

/// Categories referenced by the wallet's transactions, ordered by title.
pub fn available_categories(transactions: &[TransactionWithCategory]) -> Vec<Category> {
    let mut seen = BTreeSet::new();
    let mut categories: Vec<Category> = transactions
        .iter()
        .filter_map(|t| t.category.as_ref())
        .filter(|c| seen.insert(c.id))
        .cloned()
        .collect();
    categories.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
    categories
}

/// Transactions grouped by local calendar day, newest day first. Within a
/// day the input order is kept.
pub fn transactions_by_day<'a, Tz: TimeZone>(
    transactions: &'a [TransactionWithCategory],
    tz: &Tz,
) -> Vec<(NaiveDate, Vec<&'a TransactionWithCategory>)> {
    let mut days: BTreeMap<NaiveDate, Vec<&TransactionWithCategory>> = BTreeMap::new();
    for t in transactions {
        let day = t.transaction.timestamp.with_timezone(tz).date_naive();
        days.entry(day).or_default().push(t);
    }
    days.into_iter().rev().collect()
}
