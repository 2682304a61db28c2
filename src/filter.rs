// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transient filter state of the wallet detail view and the period
//! navigation rules that go with it.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, TimeZone};
use serde::{Deserialize, Serialize};

use crate::models::{Category, TransactionWithCategory};
use crate::summary::{available_categories, available_months, available_years};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinanceType {
    #[default]
    None,
    Expenses,
    Income,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateType {
    Week,
    Month,
    Year,
    #[default]
    All,
}

impl FromStr for FinanceType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "expenses" | "expense" => Ok(Self::Expenses),
            "income" => Ok(Self::Income),
            other => Err(anyhow::anyhow!(
                "Unknown finance type '{}' (use none|expenses|income)",
                other
            )),
        }
    }
}

impl FromStr for DateType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "all" => Ok(Self::All),
            other => Err(anyhow::anyhow!(
                "Unknown period '{}' (use week|month|year|all)",
                other
            )),
        }
    }
}

impl fmt::Display for FinanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Expenses => "expenses",
            Self::Income => "income",
        };
        f.write_str(s)
    }
}

impl fmt::Display for DateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    UpdateFinanceType(FinanceType),
    UpdateDateType(DateType),
    AddToSelectedCategories(Category),
    RemoveFromSelectedCategories(Category),
    IncrementSelectedDate,
    DecrementSelectedDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WalletFilter {
    pub finance_type: FinanceType,
    pub date_type: DateType,
    pub selected_year: i32,
    pub selected_month: u32,
    pub selected_categories: Vec<Category>,
    pub available_categories: Vec<Category>,
    pub available_years: Vec<i32>,
    pub available_months: Vec<u32>,
    #[serde(skip)]
    months_by_year: BTreeMap<i32, Vec<u32>>,
}

impl WalletFilter {
    /// Filter for a freshly opened wallet: cursors on the current period when
    /// it has data, otherwise on the latest period that does.
    pub fn for_snapshot<Tz: TimeZone>(
        transactions: &[TransactionWithCategory],
        now: &DateTime<Tz>,
    ) -> Self {
        let mut filter = WalletFilter {
            selected_year: now.year(),
            selected_month: now.month(),
            ..Default::default()
        };
        filter.refresh(transactions, &now.timezone());
        filter
    }

    /// Re-derive the available ranges and categories from the full,
    /// unfiltered transaction list and pull the cursors back into range.
    pub fn refresh<Tz: TimeZone>(&mut self, transactions: &[TransactionWithCategory], tz: &Tz) {
        self.available_years = available_years(transactions, tz);
        self.months_by_year = self
            .available_years
            .iter()
            .map(|y| (*y, available_months(transactions, *y, tz)))
            .collect();
        self.available_categories = available_categories(transactions);

        let known: BTreeSet<i64> = self.available_categories.iter().map(|c| c.id).collect();
        self.selected_categories.retain(|c| known.contains(&c.id));

        if let Some(last) = self.available_years.last() {
            if !self.available_years.contains(&self.selected_year) {
                self.selected_year = *last;
            }
        }
        self.sync_months();
    }

    fn sync_months(&mut self) {
        self.available_months = self
            .months_by_year
            .get(&self.selected_year)
            .cloned()
            .unwrap_or_default();
        if let Some(last) = self.available_months.last() {
            if !self.available_months.contains(&self.selected_month) {
                self.selected_month = *last;
            }
        }
    }

    /// Point the cursors at an explicit period. An explicit month is kept even
    /// without data for it; a missing one falls back to the latest month.
    pub fn select_period(&mut self, year: Option<i32>, month: Option<u32>) {
        if let Some(year) = year {
            self.selected_year = year;
        }
        if let Some(month) = month {
            self.selected_month = month;
            self.available_months = self
                .months_by_year
                .get(&self.selected_year)
                .cloned()
                .unwrap_or_default();
        } else {
            self.sync_months();
        }
    }

    pub fn selected_category_ids(&self) -> BTreeSet<i64> {
        self.selected_categories.iter().map(|c| c.id).collect()
    }

    pub fn is_selected(&self, category: &Category) -> bool {
        self.selected_categories.iter().any(|c| c.id == category.id)
    }

    pub fn can_go_previous(&self) -> bool {
        match self.date_type {
            DateType::Year => self
                .available_years
                .first()
                .is_some_and(|first| *first != self.selected_year),
            DateType::Month => self
                .available_months
                .first()
                .is_some_and(|first| *first != self.selected_month),
            DateType::Week | DateType::All => false,
        }
    }

    pub fn can_go_next(&self) -> bool {
        match self.date_type {
            DateType::Year => self
                .available_years
                .last()
                .is_some_and(|last| *last != self.selected_year),
            DateType::Month => self
                .available_months
                .last()
                .is_some_and(|last| *last != self.selected_month),
            DateType::Week | DateType::All => false,
        }
    }

    /// Card click: drill into one finance type, month by month.
    pub fn open_details(&mut self, finance_type: FinanceType) {
        self.finance_type = finance_type;
        self.date_type = DateType::Month;
    }

    pub fn close_details(&mut self) {
        self.finance_type = FinanceType::None;
        self.date_type = DateType::All;
    }

    pub fn apply(&mut self, event: WalletEvent) {
        match event {
            WalletEvent::UpdateFinanceType(ft) => self.finance_type = ft,
            WalletEvent::UpdateDateType(dt) => self.date_type = dt,
            WalletEvent::AddToSelectedCategories(category) => {
                if !self.is_selected(&category) {
                    self.selected_categories.push(category);
                }
            }
            WalletEvent::RemoveFromSelectedCategories(category) => {
                self.selected_categories.retain(|c| c.id != category.id);
            }
            WalletEvent::IncrementSelectedDate => self.step(true),
            WalletEvent::DecrementSelectedDate => self.step(false),
        }
    }

    // No wraparound: stepping past either end is a no-op.
    fn step(&mut self, forward: bool) {
        let allowed = if forward {
            self.can_go_next()
        } else {
            self.can_go_previous()
        };
        if !allowed {
            return;
        }
        match self.date_type {
            DateType::Year => {
                let target = neighbour(&self.available_years, self.selected_year, forward);
                if let Some(year) = target {
                    self.selected_year = year;
                    self.sync_months();
                }
            }
            DateType::Month => {
                let target = neighbour(&self.available_months, self.selected_month, forward);
                if let Some(month) = target {
                    self.selected_month = month;
                }
            }
            DateType::Week | DateType::All => {}
        }
    }
}

fn neighbour<T: Ord + Copy>(sorted: &[T], current: T, forward: bool) -> Option<T> {
    if forward {
        sorted.iter().copied().find(|v| *v > current)
    } else {
        sorted.iter().rev().copied().find(|v| *v < current)
    }
}
