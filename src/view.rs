// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Latest-value view over one wallet: the newest snapshot from the store, the
//! user's filter, and a summary recomputed only when either has changed.

use chrono::{DateTime, Datelike, TimeZone};

use crate::filter::{DateType, WalletEvent, WalletFilter};
use crate::models::{TransactionWithCategory, WalletWithTransactions};
use crate::summary::{Summary, summarize_at};

pub struct WalletView<Tz: TimeZone> {
    snapshot: WalletWithTransactions,
    filter: WalletFilter,
    now: DateTime<Tz>,
    version: u64,
    cached: Option<(u64, Summary)>,
}

impl<Tz: TimeZone> WalletView<Tz> {
    pub fn new(snapshot: WalletWithTransactions, now: DateTime<Tz>) -> Self {
        let filter = WalletFilter::for_snapshot(&snapshot.transactions, &now);
        WalletView {
            snapshot,
            filter,
            now,
            version: 0,
            cached: None,
        }
    }

    pub fn snapshot(&self) -> &WalletWithTransactions {
        &self.snapshot
    }

    pub fn filter(&self) -> &WalletFilter {
        &self.filter
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// A newer snapshot from the store replaces the old one outright.
    pub fn set_snapshot(&mut self, snapshot: WalletWithTransactions) {
        self.snapshot = snapshot;
        self.filter
            .refresh(&self.snapshot.transactions, &self.now.timezone());
        self.version += 1;
    }

    pub fn set_now(&mut self, now: DateTime<Tz>) {
        self.now = now;
        self.version += 1;
    }

    pub fn on_event(&mut self, event: WalletEvent) {
        self.filter.apply(event);
        self.version += 1;
    }

    pub fn update_filter<F: FnOnce(&mut WalletFilter)>(&mut self, f: F) {
        f(&mut self.filter);
        self.version += 1;
    }

    /// Transactions inside the period the cursors point at. `All` passes
    /// everything through; the summarizer narrows it to the current month.
    pub fn period_transactions(&self) -> Vec<TransactionWithCategory> {
        let tz = self.now.timezone();
        let now_week = self.now.iso_week();
        self.snapshot
            .transactions
            .iter()
            .filter(|t| {
                let local = t.transaction.timestamp.with_timezone(&tz);
                match self.filter.date_type {
                    DateType::Year => local.year() == self.filter.selected_year,
                    DateType::Month => {
                        local.year() == self.filter.selected_year
                            && local.month() == self.filter.selected_month
                    }
                    DateType::Week => local.iso_week() == now_week,
                    DateType::All => true,
                }
            })
            .cloned()
            .collect()
    }

    pub fn summary(&mut self) -> &Summary {
        let fresh = matches!(&self.cached, Some((v, _)) if *v == self.version);
        if !fresh {
            tracing::debug!(
                wallet_id = self.snapshot.wallet.id,
                version = self.version,
                "recomputing wallet summary"
            );
            let window = self.period_transactions();
            let summary = summarize_at(&window, &self.filter, &self.now);
            self.cached = Some((self.version, summary));
        }
        let (_, summary) = self.cached.get_or_insert_with(Default::default);
        summary
    }
}
