// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Wallet {0} not found")]
    WalletNotFound(i64),

    #[error("Category '{0}' not found")]
    CategoryNotFound(String),

    #[error("Transaction {0} not found")]
    TransactionNotFound(i64),

    #[error("Subscription {0} not found")]
    SubscriptionNotFound(i64),

    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("Invalid timestamp '{0}' in store")]
    InvalidTimestamp(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
