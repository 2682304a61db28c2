// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::StoreError;
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Settings {
    pub primary_wallet_id: Option<i64>,
    pub primary_wallet: Option<String>,
    pub default_currency: String,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let s = current(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
                let rows = vec![
                    vec![
                        "primary wallet".to_string(),
                        s.primary_wallet.unwrap_or_else(|| "(none)".into()),
                    ],
                    vec!["default currency".to_string(), s.default_currency],
                ];
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        Some(("set-currency", sub)) => {
            let ccy = sub
                .get_one::<String>("currency")
                .map(|s| s.trim().to_uppercase())
                .unwrap_or_default();
            if ccy.len() != 3 || !ccy.chars().all(|c| c.is_ascii_alphabetic()) {
                bail!("Invalid currency '{}', expected a 3-letter ISO code", ccy);
            }
            store::set_default_currency(conn, &ccy)?;
            println!("Default currency set to {}", ccy);
        }
        _ => {}
    }
    Ok(())
}

pub fn current(conn: &Connection) -> Result<Settings> {
    let primary_wallet_id = store::primary_wallet_id(conn)?;
    let primary_wallet = match primary_wallet_id {
        Some(id) => match store::get_wallet(conn, id) {
            Ok(w) => Some(w.title),
            Err(StoreError::WalletNotFound(_)) => {
                tracing::warn!(wallet_id = id, "primary wallet id points at a missing wallet");
                None
            }
            Err(e) => return Err(e.into()),
        },
        None => None,
    };
    Ok(Settings {
        primary_wallet_id,
        primary_wallet,
        default_currency: store::default_currency(conn)?,
    })
}
