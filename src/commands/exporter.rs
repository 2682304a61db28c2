// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::WalletWithTransactions;
use crate::store;
use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map_or("csv".to_string(), |s| s.to_lowercase());
    let out = sub.get_one::<String>("out").context("output path missing")?;
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let wallets: Vec<WalletWithTransactions> = match sub.get_one::<i64>("wallet") {
        Some(id) => vec![store::wallet_with_transactions(conn, *id)?],
        None => store::wallets_with_transactions(conn)?,
    };

    let mut rows = Vec::new();
    for w in &wallets {
        for t in w.transactions.iter().rev() {
            let tx = &t.transaction;
            rows.push((
                tx.timestamp,
                w.wallet.title.clone(),
                tx.amount.to_string(),
                w.wallet.currency.clone(),
                t.category.as_ref().map(|c| c.title.clone()),
                tx.description.clone(),
                tx.ignored,
            ));
        }
    }
    // Oldest first across every wallet.
    rows.sort_by_key(|row| row.0);

    match fmt.as_str() {
        "csv" => {
            let mut wtr =
                csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
            wtr.write_record([
                "timestamp",
                "wallet",
                "amount",
                "currency",
                "category",
                "description",
                "ignored",
            ])?;
            for (ts, wallet, amt, ccy, cat, desc, ignored) in rows {
                wtr.write_record([
                    ts.to_rfc3339(),
                    wallet,
                    amt,
                    ccy,
                    cat.unwrap_or_default(),
                    desc,
                    ignored.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<serde_json::Value> = rows
                .into_iter()
                .map(|(ts, wallet, amt, ccy, cat, desc, ignored)| {
                    json!({
                        "timestamp": ts.to_rfc3339(), "wallet": wallet, "amount": amt,
                        "currency": ccy,
                        "category": cat, "description": desc, "ignored": ignored
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out))?;
        }
    }
    tracing::info!(path = %out, format = %fmt, "transactions exported");
    println!("Exported transactions to {}", out);
    Ok(())
}
