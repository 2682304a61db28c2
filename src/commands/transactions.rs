// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Transaction;
use crate::store;
use crate::summary::transactions_by_day;
use crate::utils::{maybe_print_json, parse_amount, parse_timestamp, pretty_table};
use anyhow::{Context, Result};
use chrono::{Local, Utc};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("transaction id missing")?;
            store::delete_transaction(conn, id)?;
            println!("Removed transaction {}", id);
        }
        Some(("ignore", sub)) => {
            let id = *sub.get_one::<i64>("id").context("transaction id missing")?;
            let ignored = !sub.get_flag("off");
            store::set_transaction_ignored(conn, id, ignored)?;
            if ignored {
                println!("Transaction {} is now ignored in summaries", id);
            } else {
                println!("Transaction {} counts in summaries again", id);
            }
        }
        Some(("repeat", sub)) => {
            let id = *sub.get_one::<i64>("id").context("transaction id missing")?;
            let new_id = repeat(conn, id)?;
            println!("Repeated transaction {} as {}", id, new_id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let wallet_id = *sub.get_one::<i64>("wallet").context("wallet id missing")?;
    let amount = parse_amount(sub.get_one::<String>("amount").context("amount missing")?)?;
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let category_id = match sub.get_one::<String>("category") {
        Some(title) => Some(store::category_by_title(conn, title.trim())?.id),
        None => None,
    };
    let timestamp = match sub.get_one::<String>("at") {
        Some(s) => parse_timestamp(s)?,
        None => Utc::now(),
    };

    let id = store::upsert_transaction(
        conn,
        &Transaction {
            id: 0,
            wallet_id,
            category_id,
            amount,
            description: description.clone(),
            timestamp,
            ignored: sub.get_flag("ignored"),
        },
    )?;
    println!(
        "Recorded {} on {} '{}' (wallet {}, id {})",
        amount,
        timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        description,
        wallet_id,
        id
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("transaction id missing")?;
    let mut tx = store::get_transaction(conn, id)?.transaction;
    if let Some(wallet_id) = sub.get_one::<i64>("wallet") {
        tx.wallet_id = *wallet_id;
    }
    if let Some(amount) = sub.get_one::<String>("amount") {
        tx.amount = parse_amount(amount)?;
    }
    if let Some(description) = sub.get_one::<String>("description") {
        tx.description = description.trim().to_string();
    }
    if sub.get_flag("no-category") {
        tx.category_id = None;
    } else if let Some(title) = sub.get_one::<String>("category") {
        tx.category_id = Some(store::category_by_title(conn, title.trim())?.id);
    }
    if let Some(at) = sub.get_one::<String>("at") {
        tx.timestamp = parse_timestamp(at)?;
    }
    store::upsert_transaction(conn, &tx)?;
    println!("Updated transaction {}", id);
    Ok(())
}

/// A copy of transaction `id` stamped now and counted again.
pub fn repeat(conn: &Connection, id: i64) -> Result<i64> {
    let original = store::get_transaction(conn, id)?.transaction;
    let copy = Transaction {
        id: 0,
        timestamp: Utc::now(),
        ignored: false,
        ..original
    };
    Ok(store::upsert_transaction(conn, &copy)?)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.day.clone(),
                    r.id.to_string(),
                    r.time.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    if r.ignored { "yes".into() } else { String::new() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Day", "Id", "Time", "Amount", "Category", "Description", "Ignored"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub day: String,
    pub time: String,
    pub amount: String,
    pub category: String,
    pub description: String,
    pub ignored: bool,
}

/// Rows of one wallet grouped by local day, newest day first.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let wallet_id = *sub.get_one::<i64>("wallet").context("wallet id missing")?;
    let snapshot = store::wallet_with_transactions(conn, wallet_id)?;
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);

    let mut data = Vec::new();
    for (day, group) in transactions_by_day(&snapshot.transactions, &Local) {
        for t in group {
            let tx = &t.transaction;
            data.push(TransactionRow {
                id: tx.id,
                day: day.to_string(),
                time: tx.timestamp.with_timezone(&Local).format("%H:%M").to_string(),
                amount: tx.amount.to_string(),
                category: t
                    .category
                    .as_ref()
                    .map(|c| c.title.clone())
                    .unwrap_or_default(),
                description: tx.description.clone(),
                ignored: tx.ignored,
            });
        }
    }
    data.truncate(limit);
    Ok(data)
}
