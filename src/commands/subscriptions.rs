// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{RepeatingInterval, Subscription};
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, parse_amount, pretty_table};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("list", sub)) => {
            let rows = upcoming(conn, Local::now().date_naive())?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .into_iter()
                    .map(|r| {
                        vec![
                            r.subscription.id.to_string(),
                            r.subscription.title,
                            fmt_money(&r.subscription.amount, &r.subscription.currency),
                            r.subscription
                                .repeating
                                .map(|i| i.to_string())
                                .unwrap_or_else(|| "once".into()),
                            r.next_payment
                                .map(|d| d.to_string())
                                .unwrap_or_else(|| "-".into()),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Subscription", "Amount", "Repeats", "Next"], data)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("subscription id missing")?;
            store::delete_subscription(conn, id)?;
            println!("Removed subscription {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Subscription amounts are what gets paid, so the sign is dropped.
fn parse_cost(s: &str) -> Result<rust_decimal::Decimal> {
    Ok(parse_amount(s)?.abs())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let title = sub
        .get_one::<String>("title")
        .context("subscription title missing")?
        .trim()
        .to_string();
    let amount = parse_cost(sub.get_one::<String>("amount").context("amount missing")?)?;
    let payment_date = parse_date(sub.get_one::<String>("date").context("date missing")?)?;
    let currency = match sub.get_one::<String>("currency") {
        Some(c) => c.trim().to_uppercase(),
        None => store::default_currency(conn)?,
    };
    let repeating = sub
        .get_one::<String>("repeat")
        .map(|s| s.parse::<RepeatingInterval>())
        .transpose()?;
    let id = store::upsert_subscription(
        conn,
        &Subscription {
            id: 0,
            title: title.clone(),
            amount,
            currency,
            payment_date,
            repeating,
        },
    )?;
    println!("Added subscription '{}' (id {})", title, id);
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("subscription id missing")?;
    let mut s = store::get_subscription(conn, id)?;
    if let Some(title) = sub.get_one::<String>("title") {
        s.title = title.trim().to_string();
    }
    if let Some(amount) = sub.get_one::<String>("amount") {
        s.amount = parse_cost(amount)?;
    }
    if let Some(date) = sub.get_one::<String>("date") {
        s.payment_date = parse_date(date)?;
    }
    if let Some(ccy) = sub.get_one::<String>("currency") {
        s.currency = ccy.trim().to_uppercase();
    }
    if sub.get_flag("once") {
        s.repeating = None;
    } else if let Some(r) = sub.get_one::<String>("repeat") {
        s.repeating = Some(r.parse()?);
    }
    store::upsert_subscription(conn, &s)?;
    println!("Updated subscription {}", id);
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct UpcomingPayment {
    pub subscription: Subscription,
    pub next_payment: Option<NaiveDate>,
}

/// Every subscription with its next payment on or after `today`, soonest
/// first. Finished one-off subscriptions go last.
pub fn upcoming(conn: &Connection, today: NaiveDate) -> Result<Vec<UpcomingPayment>> {
    let mut rows: Vec<UpcomingPayment> = store::list_subscriptions(conn)?
        .into_iter()
        .map(|s| UpcomingPayment {
            next_payment: s.next_payment(today),
            subscription: s,
        })
        .collect();
    rows.sort_by_key(|r| (r.next_payment.is_none(), r.next_payment, r.subscription.id));
    Ok(rows)
}
