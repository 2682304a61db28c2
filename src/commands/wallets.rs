// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::filter::{DateType, FinanceType, WalletEvent, WalletFilter};
use crate::models::{UserWallet, Wallet};
use crate::store;
use crate::summary::Summary;
use crate::utils::{
    bucket_label, fmt_money, maybe_print_json, month_name, parse_decimal, pretty_table,
    progress_bar,
};
use crate::view::WalletView;
use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("wallet id missing")?;
            store::delete_wallet_with_transactions(conn, id)?;
            println!("Removed wallet {} and its transactions", id);
        }
        Some(("primary", sub)) => {
            if sub.get_flag("clear") {
                store::set_primary_wallet_id(conn, None)?;
                println!("Primary wallet cleared");
            } else {
                let id = *sub.get_one::<i64>("id").context("wallet id missing")?;
                let wallet = store::get_wallet(conn, id)?;
                store::set_primary_wallet_id(conn, Some(id))?;
                println!("'{}' is now the primary wallet", wallet.title);
            }
        }
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let title = sub
        .get_one::<String>("title")
        .context("wallet title missing")?
        .trim()
        .to_string();
    let balance = parse_decimal(sub.get_one::<String>("balance").map_or("0", |s| s.as_str()))?;
    let currency = match sub.get_one::<String>("currency") {
        Some(c) => c.trim().to_uppercase(),
        None => store::default_currency(conn)?,
    };
    let id = store::upsert_wallet(
        conn,
        &Wallet {
            id: 0,
            title: title.clone(),
            initial_balance: balance,
            currency: currency.clone(),
        },
    )?;
    println!("Added wallet '{}' (id {}, {} {})", title, id, currency, balance);
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("wallet id missing")?;
    let mut wallet = store::get_wallet(conn, id)?;
    if let Some(title) = sub.get_one::<String>("title") {
        wallet.title = title.trim().to_string();
    }
    if let Some(balance) = sub.get_one::<String>("balance") {
        wallet.initial_balance = parse_decimal(balance)?;
    }
    if let Some(ccy) = sub.get_one::<String>("currency") {
        wallet.currency = ccy.trim().to_uppercase();
    }
    store::upsert_wallet(conn, &wallet)?;
    println!(
        "Updated wallet {} ('{}', {} {})",
        id, wallet.title, wallet.currency, wallet.initial_balance
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let primary = store::primary_wallet_id(conn)?;
    let wallets: Vec<UserWallet> = store::wallets_with_transactions(conn)?
        .iter()
        .map(|w| UserWallet::from_snapshot(w, primary))
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &wallets)? {
        let rows = wallets
            .iter()
            .map(|w| {
                vec![
                    w.id.to_string(),
                    if w.is_primary {
                        format!("{} *", w.title)
                    } else {
                        w.title.clone()
                    },
                    w.currency.clone(),
                    format!("{:.2}", w.initial_balance),
                    format!("{:.2}", w.current_balance),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Wallet", "CCY", "Initial", "Balance"], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    pub finance_type: FinanceType,
    pub date_type: Option<DateType>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub categories: Vec<String>,
}

impl ShowOptions {
    pub fn from_matches(sub: &clap::ArgMatches) -> Result<Self> {
        let finance_type = match sub.get_one::<String>("type") {
            Some(s) => s.parse::<FinanceType>()?,
            None => FinanceType::None,
        };
        let date_type = sub
            .get_one::<String>("period")
            .map(|s| s.parse::<DateType>())
            .transpose()?;
        Ok(ShowOptions {
            finance_type,
            date_type,
            year: sub.get_one::<i32>("year").copied(),
            month: sub.get_one::<u32>("month").copied(),
            categories: sub
                .get_many::<String>("category")
                .map(|vals| vals.map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WalletReport {
    pub wallet: UserWallet,
    pub filter: WalletFilter,
    pub summary: Summary,
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

/// Everything the detail screen shows for one wallet at `now`.
pub fn wallet_report<Tz: TimeZone>(
    conn: &Connection,
    id: i64,
    opts: &ShowOptions,
    now: DateTime<Tz>,
) -> Result<WalletReport> {
    let snapshot = store::wallet_with_transactions(conn, id)?;
    let primary = store::primary_wallet_id(conn)?;
    let wallet = UserWallet::from_snapshot(&snapshot, primary);

    let mut selected = Vec::new();
    for title in &opts.categories {
        selected.push(store::category_by_title(conn, title)?);
    }

    let mut view = WalletView::new(snapshot, now);
    view.update_filter(|f| {
        if opts.finance_type != FinanceType::None {
            f.open_details(opts.finance_type);
        }
        if let Some(dt) = opts.date_type {
            f.date_type = dt;
        }
        if opts.year.is_some() || opts.month.is_some() {
            f.select_period(opts.year, opts.month);
        }
    });
    for category in selected {
        view.on_event(WalletEvent::AddToSelectedCategories(category));
    }

    let summary = view.summary().clone();
    let filter = view.filter().clone();
    Ok(WalletReport {
        wallet,
        can_go_previous: filter.can_go_previous(),
        can_go_next: filter.can_go_next(),
        filter,
        summary,
    })
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("wallet id missing")?;
    let opts = ShowOptions::from_matches(sub)?;
    let report = wallet_report(conn, id, &opts, Local::now())?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }

    let w = &report.wallet;
    let star = if w.is_primary { " *" } else { "" };
    println!("{}{}  {}", w.title, star, fmt_money(&w.current_balance, &w.currency));

    let f = &report.filter;
    let period = match f.date_type {
        DateType::All => "current month".to_string(),
        DateType::Week => "this week".to_string(),
        DateType::Month => format!("{} {}", month_name(f.selected_month), f.selected_year),
        DateType::Year => f.selected_year.to_string(),
    };
    let prev = if report.can_go_previous { "<" } else { " " };
    let next = if report.can_go_next { ">" } else { " " };
    println!("{} {} {}", prev, period, next);

    let s = &report.summary;
    match f.finance_type {
        FinanceType::None => {
            let rows = vec![
                vec![
                    "Expenses".to_string(),
                    fmt_money(&s.expenses, &w.currency),
                    progress_bar(s.expenses_progress, 20),
                ],
                vec![
                    "Income".to_string(),
                    fmt_money(&s.income, &w.currency),
                    progress_bar(s.income_progress, 20),
                ],
            ];
            println!("{}", pretty_table(&["", "Total", "Share"], rows));
        }
        ft @ (FinanceType::Expenses | FinanceType::Income) => {
            println!("{}: {}", ft, fmt_money(&s.total(ft), &w.currency));
            if let Some(values) = s.graph_values(ft) {
                if !values.is_empty() && f.date_type != DateType::All {
                    if !s.has_enough_data(ft) {
                        println!("Not enough data for a chart");
                    }
                    let rows = values
                        .iter()
                        .map(|(k, v)| vec![bucket_label(*k, f.date_type), format!("{:.2}", v)])
                        .collect();
                    println!("{}", pretty_table(&["Bucket", "Amount"], rows));
                }
            }
            if !f.available_categories.is_empty() {
                let chips: Vec<String> = f
                    .available_categories
                    .iter()
                    .map(|c| {
                        if f.is_selected(c) {
                            format!("[x] {}", c.title)
                        } else {
                            format!("[ ] {}", c.title)
                        }
                    })
                    .collect();
                println!("{}", chips.join("  "));
            }
        }
    }
    Ok(())
}
