// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use walletlens::commands::{settings, wallets};
use walletlens::commands::wallets::ShowOptions;
use walletlens::filter::{DateType, FinanceType};
use walletlens::{cli, db, store};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute(
        "INSERT INTO wallets(id,title,initial_balance,currency) VALUES (1,'Debit','100','USD')",
        [],
    )
    .unwrap();
    conn.execute("INSERT INTO categories(id,title) VALUES (1,'Food'), (2,'Salary')", [])
        .unwrap();
    let rows = [
        (Some(1), "-50", "2023-11-03T10:00:00+00:00", 0),
        (Some(1), "-30", "2024-03-03T10:00:00+00:00", 0),
        (None, "-20", "2024-03-03T11:00:00+00:00", 0),
        (Some(2), "200", "2024-03-10T10:00:00+00:00", 0),
        (None, "-1000", "2024-03-11T10:00:00+00:00", 1),
    ];
    for (cat, amount, ts, ignored) in rows {
        conn.execute(
            "INSERT INTO transactions(wallet_id,category_id,amount,timestamp,ignored) VALUES (1,?1,?2,?3,?4)",
            rusqlite::params![cat, amount, ts, ignored],
        )
        .unwrap();
    }
    conn
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-03-20T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

#[test]
fn overview_report_sums_current_month() {
    let conn = setup();
    store::set_primary_wallet_id(&conn, Some(1)).unwrap();
    let r = wallets::wallet_report(&conn, 1, &ShowOptions::default(), now()).unwrap();
    assert!(r.wallet.is_primary);
    assert_eq!(r.wallet.current_balance, dec("-800"));
    assert_eq!(r.summary.expenses, dec("50"));
    assert_eq!(r.summary.income, dec("200"));
    assert_eq!(r.filter.date_type, DateType::All);
    assert!(!r.can_go_previous && !r.can_go_next);
}

#[test]
fn expenses_detail_with_category_chip() {
    let conn = setup();
    let opts = ShowOptions {
        finance_type: FinanceType::Expenses,
        categories: vec!["Food".into()],
        ..Default::default()
    };
    let r = wallets::wallet_report(&conn, 1, &opts, now()).unwrap();
    assert_eq!(r.filter.date_type, DateType::Month);
    assert_eq!(r.summary.expenses, dec("30"));
    assert_eq!(
        r.summary.graph_values(FinanceType::Expenses).unwrap().get(&3),
        Some(&dec("30"))
    );
    assert!(!r.can_go_previous);
    assert!(!r.can_go_next);
}

#[test]
fn year_report_navigation_flags() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "walletlens", "wallet", "show", "1", "--type", "expenses", "--period", "year", "--year",
        "2023",
    ]);
    let Some(("wallet", wm)) = matches.subcommand() else {
        panic!("no wallet subcommand");
    };
    let Some(("show", sm)) = wm.subcommand() else {
        panic!("no show subcommand");
    };
    let opts = ShowOptions::from_matches(sm).unwrap();
    let r = wallets::wallet_report(&conn, 1, &opts, now()).unwrap();
    assert_eq!(r.filter.available_years, vec![2023, 2024]);
    assert_eq!(r.filter.selected_year, 2023);
    assert!(!r.can_go_previous);
    assert!(r.can_go_next);
    assert_eq!(r.summary.expenses, dec("50"));
    assert_eq!(
        r.summary.expense_buckets.keys().copied().collect::<Vec<_>>(),
        vec![11]
    );
}

#[test]
fn unknown_wallet_or_category_is_an_error() {
    let conn = setup();
    assert!(wallets::wallet_report(&conn, 9, &ShowOptions::default(), now()).is_err());
    let opts = ShowOptions {
        categories: vec!["Nope".into()],
        ..Default::default()
    };
    assert!(wallets::wallet_report(&conn, 1, &opts, now()).is_err());
}

#[test]
fn rm_clears_primary_setting() {
    let conn = setup();
    store::set_primary_wallet_id(&conn, Some(1)).unwrap();
    let matches = cli::build_cli().get_matches_from(["walletlens", "wallet", "rm", "1"]);
    if let Some(("wallet", wm)) = matches.subcommand() {
        wallets::handle(&conn, wm).unwrap();
    } else {
        panic!("no wallet subcommand");
    }
    let s = settings::current(&conn).unwrap();
    assert_eq!(s.primary_wallet_id, None);
    assert_eq!(s.primary_wallet, None);
    assert_eq!(s.default_currency, "USD");
}

#[test]
fn edit_updates_given_fields_only() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "walletlens", "wallet", "edit", "1", "--title", "Savings", "--currency", "eur",
    ]);
    if let Some(("wallet", wm)) = matches.subcommand() {
        wallets::handle(&conn, wm).unwrap();
    } else {
        panic!("no wallet subcommand");
    }
    let w = store::get_wallet(&conn, 1).unwrap();
    assert_eq!(w.title, "Savings");
    assert_eq!(w.currency, "EUR");
    assert_eq!(w.initial_balance, dec("100"));

    let matches =
        cli::build_cli().get_matches_from(["walletlens", "wallet", "edit", "9", "--title", "X"]);
    if let Some(("wallet", wm)) = matches.subcommand() {
        assert!(wallets::handle(&conn, wm).is_err());
    } else {
        panic!("no wallet subcommand");
    }
}
