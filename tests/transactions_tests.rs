// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use rusqlite::Connection;
use walletlens::{cli, commands::transactions, db, store};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute(
        "INSERT INTO wallets(id,title,initial_balance,currency) VALUES (1,'Debit','0','USD')",
        [],
    )
    .unwrap();
    conn.execute("INSERT INTO categories(id,title) VALUES (1,'Food')", [])
        .unwrap();
    for i in 1..=3 {
        conn.execute(
            "INSERT INTO transactions(wallet_id,category_id,amount,description,timestamp) VALUES (1,1,'-10','lunch',?1)",
            [format!("2025-01-0{}T12:00:00+00:00", i)],
        )
        .unwrap();
    }
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["walletlens", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("tx", tx_m)) => transactions::handle(conn, tx_m),
        _ => panic!("no tx subcommand"),
    }
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let cli = cli::build_cli();
    let matches =
        cli.get_matches_from(["walletlens", "tx", "list", "--wallet", "1", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].id, 3);
            assert_eq!(rows[0].category, "Food");
            assert_eq!(rows[1].id, 2);
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn add_records_negative_amount_with_category() {
    let conn = setup();
    run(
        &conn,
        &[
            "add", "--wallet", "1", "--amount", "-4.20", "--category", "Food", "--at",
            "2025-02-01T08:30:00Z", "--description", "bagel",
        ],
    )
    .unwrap();
    let snap = store::wallet_with_transactions(&conn, 1).unwrap();
    let newest = &snap.transactions[0];
    assert_eq!(newest.transaction.amount, "-4.20".parse().unwrap());
    assert_eq!(newest.transaction.description, "bagel");
    assert_eq!(newest.transaction.category_id, Some(1));
}

#[test]
fn add_rejects_bad_amounts() {
    let conn = setup();
    assert!(run(&conn, &["add", "--wallet", "1", "--amount", "0"]).is_err());
    assert!(run(&conn, &["add", "--wallet", "1", "--amount", "1.005"]).is_err());
    assert!(run(&conn, &["add", "--wallet", "1", "--amount", "ten"]).is_err());
    assert!(run(&conn, &["add", "--wallet", "9", "--amount", "5"]).is_err());
    assert_eq!(store::wallet_with_transactions(&conn, 1).unwrap().transactions.len(), 3);
}

#[test]
fn ignore_toggles_and_repeat_copies() {
    let conn = setup();
    run(&conn, &["ignore", "2"]).unwrap();
    assert!(store::get_transaction(&conn, 2).unwrap().transaction.ignored);
    run(&conn, &["ignore", "2", "--off"]).unwrap();
    assert!(!store::get_transaction(&conn, 2).unwrap().transaction.ignored);

    store::set_transaction_ignored(&conn, 1, true).unwrap();
    let before = Utc::now();
    let copy = transactions::repeat(&conn, 1).unwrap();
    let t = store::get_transaction(&conn, copy).unwrap().transaction;
    assert_eq!(t.amount, "-10".parse().unwrap());
    assert_eq!(t.category_id, Some(1));
    assert!(!t.ignored);
    assert!(t.timestamp >= before - chrono::Duration::seconds(1));
}

#[test]
fn rm_deletes_and_reports_missing() {
    let conn = setup();
    run(&conn, &["rm", "1"]).unwrap();
    assert!(run(&conn, &["rm", "1"]).is_err());
}

#[test]
fn add_rejects_extra_typed_decimals_and_huge_amounts() {
    let conn = setup();
    assert!(run(&conn, &["add", "--wallet", "1", "--amount", "1.000"]).is_err());
    assert!(run(&conn, &["add", "--wallet", "1", "--amount", "-2.50"]).is_ok());
    assert!(
        run(
            &conn,
            &["add", "--wallet", "1", "--amount", "50000000000000000000000000000"]
        )
        .is_err()
    );
    assert_eq!(store::wallet_with_transactions(&conn, 1).unwrap().transactions.len(), 4);
}

#[test]
fn edit_changes_only_given_fields() {
    let conn = setup();
    run(
        &conn,
        &["edit", "2", "--amount", "-12.75", "--description", "dinner"],
    )
    .unwrap();
    let t = store::get_transaction(&conn, 2).unwrap();
    assert_eq!(t.transaction.amount, "-12.75".parse().unwrap());
    assert_eq!(t.transaction.description, "dinner");
    assert_eq!(t.category.map(|c| c.title), Some("Food".to_string()));
    assert_eq!(t.transaction.timestamp.to_rfc3339(), "2025-01-02T12:00:00+00:00");

    run(&conn, &["edit", "2", "--no-category", "--at", "2025-01-09T07:00:00Z"]).unwrap();
    let t = store::get_transaction(&conn, 2).unwrap().transaction;
    assert_eq!(t.category_id, None);
    assert_eq!(t.amount, "-12.75".parse().unwrap());
    assert_eq!(t.timestamp.to_rfc3339(), "2025-01-09T07:00:00+00:00");
}

#[test]
fn edit_validates_before_writing() {
    let conn = setup();
    assert!(run(&conn, &["edit", "3", "--amount", "0"]).is_err());
    assert!(run(&conn, &["edit", "3", "--category", "Nope"]).is_err());
    assert!(run(&conn, &["edit", "3", "--wallet", "8"]).is_err());
    assert!(run(&conn, &["edit", "99", "--amount", "1"]).is_err());
    let t = store::get_transaction(&conn, 3).unwrap().transaction;
    assert_eq!(t.amount, "-10".parse().unwrap());
    assert_eq!(t.wallet_id, 1);
}
