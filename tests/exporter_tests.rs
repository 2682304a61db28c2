// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;
use walletlens::{cli, commands::exporter, db};

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO wallets(id,title,initial_balance,currency) VALUES (1,'Debit','0','USD'), (2,'Cash','0','EUR');
        INSERT INTO categories(id,title) VALUES (1,'Food');
        INSERT INTO transactions(wallet_id,category_id,amount,description,timestamp,ignored)
            VALUES (1,1,'-12.50','lunch','2024-03-02T12:00:00+00:00',0);
        INSERT INTO transactions(wallet_id,category_id,amount,description,timestamp,ignored)
            VALUES (1,NULL,'1000','salary','2024-03-01T09:00:00+00:00',1);
        INSERT INTO transactions(wallet_id,category_id,amount,description,timestamp,ignored)
            VALUES (2,NULL,'-3','coffee','2024-03-05T08:00:00+00:00',0);
        "#,
    )
    .unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["walletlens", "export", "transactions"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("export", m)) => exporter::handle(conn, m),
        _ => panic!("no export subcommand"),
    }
}

#[test]
fn export_json_one_wallet_oldest_first() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.json");
    run(
        &conn,
        &["--wallet", "1", "--format", "json", "--out", path.to_str().unwrap()],
    )
    .unwrap();

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        v,
        json!([
            {
                "timestamp": "2024-03-01T09:00:00+00:00", "wallet": "Debit", "amount": "1000",
                "currency": "USD", "category": null, "description": "salary", "ignored": true
            },
            {
                "timestamp": "2024-03-02T12:00:00+00:00", "wallet": "Debit", "amount": "-12.50",
                "currency": "USD", "category": "Food", "description": "lunch", "ignored": false
            }
        ])
    );
}

#[test]
fn export_csv_all_wallets() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.csv");
    run(&conn, &["--out", path.to_str().unwrap()]).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["timestamp", "wallet", "amount", "currency", "category", "description", "ignored"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().any(|r| &r[1] == "Cash" && &r[3] == "EUR" && &r[2] == "-3"));
}

#[test]
fn unknown_format_writes_nothing() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.xml");
    assert!(run(&conn, &["--format", "xml", "--out", path.to_str().unwrap()]).is_err());
    assert!(!path.exists());
}

#[test]
fn unknown_wallet_is_an_error() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.csv");
    assert!(run(&conn, &["--wallet", "7", "--out", path.to_str().unwrap()]).is_err());
}

#[test]
fn multi_wallet_export_is_oldest_first_overall() {
    let conn = base_conn();
    conn.execute(
        "INSERT INTO transactions(wallet_id,amount,timestamp) VALUES (2,'-7','2024-02-28T08:00:00+00:00')",
        [],
    )
    .unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("all.csv");
    run(&conn, &["--out", path.to_str().unwrap()]).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let stamps: Vec<(String, String)> = rdr
        .records()
        .map(|r| {
            let r = r.unwrap();
            (r[0].to_string(), r[1].to_string())
        })
        .collect();
    assert_eq!(
        stamps,
        vec![
            ("2024-02-28T08:00:00+00:00".to_string(), "Cash".to_string()),
            ("2024-03-01T09:00:00+00:00".to_string(), "Debit".to_string()),
            ("2024-03-02T12:00:00+00:00".to_string(), "Debit".to_string()),
            ("2024-03-05T08:00:00+00:00".to_string(), "Cash".to_string()),
        ]
    );
}
