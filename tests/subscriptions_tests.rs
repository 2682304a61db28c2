// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use walletlens::error::StoreError;
use walletlens::models::{RepeatingInterval, Subscription};
use walletlens::{cli, commands::subscriptions, db, store};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["walletlens", "subscription"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("subscription", m)) => subscriptions::handle(conn, m),
        _ => panic!("no subscription subcommand"),
    }
}

fn sample(date: &str, repeating: Option<RepeatingInterval>) -> Subscription {
    Subscription {
        id: 0,
        title: "Music".into(),
        amount: "9.99".parse().unwrap(),
        currency: "USD".into(),
        payment_date: day(date),
        repeating,
    }
}

#[test]
fn add_list_edit_rm() {
    let conn = setup();
    run(
        &conn,
        &[
            "add", "--title", "Music", "--amount", "9.99", "--date", "2024-01-31", "--repeat",
            "monthly",
        ],
    )
    .unwrap();
    run(&conn, &["add", "--title", "Domain", "--amount", "12", "--date", "2024-01-05"]).unwrap();

    let all = store::list_subscriptions(&conn).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].title, "Domain");
    assert_eq!(all[0].currency, "USD");
    assert_eq!(all[0].repeating, None);
    let music = &all[1];
    assert_eq!(music.amount, "9.99".parse::<Decimal>().unwrap());
    assert_eq!(music.repeating, Some(RepeatingInterval::Monthly));

    let id = music.id.to_string();
    let id = id.as_str();
    run(&conn, &["edit", id, "--amount", "10.99", "--currency", "eur", "--once"]).unwrap();
    let edited = store::get_subscription(&conn, music.id).unwrap();
    assert_eq!(edited.amount, "10.99".parse::<Decimal>().unwrap());
    assert_eq!(edited.currency, "EUR");
    assert_eq!(edited.repeating, None);
    assert_eq!(edited.payment_date, day("2024-01-31"));

    run(&conn, &["rm", id]).unwrap();
    assert!(matches!(
        store::get_subscription(&conn, music.id),
        Err(StoreError::SubscriptionNotFound(_))
    ));
    assert!(run(&conn, &["rm", id]).is_err());
}

#[test]
fn add_rejects_bad_input() {
    let conn = setup();
    let zero = ["add", "--title", "X", "--amount", "0", "--date", "2024-01-01"];
    assert!(run(&conn, &zero).is_err());
    let bad_date = ["add", "--title", "X", "--amount", "5", "--date", "01/02/2024"];
    assert!(run(&conn, &bad_date).is_err());
    let bad_interval = [
        "add", "--title", "X", "--amount", "5", "--date", "2024-01-01", "--repeat", "hourly",
    ];
    assert!(run(&conn, &bad_interval).is_err());
    assert!(store::list_subscriptions(&conn).unwrap().is_empty());
}

#[test]
fn next_payment_follows_interval() {
    let today = day("2024-03-10");
    assert_eq!(sample("2024-03-10", None).next_payment(today), Some(today));
    assert_eq!(sample("2024-03-01", None).next_payment(today), None);
    assert_eq!(
        sample("2024-01-31", Some(RepeatingInterval::Monthly)).next_payment(today),
        Some(day("2024-03-31"))
    );
    assert_eq!(
        sample("2024-03-01", Some(RepeatingInterval::Weekly)).next_payment(today),
        Some(day("2024-03-15"))
    );
    assert_eq!(
        sample("2024-03-01", Some(RepeatingInterval::Daily)).next_payment(today),
        Some(today)
    );
    assert_eq!(
        sample("2020-02-29", Some(RepeatingInterval::Yearly)).next_payment(today),
        Some(day("2025-02-28"))
    );
}

#[test]
fn upcoming_is_soonest_first_with_finished_last() {
    let conn = setup();
    let once_past = store::upsert_subscription(&conn, &sample("2024-01-01", None)).unwrap();
    let monthly = store::upsert_subscription(
        &conn,
        &sample("2023-12-20", Some(RepeatingInterval::Monthly)),
    )
    .unwrap();
    let once_soon = store::upsert_subscription(&conn, &sample("2024-03-12", None)).unwrap();

    let rows = subscriptions::upcoming(&conn, day("2024-03-10")).unwrap();
    let order: Vec<(i64, Option<NaiveDate>)> = rows
        .iter()
        .map(|r| (r.subscription.id, r.next_payment))
        .collect();
    assert_eq!(
        order,
        vec![
            (once_soon, Some(day("2024-03-12"))),
            (monthly, Some(day("2024-03-20"))),
            (once_past, None),
        ]
    );
}
