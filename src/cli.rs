// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn id_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .required(true)
        .value_parser(value_parser!(i64))
        .help(help)
}

pub fn build_cli() -> Command {
    Command::new("walletlens")
        .about("Wallets, transactions, categories and per-period finance summaries")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("Path to the SQLite database (overrides WALLETLENS_DB)"),
        )
        .subcommand(Command::new("init").about("Create the database if needed"))
        .subcommand(
            Command::new("wallet")
                .about("Manage wallets")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .default_value("0")
                                .help("Initial balance"),
                        )
                        .arg(
                            Arg::new("currency")
                                .long("currency")
                                .help("ISO code; defaults to the configured currency"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("edit")
                        .about("Change the given fields of a wallet")
                        .arg(id_arg("id", "Wallet id"))
                        .arg(Arg::new("title").long("title"))
                        .arg(Arg::new("balance").long("balance").allow_hyphen_values(true))
                        .arg(Arg::new("currency").long("currency")),
                )
                .subcommand(Command::new("rm").arg(id_arg("id", "Wallet id")))
                .subcommand(
                    Command::new("primary")
                        .about("Mark a wallet as primary")
                        .arg(
                            Arg::new("id")
                                .value_parser(value_parser!(i64))
                                .required_unless_present("clear"),
                        )
                        .arg(
                            Arg::new("clear")
                                .long("clear")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("id"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Finance summary of one wallet")
                        .arg(id_arg("id", "Wallet id"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("none")
                                .help("none|expenses|income"),
                        )
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .help("week|month|year|all (default: all, or month with --type)"),
                        )
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .value_parser(value_parser!(i32)),
                        )
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .value_parser(value_parser!(u32).range(1..=12)),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .action(ArgAction::Append)
                                .help("Restrict to a category (repeatable)"),
                        ),
                )),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("title").required(true))
                        .arg(
                            Arg::new("icon")
                                .long("icon")
                                .default_value("0")
                                .value_parser(value_parser!(i32)),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("title").required(true))
                        .arg(Arg::new("rename").long("rename").help("New title"))
                        .arg(
                            Arg::new("icon")
                                .long("icon")
                                .value_parser(value_parser!(i32)),
                        ),
                )
                .subcommand(Command::new("rm").arg(Arg::new("title").required(true)))
                .subcommand(
                    Command::new("hide")
                        .about(
                            "Hide categories one after another; each new hide deletes the previous one",
                        )
                        .arg(
                            Arg::new("title")
                                .required(true)
                                .num_args(1..)
                                .action(ArgAction::Append),
                        )
                        .arg(
                            Arg::new("undo")
                                .long("undo")
                                .action(ArgAction::SetTrue)
                                .help("Restore the last hidden category instead of deleting it"),
                        ),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Manage transactions")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("wallet")
                                .long("wallet")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Negative for expenses, positive for income"),
                        )
                        .arg(Arg::new("description").long("description").default_value(""))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("at")
                                .long("at")
                                .help("YYYY-MM-DD, 'YYYY-MM-DD HH:MM' or RFC 3339; defaults to now"),
                        )
                        .arg(
                            Arg::new("ignored")
                                .long("ignored")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(
                            Arg::new("wallet")
                                .long("wallet")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Change the given fields of a transaction")
                        .arg(id_arg("id", "Transaction id"))
                        .arg(
                            Arg::new("wallet")
                                .long("wallet")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("amount").long("amount").allow_hyphen_values(true))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("no-category")
                                .long("no-category")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("category"),
                        )
                        .arg(Arg::new("at").long("at")),
                )
                .subcommand(Command::new("rm").arg(id_arg("id", "Transaction id")))
                .subcommand(
                    Command::new("ignore")
                        .arg(id_arg("id", "Transaction id"))
                        .arg(
                            Arg::new("off")
                                .long("off")
                                .action(ArgAction::SetTrue)
                                .help("Count the transaction again"),
                        ),
                )
                .subcommand(
                    Command::new("repeat")
                        .about("Record a copy of a transaction stamped now")
                        .arg(id_arg("id", "Transaction id")),
                ),
        )
        .subcommand(
            Command::new("subscription")
                .about("Manage recurring payments")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .required(true)
                                .help("Payment date, YYYY-MM-DD"),
                        )
                        .arg(
                            Arg::new("currency")
                                .long("currency")
                                .help("ISO code; defaults to the configured currency"),
                        )
                        .arg(
                            Arg::new("repeat")
                                .long("repeat")
                                .help("daily|weekly|monthly|yearly"),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg("id", "Subscription id"))
                        .arg(Arg::new("title").long("title"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(Arg::new("repeat").long("repeat"))
                        .arg(
                            Arg::new("once")
                                .long("once")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("repeat")
                                .help("Stop repeating"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("rm").arg(id_arg("id", "Subscription id"))),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("wallet")
                                .long("wallet")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("settings")
                .about("User settings")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("set-currency").arg(Arg::new("currency").required(true)),
                ),
        )
}
