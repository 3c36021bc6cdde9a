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

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn req(name: &'static str, help: &'static str) -> Arg {
    opt(name, help).required(true)
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help("Record id")
}

fn period_args(cmd: Command) -> Command {
    cmd.arg(opt("period", "week|month|quarter|year").default_value("month"))
        .arg(opt("date", "Reference date YYYY-MM-DD (default: today)"))
}

pub fn build_cli() -> Command {
    Command::new("pocketplan")
        .about("Personal finance tracking, budgets and balance projections")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("tx")
                .about("Income and expense transactions")
                .subcommand(
                    Command::new("add")
                        .arg(req("date", "YYYY-MM-DD"))
                        .arg(req("description", "What the money was for"))
                        .arg(req("amount", "Non-negative amount"))
                        .arg(opt("category", "Category; suggested when omitted"))
                        .arg(opt("type", "income|expense; required without --category"))
                        .arg(opt("account", "Account").default_value("checking")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(opt("period", "Only this period: week|month|quarter|year"))
                        .arg(opt("date", "Reference date for --period (default: today)"))
                        .arg(opt("type", "income|expense"))
                        .arg(opt("category", "Category"))
                        .arg(opt("account", "Account"))
                        .arg(opt("limit", "Newest N rows").value_parser(value_parser!(usize))),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(opt("date", "YYYY-MM-DD"))
                        .arg(opt("description", "Description"))
                        .arg(opt("amount", "Amount"))
                        .arg(opt("category", "Category (type follows it)"))
                        .arg(opt("account", "Account")),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("transfer")
                .about("Movements between your own accounts")
                .subcommand(
                    Command::new("add")
                        .arg(req("date", "YYYY-MM-DD"))
                        .arg(opt("description", "Description").default_value(""))
                        .arg(req("amount", "Positive amount"))
                        .arg(req("from", "Source account"))
                        .arg(req("to", "Destination account")),
                )
                .subcommand(json_flags(period_args(Command::new("list")).arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .help("Ignore --period"),
                )))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly budgets per expense category")
                .subcommand(
                    Command::new("set")
                        .arg(req("month", "YYYY-MM"))
                        .arg(req("category", "Expense category"))
                        .arg(req("amount", "Planned amount")),
                )
                .subcommand(json_flags(Command::new("list").arg(req("month", "YYYY-MM"))))
                .subcommand(
                    Command::new("rm")
                        .arg(req("month", "YYYY-MM"))
                        .arg(req("category", "Expense category")),
                )
                .subcommand(json_flags(
                    Command::new("report").arg(req("month", "YYYY-MM")),
                ))
                .subcommand(json_flags(
                    Command::new("alerts").arg(req("month", "YYYY-MM")),
                )),
        )
        .subcommand(
            Command::new("event")
                .about("Planned future cash events")
                .subcommand(
                    Command::new("add")
                        .arg(req("date", "YYYY-MM-DD"))
                        .arg(req("description", "Description"))
                        .arg(req("amount", "Amount")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(json_flags(
                    Command::new("upcoming")
                        .arg(
                            opt("days", "Look-ahead window in days")
                                .default_value("30")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(opt("date", "Treat this date as today")),
                ))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("projection")
                .about("Multi-month balance projections")
                .subcommand(
                    Command::new("create")
                        .arg(req("name", "Scenario name"))
                        .arg(req("balance", "Starting balance"))
                        .arg(
                            opt("months", "Months to project (1-60)")
                                .default_value("12")
                                .value_parser(value_parser!(u32)),
                        ),
                )
                .subcommand(
                    Command::new("add-item")
                        .arg(id_arg())
                        .arg(req("side", "income|expense"))
                        .arg(opt("kind", "once|recurring").default_value("recurring"))
                        .arg(req("description", "Description"))
                        .arg(req("amount", "Amount")),
                )
                .subcommand(
                    Command::new("rm-item").arg(id_arg()).arg(
                        Arg::new("item")
                            .long("item")
                            .required(true)
                            .value_parser(value_parser!(i64))
                            .help("Item id"),
                    ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(json_flags(Command::new("run").arg(id_arg())))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated statistics")
                .subcommand(json_flags(period_args(Command::new("totals"))))
                .subcommand(json_flags(
                    period_args(Command::new("categories"))
                        .arg(opt("type", "income|expense").default_value("expense")),
                ))
                .subcommand(json_flags(
                    period_args(Command::new("pareto")).arg(
                        opt("top", "Categories kept")
                            .default_value("5")
                            .value_parser(value_parser!(usize)),
                    ),
                ))
                .subcommand(json_flags(Command::new("cashflow").arg(
                    opt("months", "Most recent N months")
                        .default_value("12")
                        .value_parser(value_parser!(usize)),
                )))
                .subcommand(json_flags(Command::new("balances"))),
        )
        .subcommand(
            Command::new("import").subcommand(
                Command::new("transactions")
                    .arg(req("path", "CSV: date,description,amount,type,category,account")),
            ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(opt("format", "csv|json").default_value("csv"))
                    .arg(req("out", "Output file")),
            ),
        )
        .subcommand(
            Command::new("rules")
                .about("Regex categorization rules")
                .subcommand(
                    Command::new("add")
                        .arg(req("pattern", "Regex matched against descriptions"))
                        .arg(opt("category", "Category to assign"))
                        .arg(opt("description_rewrite", "Replacement description")),
                )
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(json_flags(
            Command::new("categorize")
                .about("Suggest a category for a transaction")
                .arg(req("description", "Description"))
                .arg(opt("amount", "Amount").default_value("0"))
                .arg(opt("type", "income|expense").default_value("expense")),
        ))
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(req("key", "base_currency|week_start|budget_warn_ratio|ai_endpoint"))
                        .arg(req("value", "New value")),
                ),
        )
}
