// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! This file is used by the build script. Therefore everything generating the command line parser must be included
//! here and may only depend on clap.

use clap::{value_parser, Arg, ArgAction, Command};

pub fn create_parser() -> Command {
    Command::new("dns-check")
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new("record type")
                .index(1)
                .value_name("TYPE")
                .required_unless_present("list-nameservers")
                .help("Record type to query, e.g., A, AAAA, MX, TXT"),
        )
        .arg(
            Arg::new("domain name")
                .index(2)
                .value_name("NAME")
                .required_unless_present("list-nameservers")
                .help("Domain name to query, e.g., www.example.com"),
        )
        .arg(
            Arg::new("full-scan")
                .short('f')
                .long("full-scan")
                .action(ArgAction::SetTrue)
                .help("Queries all nameservers of the directory instead of only core providers"),
        )
        .arg(
            Arg::new("assert")
                .short('a')
                .long("assert")
                .value_name("VALUE")
                .action(ArgAction::Append)
                .value_delimiter(',')
                .help("Expects exactly these answers; exits with 2 if not enough nameservers return them"),
        )
        .arg(
            Arg::new("assert-threshold")
                .long("assert-threshold")
                .value_name("PERCENT")
                .value_parser(value_parser!(f64))
                .default_value("100.0")
                .help("Sets the minimum percentage of nameservers that must pass the assertion"),
        )
        .arg(
            Arg::new("fail-on-error")
                .long("fail-on-error")
                .action(ArgAction::SetTrue)
                .help("Counts failed queries as failures even without assertion"),
        )
        .arg(
            Arg::new("long")
                .short('l')
                .long("long")
                .action(ArgAction::SetTrue)
                .help("Shows the answers of every nameserver even when asserting"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FORMAT")
                .default_value("summary")
                .value_parser(["json", "summary"])
                .help("Sets the output format for result presentation"),
        )
        .arg(
            Arg::new("max-concurrent")
                .long("max-concurrent")
                .value_name("NUMBER")
                .value_parser(value_parser!(usize))
                .default_value("10")
                .help("Sets max. number of concurrent queries"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("DURATION")
                .default_value("5s")
                .help("Sets timeout for responses, e.g., 500ms or 5s"),
        )
        .arg(
            Arg::new("retries")
                .long("retries")
                .value_name("RETRIES")
                .value_parser(value_parser!(usize))
                .default_value("0")
                .help("Sets number of retries if a query to a nameserver fails"),
        )
        .arg(
            Arg::new("tcp")
                .long("tcp")
                .action(ArgAction::SetTrue)
                .help("Sends queries via TCP instead of UDP"),
        )
        .arg(
            Arg::new("nameservers-file")
                .long("nameservers-file")
                .value_name("FILE")
                .help("Uses nameserver directory from YAML file instead of the built-in one"),
        )
        .arg(
            Arg::new("list-nameservers")
                .long("list-nameservers")
                .action(ArgAction::SetTrue)
                .help("Lists all nameservers of the directory"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Does not print anything; result is only signaled by exit code"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .help("Disables colorful output"),
        )
        .arg(
            Arg::new("ascii")
                .long("ascii")
                .action(ArgAction::SetTrue)
                .help("Uses only ASCII compatible characters for output"),
        )
        .arg(
            Arg::new("v")
                .short('v')
                .action(ArgAction::Count)
                .help("Sets the level of verbosity"),
        )
}
