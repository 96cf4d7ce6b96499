use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitemapper")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitemapper")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Only print the final summary")
                .required(false)
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-v --"verbose" "Log every request to stderr")
                .required(false)
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            command!("extract")
                .about(
                    "Find a website's sitemap, collect every URL it declares and save them \
                to a CSV file.",
                )
                .arg(
                    arg!(-d --"domain" <DOMAIN>)
                        .required(true)
                        .help("Website address, e.g. example.com (https:// is assumed)"),
                )
                .arg(
                    arg!(-f --"filter" <FILTERS>)
                        .required(false)
                        .help("Comma-separated substrings; keep URLs containing any of them, e.g. \"/blog/, /post/\"")
                        .default_value(""),
                )
                .arg(
                    arg!(--"validate")
                        .required(false)
                        .help("Only keep URLs that answer with status 200")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("CSV file to write (default: <host>.csv in the current directory)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("Number of concurrent link checks when validating")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("8"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds for every stage (default: 10s probes, 15s sitemaps, 10s checks)")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                )
                .arg(
                    arg!(--"top" <COUNT>)
                        .required(false)
                        .help("Number of keywords in the summary")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"robots-fallback")
                        .required(false)
                        .help("Try sitemaps declared in robots.txt when no standard location works")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"format" <FORMAT>)
                        .required(false)
                        .help("Summary format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("locate")
                .about("Check robots.txt and report where the sitemap lives, without collecting it.")
                .arg(
                    arg!(-d --"domain" <DOMAIN>)
                        .required(true)
                        .help("Website address, e.g. example.com (https:// is assumed)"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                ),
        )
}
