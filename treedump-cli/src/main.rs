//! Command-line interface for treedump
//! Dumps trees stored as JSON files, compares dumps and looks elements up by identity.
//!
//! Usage:
//!   treedump dump `<tree>` [--format `<format>`] [--attribute `<name>`]... [--exclude `<id>`]
//!   treedump compare `<expected>` `<actual>` [--epsilon `<epsilon>`]
//!   treedump find `<dump>` `<id>`
//!   treedump formats
//!
//! `compare` exits with 0 when the dumps are equal, 1 when they differ and 2 on errors.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::error::Error;
use std::fs;
use std::process;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use treedump::{find_by_identity, find_node_by_identity, MemoryNode, OutputFormat};
use treedump_config::{Loader, TreeDumpConfig};

const EXIT_DIFFERENT: i32 = 1;
const EXIT_ERROR: i32 = 2;

type CliResult<T> = Result<T, Box<dyn Error>>;

fn build_cli() -> Command {
    Command::new("treedump")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Structural snapshots of element trees, and tolerant comparison of them")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .help("Log filtering and comparison decisions (RUST_LOG overrides)")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("dump")
                .about("Dump a tree stored as JSON")
                .arg(
                    Arg::new("tree")
                        .help("Path to the tree file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format: json or legacy (default from config)"),
                )
                .arg(
                    Arg::new("attribute")
                        .long("attribute")
                        .short('a')
                        .visible_alias("attr")
                        .help("Extra own attribute to report (repeatable)")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("exclude")
                        .long("exclude")
                        .short('x')
                        .help("Identity tag of an element to leave out, with its subtree"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write the dump to this file instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("compare")
                .about("Compare two JSON dumps")
                .arg(Arg::new("expected").required(true).index(1))
                .arg(Arg::new("actual").required(true).index(2))
                .arg(
                    Arg::new("epsilon")
                        .long("epsilon")
                        .short('e')
                        .help("Absolute numeric tolerance (default from config)")
                        .value_parser(value_parser!(f64)),
                ),
        )
        .subcommand(
            Command::new("find")
                .about("Print the element of a JSON dump with the given identity tag")
                .arg(Arg::new("dump").required(true).index(1))
                .arg(Arg::new("id").required(true).index(2)),
        )
        .subcommand(Command::new("formats").about("List available output formats"))
}

fn main() {
    let matches = build_cli().get_matches();
    let verbose = matches.get_flag("verbose")
        || matches
            .subcommand()
            .map_or(false, |(_, sub)| sub.get_flag("verbose"));
    init_logging(verbose);

    let code = match run(&matches) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {}", err);
            EXIT_ERROR
        }
    };
    process::exit(code);
}

/// Logs go to stderr so that stdout stays a clean document
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(matches: &ArgMatches) -> CliResult<i32> {
    match matches.subcommand() {
        Some(("dump", sub)) => handle_dump_command(sub),
        Some(("compare", sub)) => handle_compare_command(sub),
        Some(("find", sub)) => handle_find_command(sub),
        Some(("formats", _)) => {
            handle_formats_command();
            Ok(0)
        }
        _ => Err("a subcommand is required".into()),
    }
}

fn loader_for(matches: &ArgMatches) -> Loader {
    match matches.get_one::<String>("config") {
        Some(path) => {
            debug!(path = %path, "layering configuration file");
            Loader::new().with_file(path)
        }
        None => Loader::new(),
    }
}

fn read_file(path: &str) -> CliResult<String> {
    fs::read_to_string(path).map_err(|err| format!("cannot read {}: {}", path, err).into())
}

/// Handle the dump command
fn handle_dump_command(matches: &ArgMatches) -> CliResult<i32> {
    let mut loader = loader_for(matches);
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader.set_override("output.format", format.as_str())?;
    }
    let mut config: TreeDumpConfig = loader.build()?;
    if let Some(names) = matches.get_many::<String>("attribute") {
        config.filter.extra_names.extend(names.cloned());
    }
    let dumper = config.dumper()?;

    let path = matches
        .get_one::<String>("tree")
        .expect("tree is a required argument");
    let tree = MemoryNode::from_json(&read_file(path)?)
        .map_err(|err| format!("invalid tree file {}: {}", path, err))?;

    let excluded = match matches.get_one::<String>("exclude") {
        Some(id) => Some(
            find_node_by_identity(&tree, id)
                .ok_or_else(|| format!("no element with identity tag {:?}", id))?,
        ),
        None => None,
    };

    let root = &tree;
    let document = dumper.dump(Some(&root), excluded.as_ref())?;
    if document.is_empty() {
        info!("root element is hidden, the dump is empty");
    }

    match matches.get_one::<String>("output") {
        Some(output) => fs::write(output, document.as_str())
            .map_err(|err| format!("cannot write {}: {}", output, err))?,
        None => print!("{}", document),
    }
    Ok(0)
}

/// Handle the compare command
fn handle_compare_command(matches: &ArgMatches) -> CliResult<i32> {
    let mut loader = loader_for(matches);
    if let Some(epsilon) = matches.get_one::<f64>("epsilon") {
        loader = loader.set_override("compare.epsilon", *epsilon)?;
    }
    let comparator = loader.build()?.comparator();

    let expected = read_file(
        matches
            .get_one::<String>("expected")
            .expect("expected is a required argument"),
    )?;
    let actual = read_file(
        matches
            .get_one::<String>("actual")
            .expect("actual is a required argument"),
    )?;

    let result = comparator.compare_dumps(&expected, &actual)?;
    if result.equal {
        println!("Dumps are equal");
        Ok(0)
    } else {
        println!("Dumps differ");
        eprintln!("{}", result.trail());
        Ok(EXIT_DIFFERENT)
    }
}

/// Handle the find command
fn handle_find_command(matches: &ArgMatches) -> CliResult<i32> {
    let path = matches
        .get_one::<String>("dump")
        .expect("dump is a required argument");
    let id = matches
        .get_one::<String>("id")
        .expect("id is a required argument");

    let document: serde_json::Value = serde_json::from_str(&read_file(path)?)
        .map_err(|err| format!("invalid dump {}: {}", path, err))?;
    match find_by_identity(&document, id) {
        Some(element) => {
            println!("{}", serde_json::to_string_pretty(element)?);
            Ok(0)
        }
        None => {
            eprintln!("No element with identity tag {:?}", id);
            Ok(EXIT_DIFFERENT)
        }
    }
}

/// Handle the formats command
fn handle_formats_command() {
    println!("Available output formats:\n");
    for format in OutputFormat::available() {
        println!("  {}", format.name());
        println!("    {}", format.description());
        println!();
    }
}
