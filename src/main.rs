//! Convert an environment variable to a typed value and print it as json.
//!
//! The exit code is 0 on success, 1 when the value cannot be converted, and 2 when the options
//! are invalid for the requested type.

use clap::{builder::PossibleValuesParser, value_parser, Arg, ArgAction, ArgMatches, Command};
use envcast::{Case, CaseMode, Delimiter, Options, ParsedEnv, PemFilter, TypeDescriptor, Value};
use regex::Regex;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

const CASE_MODES: [&str; 5] = ["off", "default", "ascii", "greek", "turkic"];

fn command() -> Command {
    Command::new("envcast")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert an environment variable to a typed value, and print it as json")
        .arg(
            Arg::new("name")
                .required(true)
                .help("Name of the environment variable"),
        )
        .arg(
            Arg::new("as")
                .long("as")
                .value_name("TYPE")
                .required(true)
                .value_parser(value_parser!(TypeDescriptor))
                .help("Type to convert to, such as `integer`, `base64` or `list:integer`"),
        )
        .arg(
            Arg::new("value")
                .long("value")
                .help("Convert this value instead of reading the environment"),
        )
        .arg(
            Arg::new("default")
                .long("default")
                .help("Raw value to convert when the variable is unset"),
        )
        .arg(
            Arg::new("base")
                .long("base")
                .value_parser(value_parser!(i64))
                .help("Base of an integer"),
        )
        .arg(
            Arg::new("downcase")
                .long("downcase")
                .value_name("MODE")
                .value_parser(PossibleValuesParser::new(CASE_MODES))
                .conflicts_with("upcase")
                .help("Lowercase the value before converting it"),
        )
        .arg(
            Arg::new("upcase")
                .long("upcase")
                .value_name("MODE")
                .value_parser(PossibleValuesParser::new(CASE_MODES))
                .help("Uppercase the value before converting it"),
        )
        .arg(
            Arg::new("truthy")
                .long("truthy")
                .value_delimiter(',')
                .help("Comma-separated values which are true"),
        )
        .arg(
            Arg::new("falsy")
                .long("falsy")
                .value_delimiter(',')
                .help("Comma-separated values which are false"),
        )
        .arg(
            Arg::new("allowed")
                .long("allowed")
                .value_delimiter(',')
                .help("Comma-separated names which an atom or module may take"),
        )
        .arg(
            Arg::new("delimiter")
                .long("delimiter")
                .conflicts_with("regex")
                .help("Literal string a list is split on"),
        )
        .arg(
            Arg::new("regex")
                .long("regex")
                .value_parser(|src: &str| Regex::new(src))
                .help("Regular expression a list is split on"),
        )
        .arg(
            Arg::new("parts")
                .long("parts")
                .value_parser(value_parser!(i64))
                .help("Most parts a list is split into"),
        )
        .arg(
            Arg::new("trim")
                .long("trim")
                .action(ArgAction::SetTrue)
                .help("Drop empty list parts"),
        )
        .arg(
            Arg::new("case")
                .long("case")
                .value_parser(PossibleValuesParser::new(["upper", "lower", "mixed"]))
                .help("Letter case of base16 and base32 values"),
        )
        .arg(
            Arg::new("no-padding")
                .long("no-padding")
                .action(ArgAction::SetTrue)
                .help("Accept encoded values without padding"),
        )
        .arg(
            Arg::new("filter")
                .long("filter")
                .value_parser(PossibleValuesParser::new(["false", "true", "cert", "key"]))
                .help("Which PEM entries are returned"),
        )
}

fn case_mode(name: &str) -> CaseMode {
    match name {
        "default" => CaseMode::Default,
        "ascii" => CaseMode::Ascii,
        "greek" => CaseMode::Greek,
        "turkic" => CaseMode::Turkic,
        _ => CaseMode::Off,
    }
}

fn strings(matches: &ArgMatches, id: &str) -> Option<Vec<String>> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
}

// The same options are used for both stages of a wrapped type, each stage ignores what it
// does not read.
fn options(matches: &ArgMatches) -> Options {
    let mut opts = Options::new();
    if let Some(base) = matches.get_one::<i64>("base") {
        opts = opts.base(*base);
    }
    if let Some(mode) = matches.get_one::<String>("downcase") {
        opts = opts.downcase(case_mode(mode));
    }
    if let Some(mode) = matches.get_one::<String>("upcase") {
        opts = opts.upcase(case_mode(mode));
    }
    if let Some(truthy) = strings(matches, "truthy") {
        opts = opts.truthy(truthy);
    }
    if let Some(falsy) = strings(matches, "falsy") {
        opts = opts.falsy(falsy);
    }
    if let Some(allowed) = strings(matches, "allowed") {
        opts = opts.allowed(allowed);
    }
    if let Some(delimiter) = matches.get_one::<String>("delimiter") {
        opts = opts.delimiter(delimiter.as_str());
    }
    if let Some(regex) = matches.get_one::<Regex>("regex") {
        opts = opts.delimiter(Delimiter::Pattern(regex.clone()));
    }
    if let Some(parts) = matches.get_one::<i64>("parts") {
        opts = opts.parts(*parts);
    }
    if matches.get_flag("trim") {
        opts = opts.trim(true);
    }
    if let Some(case) = matches.get_one::<String>("case") {
        opts = opts.case(match case.as_str() {
            "lower" => Case::Lower,
            "mixed" => Case::Mixed,
            _ => Case::Upper,
        });
    }
    if matches.get_flag("no-padding") {
        opts = opts.padding(false);
    }
    if let Some(filter) = matches.get_one::<String>("filter") {
        opts = opts.filter(match filter.as_str() {
            "true" => PemFilter::On,
            "cert" => PemFilter::Cert,
            "key" => PemFilter::Key,
            _ => PemFilter::Off,
        });
    }
    opts.clone().secondary(opts)
}

fn init_tracing() {
    Registry::default()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("warn")))
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let matches = command().get_matches();

    // Both are required, clap has already rejected a command line without them
    let (Some(name), Some(descriptor)) = (
        matches.get_one::<String>("name"),
        matches.get_one::<TypeDescriptor>("as").copied(),
    ) else {
        return ExitCode::from(2);
    };
    let opts = options(&matches);

    let env = ParsedEnv::from_process();
    let raw = match matches.get_one::<String>("value") {
        Some(value) => Ok(Some(value.as_str())),
        None => env.get_str(name),
    };
    let result = raw.and_then(|raw| {
        let raw = raw.or(matches.get_one::<String>("default").map(String::as_str));
        envcast::convert_as(raw, name, descriptor, &opts)
    });

    match result {
        Ok(value) => {
            println!("{}", to_json(&value));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
        }
    }
}

fn to_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| format!("\"<{err}>\""))
}
