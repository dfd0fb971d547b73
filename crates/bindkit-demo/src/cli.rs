#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually. Supports environment variable overrides via the
//! `BINDKIT_DEMO_*` prefix; explicit flags win over the environment.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
bindkit demo: two-way binding and calendar delegate walkthrough

USAGE:
    bindkit-demo [OPTIONS]

OPTIONS:
    --name=TEXT       Initial user name (default: Samantha Gatt)
    --rename=TEXT     Name applied by the delayed change (default: Sammie)
    --delay-ms=N      Delay before the rename, in ms (default: 2000)
    --year=N          Year the calendar switches to after the rename
    --width=N         Field width in columns (default: 24)
    --help, -h        Show this help message
    --version, -V     Show version

ENVIRONMENT VARIABLES:
    BINDKIT_DEMO_NAME        Override --name
    BINDKIT_DEMO_RENAME      Override --rename
    BINDKIT_DEMO_DELAY_MS    Override --delay-ms
    BINDKIT_DEMO_YEAR        Override --year
    BINDKIT_DEMO_WIDTH       Override --width
    BINDKIT_POLL_SLICE_MS    Main loop sleep slice in ms
    BINDKIT_MAX_RUN_MS       Main loop give-up time in ms (0 = never)
    RUST_LOG                 Log filter (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Initial value of the user's name.
    pub name: String,
    /// Value the delayed change writes.
    pub rename: String,
    /// Delay before the rename, in milliseconds.
    pub delay_ms: u64,
    /// Year to switch the calendar to (None = next year).
    pub year: Option<i32>,
    /// Width of the rendered field.
    pub width: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseError {
    Help,
    Version,
    InvalidValue { flag: &'static str, value: String },
    UnknownArg(String),
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            name: "Samantha Gatt".into(),
            rename: "Sammie".into(),
            delay_ms: 2000,
            year: None,
            width: 24,
        }
    }
}

impl Opts {
    /// Parse command-line arguments and environment variables, exiting on
    /// `--help`, `--version`, or bad input.
    pub fn parse() -> Self {
        match Self::parse_from_env_and_args(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(ParseError::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseError::Version) => {
                println!("bindkit-demo {VERSION}");
                process::exit(0);
            }
            Err(ParseError::InvalidValue { flag, value }) => {
                eprintln!("Invalid {flag} value: {value}");
                process::exit(1);
            }
            Err(ParseError::UnknownArg(arg)) => {
                eprintln!("Unknown argument: {arg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    pub(crate) fn parse_from_env_and_args<I, S, F>(args: I, get_env: F) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(val) = get_env("BINDKIT_DEMO_NAME") {
            opts.name = val;
        }
        if let Some(val) = get_env("BINDKIT_DEMO_RENAME") {
            opts.rename = val;
        }
        if let Some(val) = get_env("BINDKIT_DEMO_DELAY_MS")
            && let Ok(n) = val.trim().parse()
        {
            opts.delay_ms = n;
        }
        if let Some(val) = get_env("BINDKIT_DEMO_YEAR")
            && let Ok(n) = val.trim().parse()
        {
            opts.year = Some(n);
        }
        if let Some(val) = get_env("BINDKIT_DEMO_WIDTH")
            && let Ok(n) = val.trim().parse()
        {
            opts.width = n;
        }

        for arg in args {
            let arg = arg.as_ref();
            match arg {
                "--help" | "-h" => return Err(ParseError::Help),
                "--version" | "-V" => return Err(ParseError::Version),
                _ => {}
            }
            if let Some(val) = arg.strip_prefix("--name=") {
                opts.name = val.to_string();
            } else if let Some(val) = arg.strip_prefix("--rename=") {
                opts.rename = val.to_string();
            } else if let Some(val) = arg.strip_prefix("--delay-ms=") {
                opts.delay_ms = parse_flag("--delay-ms", val)?;
            } else if let Some(val) = arg.strip_prefix("--year=") {
                opts.year = Some(parse_flag("--year", val)?);
            } else if let Some(val) = arg.strip_prefix("--width=") {
                opts.width = parse_flag("--width", val)?;
            } else {
                return Err(ParseError::UnknownArg(arg.to_string()));
            }
        }

        Ok(opts)
    }
}

fn parse_flag<T: std::str::FromStr>(flag: &'static str, value: &str) -> Result<T, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidValue {
        flag,
        value: value.to_string(),
    })
}
