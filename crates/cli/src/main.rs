//! Example command built on `argot`.
//!
//! Exercises the whole API surface: positional, named, and flag
//! arguments, every built-in value type, a custom argument type, and
//! nested command groups. The parsed result is printed as JSON.

use std::sync::LazyLock;

use anyhow::Result;
use argot::types::{INTEGER, NUMBER, STRING};
use argot::{ArgOpts, ArgumentType, Command, CommandGroup, FlagOpts, ParseError, Value, choice};
use regex::Regex;
use tracing_subscriber::{EnvFilter, fmt};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9._-]+@[a-z0-9._-]+$").expect("static email pattern")
});

/// A custom argument type: a loosely validated email address.
struct Email;

impl ArgumentType for Email {
    fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        if EMAIL_PATTERN.is_match(raw) {
            Ok(Value::Str(raw.to_string()))
        } else {
            Err(ParseError::custom(format!(
                "'{}' is not a recognized email address",
                raw.replace('\'', "\\'")
            )))
        }
    }

    fn type_name(&self) -> &str {
        "EMAIL"
    }
}

fn commands() -> CommandGroup {
    let person = Command::new("Describe a person.")
        .required(STRING, "name", ArgOpts::new())
        .required(
            NUMBER,
            "age",
            ArgOpts::new()
                .flags(["a", "age"])
                .description("The persons age in years."),
        )
        .flag(
            "dead",
            FlagOpts::new().description("Whether this person is dead."),
        );

    let device = Command::new("Input your device details.")
        .required(
            choice("DEVICE_TYPE", ["phone", "laptop", "desktop"]),
            "type",
            ArgOpts::new(),
        )
        .required(
            INTEGER,
            "serialNumber",
            ArgOpts::new()
                .flags(["s", "serial", "serial-number"])
                .description("The devices serial number."),
        )
        .optional(
            STRING,
            "friendlyName",
            ArgOpts::new()
                .flags(["n", "name", "friendly-name"])
                .description("A friendly name for the device."),
        )
        .flag(
            "lost",
            FlagOpts::new().description("Whether this device was lost."),
        );

    let signup = Command::new("Register for an imaginary account.")
        .required(
            STRING,
            "name",
            ArgOpts::new().flags(["name"]).description("Your name."),
        )
        .required(
            Email,
            "email",
            ArgOpts::new()
                .flags(["email"])
                .description("Your email address."),
        );

    let create = Command::new("Create a new resource.");
    let destroy = Command::new("Destroy a given resource.")
        .required(STRING, "resource", ArgOpts::new())
        .required(
            choice("CONFIRM", ["y", "yes", "ok"]),
            "confirm",
            ArgOpts::new()
                .flags(["confirm"])
                .description("Confirm this action."),
        );

    let manage = CommandGroup::new("Manage imaginary resources.")
        .subcommand("create", create)
        .subcommand("destroy", destroy);

    CommandGroup::new("argot example command.")
        .subcommand("person", person)
        .subcommand("device", device)
        .subcommand("signup", signup)
        .subcommand("manage", manage)
}

fn main() -> Result<()> {
    init_tracing();

    let parsed = commands().run();
    tracing::debug!(command = parsed.name(), "parsed successfully");
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
