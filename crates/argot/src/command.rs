//! Single-command argument matching, help rendering, and the host
//! entry point.

use std::collections::BTreeMap;

use indexmap::IndexSet;
use serde::Serialize;
use tracing::trace;

use crate::distance::closest;
use crate::error::{Error, ParseError};
use crate::fmt::left_pad;
use crate::types::{ArgumentType, Value};

/// Options for [`Command::required`] and [`Command::optional`].
///
/// An empty `flags` list declares a positional argument; a non-empty
/// one declares a named argument reachable through those flag tokens.
#[derive(Debug, Clone, Default)]
pub struct ArgOpts {
    pub flags: Vec<String>,
    pub description: Option<String>,
}

impl ArgOpts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags = flags.into_iter().map(Into::into).collect();
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }
}

/// Options for [`Command::flag`].
#[derive(Debug, Clone, Default)]
pub struct FlagOpts {
    pub aliases: Vec<String>,
    pub description: Option<String>,
}

impl FlagOpts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }
}

struct Arg {
    name: String,
    description: Option<String>,
    ty: Box<dyn ArgumentType>,
}

struct NamedArg {
    arg: Arg,
    flags: Vec<String>,
}

struct FlagArg {
    name: String,
    description: Option<String>,
    flags: Vec<String>,
}

/// Parsed values keyed by declared argument name.
///
/// After a successful parse every declared name is present: unset
/// optional arguments map to [`Value::None`] and unset flags to
/// `Value::Bool(false)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Matches {
    values: BTreeMap<String, Value>,
}

impl Matches {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(Value::as_number)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(Value::as_int)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(Value::as_bool)
    }

    pub fn date(&self, name: &str) -> Option<chrono::DateTime<chrono::Local>> {
        self.values.get(name).and_then(Value::as_date)
    }

    /// Whether a boolean flag was supplied.
    pub fn flag(&self, name: &str) -> bool {
        self.boolean(name).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn insert(&mut self, name: String, value: Value) {
        self.values.insert(name, value);
    }

    #[cfg(test)]
    pub(crate) fn from_pairs<const N: usize>(pairs: [(&str, Value); N]) -> Self {
        let mut matches = Self::default();
        for (name, value) in pairs {
            matches.insert(name.to_string(), value);
        }
        matches
    }
}

/// Whether a token is a request for help. The check ignores case and
/// surrounding whitespace.
pub(crate) fn is_help_token(token: &str) -> bool {
    let trimmed = token.trim().to_lowercase();
    trimmed == "-h" || trimmed == "--help"
}

/// A single command: an ordered argument specification that token
/// sequences are matched against.
///
/// Built once through the chained registration calls and treated as
/// read-only afterwards; parsing never mutates the specification, so
/// one built `Command` can serve concurrent parses.
pub struct Command {
    description: String,
    required_positional: Vec<Arg>,
    optional_positional: Option<Arg>,
    named: Vec<NamedArg>,
    flags: Vec<FlagArg>,
    required_named: Vec<String>,
    all_flags: IndexSet<String>,
}

impl Command {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            required_positional: Vec::new(),
            optional_positional: None,
            named: Vec::new(),
            flags: Vec::new(),
            required_named: Vec::new(),
            all_flags: IndexSet::new(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Register a required argument: positional when `opts.flags` is
    /// empty, named otherwise.
    ///
    /// # Panics
    ///
    /// Panics when a required positional is registered after an
    /// optional positional; that ordering can never be satisfied.
    pub fn required<A>(mut self, ty: A, name: &str, opts: ArgOpts) -> Self
    where
        A: ArgumentType + 'static,
    {
        if opts.flags.is_empty() {
            assert!(
                self.optional_positional.is_none(),
                "required positional arguments must come before optional ones"
            );
            self.required_positional.push(Arg {
                name: name.to_string(),
                description: opts.description,
                ty: Box::new(ty),
            });
        } else {
            self.register_named(ty, name, opts);
            self.required_named.push(name.to_string());
        }
        self
    }

    /// Register an optional argument: positional when `opts.flags` is
    /// empty, named otherwise. Unsupplied optionals parse to
    /// [`Value::None`].
    ///
    /// # Panics
    ///
    /// Panics when a second optional positional is registered; a
    /// command can hold at most one.
    pub fn optional<A>(mut self, ty: A, name: &str, opts: ArgOpts) -> Self
    where
        A: ArgumentType + 'static,
    {
        if opts.flags.is_empty() {
            assert!(
                self.optional_positional.is_none(),
                "there can be at most one optional positional argument"
            );
            self.optional_positional = Some(Arg {
                name: name.to_string(),
                description: opts.description,
                ty: Box::new(ty),
            });
        } else {
            self.register_named(ty, name, opts);
        }
        self
    }

    /// Register a boolean flag. The flag is reachable through its
    /// normalized name and every normalized alias; absence parses to
    /// `false`.
    pub fn flag(mut self, name: &str, opts: FlagOpts) -> Self {
        let mut tokens = vec![name.to_string()];
        tokens.extend(opts.aliases);
        let flags = normalize_flags(&tokens);
        self.all_flags.extend(flags.iter().cloned());
        self.flags.push(FlagArg {
            name: name.to_string(),
            description: opts.description,
            flags,
        });
        self
    }

    fn register_named<A>(&mut self, ty: A, name: &str, opts: ArgOpts)
    where
        A: ArgumentType + 'static,
    {
        let flags = normalize_flags(&opts.flags);
        self.all_flags.extend(flags.iter().cloned());
        self.named.push(NamedArg {
            arg: Arg {
                name: name.to_string(),
                description: opts.description,
                ty: Box::new(ty),
            },
            flags,
        });
    }

    /// Parse a full token sequence.
    pub fn parse<S: AsRef<str>>(&self, args: &[S]) -> Result<Matches, Error> {
        self.parse_from(args, 0)
    }

    /// Parse a token sequence whose first `skip` tokens are the
    /// already-consumed command path (shown in usage and help text
    /// but never matched against the specification).
    pub fn parse_from<S: AsRef<str>>(&self, args: &[S], skip: usize) -> Result<Matches, Error> {
        let path = &args[..skip.min(args.len())];

        // Help wins over everything, even missing required arguments.
        if args[skip.min(args.len())..]
            .iter()
            .any(|a| is_help_token(a.as_ref()))
        {
            return Err(Error::Help(self.help(path)));
        }

        let mut matches = Matches::default();
        let mut cursor = skip;

        for arg in &self.required_positional {
            let Some(raw) = args.get(cursor) else {
                return Err(Error::Argument(format!(
                    "Missing argument <{}>\n\n{}",
                    arg.name,
                    self.usage(path)
                )));
            };
            matches.insert(arg.name.clone(), parse_positional(arg, raw.as_ref())?);
            cursor += 1;
        }

        if let Some(arg) = &self.optional_positional {
            matches.insert(arg.name.clone(), Value::None);
            // A recognized flag token here belongs to the flag scan,
            // not to the optional positional.
            if let Some(raw) = args.get(cursor) {
                if !self.all_flags.contains(raw.as_ref()) {
                    matches.insert(arg.name.clone(), parse_positional(arg, raw.as_ref())?);
                    cursor += 1;
                }
            }
        }

        for named in &self.named {
            if !self.required_named.contains(&named.arg.name) {
                matches.insert(named.arg.name.clone(), Value::None);
            }
        }
        for flag in &self.flags {
            matches.insert(flag.name.clone(), Value::Bool(false));
        }

        while cursor < args.len() {
            let token = args[cursor].as_ref();
            if !self.all_flags.contains(token) {
                return Err(Error::Argument(self.fmt_unknown_flag(path, token)));
            }
            if let Some(named) = self
                .named
                .iter()
                .find(|n| n.flags.iter().any(|f| f == token))
            {
                let Some(raw) = args.get(cursor + 1) else {
                    return Err(Error::Argument(fmt_missing_named(named)));
                };
                trace!(flag = token, name = %named.arg.name, "matched named argument");
                matches.insert(
                    named.arg.name.clone(),
                    parse_named(named, token, raw.as_ref())?,
                );
                cursor += 2;
                continue;
            }
            if let Some(flag) = self
                .flags
                .iter()
                .find(|f| f.flags.iter().any(|t| t == token))
            {
                trace!(flag = token, name = %flag.name, "matched flag");
                matches.insert(flag.name.clone(), Value::Bool(true));
            }
            cursor += 1;
        }

        for name in &self.required_named {
            if matches.get(name).is_none() {
                // required_named only holds names registered as named
                // arguments, so the lookup always succeeds.
                if let Some(named) = self.named.iter().find(|n| &n.arg.name == name) {
                    return Err(Error::Argument(fmt_missing_named(named)));
                }
            }
        }

        Ok(matches)
    }

    /// Render the full help text, prefixed with the given command
    /// path.
    pub fn help<S: AsRef<str>>(&self, path: &[S]) -> String {
        let mut out = format!("{}\n\n{}", self.description, self.usage(path));
        if self.named.is_empty() && self.flags.is_empty() {
            return out;
        }

        let mut rows: Vec<(String, Option<&str>)> = Vec::new();
        for named in &self.named {
            let mut label = format!("{} <{}>", named.flags.join(", "), named.arg.ty.type_name());
            if self.required_named.contains(&named.arg.name) {
                label.push_str(" (required)");
            }
            rows.push((label, named.arg.description.as_deref()));
        }
        for flag in &self.flags {
            rows.push((flag.flags.join(", "), flag.description.as_deref()));
        }

        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        out.push_str("\n\nOPTIONS:");
        for (label, description) in rows {
            match description {
                Some(text) => {
                    out.push_str(&format!("\n\t{}  {}", left_pad(&label, width), text));
                }
                None => out.push_str(&format!("\n\t{label}")),
            }
        }
        out
    }

    /// Parse the process argument vector and apply the exit contract:
    /// help goes to stdout with status 0, argument errors to stderr
    /// with status 1.
    pub fn run(&self) -> Matches {
        let args: Vec<String> = std::env::args().collect();
        match self.parse_from(&args, 1) {
            Ok(matches) => matches,
            Err(Error::Help(text)) => {
                println!("{text}");
                std::process::exit(0);
            }
            Err(Error::Argument(text)) => {
                eprintln!("{text}");
                std::process::exit(1);
            }
        }
    }

    fn usage<S: AsRef<str>>(&self, path: &[S]) -> String {
        let mut parts: Vec<String> = path.iter().map(|s| s.as_ref().to_string()).collect();
        parts.extend(
            self.required_positional
                .iter()
                .map(|arg| format!("<{}>", arg.name)),
        );
        if let Some(arg) = &self.optional_positional {
            parts.push(format!("[{}]", arg.name));
        }
        if !self.named.is_empty() || !self.flags.is_empty() {
            parts.push("[OPTIONS]".to_string());
        }
        format!("USAGE:\n\t{}", parts.join(" "))
    }

    fn fmt_unknown_flag<S: AsRef<str>>(&self, path: &[S], token: &str) -> String {
        match closest(token, self.all_flags.iter().map(String::as_str)) {
            Some(suggestion) => {
                format!("Unknown flag '{token}'\n\nHELP:\n\tDid you mean {suggestion}?")
            }
            None => format!("Unknown flag '{token}'\n\n{}", self.usage(path)),
        }
    }
}

fn parse_positional(arg: &Arg, raw: &str) -> Result<Value, Error> {
    arg.ty.parse(raw).map_err(|err| {
        Error::Argument(format!("Invalid argument <{}>: {}", arg.name, err))
    })
}

fn parse_named(named: &NamedArg, flag: &str, raw: &str) -> Result<Value, Error> {
    named.arg.ty.parse(raw).map_err(|err| {
        Error::Argument(format!(
            "Invalid argument {flag} <{}>: {}",
            named.arg.ty.type_name(),
            err
        ))
    })
}

fn fmt_missing_named(named: &NamedArg) -> String {
    format!(
        "Missing argument {} <{}>",
        named.flags.join(","),
        named.arg.ty.type_name()
    )
}

/// Normalize flag tokens: empty tokens are dropped, tokens already
/// starting with `-` are kept verbatim, single-character names get a
/// single dash and longer names a double dash.
fn normalize_flags(flags: &[String]) -> Vec<String> {
    flags
        .iter()
        .filter(|flag| !flag.is_empty())
        .map(|flag| {
            if flag.starts_with('-') {
                flag.clone()
            } else if flag.chars().count() > 1 {
                format!("--{flag}")
            } else {
                format!("-{flag}")
            }
        })
        .collect()
}
