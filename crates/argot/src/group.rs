//! Hierarchical command dispatch.
//!
//! A [`CommandGroup`] routes a token sequence to one of its named
//! children, consuming one token per level. Children are either leaf
//! [`Command`]s or nested groups.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::trace;

use crate::command::{Command, Matches, is_help_token};
use crate::distance::closest;
use crate::error::Error;
use crate::fmt::left_pad;

/// A subcommand slot: either a leaf command or a nested group.
pub enum Child {
    Command(Command),
    Group(CommandGroup),
}

impl Child {
    fn description(&self) -> &str {
        match self {
            Self::Command(cmd) => cmd.description(),
            Self::Group(group) => group.description(),
        }
    }
}

impl From<Command> for Child {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}

impl From<CommandGroup> for Child {
    fn from(group: CommandGroup) -> Self {
        Self::Group(group)
    }
}

/// The result of dispatching through one or more groups: the chosen
/// subcommand name wrapping either leaf matches or a nested result.
///
/// Serializes as a single-entry map, so a dispatch through `manage`
/// to `destroy` becomes `{"manage": {"destroy": {...}}}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Command(String, Matches),
    Group(String, Box<Parsed>),
}

impl Parsed {
    /// The subcommand name chosen at this level.
    pub fn name(&self) -> &str {
        match self {
            Self::Command(name, _) | Self::Group(name, _) => name,
        }
    }

    /// The leaf matches, when this level dispatched to a command.
    pub fn matches(&self) -> Option<&Matches> {
        match self {
            Self::Command(_, matches) => Some(matches),
            Self::Group(..) => None,
        }
    }

    /// The nested result, when this level dispatched to a group.
    pub fn child(&self) -> Option<&Parsed> {
        match self {
            Self::Command(..) => None,
            Self::Group(_, child) => Some(child),
        }
    }
}

impl Serialize for Parsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Command(name, matches) => map.serialize_entry(name, matches)?,
            Self::Group(name, child) => map.serialize_entry(name, child)?,
        }
        map.end()
    }
}

/// A named collection of subcommands.
///
/// Like [`Command`], a group is built once and read-only afterwards.
/// Dispatch is exact and case-sensitive; near misses only feed the
/// "did you mean" suggestion.
pub struct CommandGroup {
    description: String,
    commands: IndexMap<String, Child>,
}

impl CommandGroup {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            commands: IndexMap::new(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Register a subcommand under `name`. Accepts a [`Command`] or a
    /// nested [`CommandGroup`].
    pub fn subcommand(mut self, name: &str, child: impl Into<Child>) -> Self {
        self.commands.insert(name.to_string(), child.into());
        self
    }

    /// Dispatch a full token sequence.
    pub fn parse<S: AsRef<str>>(&self, args: &[S]) -> Result<Parsed, Error> {
        self.parse_from(args, 0)
    }

    /// Dispatch a token sequence whose first `skip` tokens are the
    /// already-consumed command path.
    pub fn parse_from<S: AsRef<str>>(&self, args: &[S], skip: usize) -> Result<Parsed, Error> {
        let path = &args[..skip.min(args.len())];

        let Some(token) = args.get(skip) else {
            return Err(Error::Argument(self.help(path)));
        };
        let token = token.as_ref();

        if let Some((name, child)) = self.commands.get_key_value(token) {
            trace!(subcommand = token, "dispatching");
            return match child {
                Child::Command(cmd) => cmd
                    .parse_from(args, skip + 1)
                    .map(|matches| Parsed::Command(name.clone(), matches)),
                Child::Group(group) => group
                    .parse_from(args, skip + 1)
                    .map(|parsed| Parsed::Group(name.clone(), Box::new(parsed))),
            };
        }

        if args[skip..].iter().any(|a| is_help_token(a.as_ref())) {
            return Err(Error::Help(self.help(path)));
        }

        Err(Error::Argument(self.fmt_unknown_command(path, token)))
    }

    /// Render the group help text, prefixed with the given command
    /// path.
    pub fn help<S: AsRef<str>>(&self, path: &[S]) -> String {
        let mut parts: Vec<String> = path.iter().map(|s| s.as_ref().to_string()).collect();
        parts.push("<command>".to_string());
        let mut out = format!(
            "{}\n\nUSAGE:\n\t{}",
            self.description,
            parts.join(" ")
        );
        if self.commands.is_empty() {
            return out;
        }

        let width = self.commands.keys().map(String::len).max().unwrap_or(0);
        out.push_str("\n\nCOMMANDS:");
        for (name, child) in &self.commands {
            out.push_str(&format!(
                "\n\t{}  {}",
                left_pad(name, width),
                child.description()
            ));
        }
        out
    }

    /// Parse the process argument vector and apply the exit contract:
    /// help goes to stdout with status 0, argument errors to stderr
    /// with status 1.
    pub fn run(&self) -> Parsed {
        let args: Vec<String> = std::env::args().collect();
        match self.parse_from(&args, 1) {
            Ok(parsed) => parsed,
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

    fn fmt_unknown_command<S: AsRef<str>>(&self, path: &[S], token: &str) -> String {
        match closest(token, self.commands.keys().map(String::as_str)) {
            Some(suggestion) => {
                format!("Unknown command '{token}'\n\nHELP:\n\tDid you mean {suggestion}?")
            }
            None => format!("Unknown command '{token}'\n\n{}", self.help(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ArgOpts;
    use crate::types::{STRING, Value, choice};

    fn opts() -> ArgOpts {
        ArgOpts::new()
    }

    fn test_group() -> CommandGroup {
        let first = Command::new("First command.").required(
            choice("NUMBER", ["one", "two", "three"]),
            "number",
            opts().flags(["n", "number"]),
        );
        let second =
            Command::new("Second command.").required(STRING, "name", opts().flags(["n", "name"]));
        CommandGroup::new("A test group.")
            .subcommand("first", first)
            .subcommand("second", second)
    }

    #[test]
    fn basic_command_groups() {
        let group = test_group();

        let result = group.parse(&["first", "-n", "two"]).unwrap();
        assert_eq!(result.name(), "first");
        assert_eq!(result.matches().unwrap().str("number"), Some("two"));

        let result = group.parse(&["second", "--name", "Peter"]).unwrap();
        assert_eq!(
            result,
            Parsed::Command(
                "second".to_string(),
                crate::command::Matches::from_pairs([("name", Value::Str("Peter".to_string()))])
            )
        );
    }

    #[test]
    fn nested_groups_wrap_results() {
        let destroy = Command::new("Destroy a resource.").required(STRING, "resource", opts());
        let manage = CommandGroup::new("Manage resources.").subcommand("destroy", destroy);
        let root = CommandGroup::new("Root.").subcommand("manage", manage);

        let result = root.parse(&["manage", "destroy", "db"]).unwrap();
        assert_eq!(result.name(), "manage");
        let inner = result.child().unwrap();
        assert_eq!(inner.name(), "destroy");
        assert_eq!(inner.matches().unwrap().str("resource"), Some("db"));

        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"manage":{"destroy":{"resource":"db"}}}"#
        );
    }

    #[test]
    fn missing_subcommand_reports_group_help() {
        let group = test_group();
        let err = group.parse::<&str>(&[]).unwrap_err();
        assert_eq!(
            err,
            Error::Argument(
                "A test group.\n\nUSAGE:\n\t<command>\n\nCOMMANDS:\n\tfirst   First command.\n\tsecond  Second command.".to_string()
            )
        );
    }

    #[test]
    fn unknown_subcommand_suggests_the_closest_name() {
        let group = test_group();
        let err = group.parse(&["frst"]).unwrap_err();
        assert_eq!(
            err,
            Error::Argument("Unknown command 'frst'\n\nHELP:\n\tDid you mean first?".to_string())
        );
    }

    #[test]
    fn unknown_subcommand_without_candidates_shows_help() {
        let group = CommandGroup::new("An empty group.");
        let err = group.parse(&["anything"]).unwrap_err();
        assert_eq!(
            err,
            Error::Argument(
                "Unknown command 'anything'\n\nAn empty group.\n\nUSAGE:\n\t<command>".to_string()
            )
        );
    }

    #[test]
    fn help_token_yields_a_help_result() {
        let group = test_group();
        for input in [vec!["-h"], vec!["--help"], vec!["bogus", "-H"]] {
            let err = group.parse(&input).unwrap_err();
            assert!(
                matches!(err, Error::Help(_)),
                "input: {input:?}, got: {err:?}"
            );
        }
    }

    #[test]
    fn subcommand_dispatch_is_case_sensitive() {
        let group = test_group();
        let err = group.parse(&["First", "-n", "two"]).unwrap_err();
        assert!(matches!(err, Error::Argument(_)));
    }

    #[test]
    fn group_help_with_path_prefixes_usage() {
        let group = test_group();
        assert_eq!(
            group.help(&["app"]),
            "A test group.\n\nUSAGE:\n\tapp <command>\n\nCOMMANDS:\n\tfirst   First command.\n\tsecond  Second command."
        );
    }

    #[test]
    fn child_help_sees_the_consumed_path() {
        let group = test_group();
        let err = group.parse(&["second", "-h"]).unwrap_err();
        let Error::Help(text) = err else {
            panic!("expected help, got: {err:?}");
        };
        assert!(
            text.contains("USAGE:\n\tsecond [OPTIONS]"),
            "unexpected help text:\n{text}"
        );
    }
}
