//! Declarative command-line argument parsing.
//!
//! Describe positional arguments, named (flagged) arguments, and
//! boolean flags on a [`Command`]; collect commands into nested
//! [`CommandGroup`]s; then hand the raw argument vector to `parse`
//! (pure, returns a typed [`Matches`] record or an [`Error`]) or to
//! `run` (applies the process exit contract for you).
//!
//! ```
//! use argot::{ArgOpts, Command, FlagOpts};
//! use argot::types::{NUMBER, STRING};
//!
//! let person = Command::new("Describe a person.")
//!     .required(STRING, "name", ArgOpts::new())
//!     .required(
//!         NUMBER,
//!         "age",
//!         ArgOpts::new()
//!             .flags(["a", "age"])
//!             .description("The persons age in years."),
//!     )
//!     .flag("dead", FlagOpts::new().description("Whether this person is dead."));
//!
//! let matches = person.parse(&["Peter", "--age", "42"]).unwrap();
//! assert_eq!(matches.str("name"), Some("Peter"));
//! assert_eq!(matches.number("age"), Some(42.0));
//! assert!(!matches.flag("dead"));
//! ```

pub mod command;
pub mod distance;
pub mod error;
mod fmt;
pub mod group;
pub mod types;

pub use command::{ArgOpts, Command, FlagOpts, Matches};
pub use error::{Error, ParseError};
pub use group::{Child, CommandGroup, Parsed};
pub use types::{ArgumentType, Value, choice};
