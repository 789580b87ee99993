//! Line-oriented command scripts
//!
//! One command per line, whitespace separated. Blank lines and lines
//! starting with `#` are skipped.
//!
//! ```text
//! insert alice 30
//! search alice 30
//! range 10 40
//! ```

use std::str::FromStr;

use thiserror::Error;

use crate::record::Record;
use crate::store::IndexedStore;

/// Errors produced while parsing a script line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Empty line or comment handed to the parser
    #[error("empty command")]
    Empty,

    /// First word is not a known command
    #[error("unknown command '{0}'")]
    Unknown(String),

    /// Wrong number of arguments
    #[error("'{command}' expects {expected} argument(s), got {found}")]
    Arity {
        /// Command name
        command: &'static str,
        /// Required argument count
        expected: usize,
        /// Supplied argument count
        found: usize,
    },

    /// Argument that should be an integer is not
    #[error("invalid integer '{0}'")]
    InvalidInteger(String),
}

/// Parsed store command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `insert <key> <value>`
    Insert(Record),
    /// `search <key> <value>`
    Search {
        /// Record key
        key: String,
        /// Record value
        value: i64,
    },
    /// `delete <key> <value>`
    Delete {
        /// Record key
        key: String,
        /// Record value
        value: i64,
    },
    /// `update <key> <value> <new-key> <new-value>`
    Update {
        /// Current key
        key: String,
        /// Current value
        value: i64,
        /// Record to store instead
        replacement: Record,
    },
    /// `range <start> <end>`
    Range {
        /// Inclusive lower bound
        start: i64,
        /// Inclusive upper bound
        end: i64,
    },
    /// `height`
    Height,
    /// `comparisons <key> <value>`
    Comparisons {
        /// Record key
        key: String,
        /// Record value
        value: i64,
    },
    /// `count`
    Count,
    /// `clear`
    Clear,
    /// `dump`
    Dump,
}

/// Parse one script line; `Ok(None)` for blank lines and comments
pub fn parse_line(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    line.parse().map(Some)
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;
        let args: Vec<&str> = words.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "insert" => {
                let [key, value] = arguments::<2>("insert", &args)?;
                Command::Insert(Record::new(key, integer(value)?))
            }
            "search" => {
                let [key, value] = arguments::<2>("search", &args)?;
                Command::Search {
                    key: key.to_string(),
                    value: integer(value)?,
                }
            }
            "delete" => {
                let [key, value] = arguments::<2>("delete", &args)?;
                Command::Delete {
                    key: key.to_string(),
                    value: integer(value)?,
                }
            }
            "update" => {
                let [key, value, new_key, new_value] = arguments::<4>("update", &args)?;
                Command::Update {
                    key: key.to_string(),
                    value: integer(value)?,
                    replacement: Record::new(new_key, integer(new_value)?),
                }
            }
            "range" => {
                let [start, end] = arguments::<2>("range", &args)?;
                Command::Range {
                    start: integer(start)?,
                    end: integer(end)?,
                }
            }
            "comparisons" => {
                let [key, value] = arguments::<2>("comparisons", &args)?;
                Command::Comparisons {
                    key: key.to_string(),
                    value: integer(value)?,
                }
            }
            "height" => {
                arguments::<0>("height", &args)?;
                Command::Height
            }
            "count" => {
                arguments::<0>("count", &args)?;
                Command::Count
            }
            "clear" => {
                arguments::<0>("clear", &args)?;
                Command::Clear
            }
            "dump" => {
                arguments::<0>("dump", &args)?;
                Command::Dump
            }
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

fn arguments<'a, const N: usize>(
    command: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], CommandError> {
    <[&str; N]>::try_from(args).map_err(|_| CommandError::Arity {
        command,
        expected: N,
        found: args.len(),
    })
}

fn integer(word: &str) -> Result<i64, CommandError> {
    word.parse()
        .map_err(|_| CommandError::InvalidInteger(word.to_string()))
}

impl Command {
    /// Apply the command to `store` and describe the outcome
    pub fn execute(self, store: &mut IndexedStore) -> String {
        match self {
            Command::Insert(record) => {
                let before = store.len();
                let label = record.to_string();
                let value = record.value;
                store.insert(record);
                if store.len() > before {
                    format!("inserted {label}")
                } else {
                    format!("ignored {label}: value {value} already present")
                }
            }
            Command::Search { key, value } => {
                let outcome = store.search(&key, value).map(Record::to_string);
                let comparisons = store.tree().last_search_comparisons();
                match outcome {
                    Some(record) => format!("found {record} (comparisons={comparisons})"),
                    None => format!("not found (comparisons={comparisons})"),
                }
            }
            Command::Delete { key, value } => {
                let before = store.len();
                store.delete(&key, value);
                if store.len() < before {
                    format!("deleted {key}={value}")
                } else {
                    format!("not found {key}={value}")
                }
            }
            Command::Update {
                key,
                value,
                replacement,
            } => {
                let label = replacement.to_string();
                let new_value = replacement.value;
                if store.update(&key, value, replacement) {
                    format!("updated {key}={value} -> {label}")
                } else if store.tree().contains(&key, value) {
                    format!("rejected {key}={value} -> {label}: value {new_value} already present")
                } else {
                    format!("not found {key}={value}")
                }
            }
            Command::Range { start, end } => {
                let records = store.range_query(start, end);
                let mut out = format!("{} record(s) in [{start}, {end}]", records.len());
                for record in records {
                    out.push_str(&format!("\n  {record}"));
                }
                out
            }
            Command::Height => format!("height={}", store.tree_height()),
            Command::Comparisons { key, value } => {
                format!("comparisons={}", store.search_comparisons(&key, value))
            }
            Command::Count => format!("count={}", store.len()),
            Command::Clear => format!("released {}", store.clear()),
            Command::Dump => match store.tree().root() {
                Some(root) => root.to_string(),
                None => "(empty)".to_string(),
            },
        }
    }
}
