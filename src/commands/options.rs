//! Option and reply types shared by the JSON command builders.

use redis::{FromRedisValue, RedisResult, Value};

/// Formatting and multi-path options for `JSON.GET`.
///
/// ```text
/// JSON.GET <key> [INDENT indent] [NEWLINE newline] [SPACE space] [NOESCAPE] [path ...]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetOptions {
    pub indent: Option<String>,
    pub newline: Option<String>,
    pub space: Option<String>,
    pub noescape: bool,
    /// Paths to fetch. Empty means the document root.
    pub paths: Vec<String>,
}

impl GetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// String used to indent nested levels.
    pub fn indent(mut self, indent: &str) -> Self {
        self.indent = Some(indent.to_string());
        self
    }

    /// String printed at the end of each line.
    pub fn newline(mut self, newline: &str) -> Self {
        self.newline = Some(newline.to_string());
        self
    }

    /// String placed between a key and its value.
    pub fn space(mut self, space: &str) -> Self {
        self.space = Some(space.to_string());
        self
    }

    /// Leave non-ASCII characters unescaped.
    pub fn noescape(mut self, yes: bool) -> Self {
        self.noescape = yes;
        self
    }

    /// Add a path to fetch; with more than one path the reply is an object
    /// keyed by path.
    pub fn path(mut self, path: &str) -> Self {
        self.paths.push(path.to_string());
        self
    }
}

/// Existence condition for `JSON.SET`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SetCondition {
    /// Always set.
    #[default]
    Always,
    /// `NX`: only if the path does not exist yet.
    IfNotExists,
    /// `XX`: only if the path already exists.
    IfExists,
}

impl SetCondition {
    pub(crate) fn token(self) -> Option<&'static str> {
        match self {
            SetCondition::Always => None,
            SetCondition::IfNotExists => Some("NX"),
            SetCondition::IfExists => Some("XX"),
        }
    }
}

/// `JSON.DEBUG` subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugSubcommand {
    /// Memory usage in bytes of the value at a path.
    Memory,
    /// The server's help text. Takes no key or path.
    Help,
}

impl DebugSubcommand {
    pub fn as_str(self) -> &'static str {
        match self {
            DebugSubcommand::Memory => "MEMORY",
            DebugSubcommand::Help => "HELP",
        }
    }
}

/// Reply to `JSON.DEBUG`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugReply {
    Memory(i64),
    Help(Vec<String>),
}

impl FromRedisValue for DebugReply {
    fn from_redis_value(v: &Value) -> RedisResult<Self> {
        match v {
            Value::Int(bytes) => Ok(DebugReply::Memory(*bytes)),
            Value::Array(_) => Ok(DebugReply::Help(Vec::<String>::from_redis_value(v)?)),
            other => Err(redis::RedisError::from((
                redis::ErrorKind::TypeError,
                "unexpected JSON.DEBUG reply",
                format!("{other:?}"),
            ))),
        }
    }
}
