//! Attaching the JSON command catalog to a client-side command registry.
//!
//! [`register`] walks [`CATALOG`] and hands every name, in both its
//! lower-case and upper-case spelling, to a [`CommandRegistry`]. The crate's
//! own registry is [`CommandTable`], which maps registered names back to
//! catalog entries and sends them through the `redis` crate's generic
//! command path.
//!
//! ```rust
//! use redis_rejson::{register, CommandTable, JsonCommand};
//!
//! let mut table = CommandTable::new();
//! register(&mut table).unwrap();
//! assert_eq!(table.resolve("json.get"), Some(JsonCommand::Get));
//! assert_eq!(table.resolve("JSON.GET"), Some(JsonCommand::Get));
//! ```

use indexmap::IndexMap;
use redis::{FromRedisValue, ToRedisArgs};

use crate::catalog::{JsonCommand, CATALOG};
use crate::error::{ReJsonError, Result};

/// Anything that can be told "a command with this name exists".
///
/// Implementors own their error type; [`register`] passes it through
/// untouched.
pub trait CommandRegistry {
    type Error;

    /// Make `name` callable. Adding a name twice must be harmless.
    fn add_command(&mut self, name: &str) -> std::result::Result<(), Self::Error>;
}

/// Register every catalog command, lower-case and upper-case, on `registry`.
///
/// Stops at the first error and returns it as-is. Names added before the
/// failure stay registered.
pub fn register<R>(registry: &mut R) -> std::result::Result<(), R::Error>
where
    R: CommandRegistry + ?Sized,
{
    for command in CATALOG {
        for name in command.aliases() {
            registry.add_command(name)?;
        }
    }
    tracing::debug!(names = CATALOG.len() * 2, "registered JSON commands");
    Ok(())
}

/// An ordered table of callable JSON command names.
///
/// Lookups are by exact registered spelling, so a table only answers to the
/// names that were added to it.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: IndexMap<String, JsonCommand>,
}

impl CommandTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with the whole catalog already registered.
    pub fn with_json_commands() -> Result<Self> {
        let mut table = Self::new();
        register(&mut table)?;
        Ok(table)
    }

    /// Whether `name` was registered with exactly this spelling.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// The catalog entry registered under `name`.
    pub fn resolve(&self, name: &str) -> Option<JsonCommand> {
        self.commands.get(name).copied()
    }

    /// Registered names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Build the command registered under `name`, with `args` appended
    /// verbatim after the wire name.
    pub fn command<A: ToRedisArgs>(&self, name: &str, args: &[A]) -> Result<redis::Cmd> {
        let command = self
            .resolve(name)
            .ok_or_else(|| ReJsonError::UnknownCommand(name.to_string()))?;
        let mut cmd = redis::cmd(command.name());
        for arg in args {
            cmd.arg(arg);
        }
        Ok(cmd)
    }

    /// Send a registered command over a blocking connection.
    pub fn dispatch<T, A>(
        &self,
        conn: &mut dyn redis::ConnectionLike,
        name: &str,
        args: &[A],
    ) -> Result<T>
    where
        T: FromRedisValue,
        A: ToRedisArgs,
    {
        let cmd = self.command(name, args)?;
        tracing::trace!(command = name, "dispatching");
        Ok(cmd.query(conn)?)
    }

    /// Send a registered command over an async connection.
    pub async fn dispatch_async<C, T, A>(&self, conn: &mut C, name: &str, args: &[A]) -> Result<T>
    where
        C: redis::aio::ConnectionLike,
        T: FromRedisValue,
        A: ToRedisArgs,
    {
        let cmd = self.command(name, args)?;
        tracing::trace!(command = name, "dispatching");
        Ok(cmd.query_async(conn).await?)
    }
}

impl CommandRegistry for CommandTable {
    type Error = ReJsonError;

    fn add_command(&mut self, name: &str) -> Result<()> {
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(ReJsonError::InvalidCommandName(name.to_string()));
        }
        let command = JsonCommand::from_name(name)
            .ok_or_else(|| ReJsonError::UnknownCommand(name.to_string()))?;
        self.commands.insert(name.to_string(), command);
        Ok(())
    }
}
