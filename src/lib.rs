//! # redis-rejson
//!
//! ReJSON (`JSON.*`) commands for the [`redis`](https://crates.io/crates/redis)
//! driver.
//!
//! The crate has three layers:
//!
//! * **Catalog** -- [`JsonCommand`] and [`CATALOG`], the fixed list of commands
//!   the ReJSON server module understands, with their operand and reply
//!   [`Signature`]s
//! * **Registrar** -- [`register`] attaches every catalog name, lower-case and
//!   upper-case, to a [`CommandRegistry`] such as [`CommandTable`], which can
//!   then dispatch commands by name
//! * **Typed commands** -- the [`JsonCommands`] extension trait, one method
//!   per command with a fixed argument shape and decoded reply
//!
//! Protocol handling, connections and pipelining are left to the `redis`
//! crate. All standard Redis commands stay available on [`ReJsonClient`]
//! through its [`Deref`] to [`redis::aio::MultiplexedConnection`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use redis_rejson::{JsonCommands, ReJsonClientBuilder, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut client = ReJsonClientBuilder::new()
//!         .host("localhost")
//!         .port(6379)
//!         .build()
//!         .await?;
//!
//!     client.json_set("doc", ".", r#"{"value":1000}"#).await?;
//!     let value = client.json_get("doc", Some(".value")).await?;
//!     assert_eq!(value.as_deref(), Some("1000"));
//!
//!     // Any multiplexed connection works too.
//!     let mut conn = redis::Client::open("redis://127.0.0.1/")?
//!         .get_multiplexed_async_connection()
//!         .await?;
//!     let keys = conn.json_objkeys("doc", ".").await?;
//!     println!("{:?}", keys);
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod commands;
pub mod error;
pub mod registry;

#[cfg(test)]
mod test_support;

pub use catalog::{JsonCommand, Operand, ReplyKind, Signature, CATALOG};
pub use commands::{DebugReply, DebugSubcommand, GetOptions, JsonCommands, SetCondition};
pub use error::{ReJsonError, Result};
pub use registry::{register, CommandRegistry, CommandTable};

use std::ops::{Deref, DerefMut};

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`ReJsonClient`] with custom connection
/// parameters.
///
/// # Examples
///
/// ```rust,no_run
/// # use redis_rejson::{ReJsonClientBuilder, Result};
/// # async fn example() -> Result<()> {
/// let client = ReJsonClientBuilder::new()
///     .host("db.example.com")
///     .port(6380)
///     .password("s3cret")
///     .tls(true)
///     .database(2)
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReJsonClientBuilder {
    host: String,
    port: u16,
    password: Option<String>,
    username: Option<String>,
    database: u16,
    tls: bool,
    url: Option<String>,
}

impl Default for ReJsonClientBuilder {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            password: None,
            username: None,
            database: 0,
            tls: false,
            url: None,
        }
    }
}

impl ReJsonClientBuilder {
    /// Create a new builder with default settings (localhost:6379, no auth, no TLS).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hostname or IP address of the server.
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Set the port number. Defaults to `6379`.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// Set the ACL username.
    pub fn username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    /// Select a database index. Defaults to `0`.
    pub fn database(mut self, db: u16) -> Self {
        self.database = db;
        self
    }

    pub fn tls(mut self, enabled: bool) -> Self {
        self.tls = enabled;
        self
    }

    /// Use a complete connection URL; overrides every other setting.
    pub fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    /// The URL [`build`](Self::build) will connect to.
    pub fn to_url(&self) -> String {
        if let Some(ref url) = self.url {
            return url.clone();
        }

        let scheme = if self.tls { "rediss" } else { "redis" };
        let mut url = format!("{}://", scheme);

        // user info is percent-encoded; the redis URL parser decodes it again
        if let Some(ref user) = self.username {
            url.push_str(&urlencoding::encode(user));
            if self.password.is_none() {
                url.push('@');
            }
        }
        if let Some(ref pass) = self.password {
            url.push(':');
            url.push_str(&urlencoding::encode(pass));
            url.push('@');
        }
        url.push_str(&format!("{}:{}/{}", self.host, self.port, self.database));
        url
    }

    /// Build and connect a [`ReJsonClient`].
    pub async fn build(self) -> Result<ReJsonClient> {
        ReJsonClient::connect(&self.to_url()).await
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// An async client that wraps a multiplexed Redis connection and carries a
/// [`CommandTable`] with the JSON catalog registered.
///
/// The typed commands come from [`JsonCommands`]; by-name dispatch goes
/// through [`ReJsonClient::call`]. [`Deref`] exposes the underlying
/// connection for everything else.
pub struct ReJsonClient {
    connection: redis::aio::MultiplexedConnection,
    commands: CommandTable,
}

impl ReJsonClient {
    /// Connect using a URL of the form
    /// `redis://[username:password@]host[:port][/database]`
    /// (`rediss://` for TLS).
    ///
    /// # Errors
    ///
    /// Returns [`ReJsonError::Connection`] if the URL is invalid or the
    /// server is unreachable.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| ReJsonError::Connection(format!("failed to parse URL: {}", e)))?;
        Self::from_redis_client(client).await
    }

    /// Create a client from an existing [`redis::Client`].
    pub async fn from_redis_client(client: redis::Client) -> Result<Self> {
        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| ReJsonError::Connection(format!("failed to connect: {}", e)))?;
        tracing::debug!(addr = %client.get_connection_info().addr, "connected");
        Self::from_connection(connection)
    }

    /// Wrap an already open connection.
    pub fn from_connection(connection: redis::aio::MultiplexedConnection) -> Result<Self> {
        Ok(Self {
            connection,
            commands: CommandTable::with_json_commands()?,
        })
    }

    /// The registered JSON command names.
    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// Send a JSON command by any registered spelling (`json.get` or
    /// `JSON.GET`) and decode the reply generically.
    pub async fn call<T, A>(&mut self, name: &str, args: &[A]) -> Result<T>
    where
        T: redis::FromRedisValue,
        A: redis::ToRedisArgs,
    {
        self.commands
            .dispatch_async(&mut self.connection, name, args)
            .await
    }

    /// Send any command, JSON or not, without going through the command
    /// table, and return the undecoded reply.
    pub async fn execute_raw<A: redis::ToRedisArgs>(
        &mut self,
        command: &str,
        args: &[A],
    ) -> Result<redis::Value> {
        let mut cmd = redis::cmd(command);
        for arg in args {
            cmd.arg(arg);
        }
        tracing::trace!(command, "sending raw command");
        Ok(cmd.query_async(&mut self.connection).await?)
    }

    /// Check that the connection is alive.
    pub async fn ping(&mut self) -> Result<String> {
        let pong: String = redis::cmd("PING").query_async(&mut self.connection).await?;
        Ok(pong)
    }
}

// Deref to the underlying connection so callers can use all redis::AsyncCommands.
impl Deref for ReJsonClient {
    type Target = redis::aio::MultiplexedConnection;

    fn deref(&self) -> &Self::Target {
        &self.connection
    }
}

impl DerefMut for ReJsonClient {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.connection
    }
}

impl JsonCommands for ReJsonClient {
    type Connection = redis::aio::MultiplexedConnection;

    fn connection_mut(&mut self) -> &mut redis::aio::MultiplexedConnection {
        &mut self.connection
    }
}
