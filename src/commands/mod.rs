//! Typed ReJSON commands for async `redis` connections.
//!
//! [`JsonCommands`] binds every catalog entry to a method with a fixed
//! argument shape and a decoded reply type. Each method sends a single
//! command built by [`cmd`] over the connection returned by
//! [`JsonCommands::connection_mut`]; server errors come back as
//! [`ReJsonError::Redis`] unchanged.
//!
//! JSON values are passed as already serialized text (or as numbers, which
//! are valid JSON on their own). [`JsonCommands::json_set_value`] and
//! [`JsonCommands::json_get_value`] do the serde step for you.

pub mod cmd;
pub mod options;

use redis::{ToRedisArgs, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ReJsonError, Result};

pub use options::{DebugReply, DebugSubcommand, GetOptions, SetCondition};

/// Extension trait adding the `JSON.*` commands to an async connection.
///
/// Implemented for [`redis::aio::MultiplexedConnection`],
/// [`redis::aio::ConnectionManager`] and [`crate::ReJsonClient`].
#[allow(async_fn_in_trait)]
pub trait JsonCommands {
    type Connection: redis::aio::ConnectionLike;

    /// Return a mutable reference to the underlying async connection.
    fn connection_mut(&mut self) -> &mut Self::Connection;

    // -- Documents ----------------------------------------------------------

    /// Return the JSON text at `path` (the root when `None`), or `None` if
    /// the key does not exist.
    async fn json_get(&mut self, key: &str, path: Option<&str>) -> Result<Option<String>> {
        Ok(cmd::get(key, path).query_async(self.connection_mut()).await?)
    }

    /// `JSON.GET` with formatting options and any number of paths.
    async fn json_get_with(&mut self, key: &str, options: &GetOptions) -> Result<Option<String>> {
        Ok(cmd::get_with(key, options)
            .query_async(self.connection_mut())
            .await?)
    }

    /// Fetch the value at `path` and deserialize it.
    async fn json_get_value<T: DeserializeOwned>(
        &mut self,
        key: &str,
        path: Option<&str>,
    ) -> Result<Option<T>> {
        match self.json_get(key, path).await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Fetch `path` from several keys at once. Missing keys or paths yield
    /// `None` in their slot.
    async fn json_mget(&mut self, keys: &[&str], path: &str) -> Result<Vec<Option<String>>> {
        Ok(cmd::mget(keys, path).query_async(self.connection_mut()).await?)
    }

    /// Store JSON text at `path`. The root path (`.`) must be used for a new
    /// key.
    async fn json_set<V: ToRedisArgs>(&mut self, key: &str, path: &str, value: V) -> Result<()> {
        let reply: Value = cmd::set(key, path, value)
            .query_async(self.connection_mut())
            .await?;
        if is_ok(&reply) {
            Ok(())
        } else {
            Err(ReJsonError::InvalidResponse(format!(
                "JSON.SET replied {reply:?} instead of OK"
            )))
        }
    }

    /// `JSON.SET` with an `NX`/`XX` condition. Returns `false` when the
    /// condition was not met and nothing was written.
    async fn json_set_with<V: ToRedisArgs>(
        &mut self,
        key: &str,
        path: &str,
        value: V,
        condition: SetCondition,
    ) -> Result<bool> {
        let reply: Value = cmd::set_with(key, path, value, condition)
            .query_async(self.connection_mut())
            .await?;
        match reply {
            Value::Nil => Ok(false),
            ref ok if is_ok(ok) => Ok(true),
            other => Err(ReJsonError::InvalidResponse(format!(
                "JSON.SET replied {other:?}"
            ))),
        }
    }

    /// Serialize `value` with serde_json and store it at `path`.
    async fn json_set_value<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        path: &str,
        value: &T,
    ) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.json_set(key, path, text).await
    }

    /// Delete the value at `path` (the whole key when `None`). Returns the
    /// number of values removed.
    async fn json_del(&mut self, key: &str, path: Option<&str>) -> Result<i64> {
        Ok(cmd::del(key, path).query_async(self.connection_mut()).await?)
    }

    /// Same as [`json_del`](Self::json_del).
    async fn json_forget(&mut self, key: &str, path: Option<&str>) -> Result<i64> {
        Ok(cmd::forget(key, path).query_async(self.connection_mut()).await?)
    }

    /// The JSON type name at `path` (`object`, `array`, `string`, `integer`,
    /// `number`, `boolean` or `null`).
    async fn json_type(&mut self, key: &str, path: &str) -> Result<Option<String>> {
        Ok(cmd::type_of(key, path)
            .query_async(self.connection_mut())
            .await?)
    }

    // -- Numbers ------------------------------------------------------------

    /// Add `number` to the number at `path` and return the new value. O(1).
    async fn json_numincrby<N: ToRedisArgs>(
        &mut self,
        key: &str,
        path: &str,
        number: N,
    ) -> Result<serde_json::Number> {
        let reply: String = cmd::numincrby(key, path, number)
            .query_async(self.connection_mut())
            .await?;
        parse_number(&reply)
    }

    /// Multiply the number at `path` by `number` and return the new value. O(1).
    async fn json_nummultby<N: ToRedisArgs>(
        &mut self,
        key: &str,
        path: &str,
        number: N,
    ) -> Result<serde_json::Number> {
        let reply: String = cmd::nummultby(key, path, number)
            .query_async(self.connection_mut())
            .await?;
        parse_number(&reply)
    }

    // -- Strings ------------------------------------------------------------

    /// Append a JSON string (quotes included, e.g. `"\" world\""`) to the
    /// string at `path`. Returns the new length.
    async fn json_strappend(&mut self, key: &str, path: &str, json_string: &str) -> Result<i64> {
        Ok(cmd::strappend(key, path, json_string)
            .query_async(self.connection_mut())
            .await?)
    }

    async fn json_strlen(&mut self, key: &str, path: &str) -> Result<Option<i64>> {
        Ok(cmd::strlen(key, path).query_async(self.connection_mut()).await?)
    }

    // -- Arrays -------------------------------------------------------------

    /// Append values after the last element. Returns the new array length.
    ///
    /// Time complexity: `O(N)` in the number of values appended.
    async fn json_arrappend<V: ToRedisArgs>(
        &mut self,
        key: &str,
        path: &str,
        values: &[V],
    ) -> Result<i64> {
        Ok(cmd::arrappend(key, path, values)
            .query_async(self.connection_mut())
            .await?)
    }

    /// Position of the first occurrence of a scalar, or `-1`.
    ///
    /// `start` is inclusive (default `0`) and `stop` exclusive (default `0`,
    /// meaning the last element is included). Out of range indices are
    /// rounded to the array's ends; an inverse range such as `3..1` never
    /// matches.
    async fn json_arrindex<V: ToRedisArgs>(
        &mut self,
        key: &str,
        path: &str,
        value: V,
        start: Option<i64>,
        stop: Option<i64>,
    ) -> Result<i64> {
        Ok(cmd::arrindex(key, path, value, start, stop)
            .query_async(self.connection_mut())
            .await?)
    }

    /// Insert values before `index`, shifting the rest right. `0` prepends;
    /// negative indices count from the end. Returns the new length.
    async fn json_arrinsert<V: ToRedisArgs>(
        &mut self,
        key: &str,
        path: &str,
        index: i64,
        values: &[V],
    ) -> Result<i64> {
        Ok(cmd::arrinsert(key, path, index, values)
            .query_async(self.connection_mut())
            .await?)
    }

    async fn json_arrlen(&mut self, key: &str, path: &str) -> Result<Option<i64>> {
        Ok(cmd::arrlen(key, path).query_async(self.connection_mut()).await?)
    }

    /// Remove and return the element at `index` as JSON text. Out of range
    /// indices are rounded to the array's ends; popping an empty array
    /// yields `None`.
    async fn json_arrpop(&mut self, key: &str, path: &str, index: i64) -> Result<Option<String>> {
        Ok(cmd::arrpop(key, path, index)
            .query_async(self.connection_mut())
            .await?)
    }

    /// Keep only the inclusive range `start..=stop`. Never errors on out of
    /// range indices: `start` past the end or `start > stop` empties the
    /// array, a negative `start` is treated as `0` and `stop` past the end as
    /// the last element. Returns the new length.
    async fn json_arrtrim(&mut self, key: &str, path: &str, start: i64, stop: i64) -> Result<i64> {
        Ok(cmd::arrtrim(key, path, start, stop)
            .query_async(self.connection_mut())
            .await?)
    }

    // -- Objects ------------------------------------------------------------

    async fn json_objkeys(&mut self, key: &str, path: &str) -> Result<Option<Vec<String>>> {
        Ok(cmd::objkeys(key, path).query_async(self.connection_mut()).await?)
    }

    async fn json_objlen(&mut self, key: &str, path: &str) -> Result<Option<i64>> {
        Ok(cmd::objlen(key, path).query_async(self.connection_mut()).await?)
    }

    // -- Introspection ------------------------------------------------------

    /// `MEMORY` reports the size in bytes of the value at `path`; `HELP`
    /// ignores `key` and `path` and returns the server's help lines.
    async fn json_debug(
        &mut self,
        subcommand: DebugSubcommand,
        key: &str,
        path: &str,
    ) -> Result<DebugReply> {
        Ok(cmd::debug(subcommand, key, path)
            .query_async(self.connection_mut())
            .await?)
    }

    /// The value at `path` in RESP form: objects become arrays led by `{`,
    /// arrays are led by `[`, and scalars map to their RESP counterparts.
    async fn json_resp(&mut self, key: &str, path: &str) -> Result<Value> {
        Ok(cmd::resp(key, path).query_async(self.connection_mut()).await?)
    }
}

impl JsonCommands for redis::aio::MultiplexedConnection {
    type Connection = Self;

    fn connection_mut(&mut self) -> &mut Self {
        self
    }
}

impl JsonCommands for redis::aio::ConnectionManager {
    type Connection = Self;

    fn connection_mut(&mut self) -> &mut Self {
        self
    }
}

// ---------------------------------------------------------------------------
// Reply helpers
// ---------------------------------------------------------------------------

fn is_ok(reply: &Value) -> bool {
    match reply {
        Value::Okay => true,
        Value::SimpleString(s) => s == "OK",
        _ => false,
    }
}

/// Numeric replies arrive as JSON text; JSONPath (`$`) queries wrap them in
/// a one-element array.
fn parse_number(text: &str) -> Result<serde_json::Number> {
    match serde_json::from_str::<serde_json::Value>(text)? {
        serde_json::Value::Number(n) => Ok(n),
        serde_json::Value::Array(mut items) if items.len() == 1 => match items.pop() {
            Some(serde_json::Value::Number(n)) => Ok(n),
            _ => Err(ReJsonError::InvalidResponse(format!(
                "expected a number, got {text}"
            ))),
        },
        _ => Err(ReJsonError::InvalidResponse(format!(
            "expected a number, got {text}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bulk, packed, MockConnection};
    use serde::Deserialize;

    impl JsonCommands for MockConnection {
        type Connection = Self;

        fn connection_mut(&mut self) -> &mut Self {
            self
        }
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let mut conn = MockConnection::new(vec![
            Ok(Value::Okay),
            Ok(bulk(r#"{"value":1000}"#)),
            Ok(bulk("1000")),
        ]);

        conn.json_set("my_key", ".", r#"{"value":1000}"#).await.unwrap();
        let whole = conn.json_get("my_key", None).await.unwrap();
        let field = conn.json_get("my_key", Some(".value")).await.unwrap();

        assert_eq!(whole.as_deref(), Some(r#"{"value":1000}"#));
        assert_eq!(field.as_deref(), Some("1000"));
        assert_eq!(
            conn.sent(),
            &[
                packed(&["JSON.SET", "my_key", ".", r#"{"value":1000}"#]),
                packed(&["JSON.GET", "my_key"]),
                packed(&["JSON.GET", "my_key", ".value"]),
            ]
        );
    }

    #[tokio::test]
    async fn test_set_rejects_non_ok_reply() {
        let mut conn = MockConnection::new(vec![Ok(Value::Nil)]);
        let err = conn.json_set("k", ".", "1").await.unwrap_err();
        assert!(matches!(err, ReJsonError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_set_with_condition() {
        let mut conn = MockConnection::new(vec![
            Ok(Value::SimpleString("OK".into())),
            Ok(Value::Nil),
        ]);
        assert!(conn
            .json_set_with("k", ".a", "1", SetCondition::IfNotExists)
            .await
            .unwrap());
        assert!(!conn
            .json_set_with("k", ".a", "2", SetCondition::IfNotExists)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_serde_round_trip_through_get_value() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Doc {
            value: u32,
        }

        let mut conn = MockConnection::new(vec![Ok(Value::Okay), Ok(bulk(r#"{"value":7}"#))]);
        conn.json_set_value("doc", ".", &Doc { value: 7 }).await.unwrap();
        let doc: Option<Doc> = conn.json_get_value("doc", None).await.unwrap();

        assert_eq!(doc, Some(Doc { value: 7 }));
        assert_eq!(conn.sent()[0], packed(&["JSON.SET", "doc", ".", r#"{"value":7}"#]));
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let mut conn = MockConnection::new(vec![Ok(Value::Nil), Ok(Value::Nil)]);
        assert_eq!(conn.json_get("gone", None).await.unwrap(), None);
        let doc: Option<serde_json::Value> = conn.json_get_value("gone", None).await.unwrap();
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn test_mget_keeps_nil_slots() {
        let mut conn = MockConnection::new(vec![Ok(Value::Array(vec![
            bulk(r#"{"value":10}"#),
            Value::Nil,
            Value::Nil,
        ]))]);
        let replies = conn
            .json_mget(&["my_key", "invalid_key", "yet_another_invalid_key"], ".")
            .await
            .unwrap();
        assert_eq!(
            replies,
            vec![Some(r#"{"value":10}"#.to_string()), None, None]
        );
    }

    #[tokio::test]
    async fn test_numeric_replies() {
        let mut conn = MockConnection::new(vec![
            Ok(bulk("11")),
            Ok(bulk("2.5")),
            Ok(bulk("[30]")),
        ]);
        let n = conn.json_numincrby("k", ".value", 10).await.unwrap();
        assert_eq!(n.as_i64(), Some(11));
        let n = conn.json_nummultby("k", ".value", 0.5).await.unwrap();
        assert_eq!(n.as_f64(), Some(2.5));
        let n = conn.json_numincrby("k", "$.value", 10).await.unwrap();
        assert_eq!(n.as_i64(), Some(30));
    }

    #[tokio::test]
    async fn test_non_numeric_reply_is_rejected() {
        let mut conn = MockConnection::new(vec![Ok(bulk("\"eleven\""))]);
        let err = conn.json_numincrby("k", ".s", 1).await.unwrap_err();
        assert!(matches!(err, ReJsonError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_array_replies() {
        let mut conn = MockConnection::new(vec![
            Ok(Value::Int(7)),
            Ok(Value::Int(2)),
            Ok(Value::Int(-1)),
            Ok(Value::Int(7)),
            Ok(bulk("\"FORTH_POSITION\"")),
            Ok(Value::Nil),
            Ok(Value::Int(0)),
            Ok(Value::Int(6)),
        ]);

        assert_eq!(conn.json_arrappend("k", ".value", &[6]).await.unwrap(), 7);
        assert_eq!(conn.json_arrindex("k", ".value", 2, None, None).await.unwrap(), 2);
        assert_eq!(
            conn.json_arrindex("k", ".value", 2, Some(3), Some(1)).await.unwrap(),
            -1
        );
        assert_eq!(conn.json_arrinsert("k", ".value", 6, &["6"]).await.unwrap(), 7);
        assert_eq!(
            conn.json_arrpop("k", ".value", 4).await.unwrap().as_deref(),
            Some("\"FORTH_POSITION\"")
        );
        assert_eq!(conn.json_arrpop("k", ".empty", -1).await.unwrap(), None);
        assert_eq!(conn.json_arrtrim("k", ".value", 100, 200).await.unwrap(), 0);
        assert_eq!(conn.json_arrlen("k", ".value").await.unwrap(), Some(6));
    }

    #[tokio::test]
    async fn test_object_and_string_replies() {
        let mut conn = MockConnection::new(vec![
            Ok(Value::Array(vec![bulk("value")])),
            Ok(Value::Int(1)),
            Ok(Value::Int(12)),
            Ok(Value::Nil),
            Ok(Value::SimpleString("object".into())),
        ]);

        assert_eq!(
            conn.json_objkeys("k", ".").await.unwrap(),
            Some(vec!["value".to_string()])
        );
        assert_eq!(conn.json_objlen("k", ".").await.unwrap(), Some(1));
        assert_eq!(
            conn.json_strappend("k", ".string", "\" world!\"").await.unwrap(),
            12
        );
        assert_eq!(conn.json_strlen("missing", ".").await.unwrap(), None);
        assert_eq!(conn.json_type("k", ".").await.unwrap().as_deref(), Some("object"));
    }

    #[tokio::test]
    async fn test_del_and_forget_counts() {
        let mut conn = MockConnection::new(vec![Ok(Value::Int(1)), Ok(Value::Int(0))]);
        assert_eq!(conn.json_del("k", Some(".")).await.unwrap(), 1);
        assert_eq!(conn.json_forget("k", None).await.unwrap(), 0);
        assert_eq!(conn.sent()[1], packed(&["JSON.FORGET", "k"]));
    }

    #[tokio::test]
    async fn test_debug_and_resp() {
        let resp = Value::Array(vec![
            Value::SimpleString("{".into()),
            Value::SimpleString("value".into()),
            Value::Int(1000),
        ]);
        let mut conn = MockConnection::new(vec![Ok(Value::Int(24)), Ok(resp.clone())]);

        assert_eq!(
            conn.json_debug(DebugSubcommand::Memory, "k", ".").await.unwrap(),
            DebugReply::Memory(24)
        );
        assert_eq!(conn.json_resp("k", ".").await.unwrap(), resp);
    }

    #[tokio::test]
    async fn test_server_errors_pass_through() {
        let mut conn = MockConnection::new(vec![Err(redis::RedisError::from((
            redis::ErrorKind::ResponseError,
            "ERR key 'k' does not exist",
        )))]);
        let err = conn.json_arrlen("k", ".").await.unwrap_err();
        assert!(matches!(err, ReJsonError::Redis(_)));
    }
}
