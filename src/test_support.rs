//! Shared helpers for unit tests: a scripted connection that records every
//! packed command and answers from a queue of canned replies.

use std::collections::VecDeque;

use redis::{RedisError, RedisResult, Value};

/// RESP encoding of a command line, the way `redis::Cmd` packs it.
pub fn packed(args: &[&str]) -> Vec<u8> {
    let mut out = format!("*{}\r\n", args.len()).into_bytes();
    for arg in args {
        out.extend_from_slice(format!("${}\r\n", arg.len()).as_bytes());
        out.extend_from_slice(arg.as_bytes());
        out.extend_from_slice(b"\r\n");
    }
    out
}

/// Shorthand for a bulk string reply.
pub fn bulk(s: &str) -> Value {
    Value::BulkString(s.as_bytes().to_vec())
}

/// A connection that never touches the network.
#[derive(Debug, Default)]
pub struct MockConnection {
    replies: VecDeque<RedisResult<Value>>,
    sent: Vec<Vec<u8>>,
}

impl MockConnection {
    pub fn new(replies: Vec<RedisResult<Value>>) -> Self {
        Self {
            replies: replies.into(),
            sent: Vec::new(),
        }
    }

    /// Packed commands received so far, oldest first.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    fn next_reply(&mut self, packed: Vec<u8>) -> RedisResult<Value> {
        self.sent.push(packed);
        self.replies.pop_front().unwrap_or_else(|| {
            Err(RedisError::from((
                redis::ErrorKind::ClientError,
                "no scripted reply left",
            )))
        })
    }
}

fn no_pipelines() -> RedisError {
    RedisError::from((
        redis::ErrorKind::ClientError,
        "pipelines are not scripted",
    ))
}

impl redis::ConnectionLike for MockConnection {
    fn req_packed_command(&mut self, cmd: &[u8]) -> RedisResult<Value> {
        self.next_reply(cmd.to_vec())
    }

    fn req_packed_commands(
        &mut self,
        _cmd: &[u8],
        _offset: usize,
        _count: usize,
    ) -> RedisResult<Vec<Value>> {
        Err(no_pipelines())
    }

    fn get_db(&self) -> i64 {
        0
    }

    fn check_connection(&mut self) -> bool {
        true
    }

    fn is_open(&self) -> bool {
        true
    }
}

impl redis::aio::ConnectionLike for MockConnection {
    fn req_packed_command<'a>(&'a mut self, cmd: &'a redis::Cmd) -> redis::RedisFuture<'a, Value> {
        let reply = self.next_reply(cmd.get_packed_command());
        Box::pin(async move { reply })
    }

    fn req_packed_commands<'a>(
        &'a mut self,
        _cmd: &'a redis::Pipeline,
        _offset: usize,
        _count: usize,
    ) -> redis::RedisFuture<'a, Vec<Value>> {
        Box::pin(async move { Err(no_pipelines()) })
    }

    fn get_db(&self) -> i64 {
        0
    }
}
