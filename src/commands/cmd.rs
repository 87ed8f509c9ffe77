//! Pure `redis::Cmd` constructors, one per catalog command.
//!
//! Nothing here touches a connection. The typed methods on
//! [`JsonCommands`](super::JsonCommands) send these; they can also be
//! queued on a `redis::Pipeline` directly.

use redis::ToRedisArgs;

use super::options::{DebugSubcommand, GetOptions, SetCondition};
use crate::catalog::JsonCommand;

fn json(command: JsonCommand, key: &str) -> redis::Cmd {
    let mut cmd = redis::cmd(command.name());
    cmd.arg(key);
    cmd
}

fn json_at(command: JsonCommand, key: &str, path: &str) -> redis::Cmd {
    let mut cmd = json(command, key);
    cmd.arg(path);
    cmd
}

/// `JSON.GET key [path]`
pub fn get(key: &str, path: Option<&str>) -> redis::Cmd {
    let mut cmd = json(JsonCommand::Get, key);
    if let Some(path) = path {
        cmd.arg(path);
    }
    cmd
}

/// `JSON.GET key [INDENT ..] [NEWLINE ..] [SPACE ..] [NOESCAPE] [path ...]`
pub fn get_with(key: &str, options: &GetOptions) -> redis::Cmd {
    let mut cmd = json(JsonCommand::Get, key);
    if let Some(ref indent) = options.indent {
        cmd.arg("INDENT").arg(indent);
    }
    if let Some(ref newline) = options.newline {
        cmd.arg("NEWLINE").arg(newline);
    }
    if let Some(ref space) = options.space {
        cmd.arg("SPACE").arg(space);
    }
    if options.noescape {
        cmd.arg("NOESCAPE");
    }
    for path in &options.paths {
        cmd.arg(path);
    }
    cmd
}

/// `JSON.MGET key [key ...] path`
pub fn mget(keys: &[&str], path: &str) -> redis::Cmd {
    let mut cmd = redis::cmd(JsonCommand::MGet.name());
    for key in keys {
        cmd.arg(*key);
    }
    cmd.arg(path);
    cmd
}

/// `JSON.SET key path json`
pub fn set<V: ToRedisArgs>(key: &str, path: &str, value: V) -> redis::Cmd {
    set_with(key, path, value, SetCondition::Always)
}

/// `JSON.SET key path json [NX | XX]`
pub fn set_with<V: ToRedisArgs>(
    key: &str,
    path: &str,
    value: V,
    condition: SetCondition,
) -> redis::Cmd {
    let mut cmd = json_at(JsonCommand::Set, key, path);
    cmd.arg(value);
    if let Some(token) = condition.token() {
        cmd.arg(token);
    }
    cmd
}

/// `JSON.DEL key [path]`
pub fn del(key: &str, path: Option<&str>) -> redis::Cmd {
    let mut cmd = json(JsonCommand::Del, key);
    if let Some(path) = path {
        cmd.arg(path);
    }
    cmd
}

/// `JSON.FORGET key [path]`, an alias of `JSON.DEL`.
pub fn forget(key: &str, path: Option<&str>) -> redis::Cmd {
    let mut cmd = json(JsonCommand::Forget, key);
    if let Some(path) = path {
        cmd.arg(path);
    }
    cmd
}

/// `JSON.TYPE key path`
pub fn type_of(key: &str, path: &str) -> redis::Cmd {
    json_at(JsonCommand::Type, key, path)
}

/// `JSON.NUMINCRBY key path number`
pub fn numincrby<N: ToRedisArgs>(key: &str, path: &str, number: N) -> redis::Cmd {
    let mut cmd = json_at(JsonCommand::NumIncrBy, key, path);
    cmd.arg(number);
    cmd
}

/// `JSON.NUMMULTBY key path number`
pub fn nummultby<N: ToRedisArgs>(key: &str, path: &str, number: N) -> redis::Cmd {
    let mut cmd = json_at(JsonCommand::NumMultBy, key, path);
    cmd.arg(number);
    cmd
}

/// `JSON.STRAPPEND key path json-string`
pub fn strappend(key: &str, path: &str, json_string: &str) -> redis::Cmd {
    let mut cmd = json_at(JsonCommand::StrAppend, key, path);
    cmd.arg(json_string);
    cmd
}

/// `JSON.STRLEN key path`
pub fn strlen(key: &str, path: &str) -> redis::Cmd {
    json_at(JsonCommand::StrLen, key, path)
}

/// `JSON.ARRAPPEND key path json [json ...]`
pub fn arrappend<V: ToRedisArgs>(key: &str, path: &str, values: &[V]) -> redis::Cmd {
    let mut cmd = json_at(JsonCommand::ArrAppend, key, path);
    for value in values {
        cmd.arg(value);
    }
    cmd
}

/// `JSON.ARRINDEX key path json-scalar [start [stop]]`
///
/// A `stop` without a `start` searches from index 0.
pub fn arrindex<V: ToRedisArgs>(
    key: &str,
    path: &str,
    value: V,
    start: Option<i64>,
    stop: Option<i64>,
) -> redis::Cmd {
    let mut cmd = json_at(JsonCommand::ArrIndex, key, path);
    cmd.arg(value);
    match (start, stop) {
        (Some(start), Some(stop)) => {
            cmd.arg(start).arg(stop);
        }
        (Some(start), None) => {
            cmd.arg(start);
        }
        (None, Some(stop)) => {
            cmd.arg(0).arg(stop);
        }
        (None, None) => {}
    }
    cmd
}

/// `JSON.ARRINSERT key path index json [json ...]`
pub fn arrinsert<V: ToRedisArgs>(key: &str, path: &str, index: i64, values: &[V]) -> redis::Cmd {
    let mut cmd = json_at(JsonCommand::ArrInsert, key, path);
    cmd.arg(index);
    for value in values {
        cmd.arg(value);
    }
    cmd
}

/// `JSON.ARRLEN key path`
pub fn arrlen(key: &str, path: &str) -> redis::Cmd {
    json_at(JsonCommand::ArrLen, key, path)
}

/// `JSON.ARRPOP key path index`
pub fn arrpop(key: &str, path: &str, index: i64) -> redis::Cmd {
    let mut cmd = json_at(JsonCommand::ArrPop, key, path);
    cmd.arg(index);
    cmd
}

/// `JSON.ARRTRIM key path start stop`
pub fn arrtrim(key: &str, path: &str, start: i64, stop: i64) -> redis::Cmd {
    let mut cmd = json_at(JsonCommand::ArrTrim, key, path);
    cmd.arg(start).arg(stop);
    cmd
}

/// `JSON.OBJKEYS key path`
pub fn objkeys(key: &str, path: &str) -> redis::Cmd {
    json_at(JsonCommand::ObjKeys, key, path)
}

/// `JSON.OBJLEN key path`
pub fn objlen(key: &str, path: &str) -> redis::Cmd {
    json_at(JsonCommand::ObjLen, key, path)
}

/// `JSON.DEBUG MEMORY key path` or `JSON.DEBUG HELP`.
pub fn debug(subcommand: DebugSubcommand, key: &str, path: &str) -> redis::Cmd {
    let mut cmd = redis::cmd(JsonCommand::Debug.name());
    cmd.arg(subcommand.as_str());
    if subcommand == DebugSubcommand::Memory {
        cmd.arg(key).arg(path);
    }
    cmd
}

/// `JSON.RESP key path`
pub fn resp(key: &str, path: &str) -> redis::Cmd {
    json_at(JsonCommand::Resp, key, path)
}
