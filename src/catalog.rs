//! The fixed catalog of ReJSON commands.
//!
//! [`CATALOG`] lists every `JSON.*` command the server module understands, in
//! a fixed order. Each [`JsonCommand`] knows its wire spellings, the method
//! names it is bound to, and a [`Signature`] describing its operands and reply.

use std::fmt;

/// One server-side ReJSON operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JsonCommand {
    Del,
    Get,
    MGet,
    Set,
    Type,
    NumIncrBy,
    NumMultBy,
    StrAppend,
    StrLen,
    ArrAppend,
    ArrIndex,
    ArrInsert,
    ArrLen,
    ArrPop,
    ArrTrim,
    ObjKeys,
    ObjLen,
    Debug,
    Forget,
    Resp,
}

/// Every supported command, in catalog order.
pub const CATALOG: [JsonCommand; 20] = [
    JsonCommand::Del,
    JsonCommand::Get,
    JsonCommand::MGet,
    JsonCommand::Set,
    JsonCommand::Type,
    JsonCommand::NumIncrBy,
    JsonCommand::NumMultBy,
    JsonCommand::StrAppend,
    JsonCommand::StrLen,
    JsonCommand::ArrAppend,
    JsonCommand::ArrIndex,
    JsonCommand::ArrInsert,
    JsonCommand::ArrLen,
    JsonCommand::ArrPop,
    JsonCommand::ArrTrim,
    JsonCommand::ObjKeys,
    JsonCommand::ObjLen,
    JsonCommand::Debug,
    JsonCommand::Forget,
    JsonCommand::Resp,
];

impl JsonCommand {
    // [wire upper, wire lower, method lower, method upper]
    const fn spellings(self) -> [&'static str; 4] {
        match self {
            JsonCommand::Del => ["JSON.DEL", "json.del", "json_del", "JSON_DEL"],
            JsonCommand::Get => ["JSON.GET", "json.get", "json_get", "JSON_GET"],
            JsonCommand::MGet => ["JSON.MGET", "json.mget", "json_mget", "JSON_MGET"],
            JsonCommand::Set => ["JSON.SET", "json.set", "json_set", "JSON_SET"],
            JsonCommand::Type => ["JSON.TYPE", "json.type", "json_type", "JSON_TYPE"],
            JsonCommand::NumIncrBy => [
                "JSON.NUMINCRBY",
                "json.numincrby",
                "json_numincrby",
                "JSON_NUMINCRBY",
            ],
            JsonCommand::NumMultBy => [
                "JSON.NUMMULTBY",
                "json.nummultby",
                "json_nummultby",
                "JSON_NUMMULTBY",
            ],
            JsonCommand::StrAppend => [
                "JSON.STRAPPEND",
                "json.strappend",
                "json_strappend",
                "JSON_STRAPPEND",
            ],
            JsonCommand::StrLen => ["JSON.STRLEN", "json.strlen", "json_strlen", "JSON_STRLEN"],
            JsonCommand::ArrAppend => [
                "JSON.ARRAPPEND",
                "json.arrappend",
                "json_arrappend",
                "JSON_ARRAPPEND",
            ],
            JsonCommand::ArrIndex => [
                "JSON.ARRINDEX",
                "json.arrindex",
                "json_arrindex",
                "JSON_ARRINDEX",
            ],
            JsonCommand::ArrInsert => [
                "JSON.ARRINSERT",
                "json.arrinsert",
                "json_arrinsert",
                "JSON_ARRINSERT",
            ],
            JsonCommand::ArrLen => ["JSON.ARRLEN", "json.arrlen", "json_arrlen", "JSON_ARRLEN"],
            JsonCommand::ArrPop => ["JSON.ARRPOP", "json.arrpop", "json_arrpop", "JSON_ARRPOP"],
            JsonCommand::ArrTrim => [
                "JSON.ARRTRIM",
                "json.arrtrim",
                "json_arrtrim",
                "JSON_ARRTRIM",
            ],
            JsonCommand::ObjKeys => [
                "JSON.OBJKEYS",
                "json.objkeys",
                "json_objkeys",
                "JSON_OBJKEYS",
            ],
            JsonCommand::ObjLen => ["JSON.OBJLEN", "json.objlen", "json_objlen", "JSON_OBJLEN"],
            JsonCommand::Debug => ["JSON.DEBUG", "json.debug", "json_debug", "JSON_DEBUG"],
            JsonCommand::Forget => ["JSON.FORGET", "json.forget", "json_forget", "JSON_FORGET"],
            JsonCommand::Resp => ["JSON.RESP", "json.resp", "json_resp", "JSON_RESP"],
        }
    }

    /// Canonical wire name, e.g. `JSON.ARRAPPEND`.
    pub const fn name(self) -> &'static str {
        self.spellings()[0]
    }

    /// Lower-case wire name, e.g. `json.arrappend`.
    pub const fn lower_name(self) -> &'static str {
        self.spellings()[1]
    }

    /// Name of the typed method bound to this command, e.g. `json_arrappend`.
    pub const fn method_name(self) -> &'static str {
        self.spellings()[2]
    }

    /// Upper-case binding alias, e.g. `JSON_ARRAPPEND`.
    pub const fn upper_method_name(self) -> &'static str {
        self.spellings()[3]
    }

    /// Both wire spellings, lower-case first.
    pub const fn aliases(self) -> [&'static str; 2] {
        [self.lower_name(), self.name()]
    }

    /// Look a command up by any of its spellings, ignoring ASCII case.
    ///
    /// Accepts the dotted wire form (`json.get`) as well as the method form
    /// (`json_get`).
    pub fn from_name(name: &str) -> Option<JsonCommand> {
        CATALOG.iter().copied().find(|cmd| {
            name.eq_ignore_ascii_case(cmd.name()) || name.eq_ignore_ascii_case(cmd.method_name())
        })
    }

    /// Whether the command can modify the stored document.
    pub const fn is_write(self) -> bool {
        matches!(
            self,
            JsonCommand::Del
                | JsonCommand::Forget
                | JsonCommand::Set
                | JsonCommand::NumIncrBy
                | JsonCommand::NumMultBy
                | JsonCommand::StrAppend
                | JsonCommand::ArrAppend
                | JsonCommand::ArrInsert
                | JsonCommand::ArrPop
                | JsonCommand::ArrTrim
        )
    }

    /// The operand layout and reply shape of this command.
    pub const fn signature(self) -> Signature {
        match self {
            JsonCommand::Get => Signature::new(KEY_OPT_PATH, ReplyKind::NullableJson),
            JsonCommand::MGet => Signature::new(MGET, ReplyKind::JsonArray),
            JsonCommand::Set => Signature::new(SET, ReplyKind::Ok),
            JsonCommand::Del | JsonCommand::Forget => {
                Signature::new(KEY_OPT_PATH, ReplyKind::Integer)
            }
            JsonCommand::Type => Signature::new(KEY_PATH, ReplyKind::TypeName),
            JsonCommand::NumIncrBy | JsonCommand::NumMultBy => {
                Signature::new(NUM_OP, ReplyKind::Number)
            }
            JsonCommand::StrAppend => Signature::new(STRAPPEND, ReplyKind::Integer),
            JsonCommand::StrLen | JsonCommand::ArrLen | JsonCommand::ObjLen => {
                Signature::new(KEY_PATH, ReplyKind::NullableInteger)
            }
            JsonCommand::ArrAppend => Signature::new(ARRAPPEND, ReplyKind::Integer),
            JsonCommand::ArrIndex => Signature::new(ARRINDEX, ReplyKind::Integer),
            JsonCommand::ArrInsert => Signature::new(ARRINSERT, ReplyKind::Integer),
            JsonCommand::ArrPop => Signature::new(ARRPOP, ReplyKind::NullableJson),
            JsonCommand::ArrTrim => Signature::new(ARRTRIM, ReplyKind::Integer),
            JsonCommand::ObjKeys => Signature::new(KEY_PATH, ReplyKind::KeyList),
            JsonCommand::Debug => Signature::new(DEBUG, ReplyKind::DebugReply),
            JsonCommand::Resp => Signature::new(KEY_PATH, ReplyKind::Resp),
        }
    }
}

const KEY: Operand = Operand::Required("key");
const PATH: Operand = Operand::Required("path");

const KEY_PATH: &[Operand] = &[KEY, PATH];
const KEY_OPT_PATH: &[Operand] = &[KEY, Operand::Optional("path")];
const MGET: &[Operand] = &[KEY, Operand::Variadic("key"), PATH];
const SET: &[Operand] = &[KEY, PATH, Operand::Required("json")];
const NUM_OP: &[Operand] = &[KEY, PATH, Operand::Required("number")];
const STRAPPEND: &[Operand] = &[KEY, PATH, Operand::Required("json-string")];
const ARRAPPEND: &[Operand] = &[KEY, PATH, Operand::Required("json"), Operand::Variadic("json")];
const ARRINDEX: &[Operand] = &[
    KEY,
    PATH,
    Operand::Required("json-scalar"),
    Operand::Optional("start"),
    Operand::Optional("stop"),
];
const ARRINSERT: &[Operand] = &[
    KEY,
    PATH,
    Operand::Required("index"),
    Operand::Required("json"),
    Operand::Variadic("json"),
];
const ARRPOP: &[Operand] = &[KEY, PATH, Operand::Required("index")];
const ARRTRIM: &[Operand] = &[KEY, PATH, Operand::Required("start"), Operand::Required("stop")];
const DEBUG: &[Operand] = &[
    Operand::Required("subcommand"),
    Operand::Optional("key"),
    Operand::Optional("path"),
];

impl fmt::Display for JsonCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single positional operand of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Required(&'static str),
    Optional(&'static str),
    /// Zero or more further occurrences.
    Variadic(&'static str),
}

impl Operand {
    pub const fn name(self) -> &'static str {
        match self {
            Operand::Required(n) | Operand::Optional(n) | Operand::Variadic(n) => n,
        }
    }
}

/// The decoded shape of a command's reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// JSON text, or nil when the key or path does not exist.
    NullableJson,
    /// One nullable JSON text per requested key.
    JsonArray,
    /// The `OK` status.
    Ok,
    Integer,
    NullableInteger,
    /// A JSON number, sent back as bulk text.
    Number,
    /// A JSON type name such as `object` or `integer`.
    TypeName,
    /// Array of object key names.
    KeyList,
    /// Memory usage in bytes, or help lines.
    DebugReply,
    /// The value encoded as nested RESP.
    Resp,
}

/// Arity and reply contract of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub operands: &'static [Operand],
    pub reply: ReplyKind,
}

impl Signature {
    const fn new(operands: &'static [Operand], reply: ReplyKind) -> Self {
        Self { operands, reply }
    }

    /// Minimum number of arguments after the command name.
    pub fn min_args(&self) -> usize {
        self.operands
            .iter()
            .filter(|op| matches!(op, Operand::Required(_)))
            .count()
    }

    /// Maximum number of arguments after the command name, `None` when a
    /// variadic operand makes it unbounded.
    pub fn max_args(&self) -> Option<usize> {
        if self.operands.iter().any(|op| matches!(op, Operand::Variadic(_))) {
            None
        } else {
            Some(self.operands.len())
        }
    }

    /// Whether `argc` arguments fit this signature.
    pub fn accepts(&self, argc: usize) -> bool {
        argc >= self.min_args() && self.max_args().map_or(true, |max| argc <= max)
    }

    /// Render a usage line such as `JSON.ARRINDEX key path json-scalar [start] [stop]`.
    pub fn usage(&self, command: JsonCommand) -> String {
        let mut line = command.name().to_string();
        for op in self.operands {
            line.push(' ');
            match op {
                Operand::Required(n) => line.push_str(n),
                Operand::Optional(n) => {
                    line.push('[');
                    line.push_str(n);
                    line.push(']');
                }
                Operand::Variadic(n) => {
                    line.push('[');
                    line.push_str(n);
                    line.push_str(" ...]");
                }
            }
        }
        line
    }
}
