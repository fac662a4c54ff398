//! Builtin Lua standard library table.
//!
//! Ships as static data and is ingested through
//! [`SymbolStore::index_records`] under [`STDLIB_URI`]. Each record gets its
//! own line so `(uri, range)` stays unique.

use std::sync::LazyLock;

use crate::base::{DocumentUri, Span};
use crate::hir::{SymbolKind, SymbolRecord, SymbolStore};

/// Uri of the builtin table; never a file on disk.
pub const STDLIB_URI: &str = "builtin:///lua/stdlib.lua";

struct Builtin {
    name: &'static str,
    params: &'static [&'static str],
    doc: &'static str,
}

const fn f(name: &'static str, params: &'static [&'static str], doc: &'static str) -> Builtin {
    Builtin { name, params, doc }
}

const GLOBALS: &[Builtin] = &[
    f("assert", &["v", "message"], "Raises an error if `v` is false or nil."),
    f("collectgarbage", &["opt", "arg"], "Generic interface to the garbage collector."),
    f("dofile", &["filename"], "Runs the file and returns its values."),
    f("error", &["message", "level"], "Raises an error with `message`."),
    f("getmetatable", &["object"], "Returns the metatable of `object`."),
    f("ipairs", &["t"], "Iterates `t[1]`, `t[2]`, ... up to the first nil."),
    f("load", &["chunk", "chunkname", "mode", "env"], "Loads a chunk."),
    f("loadfile", &["filename", "mode", "env"], "Loads a chunk from a file."),
    f("next", &["table", "index"], "Returns the next key and value of a table."),
    f("pairs", &["t"], "Iterates over all key-value pairs of `t`."),
    f("pcall", &["f", "..."], "Calls `f` in protected mode."),
    f("print", &["..."], "Writes its arguments to stdout."),
    f("rawequal", &["v1", "v2"], "Equality without metamethods."),
    f("rawget", &["table", "index"], "Indexing without metamethods."),
    f("rawlen", &["v"], "Length without metamethods."),
    f("rawset", &["table", "index", "value"], "Assignment without metamethods."),
    f("require", &["modname"], "Loads the given module."),
    f("select", &["index", "..."], "Returns arguments after `index`, or their count with `'#'`."),
    f("setmetatable", &["table", "metatable"], "Sets the metatable of `table`."),
    f("tonumber", &["e", "base"], "Converts its argument to a number."),
    f("tostring", &["v"], "Converts its argument to a string."),
    f("type", &["v"], "Returns the type name of `v`."),
    f("xpcall", &["f", "msgh", "..."], "Calls `f` in protected mode with a message handler."),
];

const STRING: &[Builtin] = &[
    f("byte", &["s", "i", "j"], "Internal codes of characters `s[i..j]`."),
    f("char", &["..."], "String from character codes."),
    f("find", &["s", "pattern", "init", "plain"], "Finds the first match of `pattern`."),
    f("format", &["formatstring", "..."], "Formats its arguments like C `sprintf`."),
    f("gmatch", &["s", "pattern"], "Iterator over matches of `pattern`."),
    f("gsub", &["s", "pattern", "repl", "n"], "Replaces matches of `pattern`."),
    f("len", &["s"], "Length of `s`."),
    f("lower", &["s"], "Lowercase copy of `s`."),
    f("match", &["s", "pattern", "init"], "Captures of the first match of `pattern`."),
    f("rep", &["s", "n", "sep"], "`s` repeated `n` times."),
    f("reverse", &["s"], "`s` reversed."),
    f("sub", &["s", "i", "j"], "Substring from `i` to `j`."),
    f("upper", &["s"], "Uppercase copy of `s`."),
];

const TABLE: &[Builtin] = &[
    f("concat", &["list", "sep", "i", "j"], "Joins list elements into a string."),
    f("insert", &["list", "pos", "value"], "Inserts `value` into `list`."),
    f("move", &["a1", "f", "e", "t", "a2"], "Moves elements between tables."),
    f("pack", &["..."], "Packs arguments into a table with field `n`."),
    f("remove", &["list", "pos"], "Removes and returns an element."),
    f("sort", &["list", "comp"], "Sorts `list` in place."),
    f("unpack", &["list", "i", "j"], "Returns the elements of `list`."),
];

const MATH: &[Builtin] = &[
    f("abs", &["x"], "Absolute value."),
    f("ceil", &["x"], "Smallest integer not less than `x`."),
    f("cos", &["x"], "Cosine in radians."),
    f("exp", &["x"], "e raised to `x`."),
    f("floor", &["x"], "Largest integer not greater than `x`."),
    f("fmod", &["x", "y"], "Remainder of `x / y` rounded towards zero."),
    f("log", &["x", "base"], "Logarithm of `x`."),
    f("max", &["x", "..."], "Maximum argument."),
    f("min", &["x", "..."], "Minimum argument."),
    f("random", &["m", "n"], "Pseudo-random number."),
    f("randomseed", &["x"], "Seeds the pseudo-random generator."),
    f("sin", &["x"], "Sine in radians."),
    f("sqrt", &["x"], "Square root."),
    f("tointeger", &["x"], "Converts `x` to an integer if representable."),
    f("type", &["x"], "`'integer'`, `'float'` or nil."),
];

const OS: &[Builtin] = &[
    f("clock", &[], "CPU time used by the program."),
    f("date", &["format", "time"], "Formatted date or a date table."),
    f("difftime", &["t2", "t1"], "Seconds between two times."),
    f("execute", &["command"], "Runs a shell command."),
    f("exit", &["code", "close"], "Terminates the host program."),
    f("getenv", &["varname"], "Value of an environment variable."),
    f("remove", &["filename"], "Deletes a file."),
    f("rename", &["oldname", "newname"], "Renames a file."),
    f("time", &["table"], "Current time or the time of a date table."),
    f("tmpname", &[], "A name usable for a temporary file."),
];

const IO: &[Builtin] = &[
    f("close", &["file"], "Closes `file` or the default output."),
    f("input", &["file"], "Sets or returns the default input."),
    f("lines", &["filename", "..."], "Iterator over the lines of a file."),
    f("open", &["filename", "mode"], "Opens a file."),
    f("output", &["file"], "Sets or returns the default output."),
    f("read", &["..."], "Reads from the default input."),
    f("write", &["..."], "Writes to the default output."),
];

const LIBRARIES: &[(&str, &str, &[Builtin])] = &[
    ("string", "String manipulation.", STRING),
    ("table", "Table manipulation.", TABLE),
    ("math", "Mathematical functions.", MATH),
    ("os", "Operating system facilities.", OS),
    ("io", "Input and output.", IO),
];

fn build() -> Vec<SymbolRecord> {
    let uri = DocumentUri::from(STDLIB_URI);
    let mut line = 0u32;
    let mut next_span = |name: &str| {
        let span = Span::from_coords(line, 0, line, name.len() as u32);
        line += 1;
        span
    };

    let mut symbols = Vec::new();
    for builtin in GLOBALS {
        symbols.push(
            SymbolRecord::new(builtin.name, SymbolKind::Function, uri.clone(), next_span(builtin.name))
                .with_parameters(builtin.params.iter().copied())
                .with_comment(builtin.doc),
        );
    }
    for (library, doc, members) in LIBRARIES {
        symbols.push(
            SymbolRecord::new(*library, SymbolKind::Module, uri.clone(), next_span(*library))
                .with_comment(*doc),
        );
        for builtin in *members {
            symbols.push(
                SymbolRecord::new(builtin.name, SymbolKind::Function, uri.clone(), next_span(builtin.name))
                    .with_base(*library)
                    .with_parameters(builtin.params.iter().copied())
                    .with_comment(builtin.doc),
            );
        }
    }
    symbols
}

static STDLIB: LazyLock<Vec<SymbolRecord>> = LazyLock::new(build);

/// The builtin table as symbol records.
pub fn stdlib_symbols() -> &'static [SymbolRecord] {
    &STDLIB
}

/// Ingest the builtin table into `store`.
pub fn load_stdlib(store: &SymbolStore) {
    store.index_records(&DocumentUri::from(STDLIB_URI), stdlib_symbols().to_vec());
}
