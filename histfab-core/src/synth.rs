//! Generation of plausible-looking source files.
//!
//! Output only has to look like code: a header comment with the timestamp, a
//! handful of arithmetic assignments and one function that returns a sum of
//! identifiers. Nothing here touches the filesystem.

use crate::config::DATE_PLACEHOLDER;
use crate::models::{ContentUnit, SyntheticTimestamp};
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::PathBuf;

const OPERATORS: [&str; 4] = ["+", "-", "*", "/"];

const MIN_ASSIGNMENTS: usize = 5;
const MAX_ASSIGNMENTS: usize = 15;

const WORDS: &[&str] = &[
    "account", "action", "address", "agent", "amount", "answer", "area", "argument",
    "balance", "base", "batch", "bit", "block", "body", "bound", "branch", "buffer",
    "cache", "call", "capacity", "case", "chain", "change", "channel", "check",
    "child", "class", "client", "code", "color", "column", "count", "cursor",
    "data", "date", "delta", "depth", "device", "digit", "document", "draft",
    "edge", "element", "energy", "entry", "event", "factor", "field", "figure",
    "file", "filter", "flag", "flow", "focus", "form", "frame", "front", "future",
    "game", "gate", "goal", "group", "growth", "guard", "handle", "head", "health",
    "height", "history", "hour", "image", "impact", "index", "input", "item",
    "job", "key", "kind", "label", "layer", "level", "limit", "line", "link",
    "list", "load", "local", "lock", "loop", "margin", "mark", "market", "match",
    "member", "memory", "message", "method", "minute", "mode", "model", "moment",
    "month", "name", "network", "node", "note", "number", "object", "offset",
    "option", "order", "origin", "output", "owner", "page", "pair", "parent",
    "part", "path", "pattern", "peak", "period", "phase", "piece", "place", "plan",
    "point", "policy", "pool", "port", "power", "price", "process", "product",
    "queue", "range", "rate", "reason", "record", "region", "report", "request",
    "result", "return", "route", "rule", "sample", "scale", "scope", "score",
    "season", "section", "seed", "series", "server", "session", "shape", "share",
    "signal", "size", "slot", "source", "space", "speed", "stage", "state", "step",
    "store", "stream", "string", "system", "table", "target", "task", "term",
    "test", "thread", "ticket", "time", "token", "total", "track", "trade",
    "value", "version", "view", "volume", "weight", "window", "word", "worker",
    "year", "zone",
];

/// Picks one word from the built-in list.
pub fn word<R: Rng>(rng: &mut R) -> &'static str {
    WORDS.choose(rng).copied().unwrap_or("value")
}

/// Lower-case `<word>_<word>` identifier.
pub fn identifier<R: Rng>(rng: &mut R) -> String {
    format!("{}_{}", word(rng), word(rng))
}

/// Substitutes the timestamp token into a `{date}` path template.
pub fn render_path(template: &str, timestamp: &SyntheticTimestamp) -> PathBuf {
    PathBuf::from(template.replace(DATE_PLACEHOLDER, &timestamp.file_token()))
}

pub fn header_line(timestamp: &SyntheticTimestamp) -> String {
    format!("# Auto-generated at {}", timestamp.to_rfc3339())
}

/// Body of a generated file: 5..=15 assignments, then a function and its return.
pub fn pseudo_code<R: Rng>(rng: &mut R) -> String {
    let count = rng.gen_range(MIN_ASSIGNMENTS..=MAX_ASSIGNMENTS);
    let mut lines = Vec::with_capacity(count + 2);

    for _ in 0..count {
        let name = identifier(rng);
        let lhs = rng.gen_range(1..=100);
        let operator = OPERATORS.choose(rng).copied().unwrap_or("+");
        let rhs = rng.gen_range(1..=100);
        lines.push(format!("{} = {} {} {}", name, lhs, operator, rhs));
    }

    lines.push(format!("def {}_function():", word(rng)));
    let terms: Vec<&str> = (0..3).map(|_| word(rng)).collect();
    lines.push(format!("    return {}", terms.join(" + ")));

    lines.join("\n")
}

/// Builds the file path and content for one backdated commit.
pub fn synthesize<R: Rng>(
    rng: &mut R,
    timestamp: &SyntheticTimestamp,
    template: &str,
) -> ContentUnit {
    let path = render_path(template, timestamp);
    let content = format!("{}\n{}\n", header_line(timestamp), pseudo_code(rng));
    ContentUnit { path, content }
}
