//! Markup stripping for model replies.
//!
//! Turns markdown-flavoured output into single-paragraph plain prose. The
//! transform is applied until it reaches a fixed point, so `sanitize` is
//! idempotent.

use std::sync::LazyLock;

use regex::Regex;

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]\n]+)\]\([^)\n]*\)").expect("Invalid link regex"));

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]*").expect("Invalid heading regex"));

static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-+•][ \t]+|\d+[.)][ \t]+)+").expect("Invalid bullet regex")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Strip markup and collapse the text into plain prose.
pub fn sanitize(text: &str) -> String {
    let mut current = sanitize_once(text);
    loop {
        let next = sanitize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn sanitize_once(text: &str) -> String {
    let text = text.replace('`', "").replace("~~", "");
    let text = LINK_RE.replace_all(&text, "$1");
    let text = text.replace('*', "");
    let text = HEADING_RE.replace_all(&text, "");

    let lines: Vec<String> = text
        .lines()
        .map(|line| {
            let line = BULLET_RE.replace(line.trim(), "");
            WHITESPACE_RE.replace_all(line.trim(), " ").into_owned()
        })
        .filter(|line| !line.is_empty())
        .collect();

    let mut out = String::new();
    for line in lines {
        if !out.is_empty() {
            if out.ends_with(['.', '!', '?', ':', ';']) {
                out.push(' ');
            } else {
                out.push_str(". ");
            }
        }
        out.push_str(&line);
    }
    out
}
