use ferret_common::LiteralArg;
use regex::Regex;
use std::sync::LazyLock;

/// Trim, collapse whitespace outside quotes and drop trailing `.`/`!`.
/// Quoted substrings are kept verbatim.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_quote: Option<char> = None;
    let mut pending_space = false;

    for c in input.trim().chars() {
        if let Some(q) = in_quote {
            out.push(c);
            if c == q {
                in_quote = None;
            }
            continue;
        }
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        if c == '"' || (c == '\'' && starts_quote(&out)) {
            in_quote = Some(c);
        }
        out.push(c);
    }

    while out.ends_with(['.', '!']) && in_quote.is_none() {
        out.pop();
        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
    }
    out
}

/// An apostrophe opens a quote only at the start of a word, so "user's"
/// stays a plain word.
fn starts_quote(preceding: &str) -> bool {
    preceding.is_empty() || preceding.ends_with(' ')
}

static TEST_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\$\{\s*([\w.-]+)\s*\}|\{\{\s*([\w.-]+)\s*\}\})$").unwrap());

/// Interpret a fragment as a quoted literal or a test-data reference.
pub fn literal(fragment: &str) -> Option<LiteralArg> {
    let fragment = fragment.trim();
    if let Some(inner) = unquote(fragment) {
        return Some(LiteralArg::Text(inner.to_string()));
    }
    let caps = TEST_DATA_RE.captures(fragment)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| LiteralArg::TestData(m.as_str().to_string()))
}

/// Like [`literal`], but a bare fragment becomes a text literal.
pub fn literal_or_bare(fragment: &str) -> LiteralArg {
    literal(fragment).unwrap_or_else(|| LiteralArg::Text(fragment.trim().to_string()))
}

pub fn unquote(fragment: &str) -> Option<&str> {
    let bytes = fragment.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return Some(&fragment[1..fragment.len() - 1]);
        }
    }
    None
}

/// A target phrase with quote marks removed from the ends of each word, so
/// `the 'Save' button` reads as `the Save button`. Apostrophes inside a
/// word are kept.
pub fn phrase(fragment: &str) -> String {
    fragment
        .split_whitespace()
        .map(|word| word.trim_matches(|c| c == '"' || c == '\''))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
