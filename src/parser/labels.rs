use shlex::Shlex;
use tracing::debug;

use crate::error::Result;

/// Tokenize a LABEL value with shell quoting rules.
fn shell_tokens(value: &str) -> Vec<String> {
    Shlex::new(value).collect()
}

/// Legacy `LABEL name value` split: quote characters stripped from the whole
/// text, then one split on the first whitespace run. Value defaults to empty.
fn legacy_pair(value: &str) -> Option<(String, String)> {
    let cleaned: String = value.chars().filter(|c| *c != '\'' && *c != '"').collect();
    let cleaned = cleaned.trim_start();
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.split_once(char::is_whitespace) {
        Some((key, rest)) => Some((key.to_string(), rest.trim_start().to_string())),
        None => Some((cleaned.to_string(), String::new())),
    }
}

/// `"k"="v"` token split on the first `=`. Value defaults to empty.
fn kv_pair(token: &str) -> (String, String) {
    match token.split_once('=') {
        Some((key, val)) => (key.to_string(), val.to_string()),
        None => (token.to_string(), String::new()),
    }
}

/// Extract the key/value pairs a single LABEL instruction defines. The
/// syntax is auto-detected from the first shell token: no `=` means the
/// legacy space-separated form, otherwise each token is its own pair.
pub fn label_pairs(value: &str) -> Vec<(String, String)> {
    let tokens = shell_tokens(value);
    let Some(first) = tokens.first() else {
        return Vec::new();
    };

    let pairs: Vec<(String, String)> = if !first.contains('=') {
        legacy_pair(value).into_iter().collect()
    } else {
        tokens.iter().map(|token| kv_pair(token)).collect()
    };

    for (key, val) in &pairs {
        debug!("new label {:?}={:?}", key, val);
    }
    pairs
}

/// Rebuild a LABEL line with `key` set to `new_value`, preserving the other
/// pairs on the same instruction. Returns `None` when this instruction does
/// not define `key`. Key=value tokens are all re-quoted so the rebuilt line
/// stays shell-safe even where the original quoting was not.
pub fn rewrite_label_line(value: &str, key: &str, new_value: &str) -> Result<Option<String>> {
    let tokens = shell_tokens(value);
    let Some(first) = tokens.first() else {
        return Ok(None);
    };

    if !first.contains('=') {
        return Ok(match legacy_pair(value) {
            Some((name, _)) if name == key => Some(format!("LABEL {} {}\n", key, new_value)),
            _ => None,
        });
    }

    if !tokens.iter().any(|token| kv_pair(token).0 == key) {
        return Ok(None);
    }

    let mut parts = Vec::with_capacity(tokens.len());
    for token in &tokens {
        let (name, val) = kv_pair(token);
        let val = if name == key { new_value } else { val.as_str() };
        parts.push(format!("{}={}", shlex::try_quote(&name)?, shlex::try_quote(val)?));
    }
    Ok(Some(format!("LABEL {}\n", parts.join(" "))))
}
