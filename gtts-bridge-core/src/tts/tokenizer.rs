//! Splits input text into the short parts the speech endpoint accepts.
//!
//! The endpoint refuses long strings, so text is cut at punctuation first
//! and any remaining part longer than [`MAX_CHARS`] is cut again at the last
//! space before the limit. All lengths are in characters.

use regex::Regex;
use std::sync::OnceLock;

/// Longest part sent in a single request
pub const MAX_CHARS: usize = 100;

pub const PUNCTUATION: &str = "?!？！.,¡()[]¿…‥،;:—。，、：\n";
const TONE_MARKS: &str = "?!？！";
const ABBREVIATIONS: &str = "dr|jr|mr|mrs|ms|msgr|prof|sr|st";
const WORD_SUBSTITUTIONS: &[(&str, &str)] = &[("Esq.", "Esquire")];

fn abbreviation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"(?i)\b({ABBREVIATIONS})\.")).expect("static regex is valid")
    })
}

/// Normalize text before splitting: join words hyphenated across a line
/// break, drop the period of common abbreviations so it does not end a
/// part, and spell out a few short forms.
pub fn preprocess(text: &str) -> String {
    let joined = text.replace("-\r\n", "").replace("-\n", "");
    let mut out = abbreviation_re().replace_all(&joined, "$1").into_owned();
    for (from, to) in WORD_SUBSTITUTIONS {
        out = out.replace(from, to);
    }
    out
}

/// Split `text` into non-empty parts of at most [`MAX_CHARS`] characters.
/// Returns an empty list when there is nothing speakable.
pub fn tokenize(text: &str) -> Vec<String> {
    let text = preprocess(text);
    split_on_punctuation(&text)
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !is_only_punctuation(t))
        .flat_map(|t| minimize(&t, MAX_CHARS))
        .collect()
}

fn split_on_punctuation(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();

        if TONE_MARKS.contains(c) {
            // Tone marks change intonation, so they stay with their part.
            current.push(c);
            tokens.push(std::mem::take(&mut current));
        } else if c == '.' || c == ',' {
            // Only a period or comma followed by a space ends a part. This
            // keeps decimals like 1.5 and "e.g. " style abbreviations intact.
            let follows_abbreviation = i >= 2
                && chars[i - 2] == '.'
                && prev.is_some_and(|p| p.is_ascii_lowercase());
            if next == Some(' ') && !follows_abbreviation {
                tokens.push(std::mem::take(&mut current));
            } else {
                current.push(c);
            }
        } else if c == ':' {
            // 10:30 is a time, not a clause break.
            if prev.is_some_and(|p| p.is_ascii_digit()) {
                current.push(c);
            } else {
                tokens.push(std::mem::take(&mut current));
            }
        } else if PUNCTUATION.contains(c) {
            tokens.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    tokens.push(current);
    tokens
}

fn is_only_punctuation(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_whitespace() || PUNCTUATION.contains(c))
}

/// Cut `text` into pieces of at most `max` characters, preferring to cut
/// at the last space before the limit.
pub fn minimize(text: &str, max: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = text.trim_start_matches(' ');

    while rest.chars().count() > max {
        let limit = rest
            .char_indices()
            .nth(max)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let cut = match rest[..limit].rfind(' ') {
            Some(idx) if idx > 0 => idx,
            _ => limit,
        };
        parts.push(rest[..cut].to_string());
        rest = rest[cut..].trim_start_matches(' ');
    }

    if !rest.is_empty() {
        parts.push(rest.to_string());
    }
    parts
}
