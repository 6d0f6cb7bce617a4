//! Free-text chat commands such as "make 9:16, 3 minutes, sunrise over mountains".
//!
//! Parsing never fails: anything it cannot recognise falls back to the defaults
//! of [`VideoRequest`].

use super::video::{truncate_prompt, AspectRatio, ClipDuration, VideoRequest};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Prompt used when nothing is left after removing the recognised parameters.
pub const DEFAULT_PROMPT: &str = "A cinematic nature scene";

static SECONDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)\s*(sec|secs|second|seconds)\b").expect("seconds pattern")
});

static MINUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)\s*(min|mins|minute|minutes)\b").expect("minutes pattern")
});

// Applied to lower-cased text with all whitespace removed, first match wins.
static ASPECT_RULES: LazyLock<Vec<(Regex, AspectRatio)>> = LazyLock::new(|| {
    [
        (r"16[:x]?9", AspectRatio::Landscape),
        (r"9[:x]?16", AspectRatio::Portrait),
        (r"landscape", AspectRatio::Landscape),
        (r"portrait|vertical", AspectRatio::Portrait),
    ]
    .into_iter()
    .map(|(pattern, aspect)| (Regex::new(pattern).expect("aspect pattern"), aspect))
    .collect()
});

static STRIP_ASPECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(16\s*[:x]?\s*9|9\s*[:x]?\s*16|landscape|portrait|vertical)\b")
        .expect("aspect strip pattern")
});

static STRIP_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[0-9]+\s*(sec|secs|second|seconds|min|mins|minute|minutes)\b")
        .expect("duration strip pattern")
});

static REPEATED_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("whitespace pattern"));

/// Words that carry no description once the parameters are gone ("make", "a", ...).
const FILLER_WORDS: &[&str] = &[
    "make", "create", "generate", "render", "set", "use", "please", "me", "a", "an", "the",
    "video", "clip", "in", "at", "to", "with", "for", "of", "and",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub duration: Option<ClipDuration>,
    pub aspect: Option<AspectRatio>,
    pub prompt: String,
}

impl ParsedCommand {
    pub fn into_request(self) -> VideoRequest {
        VideoRequest::new(
            &self.prompt,
            self.duration.unwrap_or_default(),
            self.aspect.unwrap_or_default(),
        )
    }
}

/// Response of `POST /command`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandReply {
    pub reply: String,
    pub prompt: String,
    pub duration_seconds: ClipDuration,
    pub aspect_ratio: AspectRatio,
}

impl CommandReply {
    pub fn request(&self) -> VideoRequest {
        VideoRequest::new(&self.prompt, self.duration_seconds, self.aspect_ratio)
    }
}

pub fn parse(text: &str) -> ParsedCommand {
    let text = truncate_prompt(text);
    ParsedCommand {
        duration: parse_duration(&text),
        aspect: parse_aspect(&text),
        prompt: clean_prompt(&text),
    }
}

/// Parse `message` and phrase the confirmation sent back to the chat.
pub fn interpret(message: &str) -> CommandReply {
    let request = parse(message).into_request();
    let reply = format!(
        "Okay. I set aspect to {}, duration to {} seconds. Prompt: \"{}\"",
        request.aspect_ratio, request.duration_seconds, request.prompt
    );
    CommandReply {
        reply,
        prompt: request.prompt,
        duration_seconds: request.duration_seconds,
        aspect_ratio: request.aspect_ratio,
    }
}

/// Seconds are looked for before minutes; the first hit of a pattern is used.
pub fn parse_duration(text: &str) -> Option<ClipDuration> {
    let lower = text.to_lowercase();
    for (pattern, multiplier) in [(&*SECONDS, 1u64), (&*MINUTES, 60)] {
        if let Some(caps) = pattern.captures(&lower) {
            let amount = caps[1].parse::<u64>().unwrap_or(u64::MAX);
            return Some(ClipDuration::snap(amount.saturating_mul(multiplier)));
        }
    }
    None
}

pub fn parse_aspect(text: &str) -> Option<AspectRatio> {
    let compact: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    ASPECT_RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(&compact))
        .map(|(_, aspect)| *aspect)
}

pub fn clean_prompt(text: &str) -> String {
    let without_aspect = STRIP_ASPECT.replace_all(text, "");
    let stripped = STRIP_DURATION.replace_all(&without_aspect, "");

    let cleaned = if stripped == text {
        collapse_whitespace(text)
    } else {
        drop_filler_clauses(&stripped)
    };

    if cleaned.is_empty() {
        DEFAULT_PROMPT.to_string()
    } else {
        cleaned
    }
}

/// Clauses are split on `,` and `;`. With more than one clause, those left
/// empty or made only of filler are dropped; the rest keep their separators.
fn drop_filler_clauses(text: &str) -> String {
    let clauses = split_clauses(text);
    let several = clauses.len() > 1;

    let mut kept = String::new();
    let mut separator = None;
    for (clause, next_separator) in clauses {
        if several && is_filler(clause) {
            continue;
        }
        if let Some(sep) = separator {
            kept.push_str(sep);
        }
        kept.push_str(clause.trim_end());
        separator = next_separator;
    }
    collapse_whitespace(&kept)
}

fn split_clauses(text: &str) -> Vec<(&str, Option<&str>)> {
    let mut clauses = Vec::new();
    let mut start = 0;
    for (index, separator) in text.match_indices([',', ';']) {
        clauses.push((&text[start..index], Some(separator)));
        start = index + separator.len();
    }
    clauses.push((&text[start..], None));
    clauses
}

fn collapse_whitespace(text: &str) -> String {
    REPEATED_SPACE.replace_all(text, " ").trim().to_string()
}

fn is_filler(clause: &str) -> bool {
    clause
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .all(|word| FILLER_WORDS.contains(&word.to_lowercase().as_str()))
}
