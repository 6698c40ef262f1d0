//! Markdown cleanup for spoken replies
//!
//! Completion APIs answer in markdown. A voice platform reads every asterisk
//! and bracket out loud, so replies are flattened into a single line of plain
//! words and capped in length before they're spoken.

use std::sync::LazyLock;

use regex::Regex;

/// Longest reply spoken before truncating
pub const MAX_SPEECH_CHARS: usize = 700;

/// Appended to truncated replies
pub const TRUNCATION_SUFFIX: &str = "... Let me know if you want more.";

/// Emphasis, code and heading markers
static MARKUP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[*_`#]+").expect("valid regex"));

/// Link and citation punctuation
static BRACKET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[\]()]").expect("valid regex"));

/// List bullets at the start of a line, including stacked ones like `- - item`
static BULLET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:\s*-)+\s*").expect("valid regex"));

/// Flatten markdown into speech-friendly text
///
/// Strips emphasis, code, heading and bracket characters (keeping the text
/// inside), drops list bullets, joins lines and collapses whitespace. Replies
/// longer than [`MAX_SPEECH_CHARS`] are cut and end with [`TRUNCATION_SUFFIX`].
///
/// Cleaning already-clean text returns it unchanged, including text this
/// function truncated.
#[must_use]
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = MARKUP_REGEX.replace_all(text, "");
    let text = BRACKET_REGEX.replace_all(&text, "");
    let text = BULLET_REGEX.replace_all(&text, "");
    let text = text.replace('\n', " ");

    // A dash standing alone between words is a flattened bullet, not speech
    let text = text
        .split_whitespace()
        .filter(|word| !word.chars().all(|c| c == '-'))
        .collect::<Vec<_>>()
        .join(" ");

    truncate_for_speech(text)
}

fn truncate_for_speech(text: String) -> String {
    let body = text.strip_suffix(TRUNCATION_SUFFIX).unwrap_or(&text);
    let Some((cut, _)) = body.char_indices().nth(MAX_SPEECH_CHARS) else {
        return text;
    };

    let mut truncated = body[..cut].trim_end().to_string();
    truncated.push_str(TRUNCATION_SUFFIX);
    truncated
}
