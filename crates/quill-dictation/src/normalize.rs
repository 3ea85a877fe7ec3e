//! Turns spoken transcript text into written text.
//!
//! [`normalize`] resolves punctuation phrases, spaces words and capitalizes
//! after sentence endings within one chunk of transcript. [`join_to_document`]
//! then fits a normalized chunk onto the end of text that is already committed.

use crate::punctuation::{is_line_break, is_sentence_ending, resolve};

/// Characters that attach to the preceding committed text without a space.
const ATTACHING_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', ')', ']'];

/// Characters that end a sentence in already-committed text.
const COMMITTED_SENTENCE_ENDINGS: &[char] = &['.', '!', '?'];

/// Normalize a raw spoken transcript.
///
/// Returns an empty string for empty or whitespace-only input. Output never
/// contains two consecutive spaces, never has a space before a punctuation
/// symbol, and never has an automatic space after a line break.
pub fn normalize(raw: &str) -> String {
    let words: Vec<&str> = raw.split_whitespace().collect();
    let mut out = String::with_capacity(raw.len());
    let mut capitalize_next = false;
    let mut cursor = 0;

    while cursor < words.len() {
        if let Some(matched) = resolve(&words, cursor) {
            // A symbol right after another symbol would otherwise follow its trailing space.
            let kept = out.trim_end_matches(' ').len();
            out.truncate(kept);

            out.push_str(matched.symbol);
            if !is_line_break(matched.symbol) {
                out.push(' ');
            }
            if is_sentence_ending(matched.symbol) {
                capitalize_next = true;
            }
            cursor += matched.words_consumed;
            continue;
        }

        let word = words[cursor];
        if !out.is_empty() && !out.ends_with(' ') && !out.ends_with('\n') {
            out.push(' ');
        }
        if capitalize_next {
            out.push_str(&capitalize_first(word));
            capitalize_next = false;
        } else {
            out.push_str(word);
        }
        cursor += 1;
    }

    out
}

/// Adjust normalized text so it continues `content` correctly.
///
/// Capitalizes the first letter when the committed text ends a sentence, and
/// prepends a space when the committed text does not already end in
/// whitespace and the new text does not start with attaching punctuation.
/// Empty `content` leaves the text untouched.
pub fn join_to_document(content: &str, normalized: &str) -> String {
    if content.is_empty() {
        return normalized.to_string();
    }

    let starts_lowercase = normalized
        .chars()
        .next()
        .is_some_and(|c| c.is_lowercase());
    let ends_sentence = content.trim().ends_with(COMMITTED_SENTENCE_ENDINGS);

    let mut text = if starts_lowercase && ends_sentence {
        capitalize_first(normalized)
    } else {
        normalized.to_string()
    };

    let content_ends_spaced = content.ends_with(' ') || content.ends_with('\n');
    if !content_ends_spaced && !text.starts_with(ATTACHING_PUNCTUATION) {
        text.insert(0, ' ');
    }

    text
}

/// Uppercase the first character of `word`, leaving the rest untouched.
pub fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
