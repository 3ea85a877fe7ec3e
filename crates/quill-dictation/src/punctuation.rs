//! Spoken punctuation phrases and their written symbols.
//!
//! Phrases are one to three words long. Resolution is greedy: at any word the
//! longest phrase wins, so "semi colon" is a single `;` rather than the literal
//! word "semi" followed by `:`.

/// Longest phrase in the table, in words.
pub const MAX_PHRASE_WORDS: usize = 3;

/// Every spoken phrase and the symbol it produces.
pub const PUNCTUATION_TABLE: &[(&str, &str)] = &[
    ("full stop", "."),
    ("period", "."),
    ("dot", "."),
    ("comma", ","),
    ("question mark", "?"),
    ("exclamation mark", "!"),
    ("exclamation point", "!"),
    ("semicolon", ";"),
    ("semi colon", ";"),
    ("colon", ":"),
    ("dash", "-"),
    ("hyphen", "-"),
    ("apostrophe", "'"),
    ("quotation mark", "\""),
    ("quote", "\""),
    ("open bracket", "("),
    ("open parenthesis", "("),
    ("close bracket", ")"),
    ("close parenthesis", ")"),
    ("new line", "\n"),
    ("new paragraph", "\n\n"),
];

/// Symbols after which the next literal word is capitalized.
pub const SENTENCE_ENDINGS: &[&str] = &[".", "?", "!", "\n\n"];

/// A phrase matched at some position in a word sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhraseMatch {
    pub symbol: &'static str,
    pub words_consumed: usize,
}

/// Look up a single phrase, ignoring case and surrounding or repeated whitespace.
pub fn lookup(phrase: &str) -> Option<&'static str> {
    let normalized = phrase
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    PUNCTUATION_TABLE
        .iter()
        .find(|(key, _)| *key == normalized)
        .map(|(_, symbol)| *symbol)
}

/// Resolve the longest phrase starting at `start`, trying 3, 2, then 1 words.
///
/// Windows that would run past the end of `words` are skipped.
pub fn resolve<S: AsRef<str>>(words: &[S], start: usize) -> Option<PhraseMatch> {
    if start >= words.len() {
        return None;
    }

    let available = words.len() - start;
    (1..=MAX_PHRASE_WORDS.min(available)).rev().find_map(|len| {
        let phrase = words[start..start + len]
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        lookup(&phrase).map(|symbol| PhraseMatch {
            symbol,
            words_consumed: len,
        })
    })
}

pub fn is_sentence_ending(symbol: &str) -> bool {
    SENTENCE_ENDINGS.contains(&symbol)
}

/// Newline symbols are never followed by a space.
pub fn is_line_break(symbol: &str) -> bool {
    symbol == "\n" || symbol == "\n\n"
}
