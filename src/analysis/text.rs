//! Tokenizing and keyword-pattern helpers shared by extraction and matching.

use regex::Regex;

/// English stop words plus filler common in thesis boilerplate.
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "across", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be",
    "been", "being", "both", "but", "by", "can", "clear", "companies", "company", "could", "do",
    "does", "each", "either", "for", "from", "has", "have", "having", "in", "into", "is", "it",
    "its", "just", "like", "looking", "more", "most", "much", "must", "not", "of", "on", "only",
    "or", "other", "our", "out", "over", "per", "prefer", "range", "seeking", "should", "so",
    "such", "target", "than", "that", "the", "their", "them", "then", "there", "these", "they",
    "this", "those", "through", "to", "under", "up", "very", "want", "we", "were", "what", "when",
    "where", "which", "while", "who", "will", "with", "within", "would", "you", "your",
];

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.binary_search(&token).is_ok()
}

/// Lower-cased alphanumeric runs. Hyphens and slashes split words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Tokens with stop words and single characters removed.
pub fn content_tokens(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| t.chars().count() > 1 && !is_stop_word(t))
        .collect()
}

/// Folds the most common English plural so "payments" and "payment" line up.
pub fn normalize_token(token: &str) -> &str {
    if token.len() > 3 && token.ends_with('s') && !token.ends_with("ss") {
        &token[..token.len() - 1]
    } else {
        token
    }
}

/// Sentences split on terminal punctuation, trimmed, empties dropped.
///
/// A period only ends a sentence when followed by whitespace or the end of
/// the text, so "$2.5M" stays in one piece.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let ends = match c {
            '!' | '?' | '\n' => true,
            '.' => chars.peek().map_or(true, |(_, next)| next.is_whitespace()),
            _ => false,
        };
        if ends {
            sentences.push(&text[start..i]);
            start = i + c.len_utf8();
        }
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Truncates to `max_chars` characters, appending "..." when something was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// A vocabulary entry compiled to a case-insensitive whole-word pattern.
#[derive(Debug)]
pub struct KeywordPattern {
    pub keyword: &'static str,
    regex: Regex,
}

impl KeywordPattern {
    pub fn new(keyword: &'static str) -> Self {
        Self {
            keyword,
            regex: keyword_regex(keyword),
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex.find(text).map(|m| m.as_str())
    }
}

pub fn compile_keywords(keywords: &'static [&'static str]) -> Vec<KeywordPattern> {
    keywords.iter().map(|k| KeywordPattern::new(k)).collect()
}

/// Builds the regex for one vocabulary phrase.
///
/// Word boundaries are only asserted next to alphanumeric edges (so `100m+`
/// still matches), spaces accept any run of whitespace or hyphens, and a
/// trailing plural `s` is tolerated on alphabetic endings.
fn keyword_regex(keyword: &str) -> Regex {
    let trimmed = keyword.trim();
    let body = trimmed
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"[\s\-]+");

    let starts_word = trimmed.chars().next().is_some_and(|c| c.is_alphanumeric());
    let last = trimmed.chars().last();
    let ends_alpha = last.is_some_and(|c| c.is_alphabetic());
    let ends_word = last.is_some_and(|c| c.is_alphanumeric());

    let mut pattern = String::from("(?i)");
    if starts_word {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&body);
    if ends_alpha {
        pattern.push_str("s?");
    }
    if ends_word {
        pattern.push_str(r"\b");
    }

    Regex::new(&pattern).expect("keyword pattern is built from escaped literals")
}
