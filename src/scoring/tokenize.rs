//! Tokenizers for the lexical scorers.

/// 13a-style tokenization (the WMT `mteval-v13a` rules used by BLEU tooling).
///
/// ASCII punctuation is split off, except that `.` and `,` stay attached when both
/// neighbours are digits (`3.5`, `1,000`) and `-` is only split after a digit.
pub fn tokenize_13a(text: &str) -> Vec<String> {
    let mut line = text.replace("<skipped>", "").replace("-\n", "").replace('\n', " ");
    if line.contains('&') {
        line = line
            .replace("&quot;", "\"")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">");
    }

    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len() * 2);

    for (i, &c) in chars.iter().enumerate() {
        let prev = if i == 0 { ' ' } else { chars[i - 1] };
        let next = chars.get(i + 1).copied().unwrap_or(' ');

        let split = match c {
            '.' | ',' => !(prev.is_ascii_digit() && next.is_ascii_digit()),
            '-' => prev.is_ascii_digit(),
            _ => is_13a_punct(c),
        };

        if split {
            out.push(' ');
            out.push(c);
            out.push(' ');
        } else {
            out.push(c);
        }
    }

    out.split_whitespace().map(str::to_string).collect()
}

fn is_13a_punct(c: char) -> bool {
    matches!(c,
        '{'..='~' | '['..='`' | ' '..='&' | '('..='+' | ':'..='@' | '/')
}

/// Lowercased alphanumeric tokens (ROUGE default tokenizer, Unicode-aware, no stemming).
pub fn tokenize_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// Newline-separated sentences (summary-level ROUGE convention).
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

/// Sentences split on terminal punctuation and newlines.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split_inclusive(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .collect()
}

/// Counts n-grams of order `n`.
pub fn ngram_counts(tokens: &[String], n: usize) -> std::collections::HashMap<&[String], usize> {
    let mut counts = std::collections::HashMap::new();
    if n == 0 || tokens.len() < n {
        return counts;
    }
    for window in tokens.windows(n) {
        *counts.entry(window).or_insert(0) += 1;
    }
    counts
}
