//! ROUGE-1/2/L/Lsum F-measures.

use std::collections::{BTreeSet, HashMap};

use super::tokenize::{ngram_counts, split_lines, tokenize_words};
use super::types::RougeScores;

#[derive(Debug, Clone, Copy, PartialEq)]
/// Precision/recall/F-measure triple.
pub struct PrfScore {
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

impl PrfScore {
    fn from_counts(hits: usize, candidate_total: usize, reference_total: usize) -> Self {
        let precision = if candidate_total > 0 {
            hits as f64 / candidate_total as f64
        } else {
            0.0
        };
        let recall = if reference_total > 0 {
            hits as f64 / reference_total as f64
        } else {
            0.0
        };
        let fmeasure = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            fmeasure,
        }
    }
}

/// Recall-oriented overlap scorer. Never fails: degenerate inputs score 0.
#[derive(Debug, Clone, Default)]
pub struct RougeScorer;

impl RougeScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, candidate: &str, reference: &str) -> RougeScores {
        let candidate_tokens = tokenize_words(candidate);
        let reference_tokens = tokenize_words(reference);

        RougeScores {
            rouge1: rouge_n(&candidate_tokens, &reference_tokens, 1).fmeasure,
            rouge2: rouge_n(&candidate_tokens, &reference_tokens, 2).fmeasure,
            rouge_l: rouge_l(&candidate_tokens, &reference_tokens).fmeasure,
            rouge_lsum: rouge_lsum(candidate, reference).fmeasure,
        }
    }
}

/// N-gram overlap with clipped counts.
pub fn rouge_n(candidate: &[String], reference: &[String], n: usize) -> PrfScore {
    let candidate_ngrams = ngram_counts(candidate, n);
    let reference_ngrams = ngram_counts(reference, n);

    let hits: usize = reference_ngrams
        .iter()
        .map(|(gram, count)| (*count).min(candidate_ngrams.get(gram).copied().unwrap_or(0)))
        .sum();

    PrfScore::from_counts(
        hits,
        candidate_ngrams.values().sum(),
        reference_ngrams.values().sum(),
    )
}

/// Sentence-level LCS.
pub fn rouge_l(candidate: &[String], reference: &[String]) -> PrfScore {
    let lcs = lcs_table(reference, candidate);
    let length = lcs[reference.len()][candidate.len()];
    PrfScore::from_counts(length, candidate.len(), reference.len())
}

/// Summary-level LCS over newline-separated sentences.
///
/// Each reference sentence contributes the union of its LCS positions against every
/// candidate sentence; a token is only credited while both sides still have unused
/// occurrences of it.
pub fn rouge_lsum(candidate: &str, reference: &str) -> PrfScore {
    let reference_sentences: Vec<Vec<String>> = split_lines(reference)
        .into_iter()
        .map(tokenize_words)
        .filter(|s| !s.is_empty())
        .collect();
    let candidate_sentences: Vec<Vec<String>> = split_lines(candidate)
        .into_iter()
        .map(tokenize_words)
        .filter(|s| !s.is_empty())
        .collect();

    let reference_total: usize = reference_sentences.iter().map(Vec::len).sum();
    let candidate_total: usize = candidate_sentences.iter().map(Vec::len).sum();
    if reference_total == 0 || candidate_total == 0 {
        return PrfScore::from_counts(0, candidate_total, reference_total);
    }

    let mut reference_budget = token_counts(&reference_sentences);
    let mut candidate_budget = token_counts(&candidate_sentences);
    let mut hits = 0;

    for reference_sentence in &reference_sentences {
        for token in union_lcs(reference_sentence, &candidate_sentences) {
            let in_reference = reference_budget.get_mut(token.as_str());
            let in_candidate = candidate_budget.get_mut(token.as_str());
            if let (Some(r), Some(c)) = (in_reference, in_candidate)
                && *r > 0
                && *c > 0
            {
                *r -= 1;
                *c -= 1;
                hits += 1;
            }
        }
    }

    PrfScore::from_counts(hits, candidate_total, reference_total)
}

fn token_counts(sentences: &[Vec<String>]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for token in sentences.iter().flatten() {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Reference tokens covered by the LCS with any candidate sentence, in reference order.
fn union_lcs<'a>(reference: &'a [String], candidates: &[Vec<String>]) -> Vec<&'a String> {
    let mut positions = BTreeSet::new();
    for candidate in candidates {
        positions.extend(lcs_positions(reference, candidate));
    }
    positions.into_iter().map(|i| &reference[i]).collect()
}

fn lcs_table(a: &[String], b: &[String]) -> Vec<Vec<usize>> {
    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            table[i][j] = if a[i - 1] == b[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }
    table
}

/// Indices into `a` that belong to one LCS of `a` and `b`.
fn lcs_positions(a: &[String], b: &[String]) -> Vec<usize> {
    let table = lcs_table(a, b);
    let (mut i, mut j) = (a.len(), b.len());
    let mut positions = Vec::new();

    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] {
            positions.push(i - 1);
            i -= 1;
            j -= 1;
        } else if table[i - 1][j] >= table[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    positions.reverse();
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        tokenize_words(s)
    }

    #[test]
    fn test_identical_texts() {
        let scores = RougeScorer::new().score("O lucro cresceu.", "O lucro cresceu.");
        assert_eq!(scores.rouge1, 1.0);
        assert_eq!(scores.rouge2, 1.0);
        assert_eq!(scores.rouge_l, 1.0);
        assert_eq!(scores.rouge_lsum, 1.0);
    }

    #[test]
    fn test_rouge1_partial() {
        // 2 of 3 unigrams shared on both sides.
        let score = rouge_n(&toks("O lucro aumentou"), &toks("O lucro cresceu"), 1);
        assert!((score.precision - 2.0 / 3.0).abs() < 1e-9);
        assert!((score.recall - 2.0 / 3.0).abs() < 1e-9);
        assert!((score.fmeasure - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rouge2_partial() {
        let score = rouge_n(&toks("O lucro aumentou"), &toks("O lucro cresceu"), 2);
        assert!((score.fmeasure - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rouge_l_uses_subsequence() {
        // LCS of "a b c d" and "a c d" is "a c d".
        let score = rouge_l(&toks("a c d"), &toks("a b c d"));
        assert!((score.precision - 1.0).abs() < 1e-9);
        assert!((score.recall - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_rouge_lsum_single_line_matches_rouge_l() {
        let candidate = "the cat sat on the mat";
        let reference = "the cat was on the red mat";
        let l = rouge_l(&toks(candidate), &toks(reference));
        let lsum = rouge_lsum(candidate, reference);
        assert!((l.fmeasure - lsum.fmeasure).abs() < 1e-9);
    }

    #[test]
    fn test_rouge_lsum_multi_sentence_union() {
        let reference = "w1 w2 w3 w4 w5";
        let candidate = "w1 w2 w6 w7 w8\nw1 w3 w8 w9 w5";
        let score = rouge_lsum(candidate, reference);
        // Union LCS covers w1 w2 w3 w5: 4 hits over 5 reference and 10 candidate tokens.
        assert!((score.recall - 0.8).abs() < 1e-9);
        assert!((score.precision - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_no_overlap_scores_zero() {
        let scores = RougeScorer::new().score("alpha beta", "gamma delta");
        assert_eq!(scores.rouge1, 0.0);
        assert_eq!(scores.rouge2, 0.0);
        assert_eq!(scores.rouge_l, 0.0);
        assert_eq!(scores.rouge_lsum, 0.0);
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        let scores = RougeScorer::new().score("", "O lucro cresceu.");
        assert_eq!(scores.rouge1, 0.0);
        assert_eq!(scores.rouge_lsum, 0.0);
    }

    #[test]
    fn test_case_insensitive() {
        let scores = RougeScorer::new().score("O LUCRO", "o lucro");
        assert_eq!(scores.rouge1, 1.0);
    }
}
