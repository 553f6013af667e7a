//! Cross-cutting, shared constants.
//!
//! The reserved output keys are part of the on-disk record format. Changing them breaks
//! re-runs over previously enriched batches.

/// Record key holding the per-column metrics container.
pub const METRICS_KEY: &str = "metrics";

/// Record key holding the best-output marker.
pub const BEST_OUTPUT_KEY: &str = "best_output";

/// Criterion identifier written into the best-output marker.
pub const CRITERION_BERTSCORE_F1: &str = "BERTScore_F1";

/// Default candidate-column prefix.
pub const DEFAULT_CANDIDATE_PREFIX: &str = "generated_text";

/// Default categorical field consulted by the filter gate.
pub const DEFAULT_FILTER_FIELD: &str = "generator_model";

/// Default filter allow-list (generator identifiers).
pub const DEFAULT_ALLOWED_GENERATORS: &[&str] = &[
    "mistral-7b",
    "llama3-8b",
    "gemma-3-12b",
    "gpt4o",
    "sabia3",
    "mistral-3-24b",
    "gemma-3-27b",
    "llama-4-scout",
];

/// Default multilingual encoder used for BERTScore.
pub const DEFAULT_BERTSCORE_MODEL: &str = "bert-base-multilingual-cased";

/// Hidden layer BERTScore reads for [`DEFAULT_BERTSCORE_MODEL`].
pub const DEFAULT_BERTSCORE_LAYER: usize = 9;

/// Max tokens fed to either BERT model.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

/// Embedding width produced by the stub token encoder.
pub const STUB_EMBEDDING_DIM: usize = 64;

/// Highest n-gram order used by BLEU.
pub const BLEU_MAX_ORDER: usize = 4;

/// Returns the default BERTScore layer for a known encoder identifier.
///
/// `None` means "use every layer the checkpoint ships".
pub fn default_layer_for(model_id: &str) -> Option<usize> {
    match model_id {
        DEFAULT_BERTSCORE_MODEL => Some(DEFAULT_BERTSCORE_LAYER),
        "bert-base-uncased" | "bert-base-cased" => Some(9),
        "xlm-roberta-base" => Some(9),
        "xlm-roberta-large" => Some(17),
        _ => None,
    }
}
