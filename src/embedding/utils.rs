use std::io;
use std::path::Path;
use tokenizers::{Tokenizer, TruncationParams};

/// Loads `tokenizer.json` from a model directory with truncation at `max_len` tokens.
///
/// Both BERT models have a fixed position-embedding table, so longer inputs must be cut
/// before they reach the forward pass.
pub fn load_tokenizer_with_truncation(model_dir: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let tokenizer_path = if model_dir.is_dir() {
        model_dir.join("tokenizer.json")
    } else {
        model_dir.to_path_buf()
    };

    let mut tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(io::Error::other)?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;

    Ok(tokenizer)
}

/// Splits text into lowercased alphanumeric words (used by the stub backends).
pub fn stub_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// Scales `v` to unit length in place (zero vectors are left untouched).
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
