use super::*;

#[test]
fn test_aligner_config_default() {
    let config = AlignerConfig::default();
    assert!(config.model_path.is_none());
    assert_eq!(config.max_seq_len, 512);
    assert!(config.validate().is_ok());
}

#[test]
fn test_aligner_config_rejects_short_seq_len() {
    let config = AlignerConfig {
        max_seq_len: 2,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_stub_loads_without_model() {
    let aligner = ConsistencyAligner::stub().unwrap();
    assert!(!aligner.is_model_loaded());
}

#[test]
fn test_stub_full_alignment() {
    let aligner = ConsistencyAligner::stub().unwrap();
    let score = aligner
        .align("O lucro da empresa cresceu em 2023.", "O lucro cresceu.")
        .unwrap();
    assert!((score - 1.0).abs() < 1e-6);
}

#[test]
fn test_stub_partial_alignment() {
    let aligner = ConsistencyAligner::stub().unwrap();
    let score = aligner.align("o lucro cresceu", "o lucro caiu muito").unwrap();
    assert!((score - 0.5).abs() < 1e-6);
}

#[test]
fn test_stub_no_alignment() {
    let aligner = ConsistencyAligner::stub().unwrap();
    let score = aligner.align("receita estável", "lucro cresceu").unwrap();
    assert_eq!(score, 0.0);
}

#[test]
fn test_empty_grounding_is_error() {
    let aligner = ConsistencyAligner::stub().unwrap();
    assert!(matches!(
        aligner.align("", "O lucro cresceu."),
        Err(EmbeddingError::EmptyInput { what: "grounding" })
    ));
    assert!(matches!(
        aligner.align("   ", "O lucro cresceu."),
        Err(EmbeddingError::EmptyInput { .. })
    ));
}

#[test]
fn test_punctuation_only_grounding_is_error() {
    let aligner = ConsistencyAligner::stub().unwrap();
    assert!(aligner.align("...", "O lucro cresceu.").is_err());
}

#[test]
fn test_load_missing_model_dir() {
    let result = ConsistencyAligner::load(AlignerConfig::new("/nonexistent/aligner"));
    assert!(matches!(result, Err(EmbeddingError::ModelNotFound { .. })));
}

#[test]
fn test_load_dir_without_weights() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), "{}").unwrap();
    let result = ConsistencyAligner::load(AlignerConfig::new(dir.path()));
    assert!(matches!(
        result,
        Err(EmbeddingError::ModelLoadFailed { .. })
    ));
}
