use super::*;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

const ALL_VARS: &[&str] = &[
    "CANDOR_INPUT_PATH",
    "CANDOR_OUTPUT_PATH",
    "CANDOR_CANDIDATE_PREFIXES",
    "CANDOR_CANDIDATE_COLUMNS",
    "CANDOR_REFERENCE_FIELD",
    "CANDOR_FACT_FIELD",
    "CANDOR_FILTER_ENABLED",
    "CANDOR_FILTER_FIELD",
    "CANDOR_FILTER_ALLOW",
    "CANDOR_BERTSCORE_MODEL",
    "CANDOR_BERTSCORE_PATH",
    "CANDOR_BERTSCORE_LAYER",
    "CANDOR_CONSISTENCY_PATH",
    "CANDOR_SELECTION",
    "CANDOR_RERUN_POLICY",
    "CANDOR_WORKERS",
];

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    clear_candor_env();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    clear_candor_env();
    result
}

fn clear_candor_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for key in ALL_VARS {
        unsafe { env::remove_var(key) };
    }
}

const REQUIRED: [(&str, &str); 2] = [
    ("CANDOR_REFERENCE_FIELD", "reference"),
    ("CANDOR_FACT_FIELD", "fact"),
];

fn required_with<'a>(extra: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
    let mut vars: Vec<(&'a str, &'a str)> = REQUIRED.to_vec();
    vars.extend_from_slice(extra);
    vars
}

fn touch_model_dir(dir: &std::path::Path, skip: Option<&str>) {
    for file in ["config.json", "model.safetensors", "tokenizer.json"] {
        if Some(file) != skip {
            std::fs::write(dir.join(file), b"{}").unwrap();
        }
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.input_path, PathBuf::from("input.json"));
    assert_eq!(config.output_path, PathBuf::from("output.json"));
    assert_eq!(config.candidate_prefixes, vec!["generated_text"]);
    assert!(config.candidate_columns.is_none());
    assert!(!config.filter_enabled);
    assert_eq!(config.filter_field, "generator_model");
    assert_eq!(config.filter_allow.len(), 8);
    assert_eq!(config.bertscore_model, "bert-base-multilingual-cased");
    assert_eq!(config.bertscore_layer, Some(9));
    assert_eq!(config.rerun_policy, RerunPolicy::Refresh);
    assert_eq!(config.selection, SelectionCriterion::BertScoreF1);
    assert!(config.workers >= 1);
}

#[test]
#[serial]
fn test_from_env_requires_reference_field() {
    let result = with_env_vars(&[("CANDOR_FACT_FIELD", "fact")], Config::from_env);
    assert!(matches!(
        result,
        Err(ConfigError::MissingEnvVar {
            name: "CANDOR_REFERENCE_FIELD"
        })
    ));
}

#[test]
#[serial]
fn test_from_env_requires_fact_choice() {
    let result = with_env_vars(&[("CANDOR_REFERENCE_FIELD", "reference")], Config::from_env);
    assert!(matches!(
        result,
        Err(ConfigError::MissingEnvVar {
            name: "CANDOR_FACT_FIELD"
        })
    ));
}

#[test]
#[serial]
fn test_from_env_fact_none_disables_field() {
    let config = with_env_vars(
        &[
            ("CANDOR_REFERENCE_FIELD", "reference"),
            ("CANDOR_FACT_FIELD", "None"),
        ],
        Config::from_env,
    )
    .unwrap();
    assert!(config.fact_field.is_none());
    assert!(config.eval_settings().fact_field.is_none());
}

#[test]
#[serial]
fn test_from_env_minimal() {
    let config = with_env_vars(&REQUIRED, Config::from_env).unwrap();

    assert_eq!(config.reference_field, "reference");
    assert_eq!(config.fact_field.as_deref(), Some("fact"));
    assert_eq!(config.candidate_prefixes, vec!["generated_text"]);
    assert!(config.filter_gate().is_none());
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_full_override() {
    let vars = required_with(&[
        ("CANDOR_INPUT_PATH", "/tmp/in.json"),
        ("CANDOR_OUTPUT_PATH", "/tmp/out.json"),
        ("CANDOR_CANDIDATE_PREFIXES", "out_, gen_"),
        ("CANDOR_FILTER_ENABLED", "yes"),
        ("CANDOR_FILTER_FIELD", "model"),
        ("CANDOR_FILTER_ALLOW", "A,B, ,C"),
        ("CANDOR_BERTSCORE_MODEL", "xlm-roberta-large"),
        ("CANDOR_RERUN_POLICY", "skip-unchanged"),
        ("CANDOR_SELECTION", "bertscore_f1"),
        ("CANDOR_WORKERS", "3"),
    ]);
    let config = with_env_vars(&vars, Config::from_env).unwrap();

    assert_eq!(config.input_path, PathBuf::from("/tmp/in.json"));
    assert_eq!(config.output_path, PathBuf::from("/tmp/out.json"));
    assert_eq!(config.candidate_prefixes, vec!["out_", "gen_"]);
    assert!(config.filter_enabled);
    assert_eq!(config.filter_field, "model");
    assert_eq!(config.filter_allow, vec!["A", "B", "C"]);
    assert_eq!(config.bertscore_layer, Some(17));
    assert_eq!(config.rerun_policy, RerunPolicy::SkipUnchanged);
    assert_eq!(config.workers, 3);

    let gate = config.filter_gate().unwrap();
    assert_eq!(gate.field(), "model");
    assert_eq!(gate.allow_list().len(), 3);
}

#[test]
#[serial]
fn test_from_env_explicit_columns_override_prefixes() {
    let vars = required_with(&[("CANDOR_CANDIDATE_COLUMNS", "answer_b,answer_a")]);
    let config = with_env_vars(&vars, Config::from_env).unwrap();

    assert_eq!(
        config.column_spec(),
        ColumnSpec::Explicit(vec!["answer_b".to_string(), "answer_a".to_string()])
    );
}

#[test]
#[serial]
fn test_from_env_unknown_model_uses_all_layers() {
    let vars = required_with(&[("CANDOR_BERTSCORE_MODEL", "my-org/custom-encoder")]);
    let config = with_env_vars(&vars, Config::from_env).unwrap();
    assert_eq!(config.bertscore_layer, None);

    let vars = required_with(&[
        ("CANDOR_BERTSCORE_MODEL", "my-org/custom-encoder"),
        ("CANDOR_BERTSCORE_LAYER", "6"),
    ]);
    let config = with_env_vars(&vars, Config::from_env).unwrap();
    assert_eq!(config.bertscore_layer, Some(6));
    assert_eq!(config.encoder_config().layer, Some(6));
}

#[test]
#[serial]
fn test_from_env_invalid_values() {
    let cases: &[(&str, &str)] = &[
        ("CANDOR_FILTER_ENABLED", "maybe"),
        ("CANDOR_WORKERS", "many"),
        ("CANDOR_BERTSCORE_LAYER", "-1"),
        ("CANDOR_RERUN_POLICY", "append"),
        ("CANDOR_SELECTION", "bleu"),
    ];

    for case in cases {
        let vars = required_with(&[*case]);
        let result = with_env_vars(&vars, Config::from_env);
        assert!(
            matches!(result, Err(ConfigError::InvalidValue { .. })),
            "expected InvalidValue for {}={}",
            case.0,
            case.1
        );
    }
}

#[test]
#[serial]
fn test_from_env_empty_required_value() {
    let result = with_env_vars(
        &[
            ("CANDOR_REFERENCE_FIELD", "  "),
            ("CANDOR_FACT_FIELD", "fact"),
        ],
        Config::from_env,
    );
    assert!(matches!(result, Err(ConfigError::EmptyValue { .. })));
}

#[test]
fn test_validate_empty_prefixes() {
    let config = Config {
        reference_field: "reference".to_string(),
        candidate_prefixes: vec![],
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::EmptyList {
            name: "CANDOR_CANDIDATE_PREFIXES"
        })
    ));
}

#[test]
fn test_validate_empty_reference() {
    let config = Config::default();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::EmptyValue {
            name: "CANDOR_REFERENCE_FIELD"
        })
    ));
}

#[test]
fn test_validate_enabled_filter_needs_allow_list() {
    let config = Config {
        reference_field: "reference".to_string(),
        filter_enabled: true,
        filter_allow: vec![],
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::EmptyList {
            name: "CANDOR_FILTER_ALLOW"
        })
    ));
}

#[test]
fn test_validate_zero_workers_and_layer() {
    let config = Config {
        reference_field: "reference".to_string(),
        workers: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { .. })
    ));

    let config = Config {
        reference_field: "reference".to_string(),
        bertscore_layer: Some(0),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn test_validate_input_path_directory() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        reference_field: "reference".to_string(),
        input_path: dir.path().to_path_buf(),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotAFile { .. })
    ));
}

#[test]
fn test_validate_model_dirs() {
    let dir = TempDir::new().unwrap();
    touch_model_dir(dir.path(), None);

    let config = Config {
        reference_field: "reference".to_string(),
        bertscore_path: Some(dir.path().to_path_buf()),
        consistency_path: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    assert!(config.validate().is_ok());

    let config = Config {
        bertscore_path: Some(dir.path().join("missing")),
        ..config
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));
}

#[test]
fn test_validate_model_dir_missing_artifact() {
    let dir = TempDir::new().unwrap();
    touch_model_dir(dir.path(), Some("tokenizer.json"));

    let config = Config {
        reference_field: "reference".to_string(),
        consistency_path: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::MissingModelFile {
            file: "tokenizer.json",
            ..
        })
    ));
}

#[test]
fn test_model_configs_follow_paths() {
    let config = Config::default();
    assert!(config.encoder_config().is_stub());
    assert!(config.aligner_config().model_path.is_none());

    let config = Config {
        consistency_path: Some(PathBuf::from("/models/ctc")),
        ..Default::default()
    };
    assert_eq!(
        config.aligner_config().model_path,
        Some(PathBuf::from("/models/ctc"))
    );
}
