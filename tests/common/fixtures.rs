use std::path::{Path, PathBuf};

use candor::evaluation::{ColumnSpec, EvalSettings};
use serde_json::{Value, json};

pub const REFERENCE_FIELD: &str = "reference";
pub const FACT_FIELD: &str = "fact";
pub const CANDIDATE_PREFIX: &str = "generated_text";

pub fn settings() -> EvalSettings {
    EvalSettings::new(
        ColumnSpec::Prefixes(vec![CANDIDATE_PREFIX.to_string()]),
        REFERENCE_FIELD,
    )
    .with_fact_field(FACT_FIELD)
}

/// Builder for one input record.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    fields: serde_json::Map<String, Value>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reference(self, text: &str) -> Self {
        self.field(REFERENCE_FIELD, text)
    }

    pub fn fact(self, text: &str) -> Self {
        self.field(FACT_FIELD, text)
    }

    pub fn candidate(self, suffix: &str, text: &str) -> Self {
        self.field(&format!("{CANDIDATE_PREFIX}_{suffix}"), text)
    }

    pub fn generator(self, model: &str) -> Self {
        self.field("generator_model", model)
    }

    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Small Portuguese batch mirroring a typical generation run.
pub fn sample_batch() -> Vec<Value> {
    vec![
        RecordBuilder::new()
            .reference("O lucro cresceu.")
            .fact("O lucro da empresa cresceu em 2023.")
            .candidate("a", "O lucro aumentou.")
            .candidate("b", "")
            .build(),
        RecordBuilder::new()
            .reference("A receita caiu no trimestre.")
            .fact("A receita caiu 5% no terceiro trimestre.")
            .candidate("a", "A receita caiu no trimestre.")
            .candidate("b", "Os custos subiram.")
            .build(),
        RecordBuilder::new()
            .reference("")
            .candidate("a", "Sem referência.")
            .build(),
    ]
}

pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
    path
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

pub fn batch_value(records: Vec<Value>) -> Value {
    json!(records)
}
