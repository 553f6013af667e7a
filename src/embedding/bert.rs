use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;
use std::sync::Arc;

fn read_config(model_dir: &Path) -> Result<Config> {
    let config_content = std::fs::read_to_string(model_dir.join("config.json"))?;
    serde_json::from_str(&config_content)
        .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))
}

fn var_builder<'a>(model_dir: &Path, device: &Device) -> Result<VarBuilder<'a>> {
    let weights_path = model_dir.join("model.safetensors");
    unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device) }
}

/// Loads the transformer body regardless of the checkpoint's head prefix.
fn load_backbone(vb: &VarBuilder, config: &Config) -> Result<BertModel> {
    if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
        BertModel::load(vb.pp("bert"), config)
    } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
        BertModel::load(vb.pp("roberta"), config)
    } else {
        BertModel::load(vb.clone(), config)
    }
}

struct BertForSequenceClassificationImpl {
    bert: BertModel,
    classifier: Linear,
}

impl BertForSequenceClassificationImpl {
    fn load(vb: VarBuilder, config: &Config) -> Result<Self> {
        let bert = load_backbone(&vb, config)?;
        let classifier = candle_nn::linear(config.hidden_size, 1, vb.pp("classifier"))?;

        Ok(Self { bert, classifier })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let output = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls_token = output.i((.., 0, ..))?;
        self.classifier.forward(&cls_token)
    }
}

/// Pair classifier with a single-logit head (consistency aligner).
#[derive(Clone)]
pub struct BertClassifier(Arc<BertForSequenceClassificationImpl>);

impl BertClassifier {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config = read_config(model_dir)?;
        let vb = var_builder(model_dir, device)?;

        let model = BertForSequenceClassificationImpl::load(vb, &config)?;

        Ok(Self(Arc::new(model)))
    }

    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        self.0.forward(input_ids, token_type_ids, attention_mask)
    }
}

/// Transformer body returning per-token hidden states.
///
/// When `layer` is set the encoder is built with only the first `layer` blocks, so the
/// output is that layer's hidden state rather than the last one.
#[derive(Clone)]
pub struct BertEncoder {
    model: Arc<BertModel>,
    hidden_size: usize,
    num_layers: usize,
}

impl BertEncoder {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device, layer: Option<usize>) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let mut config = read_config(model_dir)?;

        if let Some(layer) = layer {
            if layer == 0 || layer > config.num_hidden_layers {
                return Err(candle::Error::Msg(format!(
                    "layer {} out of range (model has {} layers)",
                    layer, config.num_hidden_layers
                )));
            }
            config.num_hidden_layers = layer;
        }

        let vb = var_builder(model_dir, device)?;
        let model = load_backbone(&vb, &config)?;

        Ok(Self {
            model: Arc::new(model),
            hidden_size: config.hidden_size,
            num_layers: config.num_hidden_layers,
        })
    }

    /// Returns hidden states shaped `[batch, seq_len, hidden_size]`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        self.model.forward(input_ids, token_type_ids, attention_mask)
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn num_layers(&self) -> usize {
        self.num_layers
    }
}
