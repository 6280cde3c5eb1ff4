//! Common test utilities: a sample workflow, mapping, and test submitters.
use chrono::{NaiveDate, NaiveDateTime};
use promptbatch::prelude::*;
use serde_json::Value;

/// A trimmed-down Flux workflow in API format.
#[allow(dead_code)]
pub const SAMPLE_WORKFLOW: &str = r#"{
  "6": {
    "inputs": { "text": "placeholder prompt", "clip": ["11", 0] },
    "class_type": "CLIPTextEncode",
    "_meta": { "title": "CLIP Text Encode (Prompt)" }
  },
  "9": {
    "inputs": { "filename_prefix": "ComfyUI", "images": ["8", 0] },
    "class_type": "SaveImage",
    "_meta": { "title": "Save Image" }
  },
  "12": {
    "inputs": { "unet_name": "flux1-dev.safetensors", "weight_dtype": "default" },
    "class_type": "UNETLoader",
    "_meta": { "title": "Load Diffusion Model" }
  },
  "17": {
    "inputs": { "scheduler": "simple", "steps": 20, "denoise": 1, "model": ["12", 0] },
    "class_type": "BasicScheduler",
    "_meta": { "title": "BasicScheduler" }
  },
  "25": {
    "inputs": { "noise_seed": 1 },
    "class_type": "RandomNoise",
    "_meta": { "title": "RandomNoise" }
  },
  "26": {
    "inputs": { "guidance": 3.5, "conditioning": ["6", 0] },
    "class_type": "FluxGuidance",
    "_meta": { "title": "FluxGuidance" }
  },
  "27": {
    "inputs": { "width": 1024, "height": 1024, "batch_size": 1 },
    "class_type": "EmptySD3LatentImage",
    "_meta": { "title": "Empty Latent Image" }
  },
  "30": {
    "inputs": { "options": { "tiling": false } },
    "class_type": "Custom",
    "_meta": { "title": "Nested" }
  }
}"#;

/// Mapping file matching `SAMPLE_WORKFLOW`, plus one path to a node that does not exist.
#[allow(dead_code)]
pub const SAMPLE_MAPPING: &str = "\
# argument == title/key
prompt          == CLIP Text Encode (Prompt)
steps           == BasicScheduler/steps
seed            == RandomNoise/noise_seed
filename_prefix == Save Image/filename_prefix
width           == Empty Latent Image/width
height          == Empty Latent Image/height
guidance        == FluxGuidance/guidance
model           == Load Diffusion Model/unet_name
missing         == No Such Node/value   # never resolves
";

#[allow(dead_code)]
pub fn sample_graph() -> WorkflowGraph {
    WorkflowGraph::from_json(SAMPLE_WORKFLOW).expect("sample workflow parses")
}

#[allow(dead_code)]
pub fn sample_mapping() -> MappingTable {
    MappingTable::parse(SAMPLE_MAPPING).expect("sample mapping parses")
}

#[allow(dead_code)]
pub fn args(pairs: &[(&str, &str)]) -> UserArgs {
    let mut args = UserArgs::new();
    for (name, value) in pairs {
        args.insert(name, value);
    }
    args
}

#[allow(dead_code)]
pub fn build_bindings(pairs: &[(&str, &str)]) -> BindingSet {
    BindingSetBuilder::new(&sample_mapping())
        .with_args(args(pairs))
        .build(&sample_graph())
        .expect("bindings build")
}

/// 2024-05-06 07:08:09
#[allow(dead_code)]
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 6)
        .unwrap()
        .and_hms_opt(7, 8, 9)
        .unwrap()
}

/// Reads `inputs.<key>` of node `id` from a submitted graph.
#[allow(dead_code)]
pub fn input(graph: &Value, id: &str, key: &str) -> Value {
    graph[id]["inputs"][key].clone()
}

/// Keeps a JSON copy of every submitted graph.
#[derive(Default)]
#[allow(dead_code)]
pub struct RecordingSubmitter {
    pub graphs: Vec<Value>,
}

impl Submitter for RecordingSubmitter {
    fn submit(&mut self, graph: &WorkflowGraph) -> std::result::Result<(), SubmitError> {
        self.graphs.push(graph.to_value());
        Ok(())
    }
}

/// Fails the submissions whose 1-based call number is listed, records the rest.
#[derive(Default)]
#[allow(dead_code)]
pub struct FlakySubmitter {
    pub fail_on: Vec<usize>,
    pub calls: usize,
    pub graphs: Vec<Value>,
}

impl Submitter for FlakySubmitter {
    fn submit(&mut self, graph: &WorkflowGraph) -> std::result::Result<(), SubmitError> {
        self.calls += 1;
        if self.fail_on.contains(&self.calls) {
            return Err(SubmitError::Transport {
                url: "http://test/prompt".to_string(),
                message: "connection reset".to_string(),
            });
        }
        self.graphs.push(graph.to_value());
        Ok(())
    }
}
