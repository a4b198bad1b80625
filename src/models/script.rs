use serde::{Deserialize, Serialize};

/// Structured script produced once per generation run.
///
/// Wire form is the camelCase JSON object the script model is instructed
/// to return: `{"characterDescription": "...", "panels": [{"text": "..."}]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComicScript {
    pub character_description: String,
    pub panels: Vec<Panel>,
}

/// One narrative beat of the script; rendered as a single image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Panel {
    pub text: String,
}
