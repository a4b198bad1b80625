use crate::{
    error::{PanelGenError, Result},
    gemini::TextClient,
    models::{ComicScript, TextGenerationRequest},
};

/// Fixed instruction block appended to every script request. Demands a
/// consolidated character description, single-sentence panel texts, and
/// raw JSON output with no surrounding prose or fences.
const SCRIPT_INSTRUCTIONS: &str = r#"You are a comic book writer. Turn the story above into a short comic script.

Produce:
1. "characterDescription": one consolidated description of the main character's appearance (face, hair, clothing, build, palette), detailed enough to draw the same character consistently across separately generated images.
2. "panels": the story broken into 4 to 8 ordered panels. Each panel's "text" is a single short sentence describing one visual moment.

Respond with exactly one raw JSON object of the form
{"characterDescription": "...", "panels": [{"text": "..."}, ...]}
Do not wrap the JSON in markdown code fences and do not add any other text."#;

#[derive(Clone)]
pub struct ScriptGenerator {
    client: TextClient,
}

impl ScriptGenerator {
    pub fn new(client: TextClient) -> Self {
        Self { client }
    }

    /// One non-streaming request to the text model, then parse + validate.
    /// The caller guarantees `story` is not blank.
    pub async fn generate(&self, story: &str) -> Result<ComicScript> {
        let request = TextGenerationRequest {
            prompt: build_prompt(story),
            max_tokens: Some(2048),
            temperature: Some(0.7),
            model_id: None,
        };

        let response = self.client.generate(request).await?;

        if response.text.trim().is_empty() {
            return Err(PanelGenError::ScriptError(
                "model returned an empty script".into(),
            ));
        }

        let script = parse_script(&response.text)?;
        log::info!(
            "Script ready: {} panels, character described in {} characters",
            script.panels.len(),
            script.character_description.len()
        );

        Ok(script)
    }
}

pub fn build_prompt(story: &str) -> String {
    format!("Story:\n{}\n\n{}", story.trim(), SCRIPT_INSTRUCTIONS)
}

/// Parse the model's reply into a validated script. The reply is fenced
/// defensively first, since models routinely ignore the no-markdown rule.
pub fn parse_script(raw: &str) -> Result<ComicScript> {
    let cleaned = strip_code_fences(raw);

    let script: ComicScript = serde_json::from_str(cleaned).map_err(|e| {
        PanelGenError::ScriptError(format!("script is not valid JSON: {} (raw: {})", e, cleaned))
    })?;

    if script.panels.is_empty() {
        return Err(PanelGenError::ScriptError(
            "script contains no panels".into(),
        ));
    }
    if script.character_description.trim().is_empty() {
        return Err(PanelGenError::ScriptError(
            "script is missing a character description".into(),
        ));
    }

    Ok(script)
}

/// Strip leading/trailing markdown code fences, if present.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed);
    trimmed.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"characterDescription":"A red fox in a blue scarf","panels":[{"text":"The fox wakes up."},{"text":"The fox finds a map."}]}"#;

    #[test]
    fn parses_raw_json() {
        let script = parse_script(VALID).unwrap();
        assert_eq!(script.panels.len(), 2);
        assert_eq!(script.character_description, "A red fox in a blue scarf");
        assert_eq!(script.panels[0].text, "The fox wakes up.");
    }

    #[test]
    fn parses_fenced_json_identically() {
        let fenced = format!("```json\n{}\n```", VALID);
        let bare_fence = format!("```\n{}\n```", VALID);

        let from_fenced = parse_script(&fenced).unwrap();
        let from_bare = parse_script(&bare_fence).unwrap();
        let from_raw = parse_script(VALID).unwrap();

        assert_eq!(from_fenced.panels.len(), from_raw.panels.len());
        assert_eq!(from_bare.panels.len(), from_raw.panels.len());
        assert_eq!(
            from_fenced.character_description,
            from_raw.character_description
        );
    }

    #[test]
    fn strip_code_fences_leaves_plain_text_alone() {
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```{}```"), "{}");
    }

    #[test]
    fn rejects_invalid_json() {
        let result = parse_script("this is not json");
        assert!(matches!(result, Err(PanelGenError::ScriptError(_))));
    }

    #[test]
    fn rejects_empty_panel_list() {
        let result = parse_script(r#"{"characterDescription":"A fox","panels":[]}"#);
        assert!(matches!(result, Err(PanelGenError::ScriptError(_))));
    }

    #[test]
    fn rejects_missing_panels_field() {
        let result = parse_script(r#"{"characterDescription":"A fox"}"#);
        assert!(matches!(result, Err(PanelGenError::ScriptError(_))));
    }

    #[test]
    fn rejects_blank_character_description() {
        let result = parse_script(r#"{"characterDescription":"  ","panels":[{"text":"x"}]}"#);
        assert!(matches!(result, Err(PanelGenError::ScriptError(_))));
    }

    #[test]
    fn prompt_embeds_the_story() {
        let prompt = build_prompt("  A fox goes on an adventure.  ");
        assert!(prompt.starts_with("Story:\nA fox goes on an adventure."));
        assert!(prompt.contains("characterDescription"));
    }
}
