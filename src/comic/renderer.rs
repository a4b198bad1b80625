use crate::{
    comic::{ScriptGenerator, SlideAssembler},
    error::{PanelGenError, Result},
    gemini::GeminiClient,
    models::{ComicScript, ImageGenerationRequest, Panel, Slide},
};
use async_trait::async_trait;
use futures::StreamExt;
use uuid::Uuid;

/// Fixed style directive appended to every image prompt so separately
/// generated panels share one look.
pub const STYLE_DIRECTIVE: &str = "Render this panel as vibrant comic book art with bold ink outlines, flat colors and a single clear action. No speech bubbles, no captions, no lettering of any kind inside the image.";

/// Render side effect: invoked once per emitted slide, in emission order.
#[async_trait]
pub trait SlideSink: Send {
    async fn publish(&mut self, index: usize, slide: &Slide);
}

/// Sink that just logs progress; the CLI's default.
pub struct LogSink;

#[async_trait]
impl SlideSink for LogSink {
    async fn publish(&mut self, index: usize, slide: &Slide) {
        log::info!(
            "🖼️  Slide {} ready ({} bytes, {})",
            index + 1,
            slide.image.bytes.len(),
            slide.image.mime_type
        );
    }
}

/// Sink that discards notifications.
pub struct NullSink;

#[async_trait]
impl SlideSink for NullSink {
    async fn publish(&mut self, _index: usize, _slide: &Slide) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    ScriptPending,
    Rendering { panel: usize },
    Done,
    Failed,
}

#[derive(Debug)]
pub enum RunOutcome {
    Done,
    Failed(PanelGenError),
}

/// Everything one `generate` call produced. Slides emitted before a
/// failure are preserved here.
#[derive(Debug)]
pub struct RunReport {
    pub run_id: Uuid,
    pub script: Option<ComicScript>,
    pub slides: Vec<Slide>,
    pub outcome: RunOutcome,
}

impl RunReport {
    pub fn is_done(&self) -> bool {
        matches!(self.outcome, RunOutcome::Done)
    }

    pub fn error(&self) -> Option<&PanelGenError> {
        match &self.outcome {
            RunOutcome::Done => None,
            RunOutcome::Failed(e) => Some(e),
        }
    }
}

/// Drives one story through script generation and the sequential
/// per-panel image loop.
///
/// A run needs `&mut self` for its whole duration, so two runs on the
/// same renderer can never overlap.
pub struct PanelRenderer {
    client: GeminiClient,
    script_generator: ScriptGenerator,
    state: RunState,
}

impl PanelRenderer {
    pub fn new(client: GeminiClient) -> Self {
        let script_generator = ScriptGenerator::new(client.text().clone());
        Self {
            client,
            script_generator,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run the full pipeline for one story. Never panics and never
    /// returns `Err`: failures land in the report's outcome with any
    /// already-rendered slides intact.
    pub async fn generate(&mut self, story: &str, sink: &mut dyn SlideSink) -> RunReport {
        self.state = RunState::Idle;
        let run_id = Uuid::new_v4();
        let mut slides: Vec<Slide> = Vec::new();

        if story.trim().is_empty() {
            log::warn!("Ignoring empty story input");
            self.state = RunState::Failed;
            return RunReport {
                run_id,
                script: None,
                slides,
                outcome: RunOutcome::Failed(PanelGenError::RequestError(
                    "story is empty".into(),
                )),
            };
        }

        log::info!("Starting run {}", run_id);
        let timer = crate::logger::timer("comic generation");

        self.state = RunState::ScriptPending;
        let script = match self.script_generator.generate(story).await {
            Ok(script) => script,
            Err(e) => {
                log::error!("Script generation failed: {}", e);
                self.state = RunState::Failed;
                return RunReport {
                    run_id,
                    script: None,
                    slides,
                    outcome: RunOutcome::Failed(e),
                };
            }
        };

        let total = script.panels.len();
        for index in 0..total {
            self.state = RunState::Rendering { panel: index };
            let panel = &script.panels[index];
            log::info!("Rendering panel {}/{}: {}", index + 1, total, panel.text);

            if let Err(e) = self
                .render_panel(index, panel, &script.character_description, sink, &mut slides)
                .await
            {
                log::error!("{}", e);
                self.state = RunState::Failed;
                return RunReport {
                    run_id,
                    script: Some(script),
                    slides,
                    outcome: RunOutcome::Failed(e),
                };
            }
        }

        timer.stop();
        self.state = RunState::Done;
        log::info!("Run {} complete: {} slides", run_id, slides.len());

        RunReport {
            run_id,
            script: Some(script),
            slides,
            outcome: RunOutcome::Done,
        }
    }

    /// One panel: a single streaming image request demultiplexed into
    /// slides, with assembler buffers scoped to this panel only.
    async fn render_panel(
        &self,
        index: usize,
        panel: &Panel,
        character_description: &str,
        sink: &mut dyn SlideSink,
        slides: &mut Vec<Slide>,
    ) -> Result<()> {
        let request = ImageGenerationRequest {
            prompt: build_image_prompt(&panel.text, character_description),
            model_id: None,
        };

        let mut stream = self
            .client
            .image()
            .generate_stream(request)
            .await
            .map_err(|e| panel_failure(index, panel, e))?;

        let mut assembler = SlideAssembler::new();
        let mut produced = 0usize;

        while let Some(item) = stream.next().await {
            let chunk = item.map_err(|e| panel_failure(index, panel, e))?;
            for part in chunk.parts() {
                if let Some(slide) = assembler
                    .push_part(part)
                    .map_err(|e| panel_failure(index, panel, e))?
                {
                    sink.publish(slides.len(), &slide).await;
                    slides.push(slide);
                    produced += 1;
                }
            }
        }

        if assembler.has_leftovers() {
            log::debug!(
                "Panel {}: discarding unpaired fragment at end of stream",
                index + 1
            );
        }

        if produced == 0 {
            return Err(PanelGenError::PanelError {
                panel: index,
                text: panel.text.clone(),
                detail: "stream ended without producing an image".into(),
            });
        }

        Ok(())
    }
}

fn panel_failure(index: usize, panel: &Panel, source: PanelGenError) -> PanelGenError {
    PanelGenError::PanelError {
        panel: index,
        text: panel.text.clone(),
        detail: source.to_string(),
    }
}

pub fn build_image_prompt(panel_text: &str, character_description: &str) -> String {
    format!(
        "{}\n\nThe main character looks like this: {}\n\n{}",
        panel_text, character_description, STYLE_DIRECTIVE
    )
}
