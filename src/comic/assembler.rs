use crate::{
    error::{PanelGenError, Result},
    models::{InlineData, Part, Slide, SlideImage},
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Pairing state for one panel's stream: a running text accumulator and
/// the currently held image.
///
/// A slide is emitted the moment both halves are present; partial state
/// stays buffered. Whatever is still unpaired when the stream ends is
/// dropped by the caller, never emitted.
pub struct SlideAssembler {
    text: String,
    image: Option<SlideImage>,
}

impl SlideAssembler {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            image: None,
        }
    }

    /// Feed one part. Text fragments concatenate onto the accumulator;
    /// an inline image replaces any image already held. Returns the
    /// completed slide when the pairing condition fires.
    pub fn push_part(&mut self, part: &Part) -> Result<Option<Slide>> {
        match part {
            Part::Text { text } => self.text.push_str(text),
            Part::InlineData { inline_data } => {
                if self.image.is_some() {
                    log::debug!("replacing held image before pairing");
                }
                self.image = Some(Self::decode(inline_data)?);
            }
        }
        Ok(self.try_emit())
    }

    fn try_emit(&mut self) -> Option<Slide> {
        if self.text.is_empty() {
            return None;
        }
        let image = self.image.take()?;
        Some(Slide {
            text: std::mem::take(&mut self.text),
            image,
        })
    }

    fn decode(inline_data: &InlineData) -> Result<SlideImage> {
        let bytes = STANDARD.decode(inline_data.data.as_bytes()).map_err(|e| {
            PanelGenError::ResponseError(format!("invalid base64 image payload: {}", e))
        })?;

        Ok(SlideImage {
            mime_type: inline_data.mime_type.clone(),
            bytes,
        })
    }

    /// True when unpaired text or an unpaired image is still buffered.
    pub fn has_leftovers(&self) -> bool {
        !self.text.is_empty() || self.image.is_some()
    }
}

impl Default for SlideAssembler {
    fn default() -> Self {
        Self::new()
    }
}
