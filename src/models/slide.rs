use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Decoded image handle: MIME type plus raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SlideImage {
    /// Re-encode as a `data:` URI suitable for an `<img src>` attribute.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// One finished panel: paired narration text and generated image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub text: String,
    pub image: SlideImage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_round_trips_bytes() {
        let image = SlideImage {
            mime_type: "image/png".to_string(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        };

        let uri = image.data_uri();
        assert!(uri.starts_with("data:image/png;base64,"));

        let payload = uri.rsplit(',').next().unwrap();
        assert_eq!(STANDARD.decode(payload).unwrap(), image.bytes);
    }
}
