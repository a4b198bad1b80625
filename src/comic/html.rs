use crate::{
    error::{PanelGenError, Result},
    models::Slide,
};
use std::fs;
use std::path::Path;

/// Render the slide list as a self-contained slideshow page. Panel text
/// is HTML-escaped; images are embedded as base64 data URIs.
pub fn render_page(title: &str, slides: &[Slide]) -> String {
    let mut body = String::new();

    for (index, slide) in slides.iter().enumerate() {
        body.push_str(&format!(
            "    <figure class=\"panel\" id=\"panel-{}\">\n      <img src=\"{}\" alt=\"Panel {}\">\n      <figcaption>{}</figcaption>\n    </figure>\n",
            index + 1,
            slide.image.data_uri(),
            index + 1,
            escape_html(&slide.text)
        ));
    }

    if slides.is_empty() {
        body.push_str("    <p class=\"empty\">No panels were rendered.</p>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  <title>{title}</title>\n  <style>\n    body {{ font-family: sans-serif; background: #111; color: #eee; margin: 0 auto; max-width: 720px; padding: 2rem; }}\n    .panel {{ margin: 0 0 2rem; }}\n    .panel img {{ width: 100%; border-radius: 8px; }}\n    .panel figcaption {{ margin-top: 0.5rem; line-height: 1.4; }}\n  </style>\n</head>\n<body>\n  <h1>{title}</h1>\n  <main>\n{body}  </main>\n</body>\n</html>\n",
        title = escape_html(title),
        body = body
    )
}

pub fn write_slideshow(path: &Path, title: &str, slides: &[Slide]) -> Result<()> {
    let page = render_page(title, slides);
    fs::write(path, page)
        .map_err(|e| PanelGenError::InternalError(format!("failed to write slideshow: {}", e)))?;

    log::info!("💾 Slideshow written to {}", path.display());
    Ok(())
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
