use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use qrcode::render::svg;
use qrcode::QrCode;
use thiserror::Error;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("failed to encode payload as qr code: {0}")]
    Encode(String),
}

/// Turns a string into a scannable code image.
///
/// Implementations are pure: the same payload always yields the same image.
pub trait CodeRenderer: Send + Sync + 'static {
    /// Renders `payload` and returns the image as a `data:` URI.
    fn render(&self, payload: &str) -> Result<String, RenderError>;
}

/// Renders QR codes as SVG, returned as a base64 `data:image/svg+xml` URI.
#[derive(Debug, Clone, TypedBuilder)]
pub struct SvgQrRenderer {
    /// Minimum width and height of the image, in pixels.
    #[builder(default = 240)]
    min_dimension: u32,
    #[builder(default = "#000000")]
    dark_color: &'static str,
    #[builder(default = "#ffffff")]
    light_color: &'static str,
}

impl Default for SvgQrRenderer {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CodeRenderer for SvgQrRenderer {
    fn render(&self, payload: &str) -> Result<String, RenderError> {
        let code =
            QrCode::new(payload.as_bytes()).map_err(|e| RenderError::Encode(e.to_string()))?;

        let image = code
            .render::<svg::Color<'_>>()
            .min_dimensions(self.min_dimension, self.min_dimension)
            .dark_color(svg::Color(self.dark_color))
            .light_color(svg::Color(self.light_color))
            .build();

        Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(image)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "data:image/svg+xml;base64,";

    #[test]
    fn renders_svg_data_uri() {
        let uri = SvgQrRenderer::default()
            .render("http://qr.test/r/Ab3xYz")
            .unwrap();

        let encoded = uri.strip_prefix(PREFIX).expect("data uri prefix");
        let svg = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = SvgQrRenderer::default();

        assert_eq!(
            renderer.render("http://qr.test/r/Ab3xYz").unwrap(),
            renderer.render("http://qr.test/r/Ab3xYz").unwrap()
        );
        assert_ne!(
            renderer.render("http://qr.test/r/Ab3xYz").unwrap(),
            renderer.render("http://qr.test/r/Zz9yXw").unwrap()
        );
    }

    #[test]
    fn oversized_payload_fails() {
        let err = SvgQrRenderer::default()
            .render(&"a".repeat(8000))
            .unwrap_err();
        assert!(matches!(err, RenderError::Encode(_)));
    }
}
