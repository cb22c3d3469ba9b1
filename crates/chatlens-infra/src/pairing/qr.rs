//! QR code renderer producing `data:` URL SVG images.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use qrcode::QrCode;
use qrcode::render::svg;

use chatlens_core::session::PairingRenderer;
use chatlens_types::error::RenderError;

const DATA_URL_PREFIX: &str = "data:image/svg+xml;base64,";

/// Renders pairing codes as base64 SVG data URLs that browsers can show
/// directly in an `<img>` tag.
#[derive(Debug, Clone, Copy)]
pub struct QrSvgRenderer {
    min_size: u32,
}

impl QrSvgRenderer {
    pub fn new(min_size: u32) -> Self {
        Self { min_size }
    }
}

impl Default for QrSvgRenderer {
    fn default() -> Self {
        Self::new(256)
    }
}

impl PairingRenderer for QrSvgRenderer {
    fn render(&self, raw: &str) -> Result<String, RenderError> {
        let code = QrCode::new(raw.as_bytes()).map_err(|e| RenderError::Encode(e.to_string()))?;
        let image = code
            .render::<svg::Color>()
            .min_dimensions(self.min_size, self.min_size)
            .build();

        Ok(format!("{DATA_URL_PREFIX}{}", STANDARD.encode(image)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(data_url: &str) -> String {
        let payload = data_url.strip_prefix(DATA_URL_PREFIX).unwrap();
        String::from_utf8(STANDARD.decode(payload).unwrap()).unwrap()
    }

    #[test]
    fn renders_svg_data_url() {
        let url = QrSvgRenderer::default()
            .render("2@Jx8pQ,Bf3kL0=,wXyZ==")
            .unwrap();

        assert!(url.starts_with("data:image/svg+xml;base64,"));
        let svg = decode(&url);
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn same_code_renders_identically() {
        let renderer = QrSvgRenderer::default();
        assert_eq!(renderer.render("abc").unwrap(), renderer.render("abc").unwrap());
        assert_ne!(renderer.render("abc").unwrap(), renderer.render("abd").unwrap());
    }

    #[test]
    fn oversized_code_is_encode_error() {
        let raw = "x".repeat(4000);
        assert!(matches!(
            QrSvgRenderer::default().render(&raw),
            Err(RenderError::Encode(_))
        ));
    }
}
