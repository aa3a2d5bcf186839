//! QR code rendering into PNG bytes

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};
use serde::{Deserialize, Serialize};

use crate::application::errors::QrError;
use crate::domain::entities::{ColorChoice, Rgb};

/// Largest accepted pixels-per-module
pub const MAX_BOX_SIZE: u32 = 20;
/// Largest accepted quiet zone, in modules
pub const MAX_BORDER: u32 = 10;

/// Error correction level, as written in config files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    Low,
    Medium,
    Quartile,
    High,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

/// Geometry and redundancy of rendered codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrStyle {
    /// Pixels per module
    pub box_size: u32,
    /// Quiet zone width in modules
    pub border: u32,
    pub error_correction: ErrorCorrection,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            box_size: 10,
            border: 4,
            error_correction: ErrorCorrection::High,
        }
    }
}

/// Renders payloads into PNG images
#[derive(Debug, Clone, Default)]
pub struct QrRenderer {
    style: QrStyle,
}

impl QrRenderer {
    pub fn new(style: QrStyle) -> Self {
        Self { style }
    }

    /// Render `data` with the given colors into an RGBA PNG.
    ///
    /// Colors are validated before anything is encoded.
    pub fn render(&self, data: &str, colors: &ColorChoice) -> Result<Vec<u8>, QrError> {
        let fill = Rgb::parse(&colors.fill)?;
        let background = Rgb::parse(&colors.background)?;

        if data.is_empty() {
            return Err(QrError::EmptyPayload);
        }

        let level: EcLevel = self.style.error_correction.into();
        let code = QrCode::with_error_correction_level(data.as_bytes(), level)
            .map_err(|e| QrError::Encode(e.to_string()))?;

        let image = self.paint(&code, fill, background)?;
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| QrError::Image(e.to_string()))?;

        tracing::debug!(
            "Rendered {}x{} module code into {} bytes",
            code.width(),
            code.width(),
            png.len()
        );
        Ok(png)
    }

    fn paint(&self, code: &QrCode, fill: Rgb, background: Rgb) -> Result<RgbaImage, QrError> {
        let modules = code.width() as u32;
        let QrStyle { box_size, border, .. } = self.style;
        if box_size == 0 || box_size > MAX_BOX_SIZE || border > MAX_BORDER {
            return Err(QrError::Image(format!(
                "unsupported geometry: box size {}, border {}",
                box_size, border
            )));
        }
        let side = (modules + 2 * border) * box_size;

        let mut image = RgbaImage::from_pixel(side, side, Rgba(background.to_rgba()));
        let dark = Rgba(fill.to_rgba());

        for (index, color) in code.to_colors().into_iter().enumerate() {
            if color != Color::Dark {
                continue;
            }
            let col = index as u32 % modules;
            let row = index as u32 / modules;
            let x0 = (col + border) * box_size;
            let y0 = (row + border) * box_size;
            for y in y0..y0 + box_size {
                for x in x0..x0 + box_size {
                    image.put_pixel(x, y, dark);
                }
            }
        }

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(png: &[u8]) -> RgbaImage {
        image::load_from_memory_with_format(png, ImageFormat::Png)
            .unwrap()
            .to_rgba8()
    }

    #[test]
    fn renders_version_one_with_default_geometry() {
        let png = QrRenderer::default()
            .render("hi", &ColorChoice::default())
            .unwrap();
        let image = decode(&png);
        // 21 modules + 2 * 4 border, 10 px each
        assert_eq!(image.dimensions(), (290, 290));
    }

    #[test]
    fn uses_requested_colors() {
        let colors = ColorChoice::new("red", "#0000ff");
        let png = QrRenderer::default().render("hi", &colors).unwrap();
        let image = decode(&png);
        // Corner is quiet zone, the finder pattern starts right after the border
        assert_eq!(image.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(image.get_pixel(40, 40), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn grows_version_for_longer_payloads() {
        let png = QrRenderer::default()
            .render(&"x".repeat(200), &ColorChoice::default())
            .unwrap();
        assert!(decode(&png).width() > 290);
    }

    #[test]
    fn custom_geometry() {
        let style = QrStyle {
            box_size: 2,
            border: 1,
            error_correction: ErrorCorrection::Low,
        };
        let png = QrRenderer::new(style).render("hi", &ColorChoice::default()).unwrap();
        assert_eq!(decode(&png).dimensions(), (46, 46));
    }

    #[test]
    fn rejects_invalid_colors_and_empty_payloads() {
        let renderer = QrRenderer::default();
        assert_eq!(
            renderer.render("hi", &ColorChoice::new("nope", "white")),
            Err(QrError::InvalidColor("nope".to_string()))
        );
        assert_eq!(
            renderer.render("", &ColorChoice::default()),
            Err(QrError::EmptyPayload)
        );
    }

    #[test]
    fn rejects_unsupported_geometry() {
        let style = QrStyle {
            box_size: u32::MAX,
            border: 4,
            error_correction: ErrorCorrection::High,
        };
        let result = QrRenderer::new(style).render("hi", &ColorChoice::default());
        assert!(matches!(result, Err(QrError::Image(_))));
    }

    #[test]
    fn rejects_oversized_payloads() {
        let result = QrRenderer::default().render(&"x".repeat(5000), &ColorChoice::default());
        assert!(matches!(result, Err(QrError::Encode(_))));
    }
}
