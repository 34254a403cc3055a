//! QR code vector rendering.
//!
//! Encodes text into a QR symbol and describes it as an SVG document: a
//! background square covering symbol and margin, then one path with
//! a sub-path per horizontal run of dark modules. One SVG user unit equals
//! one module.

use std::fmt;
use std::str::FromStr;

use qrcode::{Color as ModuleColor, EcLevel, QrCode};

use crate::error::QrError;

/// Default quiet zone around the symbol, in modules.
pub const DEFAULT_MARGIN: u32 = 2;

// =============================================================================
// Colors
// =============================================================================

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(0xff, 0xff, 0xff);
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// `#rrggbb`, without the alpha channel.
    pub fn hex_rgb(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as an SVG opacity in `0..=1`.
    pub fn opacity(&self) -> f32 {
        f32::from(self.a) / 255.0
    }

    /// Fill attributes for an SVG element.
    fn svg_fill(&self) -> String {
        if self.a == 0xff {
            format!(r#"fill="{}""#, self.hex_rgb())
        } else {
            format!(
                r#"fill="{}" fill-opacity="{}""#,
                self.hex_rgb(),
                self.opacity()
            )
        }
    }
}

/// Foreground (dark modules) and background colors of a QR image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub foreground: Rgba,
    pub background: Rgba,
}

/// Color preset selected by the `mode` request parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QrMode {
    /// Black modules on a transparent background
    #[default]
    Black,
    /// White modules on a transparent background, for dark surfaces
    White,
}

impl QrMode {
    /// Interpret a `mode` parameter. Only `"white"` selects [`QrMode::White`];
    /// anything else, including no value, is [`QrMode::Black`].
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("white") => QrMode::White,
            _ => QrMode::Black,
        }
    }

    pub fn color_scheme(&self) -> ColorScheme {
        match self {
            QrMode::Black => ColorScheme {
                foreground: Rgba::BLACK,
                background: Rgba::TRANSPARENT,
            },
            QrMode::White => ColorScheme {
                foreground: Rgba::WHITE,
                background: Rgba::TRANSPARENT,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QrMode::Black => "black",
            QrMode::White => "white",
        }
    }
}

// =============================================================================
// Error Correction
// =============================================================================

/// QR error correction level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorCorrection {
    /// ~7% recovery, largest capacity
    #[default]
    Low,
    /// ~15% recovery
    Medium,
    /// ~25% recovery
    Quartile,
    /// ~30% recovery
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

impl FromStr for ErrorCorrection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "L" | "LOW" => Ok(ErrorCorrection::Low),
            "M" | "MEDIUM" => Ok(ErrorCorrection::Medium),
            "Q" | "QUARTILE" => Ok(ErrorCorrection::Quartile),
            "H" | "HIGH" => Ok(ErrorCorrection::High),
            other => Err(format!(
                "unknown error correction level '{}' (expected L, M, Q or H)",
                other
            )),
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            ErrorCorrection::Low => "L",
            ErrorCorrection::Medium => "M",
            ErrorCorrection::Quartile => "Q",
            ErrorCorrection::High => "H",
        };
        f.write_str(letter)
    }
}

// =============================================================================
// SVG Rendering
// =============================================================================

/// Options for [`render_svg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SvgOptions {
    pub colors: ColorScheme,
    pub margin: u32,
    pub error_correction: ErrorCorrection,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            colors: QrMode::Black.color_scheme(),
            margin: DEFAULT_MARGIN,
            error_correction: ErrorCorrection::Low,
        }
    }
}

/// Encode `text` as a QR code and render it as an SVG document.
///
/// Fails with [`QrError::Encode`] if the text exceeds the capacity of the
/// largest symbol at the requested error correction level.
pub fn render_svg(text: &str, options: &SvgOptions) -> Result<String, QrError> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), options.error_correction.into())
        .map_err(|e| QrError::Encode(e.to_string()))?;

    let width = code.width();
    let modules = code.to_colors();
    let margin = options.margin as usize;
    let size = width + 2 * margin;

    let mut svg = String::with_capacity(256 + modules.len() * 4);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}" shape-rendering="crispEdges">"#
    ));
    svg.push_str(&format!(
        r#"<path {} d="M0 0h{size}v{size}H0z"/>"#,
        options.colors.background.svg_fill()
    ));

    svg.push_str(&format!(r#"<path {} d=""#, options.colors.foreground.svg_fill()));
    for y in 0..width {
        let row = &modules[y * width..(y + 1) * width];
        let mut x = 0;
        while x < width {
            if row[x] != ModuleColor::Dark {
                x += 1;
                continue;
            }
            let start = x;
            while x < width && row[x] == ModuleColor::Dark {
                x += 1;
            }
            svg.push_str(&format!(
                "M{} {}h{}v1h-{}z",
                start + margin,
                y + margin,
                x - start,
                x - start
            ));
        }
    }
    svg.push_str(r#""/></svg>"#);

    Ok(svg)
}

/// Number of modules per side of the rendered SVG, margin included.
pub fn svg_module_count(text: &str, options: &SvgOptions) -> Result<usize, QrError> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), options.error_correction.into())
        .map_err(|e| QrError::Encode(e.to_string()))?;
    Ok(code.width() + 2 * options.margin as usize)
}

// =============================================================================
// Tests
// =============================================================================
