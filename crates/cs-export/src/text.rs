use std::collections::HashMap;
use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use anyhow::{Context, Result};

use crate::canvas::{AlphaMask, Canvas, Color};

/// Emplacements système essayés quand aucune police n'est configurée.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Alignement d'un libellé par rapport à son point d'ancrage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
}

impl Align {
    fn shift(self, extent: u32) -> i64 {
        match self {
            Self::Start => 0,
            Self::Center => -i64::from(extent / 2),
            Self::End => -i64::from(extent),
        }
    }
}

/// Glyphe rasterisé, positionné relativement à l'origine de la ligne (haut, plume).
struct CachedGlyph {
    left: i32,
    top: i32,
    width: u32,
    height: u32,
    alpha: Vec<u8>,
    advance: f32,
}

/// Rasterise des libellés en masques alpha avec ab_glyph.
///
/// Maintient un cache par (caractère, taille) : les mêmes chiffres et titres
/// reviennent sur chaque figure du lot.
pub struct TextRasterizer {
    font: FontVec,
    glyph_cache: HashMap<(char, u32), CachedGlyph>,
}

impl TextRasterizer {
    /// Charge une police TrueType/OpenType depuis la mémoire.
    ///
    /// # Errors
    /// Retourne une erreur si la police fournie est invalide.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(data).context("Police invalide")?;
        Ok(Self {
            font,
            glyph_cache: HashMap::new(),
        })
    }

    /// Charge une police depuis un fichier.
    ///
    /// # Errors
    /// Retourne une erreur si le fichier est illisible ou n'est pas une police.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Impossible de lire la police {}", path.display()))?;
        Self::from_bytes(data).with_context(|| format!("Police invalide : {}", path.display()))
    }

    /// Police configurée, sinon première police système trouvée.
    ///
    /// Returns `None` (after a warning) when nothing usable exists; figures are
    /// then rendered without text.
    #[must_use]
    pub fn discover(configured: Option<&Path>) -> Option<Self> {
        if let Some(path) = configured {
            match Self::from_file(path) {
                Ok(r) => return Some(r),
                Err(e) => log::warn!("{e:#}"),
            }
        }
        for candidate in FONT_CANDIDATES {
            let path = Path::new(candidate);
            if path.is_file() {
                if let Ok(r) = Self::from_file(path) {
                    log::debug!("Police : {}", path.display());
                    return Some(r);
                }
            }
        }
        log::warn!("Aucune police trouvée : les figures seront rendues sans libellés.");
        None
    }

    fn rasterize(font: &FontVec, ch: char, px: u32) -> CachedGlyph {
        let scale = PxScale::from(px as f32);
        let scaled = font.as_scaled(scale);
        let id = font.glyph_id(ch);
        let advance = scaled.h_advance(id);
        let glyph = id.with_scale_and_position(scale, point(0.0, scaled.ascent()));

        let Some(outline) = font.outline_glyph(glyph) else {
            return CachedGlyph {
                left: 0,
                top: 0,
                width: 0,
                height: 0,
                alpha: Vec::new(),
                advance,
            };
        };

        let bounds = outline.px_bounds();
        let width = bounds.width().max(0.0) as u32;
        let height = bounds.height().max(0.0) as u32;
        let mut alpha = vec![0u8; (width * height) as usize];
        outline.draw(|x, y, v| {
            if x < width && y < height {
                alpha[(y * width + x) as usize] = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            }
        });

        CachedGlyph {
            left: bounds.min.x as i32,
            top: bounds.min.y as i32,
            width,
            height,
            alpha,
            advance,
        }
    }

    fn line_metrics(&self, px: u32) -> (f32, f32) {
        let scaled = self.font.as_scaled(PxScale::from(px as f32));
        (scaled.ascent(), scaled.descent())
    }

    /// Rend `text` en une ligne de hauteur `ascent - descent` à `px` pixels.
    pub fn render(&mut self, text: &str, px: f32) -> AlphaMask {
        let px = px.round().max(1.0) as u32;
        let (ascent, descent) = self.line_metrics(px);
        let height = (ascent - descent).ceil().max(1.0) as u32;

        let mut pen = 0.0f32;
        let mut placed = Vec::with_capacity(text.len());
        for ch in text.chars() {
            placed.push((ch, pen));
            let font = &self.font;
            let glyph = self
                .glyph_cache
                .entry((ch, px))
                .or_insert_with(|| Self::rasterize(font, ch, px));
            pen += glyph.advance;
        }
        let width = pen.ceil().max(1.0) as u32;

        let mut mask = AlphaMask::new(width, height);
        for (ch, pen_x) in placed {
            let Some(glyph) = self.glyph_cache.get(&(ch, px)) else {
                continue;
            };
            let ox = pen_x.round() as i32 + glyph.left;
            let oy = glyph.top;
            for gy in 0..glyph.height {
                for gx in 0..glyph.width {
                    let a = glyph.alpha[(gy * glyph.width + gx) as usize];
                    let x = ox + gx as i32;
                    let y = oy + gy as i32;
                    if a == 0 || x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
                        continue;
                    }
                    let idx = (y as u32 * width + x as u32) as usize;
                    mask.alpha[idx] = mask.alpha[idx].max(a);
                }
            }
        }
        mask
    }

    /// Dessine `text` ancré en `at` selon `(horizontal, vertical)`.
    pub fn draw(
        &mut self,
        canvas: &mut Canvas,
        text: &str,
        at: (f64, f64),
        px: f32,
        color: Color,
        align: (Align, Align),
    ) {
        let mask = self.render(text, px);
        let x = at.0.round() as i64 + align.0.shift(mask.width);
        let y = at.1.round() as i64 + align.1.shift(mask.height);
        canvas.blit_mask(&mask, x, y, color);
    }

    /// Dessine `text` vertical (lu de bas en haut), centré en `at`.
    pub fn draw_vertical(&mut self, canvas: &mut Canvas, text: &str, at: (f64, f64), px: f32, color: Color) {
        let mask = self.render(text, px);
        let x = at.0.round() as i64 - i64::from(mask.height / 2);
        let y = at.1.round() as i64 - i64::from(mask.width / 2);
        canvas.blit_mask_ccw(&mask, x, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{BLACK, WHITE};

    #[test]
    fn garbage_is_not_a_font() {
        assert!(TextRasterizer::from_bytes(b"definitely not a font".to_vec()).is_err());
    }

    #[test]
    fn missing_configured_font_falls_back() {
        // Must not panic whether or not a system font exists.
        let _ = TextRasterizer::discover(Some(Path::new("/nonexistent/font.ttf")));
    }

    #[test]
    fn renders_ink_when_a_font_exists() {
        let Some(mut text) = TextRasterizer::discover(None) else {
            return;
        };
        let short = text.render("0:00", 24.0);
        let long = text.render("10:00", 24.0);
        assert!(long.width > short.width);
        assert!(short.alpha.iter().any(|&a| a > 0));

        let mut canvas = Canvas::new(200, 60, WHITE);
        text.draw(&mut canvas, "Waveform", (100.0, 30.0), 24.0, BLACK, (Align::Center, Align::Center));
        let inked = (0..200)
            .flat_map(|x| (0..60).map(move |y| (x, y)))
            .any(|(x, y)| canvas.pixel(x, y) != WHITE);
        assert!(inked);
    }

    #[test]
    fn alignment_shifts() {
        assert_eq!(Align::Start.shift(10), 0);
        assert_eq!(Align::Center.shift(10), -5);
        assert_eq!(Align::End.shift(10), -10);
    }
}
