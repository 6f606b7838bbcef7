use image::{Rgb, RgbImage};

/// Couleur RGB 8 bits.
pub type Color = (u8, u8, u8);

pub const WHITE: Color = (255, 255, 255);
pub const BLACK: Color = (0, 0, 0);

/// Rectangle de pixels `[x0, x1) × [y0, y1)` dans lequel une série est tracée.
///
/// # Example
/// ```
/// use cs_export::canvas::PlotArea;
/// let area = PlotArea { x0: 10, y0: 0, x1: 110, y1: 50 };
/// assert_eq!(area.x_at(0.0), 10.0);
/// assert_eq!(area.x_at(1.0), 110.0);
/// assert_eq!(area.y_at(0.0), 50.0); // bottom
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlotArea {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PlotArea {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    /// Pixel x for a horizontal fraction in `[0, 1]`.
    #[must_use]
    pub fn x_at(&self, fraction: f64) -> f64 {
        f64::from(self.x0) + fraction * f64::from(self.width())
    }

    /// Pixel y for a vertical fraction in `[0, 1]`, 0 at the bottom.
    #[must_use]
    pub fn y_at(&self, fraction: f64) -> f64 {
        f64::from(self.y1) - fraction * f64::from(self.height())
    }
}

/// Masque alpha 8 bits (texte rasterisé).
#[derive(Clone, Debug, Default)]
pub struct AlphaMask {
    pub width: u32,
    pub height: u32,
    pub alpha: Vec<u8>,
}

impl AlphaMask {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; (width * height) as usize],
        }
    }

    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.alpha[(y * self.width + x) as usize]
    }
}

/// Surface de dessin RGB : primitives clippées sur les bords de l'image.
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    #[must_use]
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        let (r, g, b) = background;
        Self {
            image: RgbImage::from_pixel(width, height, Rgb([r, g, b])),
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let Rgb([r, g, b]) = *self.image.get_pixel(x, y);
        (r, g, b)
    }

    #[must_use]
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    #[inline]
    pub fn put(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return;
        }
        let (r, g, b) = color;
        self.image.put_pixel(x as u32, y as u32, Rgb([r, g, b]));
    }

    /// Mélange `color` sur le pixel existant avec une opacité `alpha` ∈ [0, 1].
    #[inline]
    pub fn blend(&mut self, x: i64, y: i64, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let px = self.image.get_pixel_mut(x as u32, y as u32);
        let mix = |dst: u8, src: u8| (f32::from(src) * a + f32::from(dst) * (1.0 - a)).round() as u8;
        px.0 = [mix(px.0[0], color.0), mix(px.0[1], color.1), mix(px.0[2], color.2)];
    }

    /// Rectangle plein `[x0, x1) × [y0, y1)`.
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Color) {
        let x0 = x0.max(0);
        let y0 = y0.max(0);
        let x1 = x1.min(i64::from(self.width()));
        let y1 = y1.min(i64::from(self.height()));
        for y in y0..y1 {
            for x in x0..x1 {
                self.put(x, y, color);
            }
        }
    }

    /// Segment vertical inclusif, épaisseur 1.
    pub fn vline(&mut self, x: i64, y0: i64, y1: i64, color: Color) {
        let (a, b) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        for y in a..=b {
            self.put(x, y, color);
        }
    }

    /// Segment horizontal inclusif, épaisseur 1.
    pub fn hline(&mut self, x0: i64, x1: i64, y: i64, color: Color) {
        let (a, b) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        for x in a..=b {
            self.put(x, y, color);
        }
    }

    /// Segment quelconque (Bresenham) d'épaisseur `thickness` pixels.
    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, thickness: u32) {
        let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
        let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let half = i64::from(thickness.max(1)) / 2;
        let extra = i64::from(thickness.max(1)) - half;

        loop {
            for oy in -half..extra {
                for ox in -half..extra {
                    self.put(x0 + ox, y0 + oy, color);
                }
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Contour d'un rectangle de tracé, à l'extérieur de la zone.
    pub fn frame(&mut self, area: &PlotArea, color: Color, thickness: u32) {
        let t = i64::from(thickness.max(1));
        let (x0, y0) = (i64::from(area.x0), i64::from(area.y0));
        let (x1, y1) = (i64::from(area.x1), i64::from(area.y1));
        self.fill_rect(x0 - t, y0 - t, x1 + t, y0, color);
        self.fill_rect(x0 - t, y1, x1 + t, y1 + t, color);
        self.fill_rect(x0 - t, y0, x0, y1, color);
        self.fill_rect(x1, y0, x1 + t, y1, color);
    }

    /// Applique un masque alpha avec son coin haut-gauche en `(x, y)`.
    pub fn blit_mask(&mut self, mask: &AlphaMask, x: i64, y: i64, color: Color) {
        for my in 0..mask.height {
            for mx in 0..mask.width {
                let a = mask.get(mx, my);
                if a > 0 {
                    self.blend(x + i64::from(mx), y + i64::from(my), color, f32::from(a) / 255.0);
                }
            }
        }
    }

    /// Applique un masque tourné de 90° dans le sens anti-horaire (texte vertical).
    ///
    /// The rotated mask is `mask.height` wide and `mask.width` tall.
    pub fn blit_mask_ccw(&mut self, mask: &AlphaMask, x: i64, y: i64, color: Color) {
        for my in 0..mask.height {
            for mx in 0..mask.width {
                let a = mask.get(mx, my);
                if a > 0 {
                    let rx = i64::from(my);
                    let ry = i64::from(mask.width - 1 - mx);
                    self.blend(x + rx, y + ry, color, f32::from(a) / 255.0);
                }
            }
        }
    }
}
