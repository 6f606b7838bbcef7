use crate::canvas::Color;

/// Points d'ancrage de la palette "magma" (0.0 → 1.0, pas de 1/8).
const MAGMA: [Color; 9] = [
    (0, 0, 4),
    (28, 16, 68),
    (79, 18, 123),
    (129, 37, 129),
    (181, 54, 122),
    (229, 80, 100),
    (251, 135, 97),
    (254, 194, 135),
    (252, 253, 191),
];

/// Palette séquentielle magma, interpolée linéairement entre ancres.
///
/// `t` est clampé dans `[0, 1]` ; NaN donne la couleur basse.
///
/// # Example
/// ```
/// use cs_export::colormap::magma;
/// assert_eq!(magma(0.0), (0, 0, 4));
/// assert_eq!(magma(1.0), (252, 253, 191));
/// ```
#[must_use]
pub fn magma(t: f32) -> Color {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (MAGMA.len() - 1) as f32;
    let i = (scaled.floor() as usize).min(MAGMA.len() - 2);
    let f = scaled - i as f32;
    let (a, b) = (MAGMA[i], MAGMA[i + 1]);
    let lerp = |x: u8, y: u8| (f32::from(x) + (f32::from(y) - f32::from(x)) * f).round() as u8;
    (lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Normalise `value` dans `[vmin, vmax]` ; plage dégénérée → 0.
#[must_use]
pub fn normalize(value: f32, vmin: f32, vmax: f32) -> f32 {
    let range = vmax - vmin;
    if range.abs() < f32::EPSILON {
        0.0
    } else {
        ((value - vmin) / range).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luminance(c: Color) -> f32 {
        0.2126 * f32::from(c.0) + 0.7152 * f32::from(c.1) + 0.0722 * f32::from(c.2)
    }

    #[test]
    fn magma_brightens_monotonically() {
        let mut last = -1.0;
        for i in 0..=64 {
            let l = luminance(magma(i as f32 / 64.0));
            assert!(l >= last - 0.5, "step {i}: {l} < {last}");
            last = l;
        }
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(magma(-3.0), magma(0.0));
        assert_eq!(magma(7.0), magma(1.0));
        assert_eq!(magma(f32::NAN), magma(0.0));
    }

    #[test]
    fn normalize_handles_degenerate_range() {
        assert!(normalize(5.0, 1.0, 1.0).abs() < f32::EPSILON);
        assert!((normalize(-40.0, -80.0, 0.0) - 0.5).abs() < f32::EPSILON);
    }
}
