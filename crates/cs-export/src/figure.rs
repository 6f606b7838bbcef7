//! Figure d'analyse à trois panneaux empilés : waveform, spectrogramme, RMS.
//!
//! Les trois panneaux partagent la même plage x `[offset, offset + durée]`
//! et les mêmes cinq graduations `m:ss` sur la timeline globale.

use cs_audio::analysis::Analysis;
use cs_core::axis::TimeAxis;
use cs_core::config::ToolConfig;
use image::RgbImage;

use crate::canvas::{BLACK, Canvas, Color, PlotArea, WHITE};
use crate::colormap::{magma, normalize};
use crate::text::{Align, TextRasterizer};

/// Couleur de tracé par défaut (bleu "tab:blue").
const LINE_COLOR: Color = (31, 119, 180);
const GRID_COLOR: Color = (60, 60, 60);

// Mise en page, en points typographiques (1 pt = dpi / 72 px).
const MARGIN_TOP_PT: f64 = 8.0;
const MARGIN_BOTTOM_PT: f64 = 6.0;
const MARGIN_LEFT_PT: f64 = 62.0;
const MARGIN_RIGHT_PT: f64 = 14.0;
const TITLE_PT: f64 = 24.0;
const XTICKS_PT: f64 = 34.0;
const COLORBAR_GAP_PT: f64 = 12.0;
const COLORBAR_WIDTH_PT: f64 = 14.0;
const COLORBAR_LABELS_PT: f64 = 48.0;

const TITLE_FONT_PT: f64 = 12.0;
const LABEL_FONT_PT: f64 = 10.0;
const TICK_LEN_PT: f64 = 3.5;
const LINE_WIDTH_PT: f64 = 0.8;

/// Dimensions de la figure en pixels et résolution.
///
/// # Example
/// ```
/// use cs_core::config::ToolConfig;
/// use cs_export::figure::FigureStyle;
/// let style = FigureStyle::from_config(&ToolConfig::default());
/// assert_eq!((style.width_px, style.height_px, style.dpi), (3600, 4500, 300));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FigureStyle {
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: u32,
}

/// Zones de tracé de chaque panneau.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FigureLayout {
    pub waveform: PlotArea,
    pub spectrogram: PlotArea,
    pub colorbar: PlotArea,
    pub rms: PlotArea,
}

impl FigureStyle {
    #[must_use]
    pub fn from_config(config: &ToolConfig) -> Self {
        let (width_px, height_px) = config.figure_size_px();
        Self {
            width_px,
            height_px,
            dpi: config.dpi,
        }
    }

    /// Points → pixels.
    #[must_use]
    pub fn pt(&self, points: f64) -> f64 {
        points * f64::from(self.dpi) / 72.0
    }

    fn pt_px(&self, points: f64) -> u32 {
        self.pt(points).round().max(1.0) as u32
    }

    /// Découpe la figure en trois rangées de même hauteur.
    ///
    /// The spectrogram row gives up room on its right for the colour bar.
    #[must_use]
    pub fn layout(&self) -> FigureLayout {
        let w = f64::from(self.width_px);
        let h = f64::from(self.height_px);
        let top = self.pt(MARGIN_TOP_PT);
        let row_h = ((h - top - self.pt(MARGIN_BOTTOM_PT)) / 3.0).max(3.0);

        let x0 = self.pt(MARGIN_LEFT_PT).min(w / 3.0);
        let x1 = (w - self.pt(MARGIN_RIGHT_PT)).max(x0 + 1.0);

        let row = |i: f64, x1: f64| {
            let y_top = top + row_h * i;
            let y0 = (y_top + self.pt(TITLE_PT)).min(y_top + row_h / 3.0);
            let y1 = (y_top + row_h - self.pt(XTICKS_PT)).max(y0 + 1.0);
            PlotArea {
                x0: x0.round() as u32,
                y0: y0.round() as u32,
                x1: x1.round() as u32,
                y1: y1.round() as u32,
            }
        };

        let cb_reserved = self.pt(COLORBAR_GAP_PT + COLORBAR_WIDTH_PT + COLORBAR_LABELS_PT);
        let spec_x1 = (x1 - cb_reserved).max(x0 + 1.0);
        let spectrogram = row(1.0, spec_x1);
        let cb_x0 = spec_x1 + self.pt(COLORBAR_GAP_PT);
        let colorbar = PlotArea {
            x0: cb_x0.round() as u32,
            y0: spectrogram.y0,
            x1: (cb_x0 + self.pt(COLORBAR_WIDTH_PT)).round() as u32,
            y1: spectrogram.y1,
        };

        FigureLayout {
            waveform: row(0.0, x1),
            spectrogram,
            colorbar,
            rms: row(2.0, x1),
        }
    }
}

/// Pas "rond" (1, 2, 2.5, 5 × 10^k) donnant au plus `max_ticks` graduations.
///
/// # Example
/// ```
/// use cs_export::figure::nice_ticks;
/// assert_eq!(nice_ticks(-80.0, 0.0, 9), vec![-80.0, -70.0, -60.0, -50.0, -40.0, -30.0, -20.0, -10.0, 0.0]);
/// ```
#[must_use]
pub fn nice_ticks(lo: f64, hi: f64, max_ticks: usize) -> Vec<f64> {
    if !(lo.is_finite() && hi.is_finite()) || hi <= lo || max_ticks < 2 {
        return if lo.is_finite() { vec![lo] } else { Vec::new() };
    }
    let raw = (hi - lo) / (max_ticks - 1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw * (1.0 - 1e-9))
        .unwrap_or(10.0 * magnitude);

    let first = (lo / step - 1e-9).ceil() as i64;
    let last = (hi / step + 1e-9).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Libellé de graduation de la barre de couleur : `+0 dB`, `-20 dB`…
///
/// # Example
/// ```
/// use cs_export::figure::format_db;
/// assert_eq!(format_db(0.0), "+0 dB");
/// assert_eq!(format_db(-0.0), "+0 dB");
/// assert_eq!(format_db(-40.0), "-40 dB");
/// ```
#[must_use]
pub fn format_db(value: f64) -> String {
    // -0.0 + 0.0 == +0.0
    format!("{:+.0} dB", value + 0.0)
}

fn decimals_for(step: f64) -> usize {
    if step <= 0.0 || !step.is_finite() {
        return 0;
    }
    (-step.log10().floor()).max(0.0) as usize
}

fn format_linear(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value + 0.0)
}

/// Axe vertical d'un panneau : linéaire ou log10.
#[derive(Clone, Copy, Debug)]
enum YScale {
    Linear { lo: f64, hi: f64 },
    Log { lo: f64, hi: f64 },
}

impl YScale {
    fn fraction(self, v: f64) -> Option<f64> {
        match self {
            Self::Linear { lo, hi } => Some(normalize(v as f32, lo as f32, hi as f32).into()),
            Self::Log { lo, hi } => {
                if v <= 0.0 {
                    return None;
                }
                let range = hi - lo;
                Some(if range.abs() < f64::EPSILON {
                    0.5
                } else {
                    ((v.log10() - lo) / range).clamp(0.0, 1.0)
                })
            }
        }
    }
}

fn waveform_scale(samples: &[f32]) -> YScale {
    let (min, max) = samples
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &s| (lo.min(s), hi.max(s)));
    if !min.is_finite() || !max.is_finite() || (max - min).abs() < f32::EPSILON {
        let center = if min.is_finite() { f64::from(min) } else { 0.0 };
        return YScale::Linear {
            lo: center - 1.0,
            hi: center + 1.0,
        };
    }
    let margin = f64::from(max - min) * 0.05;
    YScale::Linear {
        lo: f64::from(min) - margin,
        hi: f64::from(max) + margin,
    }
}

fn rms_scale(rms: &[f32]) -> YScale {
    let (min, max) = rms
        .iter()
        .filter(|v| **v > 0.0 && v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(f64::from(v)), hi.max(f64::from(v)))
        });
    if !min.is_finite() {
        return YScale::Log { lo: -5.0, hi: 0.0 };
    }
    let (lo, hi) = (min.log10(), max.log10());
    let span = hi - lo;
    if span < 1e-6 {
        return YScale::Log {
            lo: lo - 0.5,
            hi: hi + 0.5,
        };
    }
    YScale::Log {
        lo: lo - span * 0.05,
        hi: hi + span * 0.05,
    }
}

fn x_of(area: &PlotArea, axis: &TimeAxis, t: f64) -> f64 {
    area.x_at(axis.fraction(t))
}

fn draw_waveform(canvas: &mut Canvas, area: &PlotArea, analysis: &Analysis, scale: YScale) {
    let samples = &analysis.waveform;
    let n = samples.len();
    let w = area.width();
    if n == 0 || w == 0 {
        return;
    }
    let last = (n - 1) as f64;
    let mut prev_end = 0usize;

    // Une colonne de pixels = enveloppe min/max des échantillons qu'elle couvre.
    for c in 0..w {
        let end = ((f64::from(c + 1) / f64::from(w)) * last).floor() as usize;
        let start = prev_end.min(end);
        let (lo, hi) = samples[start..=end.min(n - 1)]
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &s| (lo.min(s), hi.max(s)));
        prev_end = end;

        let (Some(f_lo), Some(f_hi)) = (scale.fraction(f64::from(lo)), scale.fraction(f64::from(hi)))
        else {
            continue;
        };
        let x = i64::from(area.x0 + c);
        canvas.vline(x, area.y_at(f_lo).round() as i64, area.y_at(f_hi).round() as i64, LINE_COLOR);
    }
}

fn draw_spectrogram(canvas: &mut Canvas, area: &PlotArea, analysis: &Analysis) -> (f32, f32) {
    let spec = &analysis.spectrogram_db;
    let vmin = spec.min().unwrap_or(-analysis.top_db);
    let vmax = spec.max().unwrap_or(0.0);
    if spec.n_frames == 0 || spec.n_bins == 0 || area.width() == 0 || area.height() == 0 {
        return (vmin, vmax);
    }

    let axis = &analysis.axis;
    let hop_secs = analysis.hop_secs();
    let frames: Vec<usize> = (0..area.width())
        .map(|c| {
            let t = axis.start + axis.span() * (f64::from(c) + 0.5) / f64::from(area.width());
            let rel = if hop_secs > 0.0 { (t - analysis.offset_secs) / hop_secs } else { 0.0 };
            (rel.round().max(0.0) as usize).min(spec.n_frames - 1)
        })
        .collect();
    let bins: Vec<usize> = (0..area.height())
        .map(|r| {
            let frac = 1.0 - (f64::from(r) + 0.5) / f64::from(area.height());
            ((frac * (spec.n_bins - 1) as f64).round() as usize).min(spec.n_bins - 1)
        })
        .collect();

    for (r, &bin) in bins.iter().enumerate() {
        let y = i64::from(area.y0) + r as i64;
        for (c, &frame) in frames.iter().enumerate() {
            let color = magma(normalize(spec.get(frame, bin), vmin, vmax));
            canvas.put(i64::from(area.x0) + c as i64, y, color);
        }
    }
    (vmin, vmax)
}

/// Dégradé vertical : vmin en bas, vmax en haut.
fn draw_colorbar(canvas: &mut Canvas, area: &PlotArea) {
    let h = area.height();
    for r in 0..h {
        let frac = 1.0 - (f64::from(r) + 0.5) / f64::from(h.max(1));
        let y = i64::from(area.y0 + r);
        canvas.hline(i64::from(area.x0), i64::from(area.x1) - 1, y, magma(frac as f32));
    }
}

fn draw_rms(canvas: &mut Canvas, area: &PlotArea, analysis: &Analysis, scale: YScale, thickness: u32) {
    let mut prev: Option<(f64, f64)> = None;
    for (&v, &t) in analysis.rms.iter().zip(&analysis.rms_times) {
        let Some(fy) = scale.fraction(f64::from(v)) else {
            // valeurs non positives masquées sur l'axe log
            prev = None;
            continue;
        };
        let point = (x_of(area, &analysis.axis, t), area.y_at(fy));
        if let Some(p) = prev {
            canvas.line(p, point, LINE_COLOR, thickness);
        } else {
            canvas.put(point.0.round() as i64, point.1.round() as i64, LINE_COLOR);
        }
        prev = Some(point);
    }
}

/// Graduations x communes : traits sous la zone, libellés `m:ss`.
fn draw_time_ticks(
    canvas: &mut Canvas,
    text: Option<&mut TextRasterizer>,
    style: &FigureStyle,
    area: &PlotArea,
    axis: &TimeAxis,
) {
    let tick_len = style.pt(TICK_LEN_PT).round() as i64;
    let y = i64::from(area.y1);
    let positions: Vec<f64> = axis.ticks().iter().map(|&t| x_of(area, axis, t)).collect();
    for &x in &positions {
        canvas.vline(x.round() as i64, y, y + tick_len, GRID_COLOR);
    }
    if let Some(text) = text {
        let px = style.pt(LABEL_FONT_PT) as f32;
        for (x, label) in positions.iter().zip(axis.tick_labels()) {
            text.draw(
                canvas,
                &label,
                (*x, (y + tick_len * 2) as f64),
                px,
                BLACK,
                (Align::Center, Align::Start),
            );
        }
    }
}

/// Graduations y : traits à gauche de la zone (ou à droite pour la barre de couleur).
fn draw_value_ticks(
    canvas: &mut Canvas,
    text: Option<&mut TextRasterizer>,
    style: &FigureStyle,
    area: &PlotArea,
    ticks: &[(f64, String)],
    right_side: bool,
) {
    let tick_len = style.pt(TICK_LEN_PT).round() as i64;
    let px = style.pt(LABEL_FONT_PT) as f32;
    let mut text = text;
    for (frac, label) in ticks {
        let y = area.y_at(*frac).round() as i64;
        let (x_from, x_to, anchor_x, align) = if right_side {
            let x = i64::from(area.x1);
            (x, x + tick_len, (x + tick_len * 2) as f64, Align::Start)
        } else {
            let x = i64::from(area.x0);
            (x - tick_len, x, (x - tick_len * 2) as f64, Align::End)
        };
        canvas.hline(x_from, x_to, y, GRID_COLOR);
        if let Some(t) = text.as_deref_mut() {
            t.draw(canvas, label, (anchor_x, y as f64), px, BLACK, (align, Align::Center));
        }
    }
}

fn linear_ticks(lo: f64, hi: f64, max_ticks: usize) -> Vec<(f64, String)> {
    let ticks = nice_ticks(lo, hi, max_ticks);
    let step = if ticks.len() > 1 { ticks[1] - ticks[0] } else { 1.0 };
    let decimals = decimals_for(step);
    ticks
        .into_iter()
        .map(|v| (normalize(v as f32, lo as f32, hi as f32).into(), format_linear(v, decimals)))
        .collect()
}

fn log_ticks(lo: f64, hi: f64) -> Vec<(f64, String)> {
    let first = lo.ceil() as i64;
    let last = hi.floor() as i64;
    let range = hi - lo;
    (first..=last)
        .map(|k| {
            let frac = if range.abs() < f64::EPSILON { 0.5 } else { (k as f64 - lo) / range };
            (frac, format!("1e{k}"))
        })
        .collect()
}

fn draw_title(text: Option<&mut TextRasterizer>, canvas: &mut Canvas, style: &FigureStyle, area: &PlotArea, title: &str) {
    if let Some(t) = text {
        let x = f64::from(area.x0 + area.width() / 2);
        let y = f64::from(area.y0) - style.pt(6.0);
        t.draw(canvas, title, (x, y), style.pt(TITLE_FONT_PT) as f32, BLACK, (Align::Center, Align::End));
    }
}

fn draw_legend(canvas: &mut Canvas, text: Option<&mut TextRasterizer>, style: &FigureStyle, area: &PlotArea, label: &str, thickness: u32) {
    let pad = style.pt(6.0);
    let sample_len = style.pt(20.0);
    let px = style.pt(LABEL_FONT_PT) as f32;
    let mut text = text;
    let label_w = text
        .as_deref_mut()
        .map_or(0.0, |t| f64::from(t.render(label, px).width));
    let box_w = pad * 3.0 + sample_len + label_w;
    let box_h = style.pt(LABEL_FONT_PT) + pad * 2.0;

    let x1 = f64::from(area.x1) - pad;
    let x0 = (x1 - box_w).max(f64::from(area.x0));
    let y0 = f64::from(area.y0) + pad;
    let legend = PlotArea {
        x0: x0.round() as u32,
        y0: y0.round() as u32,
        x1: x1.round() as u32,
        y1: (y0 + box_h).round() as u32,
    };
    canvas.fill_rect(
        i64::from(legend.x0),
        i64::from(legend.y0),
        i64::from(legend.x1),
        i64::from(legend.y1),
        WHITE,
    );
    canvas.frame(&legend, (204, 204, 204), 1);

    let mid_y = f64::from(legend.y0 + legend.height() / 2);
    let lx0 = x0 + pad;
    canvas.line((lx0, mid_y), (lx0 + sample_len, mid_y), LINE_COLOR, thickness);
    if let Some(t) = text {
        t.draw(canvas, label, (lx0 + sample_len + pad, mid_y), px, BLACK, (Align::Start, Align::Center));
    }
}

/// Rend la figure complète d'une analyse.
///
/// Text is drawn only when a rasterizer is given; the plots themselves never
/// depend on a font.
#[must_use]
pub fn render_analysis(
    analysis: &Analysis,
    style: &FigureStyle,
    text: Option<&mut TextRasterizer>,
) -> RgbImage {
    let mut text = text;
    let layout = style.layout();
    let mut canvas = Canvas::new(style.width_px, style.height_px, WHITE);
    let thickness = style.pt(LINE_WIDTH_PT * 1.5).round().max(1.0) as u32;
    let frame_px = style.pt_px(LINE_WIDTH_PT);
    let axis = analysis.axis;

    // 1. Waveform
    let wave_scale = waveform_scale(&analysis.waveform);
    draw_waveform(&mut canvas, &layout.waveform, analysis, wave_scale);

    // 2. Spectrogramme + barre de couleur
    let (vmin, vmax) = draw_spectrogram(&mut canvas, &layout.spectrogram, analysis);
    draw_colorbar(&mut canvas, &layout.colorbar);

    // 3. Intensité sonore (RMS, axe log)
    let rms_y = rms_scale(&analysis.rms);
    draw_rms(&mut canvas, &layout.rms, analysis, rms_y, thickness);

    // Cadres et graduations
    for area in [&layout.waveform, &layout.spectrogram, &layout.colorbar, &layout.rms] {
        canvas.frame(area, BLACK, frame_px);
    }
    for area in [&layout.waveform, &layout.spectrogram, &layout.rms] {
        draw_time_ticks(&mut canvas, text.as_deref_mut(), style, area, &axis);
    }

    if let YScale::Linear { lo, hi } = wave_scale {
        draw_value_ticks(&mut canvas, text.as_deref_mut(), style, &layout.waveform, &linear_ticks(lo, hi, 7), false);
    }
    let nyquist = analysis.max_frequency();
    draw_value_ticks(&mut canvas, text.as_deref_mut(), style, &layout.spectrogram, &linear_ticks(0.0, nyquist, 6), false);
    let db_ticks: Vec<(f64, String)> = nice_ticks(f64::from(vmin), f64::from(vmax), 9)
        .into_iter()
        .map(|v| (f64::from(normalize(v as f32, vmin, vmax)), format_db(v)))
        .collect();
    draw_value_ticks(&mut canvas, text.as_deref_mut(), style, &layout.colorbar, &db_ticks, true);
    if let YScale::Log { lo, hi } = rms_y {
        draw_value_ticks(&mut canvas, text.as_deref_mut(), style, &layout.rms, &log_ticks(lo, hi), false);
    }

    draw_legend(&mut canvas, text.as_deref_mut(), style, &layout.rms, "RMS Energy", thickness);

    if let Some(t) = text.as_deref_mut() {
        draw_title(Some(&mut *t), &mut canvas, style, &layout.waveform, "Waveform");
        draw_title(Some(&mut *t), &mut canvas, style, &layout.spectrogram, "Spectrogram");
        draw_title(Some(&mut *t), &mut canvas, style, &layout.rms, "Sound Intensity");

        let label_px = style.pt(LABEL_FONT_PT) as f32;
        let ylabel_x = style.pt(12.0);
        let spec_mid = f64::from(layout.spectrogram.y0 + layout.spectrogram.height() / 2);
        t.draw_vertical(&mut canvas, "Hz", (ylabel_x, spec_mid), label_px, BLACK);
        let rms_mid = f64::from(layout.rms.y0 + layout.rms.height() / 2);
        t.draw_vertical(&mut canvas, "RMS Energy", (ylabel_x, rms_mid), label_px, BLACK);

        let xlabel_y = f64::from(layout.rms.y1) + style.pt(XTICKS_PT) - style.pt(2.0);
        let x_mid = f64::from(layout.rms.x0 + layout.rms.width() / 2);
        t.draw(&mut canvas, "Time (seconds)", (x_mid, xlabel_y), label_px, BLACK, (Align::Center, Align::End));
    }

    canvas.into_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_audio::analysis::BatchAnalyzer;

    fn small_style() -> FigureStyle {
        let config = ToolConfig {
            dpi: 20,
            ..ToolConfig::default()
        };
        FigureStyle::from_config(&config)
    }

    fn sine_analysis(offset: f64) -> Analysis {
        let sr = 4000u32;
        let samples: Vec<f32> = (0..sr * 2)
            .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 300.0 * i as f32 / sr as f32).sin())
            .collect();
        let mut analyzer = BatchAnalyzer::new(256, 64, 80.0, 0);
        analyzer.analyze_samples(samples, sr, offset)
    }

    #[test]
    fn panels_share_the_time_axis() {
        let style = small_style();
        let layout = style.layout();
        let axis = TimeAxis::new(1200.0, 600.0);
        for area in [layout.waveform, layout.spectrogram, layout.rms] {
            assert!((x_of(&area, &axis, axis.start) - f64::from(area.x0)).abs() < 1e-9);
            assert!((x_of(&area, &axis, axis.end) - f64::from(area.x1)).abs() < 1e-9);
            assert!(area.width() > 0 && area.height() > 0);
        }
        assert_eq!(layout.waveform.x0, layout.rms.x0);
        assert_eq!(layout.waveform.x1, layout.rms.x1);
        assert!(layout.colorbar.x0 > layout.spectrogram.x1);
        assert!(layout.waveform.y1 < layout.spectrogram.y0);
        assert!(layout.spectrogram.y1 < layout.rms.y0);
    }

    #[test]
    fn render_without_font_has_expected_size() {
        let style = small_style();
        let img = render_analysis(&sine_analysis(600.0), &style, None);
        assert_eq!((img.width(), img.height()), (240, 300));
    }

    #[test]
    fn spectrogram_area_is_painted() {
        let style = FigureStyle {
            width_px: 400,
            height_px: 600,
            dpi: 30,
        };
        let layout = style.layout();
        let img = render_analysis(&sine_analysis(0.0), &style, None);
        let a = layout.spectrogram;
        let center = img.get_pixel(a.x0 + a.width() / 2, a.y0 + a.height() / 2);
        assert_ne!(center.0, [255, 255, 255]);
        // waveform crosses the vertical middle of its panel
        let w = layout.waveform;
        let mid_row = w.y0 + w.height() / 2;
        let blue = (w.x0..w.x1).any(|x| img.get_pixel(x, mid_row).0 == [31, 119, 180]);
        assert!(blue);
    }

    #[test]
    fn nice_ticks_cover_range() {
        assert_eq!(nice_ticks(0.0, 11025.0, 6), vec![0.0, 2500.0, 5000.0, 7500.0, 10000.0]);
        assert_eq!(nice_ticks(-0.55, 0.55, 7), vec![-0.4, -0.2, 0.0, 0.2, 0.4]);
        assert_eq!(nice_ticks(1.0, 1.0, 5), vec![1.0]);
        assert!(nice_ticks(f64::NAN, 1.0, 5).is_empty());
    }

    #[test]
    fn log_ticks_are_decades() {
        let ticks = log_ticks(-3.2, -0.7);
        let labels: Vec<&str> = ticks.iter().map(|(_, l)| l.as_str()).collect();
        assert_eq!(labels, vec!["1e-3", "1e-2", "1e-1"]);
        assert!(ticks.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn rms_scale_ignores_non_positive() {
        match rms_scale(&[0.0, 0.01, 0.1]) {
            YScale::Log { lo, hi } => {
                assert!(lo < -2.0 && hi > -1.0, "{lo} {hi}");
            }
            YScale::Linear { .. } => panic!("expected log scale"),
        }
        assert!(matches!(rms_scale(&[0.0, 0.0]), YScale::Log { .. }));
    }
}
