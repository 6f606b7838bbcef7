use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use image::RgbImage;

use crate::error::ExportError;

/// Pixels par mètre pour une résolution en DPI (1 pouce = 0.0254 m).
///
/// # Example
/// ```
/// use cs_export::png_writer::dpi_to_ppm;
/// assert_eq!(dpi_to_ppm(300), 11811);
/// assert_eq!(dpi_to_ppm(72), 2835);
/// ```
#[must_use]
pub fn dpi_to_ppm(dpi: u32) -> u32 {
    (f64::from(dpi) / 0.0254).round() as u32
}

/// Écrit une image RGB en PNG avec sa résolution (chunk `pHYs`).
///
/// # Errors
/// [`ExportError::Render`] pour une image vide ; erreur I/O ou d'encodage sinon.
pub fn save_png(image: &RgbImage, path: &Path, dpi: u32) -> Result<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ExportError::Render(format!(
            "image vide ({}x{}) pour {}",
            image.width(),
            image.height(),
            path.display()
        ))
        .into());
    }
    let file = File::create(path)
        .with_context(|| format!("Impossible de créer {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width(), image.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let ppm = dpi_to_ppm(dpi);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: ppm,
        yppu: ppm,
        unit: png::Unit::Meter,
    }));

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("En-tête PNG : {}", path.display()))?;
    writer
        .write_image_data(image.as_raw())
        .with_context(|| format!("Écriture PNG : {}", path.display()))?;
    writer.finish().context("Finalisation PNG")?;

    log::debug!(
        "PNG {}x{} @ {dpi} dpi → {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn writes_resolution_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fig.png");
        let img = RgbImage::from_pixel(12, 15, Rgb([10, 20, 30]));
        save_png(&img, &path, 300).unwrap();

        let decoder = png::Decoder::new(File::open(&path).unwrap());
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (12, 15));
        let dims = info.pixel_dims.unwrap();
        assert_eq!(dims.xppu, 11811);
        assert_eq!(dims.yppu, 11811);
        assert_eq!(dims.unit, png::Unit::Meter);
    }

    #[test]
    fn pixels_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fig.png");
        let mut img = RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]));
        img.put_pixel(1, 2, Rgb([31, 119, 180]));
        save_png(&img, &path, 100).unwrap();

        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back.get_pixel(1, 2).0, [31, 119, 180]);
        assert_eq!(back.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn empty_image_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_png(&RgbImage::new(0, 10), &dir.path().join("x.png"), 300).unwrap_err();
        assert!(matches!(err.downcast_ref::<ExportError>(), Some(ExportError::Render(_))));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let img = RgbImage::new(2, 2);
        assert!(save_png(&img, Path::new("/nonexistent/dir/fig.png"), 300).is_err());
    }
}
