//! Bottom-to-top alpha compositing of layer images and PNG export

use crate::io::error::{ForgeError, Result};
use crate::metadata::store::write_output;
use crate::render::plan::ImagePlan;
use image::{ImageFormat, Rgba, RgbaImage};
use std::path::Path;

fn load_layer(path: &Path) -> Result<RgbaImage> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| ForgeError::MissingLayer {
            path: path.to_path_buf(),
            source,
        })
}

/// Composite a plan's layers into one raster
///
/// The first layer is the canvas and fixes the output size. Every later
/// layer is placed at (0, 0) and clipped to the canvas.
///
/// # Errors
///
/// Returns [`ForgeError::EmptyPlan`] for a plan without layers and
/// [`ForgeError::MissingLayer`] when a layer is absent or undecodable.
pub fn composite(plan: &ImagePlan) -> Result<RgbaImage> {
    let mut layers = plan.layers.iter();
    let base_path = layers
        .next()
        .ok_or(ForgeError::EmptyPlan { token: plan.token })?;
    let mut canvas = load_layer(base_path)?;

    for path in layers {
        let layer = load_layer(path)?;
        paste_over(&mut canvas, &layer);
    }
    Ok(canvas)
}

/// Blend `layer` onto `canvas` using the layer's alpha as mask
///
/// Color channels mix as `l·a + c·(1−a)`; alpha accumulates as
/// `a + c_a·(1−a)`, so a fully transparent pixel leaves the canvas intact
/// and an opaque one replaces it.
pub fn paste_over(canvas: &mut RgbaImage, layer: &RgbaImage) {
    let width = canvas.width().min(layer.width());
    let height = canvas.height().min(layer.height());

    for y in 0..height {
        for x in 0..width {
            let Rgba(top) = *layer.get_pixel(x, y);
            let bottom = canvas.get_pixel_mut(x, y);
            *bottom = blend(bottom.0, top);
        }
    }
}

fn blend(bottom: [u8; 4], top: [u8; 4]) -> Rgba<u8> {
    let [tr, tg, tb, ta] = top.map(u32::from);
    let [br, bg, bb, ba] = bottom.map(u32::from);
    let inv = 255 - ta;
    let mix = |t: u32, b: u32| ((t * ta + b * inv + 127) / 255) as u8;

    Rgba([
        mix(tr, br),
        mix(tg, bg),
        mix(tb, bb),
        ((ta * 255 + ba * inv + 127) / 255) as u8,
    ])
}

/// Write `image` as PNG unless the target exists and `overwrite` is off
///
/// Returns `Ok(false)` when an existing file was kept.
///
/// # Errors
///
/// Returns [`ForgeError::FileSystem`] if the target cannot be created and
/// [`ForgeError::ImageExport`] if encoding fails.
pub fn save_png(image: &RgbaImage, path: &Path, overwrite: bool) -> Result<bool> {
    write_output(path, overwrite, |writer| {
        image
            .write_to(writer, ImageFormat::Png)
            .map_err(|source| ForgeError::ImageExport {
                path: path.to_path_buf(),
                source,
            })
    })
}
