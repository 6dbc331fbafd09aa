// render.rs - PNG output of a colorized context
use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;

use crate::context::MandelbrotContext;

/// Row-major RGBA bytes of the color buffer, row 0 first
pub fn rgba_bytes(ctx: &MandelbrotContext) -> Vec<u8> {
    ctx.color_pixels()
        .iter()
        .flat_map(|pixel| pixel.to_le_bytes())
        .collect()
}

/// Image of the color buffer; world `y` grows upward, so rows are flipped
pub fn to_image(ctx: &MandelbrotContext) -> Result<RgbaImage> {
    let row_bytes = ctx.width() as usize * 4;
    let bytes = rgba_bytes(ctx);
    let flipped: Vec<u8> = bytes.chunks_exact(row_bytes).rev().flatten().copied().collect();

    RgbaImage::from_raw(ctx.width(), ctx.height(), flipped)
        .context("color buffer does not match the screen dimensions")
}

pub fn save_png(ctx: &MandelbrotContext, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    to_image(ctx)?
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write PNG: {}", path.display()))?;
    log::debug!("wrote {}x{} PNG to {}", ctx.width(), ctx.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineVariant;

    #[test]
    fn test_image_rows_are_flipped() {
        let mut ctx = MandelbrotContext::new(8, 4).unwrap();
        ctx.compute(EngineVariant::Scalar).unwrap();
        ctx.colorize();

        let image = to_image(&ctx).unwrap();
        let bottom_left = ctx.color_pixels()[0].to_le_bytes();
        assert_eq!(image.get_pixel(0, 3).0, bottom_left);
    }
}
