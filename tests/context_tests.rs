use mandelbrot_engine::math::{unpack_rgba, BACKGROUND_COLOR};
use mandelbrot_engine::render::{save_png, to_image};
use mandelbrot_engine::{EngineVariant, MandelbrotContext, Position, PositionError, Viewport};

fn rendered(width: u32, height: u32, cap: u32) -> MandelbrotContext {
    let mut ctx = MandelbrotContext::new(width, height).unwrap();
    ctx.set_iteration_cap(cap).unwrap();
    ctx.compute(EngineVariant::SimdConveyor).unwrap();
    ctx.colorize();
    ctx
}

#[cfg(test)]
mod color_tests {
    use super::*;

    #[test]
    fn test_sentinel_pixels_are_background() {
        let ctx = rendered(80, 60, 64);
        for (&count, &pixel) in ctx.escape_counts().iter().zip(ctx.color_pixels()) {
            if count == 64 {
                assert_eq!(pixel, BACKGROUND_COLOR);
            } else {
                assert_eq!(pixel, ctx.color_table().color_for(count));
                assert_eq!(unpack_rgba(pixel)[3], 255);
            }
        }
    }

    #[test]
    fn test_table_rebuilt_after_cap_change() {
        let mut ctx = rendered(40, 30, 64);
        assert_eq!(ctx.color_table().cap(), 64);
        let before = ctx.color_table().color_for(10);

        ctx.set_iteration_cap(500).unwrap();
        ctx.compute(EngineVariant::Simd).unwrap();
        ctx.colorize();
        assert_eq!(ctx.color_table().cap(), 500);
        assert_eq!(ctx.color_table().len(), 500);

        // red falls off as count / cap, so count 10 is redder under the larger cap
        let after = ctx.color_table().color_for(10);
        assert_ne!(after, before);
        assert_eq!(unpack_rgba(before)[0], 216);
        assert_eq!(unpack_rgba(after)[0], 251);
        if let Some(pixel) = ctx.escape_counts().iter().position(|&n| n == 10) {
            assert_eq!(ctx.color_pixels()[pixel], after);
        }

        let interior = ctx.escape_counts().iter().position(|&n| n == 500).unwrap();
        assert_eq!(ctx.color_pixels()[interior], BACKGROUND_COLOR);
    }

    #[test]
    fn test_colorize_is_repeatable() {
        let mut ctx = rendered(32, 32, 100);
        let first = ctx.color_pixels().to_vec();
        ctx.colorize();
        assert_eq!(ctx.color_pixels(), first.as_slice());
    }
}

#[cfg(test)]
mod position_file_tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_save_then_load_restores_view() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("position.txt");

        let mut ctx = MandelbrotContext::new(256, 144).unwrap();
        ctx.set_viewport(Viewport {
            center_x: -1.25066,
            center_y: 0.02012,
            scale: 1.7e-4 / 256.0,
            iteration_cap: 1500,
        })
        .unwrap();
        ctx.position().save(&path).unwrap();

        let loaded = Position::load(&path).unwrap();
        let mut restored = MandelbrotContext::new(256, 144).unwrap();
        restored.apply_position(&loaded).unwrap();

        let view = restored.viewport();
        assert_eq!(view.center_x, -1.25066);
        assert_eq!(view.center_y, 0.02012);
        assert_eq!(view.iteration_cap, 1500);
        assert!((view.scale - ctx.viewport().scale).abs() < 1e-18);
    }

    #[test]
    fn test_saved_file_has_canonical_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("position.txt");
        Position::default().save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let keys: Vec<&str> = text
            .lines()
            .filter_map(|line| line.split_once('=').map(|(k, _)| k.trim()))
            .collect();
        assert_eq!(keys, ["center_x", "center_y", "iter_num", "plot_width"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Position::load(dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, PositionError::Io(_)));
    }

    #[test]
    fn test_invalid_position_rejected_by_context() {
        let mut ctx = MandelbrotContext::new(10, 10).unwrap();
        let position = Position {
            iter_num: 0,
            ..Position::default()
        };
        assert!(ctx.apply_position(&position).is_err());
        assert_eq!(ctx.viewport(), Viewport::default_for_width(10));
    }
}

#[cfg(test)]
mod render_tests {
    use super::*;

    #[test]
    fn test_png_written_with_screen_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let ctx = rendered(64, 48, 128);

        save_png(&ctx, &path).unwrap();

        let image = image::open(&path).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (64, 48));
        assert_eq!(image, to_image(&ctx).unwrap());
    }
}
