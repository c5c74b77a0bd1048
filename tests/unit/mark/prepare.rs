use super::*;
use crate::foundation::core::Dpi;

fn red(w: u32, h: u32) -> RasterImage {
    RasterImage::filled(w, h, [255, 0, 0, 255], Dpi { x: 72.0, y: 144.0 })
}

#[test]
fn identity_returns_the_same_buffer() {
    let mark = red(4, 3);
    let out = prepare_mark(&mark, Margin::ZERO, 1.0, ScaleMode::Resample).unwrap();
    match out {
        Cow::Borrowed(b) => assert!(std::ptr::eq(b, &mark)),
        Cow::Owned(_) => panic!("identity preparation must not copy"),
    }
}

#[test]
fn margin_only_pads_with_transparent_border() {
    let mark = red(2, 2);
    let out = prepare_mark(&mark, Margin::new(1, 2, 3, 4), 1.0, ScaleMode::Resample).unwrap();
    assert_eq!(out.dimensions(), (2 + 1 + 3, 2 + 2 + 4));
    assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]);
    assert_eq!(out.pixel(1, 2), [255, 0, 0, 255]);
    assert_eq!(out.pixel(2, 3), [255, 0, 0, 255]);
    assert_eq!(out.pixel(3, 2), [0, 0, 0, 0]);
    assert_eq!(out.dpi(), Dpi { x: 72.0, y: 144.0 });
}

#[test]
fn resample_fills_the_scaled_rectangle() {
    let mark = red(4, 2);
    let out = prepare_mark(&mark, Margin::uniform(1), 2.0, ScaleMode::Resample).unwrap();
    assert_eq!(out.dimensions(), (8 + 2, 4 + 2));
    assert_eq!(out.pixel(1, 1), [255, 0, 0, 255]);
    assert_eq!(out.pixel(8, 4), [255, 0, 0, 255]);
    assert_eq!(out.pixel(9, 5), [0, 0, 0, 0]);
}

#[test]
fn canvas_only_keeps_pixels_unscaled() {
    let mark = red(4, 2);
    let out = prepare_mark(&mark, Margin::ZERO, 2.0, ScaleMode::CanvasOnly).unwrap();
    assert_eq!(out.dimensions(), (8, 4));
    assert_eq!(out.pixel(3, 1), [255, 0, 0, 255]);
    assert_eq!(out.pixel(4, 1), [0, 0, 0, 0]);
    assert_eq!(out.pixel(3, 2), [0, 0, 0, 0]);
}

#[test]
fn canvas_only_crops_when_shrinking() {
    let mark = red(4, 4);
    let out = prepare_mark(&mark, Margin::uniform(1), 0.5, ScaleMode::CanvasOnly).unwrap();
    assert_eq!(out.dimensions(), (4, 4));
    assert_eq!(out.pixel(1, 1), [255, 0, 0, 255]);
    assert_eq!(out.pixel(2, 2), [255, 0, 0, 255]);
    assert_eq!(out.pixel(3, 3), [0, 0, 0, 0]);
}

#[test]
fn scaled_size_rounds_half_to_even() {
    assert_eq!(scaled_size(5, 3, 0.5), (2, 2));
    assert_eq!(scaled_size(7, 10, 0.5), (4, 5));
    assert_eq!(scaled_size(100, 40, 3.0), (300, 120));
}

#[test]
fn tiny_ratio_yields_margin_only_canvas() {
    let mark = red(2, 2);
    let out = prepare_mark(&mark, Margin::uniform(2), 0.01, ScaleMode::Resample).unwrap();
    assert_eq!(out.dimensions(), (4, 4));
    assert!(out.pixels().pixels().all(|p| p.0[3] == 0));
}

#[test]
fn oversized_scale_ratio_is_reported() {
    let mark = red(100, 100);
    for mode in [ScaleMode::Resample, ScaleMode::CanvasOnly] {
        let err = prepare_mark(&mark, Margin::ZERO, 1.0e9, mode).unwrap_err();
        assert!(matches!(err, WatermarkError::Validation(_)), "{err}");
    }
}

#[test]
fn oversized_margin_is_reported() {
    let mark = red(2, 2);
    let err = prepare_mark(&mark, Margin::uniform(u32::MAX), 1.0, ScaleMode::Resample).unwrap_err();
    assert!(matches!(err, WatermarkError::Validation(_)));

    // Tall but thin stays well within the pixel cap.
    assert!(prepare_mark(&mark, Margin::new(0, 70_000, 0, 0), 1.0, ScaleMode::Resample).is_ok());

    let err = prepare_mark(&mark, Margin::new(20_000, 20_000, 0, 0), 1.0, ScaleMode::Resample)
        .unwrap_err();
    assert!(matches!(err, WatermarkError::Validation(_)));
}
