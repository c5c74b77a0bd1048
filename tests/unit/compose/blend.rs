use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over_straight(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over_straight(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over_straight(dst, src, 1.0), src);
}

#[test]
fn over_dst_transparent_keeps_src_color() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over_straight(dst, src, 1.0), src);
    assert_eq!(over_straight(dst, src, 0.5), [100, 110, 120, 100]);
}

#[test]
fn opaque_mark_on_opaque_base_is_linear_mix() {
    let base = [100u8, 0, 255, 255];
    let mark = [200u8, 255, 0, 255];
    for step in 0..=20 {
        let op = step as f32 / 20.0;
        let out = over_straight(base, mark, op);
        for i in 0..3 {
            let expected = f32::from(base[i]) * (1.0 - op) + f32::from(mark[i]) * op;
            assert!(
                (f32::from(out[i]) - expected).abs() <= 1.0,
                "channel {i} at opacity {op}: {} vs {expected}",
                out[i]
            );
        }
        assert_eq!(out[3], 255);
    }
}

#[test]
fn clip_region_handles_partial_and_disjoint() {
    assert_eq!(
        clip_region((10, 10), (4, 4), PixelPoint::new(-2, 8)),
        Some(BlitRegion {
            x: 0,
            y: 8,
            width: 2,
            height: 2
        })
    );
    assert_eq!(clip_region((10, 10), (4, 4), PixelPoint::new(10, 0)), None);
    assert_eq!(clip_region((10, 10), (4, 4), PixelPoint::new(-4, 0)), None);
    assert_eq!(clip_region((10, 10), (0, 4), PixelPoint::new(0, 0)), None);
}

#[test]
fn composite_skips_key_color_pixels() {
    let mut dst = RgbaImage::from_pixel(2, 1, image::Rgba([9, 9, 9, 255]));
    let mut src = RgbaImage::from_pixel(2, 1, image::Rgba([255, 255, 255, 255]));
    src.put_pixel(1, 0, image::Rgba([0, 0, 255, 255]));

    let region = composite_into(&mut dst, &src, PixelPoint::new(0, 0), 1.0, Some(Rgb8::WHITE));
    assert!(region.is_some());
    assert_eq!(dst.get_pixel(0, 0).0, [9, 9, 9, 255]);
    assert_eq!(dst.get_pixel(1, 0).0, [0, 0, 255, 255]);
}

#[test]
fn composite_clips_negative_origin() {
    let mut dst = RgbaImage::from_pixel(3, 3, image::Rgba([0, 0, 0, 255]));
    let mut src = RgbaImage::from_pixel(2, 2, image::Rgba([10, 10, 10, 255]));
    src.put_pixel(1, 1, image::Rgba([200, 0, 0, 255]));

    let region = composite_into(&mut dst, &src, PixelPoint::new(-1, -1), 1.0, None).unwrap();
    assert_eq!((region.x, region.y, region.width, region.height), (0, 0, 1, 1));
    assert_eq!(dst.get_pixel(0, 0).0, [200, 0, 0, 255]);
    assert_eq!(dst.get_pixel(1, 1).0, [0, 0, 0, 255]);
}
