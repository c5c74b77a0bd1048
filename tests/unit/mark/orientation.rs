use super::*;
use crate::foundation::core::Dpi;

fn asymmetric() -> RasterImage {
    let mut img = RasterImage::new(3, 2, Dpi { x: 72.0, y: 300.0 });
    let mut v = 0u8;
    for y in 0..2 {
        for x in 0..3 {
            v += 10;
            img.pixels_mut().put_pixel(x, y, image::Rgba([v, 0, 0, 255]));
        }
    }
    img
}

fn oriented(img: &RasterImage, o: Orientation) -> RasterImage {
    apply_orientation(Cow::Borrowed(img), o).into_owned()
}

#[test]
fn identity_keeps_borrowed_buffer() {
    let img = asymmetric();
    let out = apply_orientation(Cow::Borrowed(&img), Orientation::RotateNoneFlipNone);
    assert!(matches!(out, Cow::Borrowed(b) if std::ptr::eq(b, &img)));
}

#[test]
fn quarter_turn_swaps_axes_and_dpi() {
    let img = asymmetric();
    let out = oriented(&img, Orientation::Rotate90FlipNone);
    assert_eq!(out.dimensions(), (2, 3));
    assert_eq!(out.dpi(), Dpi { x: 300.0, y: 72.0 });
    // Clockwise: bottom-left pixel becomes top-left.
    assert_eq!(out.pixel(0, 0), img.pixel(0, 1));
}

#[test]
fn flip_x_mirrors_columns() {
    let img = asymmetric();
    let out = oriented(&img, Orientation::RotateNoneFlipX);
    assert_eq!(out.pixel(0, 0), img.pixel(2, 0));
    assert_eq!(out.pixel(2, 1), img.pixel(0, 1));
}

#[test]
fn rotate180_flip_x_round_trips_through_inverse() {
    let img = asymmetric();
    let o = Orientation::Rotate180FlipX;
    let back = oriented(&oriented(&img, o), o.inverse());
    assert_eq!(back, img);
}

#[test]
fn every_orientation_round_trips() {
    let img = asymmetric();
    for o in Orientation::ALL {
        let back = oriented(&oriented(&img, o), o.inverse());
        assert_eq!(back, img, "{o:?}");
        assert_eq!(o.then(o.inverse()), Orientation::RotateNoneFlipNone);
    }
}

#[test]
fn composition_matches_sequential_application() {
    let img = asymmetric();
    for a in Orientation::ALL {
        for b in Orientation::ALL {
            let sequential = oriented(&oriented(&img, a), b);
            let composed = oriented(&img, a.then(b));
            assert_eq!(sequential.pixels(), composed.pixels(), "{a:?} then {b:?}");
        }
    }
}

#[test]
fn orientation_parts_round_trip() {
    for o in Orientation::ALL {
        assert_eq!(Orientation::from_parts(o.quarter_turns(), o.flips_x()), o);
    }
    assert_eq!(Orientation::Rotate270FlipX.rotation_degrees(), 270);
}
