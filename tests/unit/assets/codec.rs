use super::*;

fn png_bytes(img: &image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_keeps_straight_alpha() {
    let src = image::RgbaImage::from_raw(1, 1, vec![100, 50, 200, 128]).unwrap();
    let img = decode_image(&png_bytes(&src)).unwrap();
    assert_eq!(img.dimensions(), (1, 1));
    assert_eq!(img.pixel(0, 0), [100, 50, 200, 128]);
    assert_eq!(img.dpi(), Dpi::DEFAULT);
}

#[test]
fn decode_garbage_is_a_collaborator_error() {
    let err = decode_image(b"not an image").unwrap_err();
    assert!(matches!(err, WatermarkError::Other(_)));
}

#[test]
fn encode_jpeg_drops_alpha() {
    let img = RasterImage::filled(4, 4, [10, 20, 30, 128], Dpi::DEFAULT);
    let bytes = encode_image(&img, image::ImageFormat::Jpeg).unwrap();
    let back = image::load_from_memory(&bytes).unwrap();
    assert_eq!(back.color(), image::ColorType::Rgb8);
}

#[test]
fn save_then_load_png() {
    let dir = std::path::PathBuf::from("target").join("codec_unit");
    let path = dir.join("nested").join("out.png");
    let _ = std::fs::remove_file(&path);

    let img = RasterImage::filled(3, 2, [1, 2, 3, 4], Dpi::DEFAULT);
    save_image(&img, &path).unwrap();
    let back = load_image(&path).unwrap();
    assert_eq!(back.pixels(), img.pixels());
}

#[test]
fn svg_mark_rasterizes_at_scale() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2">
        <rect width="4" height="2" fill="#ff0000"/>
    </svg>"##;
    let img = decode_svg_mark(svg, 2.0).unwrap();
    assert_eq!(img.dimensions(), (8, 4));
    assert_eq!(img.pixel(3, 2), [255, 0, 0, 255]);

    assert!(decode_svg_mark(b"<svg", 1.0).is_err());
    assert!(matches!(
        decode_svg_mark(svg, 0.0),
        Err(WatermarkError::ScaleRatio(_))
    ));
}
