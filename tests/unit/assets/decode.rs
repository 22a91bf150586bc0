use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let prepared = decode_image(&png_bytes(1, 1, [100, 50, 200, 128])).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_fit_resizes_to_target() {
    let prepared = decode_image_fit(&png_bytes(8, 4, [10, 20, 30, 255]), 6, 6).unwrap();
    assert_eq!((prepared.width, prepared.height), (6, 6));
    assert_eq!(prepared.rgba8_premul.len(), 6 * 6 * 4);
    assert_eq!(&prepared.rgba8_premul[..4], &[10, 20, 30, 255]);
}

#[test]
fn garbage_bytes_are_an_error() {
    assert!(decode_image(b"not an image").is_err());
    assert!(decode_image_fit(&png_bytes(1, 1, [0; 4]), 0, 3).is_err());
}

#[test]
fn from_premul_checks_length() {
    assert!(PreparedImage::from_premul(2, 2, vec![0; 15]).is_err());
    PreparedImage::from_premul(2, 2, vec![0; 16]).unwrap();
}
