use super::*;

fn gradient(width: u32, height: u32, format: PixelFormat) -> Frame {
    let bpp = format.bytes_per_pixel();
    let data = (0..width as usize * height as usize * bpp)
        .map(|i| (i * 7 % 251) as u8)
        .collect();
    Frame::from_packed(width, height, format, data).unwrap()
}

#[test]
fn constructors_reject_bad_geometry() {
    assert!(Frame::new(0, 4, PixelFormat::Rgba8).is_err());
    assert!(Frame::new(4, 0, PixelFormat::Rgba8).is_err());
    assert!(Frame::from_packed(2, 2, PixelFormat::Rgb8, vec![0; 11]).is_err());
    assert!(Frame::from_raw(2, 2, 7, PixelFormat::Rgba8, vec![0; 32]).is_err());
    // Last row does not need trailing padding.
    assert!(Frame::from_raw(2, 2, 12, PixelFormat::Rgba8, vec![0; 20]).is_ok());
    assert!(Frame::from_raw(2, 2, 12, PixelFormat::Rgba8, vec![0; 19]).is_err());
}

#[test]
fn pixel_addressing_uses_linesize() {
    let mut f = Frame::from_raw(3, 2, 16, PixelFormat::Rgba8, vec![0; 32]).unwrap();
    f.pixel_mut(2, 1).copy_from_slice(&[1, 2, 3, 4]);
    assert_eq!(&f.data()[24..28], &[1, 2, 3, 4]);
    assert_eq!(f.pixel(2, 1), &[1, 2, 3, 4]);
    assert_eq!(f.row(1).len(), 12);
    assert!(!f.is_packed());
}

#[test]
fn alignment_pads_rows_and_packing_removes_padding() {
    let f = gradient(3, 3, PixelFormat::Rgb8);
    let packed = f.to_packed();
    let aligned = f.clone().with_alignment(16).unwrap();
    assert_eq!(aligned.linesize(), 16);
    assert_eq!(aligned.data().len(), 48);
    for y in 0..3 {
        assert_eq!(aligned.row(y), f.row(y));
        assert!(aligned.data()[y as usize * 16 + 9..(y as usize + 1) * 16].iter().all(|&b| b == 0));
    }
    assert_eq!(aligned.to_packed(), packed);
    assert!(f.clone().with_alignment(0).is_err());
    assert_eq!(f.clone().with_alignment(1).unwrap(), f);
}

#[test]
fn convert_bgra_swaps_channel_order() {
    let f = Frame::from_packed(1, 1, PixelFormat::Bgra8, vec![10, 20, 30, 40]).unwrap();
    let rgba = f.convert(PixelFormat::Rgba8);
    assert_eq!(rgba.data(), &[30, 20, 10, 40]);
    assert_eq!(rgba.convert(PixelFormat::Bgra8).data(), f.data());
}

#[test]
fn convert_adds_opaque_alpha_and_reduces_to_luma() {
    let rgb = Frame::from_packed(2, 1, PixelFormat::Rgb8, vec![255, 255, 255, 0, 0, 0]).unwrap();
    assert_eq!(
        rgb.convert(PixelFormat::Rgba8).data(),
        &[255, 255, 255, 255, 0, 0, 0, 255]
    );
    assert_eq!(rgb.convert(PixelFormat::Gray8).data(), &[255, 0]);

    let gray = Frame::from_packed(1, 1, PixelFormat::GrayAlpha8, vec![77, 9]).unwrap();
    assert_eq!(gray.convert(PixelFormat::Rgba8).data(), &[77, 77, 77, 9]);
}

#[test]
fn dynamic_image_keeps_8bit_layouts() {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_raw(1, 1, vec![1, 2, 3]).unwrap());
    let f = Frame::from_dynamic_image(img).unwrap();
    assert_eq!(f.format(), PixelFormat::Rgb8);
    assert_eq!(f.data(), &[1, 2, 3]);

    let back = f.to_dynamic_image().unwrap();
    assert_eq!(back.color(), image::ColorType::Rgb8);
}

#[test]
fn dynamic_image_reduces_16bit_to_8bit() {
    let img = image::DynamicImage::ImageRgba16(
        image::ImageBuffer::from_raw(1, 1, vec![65535u16, 0, 32896, 65535]).unwrap(),
    );
    let f = Frame::from_dynamic_image(img).unwrap();
    assert_eq!(f.format(), PixelFormat::Rgba8);
    assert_eq!(f.data(), &[255, 0, 128, 255]);
}

#[test]
fn bgra_exports_as_rgba_image() {
    let f = Frame::from_packed(1, 1, PixelFormat::Bgra8, vec![10, 20, 30, 40]).unwrap();
    let img = f.to_dynamic_image().unwrap();
    assert_eq!(img.to_rgba8().into_raw(), vec![30, 20, 10, 40]);
}
