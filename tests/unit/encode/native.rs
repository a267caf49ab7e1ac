use super::*;

fn decode(bytes: &[u8]) -> image::DynamicImage {
    image::load_from_memory(bytes).unwrap()
}

fn drain(enc: &mut NativeEncoder) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        match enc.receive_packet().unwrap() {
            Receive::Ready(p) => out.extend_from_slice(&p.data),
            Receive::NeedMore => panic!("encoder wants more input after flush"),
            Receive::Eof => return out,
        }
    }
}

#[test]
fn png_keeps_source_pixel_format() {
    for (format, color) in [
        (PixelFormat::Gray8, image::ColorType::L8),
        (PixelFormat::GrayAlpha8, image::ColorType::La8),
        (PixelFormat::Rgb8, image::ColorType::Rgb8),
        (PixelFormat::Rgba8, image::ColorType::Rgba8),
        (PixelFormat::Bgra8, image::ColorType::Rgba8),
    ] {
        let frame = Frame::new(3, 2, format).unwrap();
        let cfg = EncoderConfig::for_frame(CodecId::Png, &frame);
        let mut enc = NativeEncoder::open(&cfg, PngOptions::default()).unwrap();
        enc.send_frame(Some(&frame)).unwrap();
        enc.send_frame(None).unwrap();
        let img = decode(&drain(&mut enc));
        assert_eq!(img.color(), color, "{format}");
        assert_eq!((img.width(), img.height()), (3, 2));
    }
}

#[test]
fn png_output_preserves_pixels_of_padded_frames() {
    let frame = Frame::from_packed(2, 2, PixelFormat::Rgba8, (0..16).collect())
        .unwrap()
        .with_alignment(32)
        .unwrap();
    let cfg = EncoderConfig::for_frame(CodecId::Png, &frame);
    let opts = PngOptions {
        compression: PngCompression::Best,
        filter: PngFilter::Paeth,
    };
    let mut enc = NativeEncoder::open(&cfg, opts).unwrap();
    enc.send_frame(Some(&frame)).unwrap();
    enc.send_frame(None).unwrap();
    let img = decode(&drain(&mut enc));
    assert_eq!(img.to_rgba8().into_raw(), (0..16).collect::<Vec<u8>>());
}

#[test]
fn packets_only_after_frame_and_eof_after_flush() {
    let frame = Frame::new(1, 1, PixelFormat::Rgb8).unwrap();
    let cfg = EncoderConfig::for_frame(CodecId::Png, &frame);
    let mut enc = NativeEncoder::open(&cfg, PngOptions::default()).unwrap();
    assert_eq!(enc.receive_packet().unwrap(), Receive::NeedMore);
    enc.send_frame(Some(&frame)).unwrap();
    assert!(matches!(enc.receive_packet().unwrap(), Receive::Ready(_)));
    assert_eq!(enc.receive_packet().unwrap(), Receive::NeedMore);
    enc.send_frame(None).unwrap();
    assert_eq!(enc.receive_packet().unwrap(), Receive::Eof);
}

#[test]
fn second_frame_and_frame_after_flush_are_rejected() {
    let frame = Frame::new(1, 1, PixelFormat::Rgb8).unwrap();
    let cfg = EncoderConfig::for_frame(CodecId::Png, &frame);

    let mut enc = NativeEncoder::open(&cfg, PngOptions::default()).unwrap();
    enc.send_frame(Some(&frame)).unwrap();
    assert!(matches!(enc.send_frame(Some(&frame)), Err(InvertError::Encoder(_))));

    let mut enc = NativeEncoder::open(&cfg, PngOptions::default()).unwrap();
    enc.send_frame(None).unwrap();
    assert!(matches!(enc.send_frame(Some(&frame)), Err(InvertError::Encoder(_))));
}

#[test]
fn mismatched_frame_size_is_rejected() {
    let frame = Frame::new(2, 2, PixelFormat::Rgb8).unwrap();
    let other = Frame::new(3, 2, PixelFormat::Rgb8).unwrap();
    let cfg = EncoderConfig::for_frame(CodecId::Png, &frame);
    let mut enc = NativeEncoder::open(&cfg, PngOptions::default()).unwrap();
    assert!(matches!(enc.send_frame(Some(&other)), Err(InvertError::Encoder(_))));
}

#[test]
fn alpha_is_dropped_for_codecs_without_alpha() {
    assert_eq!(native_layout(CodecId::Jpeg, PixelFormat::Rgba8), PixelFormat::Rgb8);
    assert_eq!(native_layout(CodecId::Jpeg, PixelFormat::Bgra8), PixelFormat::Rgb8);
    assert_eq!(native_layout(CodecId::Pnm, PixelFormat::GrayAlpha8), PixelFormat::Gray8);
    assert_eq!(native_layout(CodecId::Png, PixelFormat::Bgra8), PixelFormat::Rgba8);
    assert_eq!(native_layout(CodecId::Png, PixelFormat::GrayAlpha8), PixelFormat::GrayAlpha8);
}

#[test]
fn bmp_encodes_through_dynamic_image() {
    let frame = Frame::from_packed(2, 1, PixelFormat::Rgb8, vec![10, 20, 30, 40, 50, 60]).unwrap();
    let cfg = EncoderConfig::for_frame(CodecId::Bmp, &frame);
    let mut enc = NativeEncoder::open(&cfg, PngOptions::default()).unwrap();
    enc.send_frame(Some(&frame)).unwrap();
    enc.send_frame(None).unwrap();
    let bytes = drain(&mut enc);
    assert_eq!(&bytes[..2], b"BM");
    assert_eq!(decode(&bytes).to_rgb8().into_raw(), vec![10, 20, 30, 40, 50, 60]);
}

#[test]
fn png_options_deserialize_with_defaults() {
    let o: PngOptions = serde_json::from_str(r#"{ "compression": "best" }"#).unwrap();
    assert_eq!(o.compression, PngCompression::Best);
    assert_eq!(o.filter, PngFilter::Adaptive);
}

#[test]
fn grey_frames_are_widened_for_qoi_and_tiff() {
    for (codec, format, color) in [
        (CodecId::Qoi, PixelFormat::Gray8, image::ColorType::Rgb8),
        (CodecId::Qoi, PixelFormat::GrayAlpha8, image::ColorType::Rgba8),
        (CodecId::Tiff, PixelFormat::GrayAlpha8, image::ColorType::Rgba8),
    ] {
        let bpp = format.bytes_per_pixel();
        let data = (0..16 * bpp).map(|i| (i * 13 % 256) as u8).collect();
        let frame = Frame::from_packed(4, 4, format, data).unwrap();
        let cfg = EncoderConfig::for_frame(codec, &frame);
        let mut enc = NativeEncoder::open(&cfg, PngOptions::default()).unwrap();
        let bytes = crate::encode::encoder::encode_frame(&mut enc, &frame).unwrap();

        let img = decode(&bytes);
        assert_eq!(img.color(), color, "{codec} {format}");
        let expected = frame.convert(PixelFormat::Rgba8);
        assert_eq!(img.to_rgba8().as_raw(), expected.data(), "{codec} {format}");
    }
}

#[test]
fn grey_layouts_stay_grey_where_the_codec_allows() {
    assert_eq!(native_layout(CodecId::Qoi, PixelFormat::Gray8), PixelFormat::Rgb8);
    assert_eq!(native_layout(CodecId::Qoi, PixelFormat::GrayAlpha8), PixelFormat::Rgba8);
    assert_eq!(native_layout(CodecId::Tiff, PixelFormat::GrayAlpha8), PixelFormat::Rgba8);
    assert_eq!(native_layout(CodecId::Tiff, PixelFormat::Gray8), PixelFormat::Gray8);
    assert_eq!(native_layout(CodecId::Png, PixelFormat::Gray8), PixelFormat::Gray8);
}
