use super::*;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([x as u8 * 10, y as u8 * 10, 7, 200])
    });
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn open_missing_file_is_open_error() {
    let err = InputContainer::open(
        Path::new("target/container_unit/definitely_missing.png"),
        ContainerOpts::default(),
    )
    .unwrap_err();
    assert!(matches!(err, InvertError::Open(_)), "{err}");
}

#[test]
fn open_empty_file_is_open_error() {
    let dir = PathBuf::from("target").join("container_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("empty.png");
    std::fs::write(&path, b"").unwrap();
    let err = InputContainer::open(&path, ContainerOpts::default()).unwrap_err();
    assert!(matches!(err, InvertError::Open(_)), "{err}");
}

#[test]
fn find_stream_info_reads_png_header() {
    let mut c =
        InputContainer::from_memory("mem.png", png_bytes(5, 3), ContainerOpts::default()).unwrap();
    let info = c.find_stream_info().unwrap().clone();
    assert_eq!(info.index, 0);
    assert_eq!(info.codec, Some(CodecId::Png));
    assert_eq!(info.codec_name, "png");
    assert_eq!((info.width, info.height), (5, 3));
    assert_eq!(info.pixel_format, PixelFormat::Rgba8);
    assert_eq!(info.time_base, Rational::ONE);
    assert_eq!(c.stream(), Some(&info));
}

#[test]
fn find_stream_info_rejects_garbage() {
    let mut c = InputContainer::from_memory(
        "garbage.bin",
        b"this is not an image at all".to_vec(),
        ContainerOpts::default(),
    )
    .unwrap();
    let err = c.find_stream_info().unwrap_err();
    assert!(matches!(err, InvertError::Probe(_)), "{err}");
}

#[test]
fn find_stream_info_rejects_truncated_header() {
    let bytes = png_bytes(4, 4);
    let mut c =
        InputContainer::from_memory("cut.png", bytes[..12].to_vec(), ContainerOpts::default())
            .unwrap();
    assert!(matches!(c.find_stream_info(), Err(InvertError::Probe(_))));
}

#[test]
fn whole_stream_is_one_packet_by_default() {
    let bytes = png_bytes(2, 2);
    let mut c =
        InputContainer::from_memory("a.png", bytes.clone(), ContainerOpts::default()).unwrap();
    let p = c.read_packet().unwrap().unwrap();
    assert_eq!(p.data, bytes);
    assert_eq!(p.stream_index, 0);
    assert!(c.read_packet().unwrap().is_none());
    assert_eq!(c.packets_read(), 1);
}

#[test]
fn packets_are_split_and_reassemble() {
    let bytes = png_bytes(6, 6);
    let mut c = InputContainer::from_memory(
        "a.png",
        bytes.clone(),
        ContainerOpts {
            max_packet_size: Some(16),
        },
    )
    .unwrap();
    let mut joined = Vec::new();
    while let Some(p) = c.read_packet().unwrap() {
        assert!(p.len() <= 16);
        joined.extend_from_slice(&p.data);
    }
    assert_eq!(joined, bytes);
    assert_eq!(c.packets_read(), bytes.len().div_ceil(16));

    c.rewind();
    assert_eq!(c.packets_read(), 0);
    assert!(c.read_packet().unwrap().is_some());
}

#[test]
fn zero_packet_size_is_rejected() {
    let err = InputContainer::from_memory(
        "a.png",
        vec![1, 2, 3],
        ContainerOpts {
            max_packet_size: Some(0),
        },
    )
    .unwrap_err();
    assert!(matches!(err, InvertError::Validation(_)));
}
