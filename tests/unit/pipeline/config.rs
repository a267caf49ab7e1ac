use super::*;
use crate::encode::native::{PngCompression, PngFilter};

#[test]
fn empty_json_is_the_default_config() {
    let cfg: InvertConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, InvertConfig::default());
    assert_eq!(cfg.input, PathBuf::from("traffic_map_2020_12_01_03_40.png"));
    assert_eq!(cfg.output, PathBuf::from("inverted.png"));
    assert_eq!(cfg.backend, BackendKind::Native);
    assert!(cfg.overwrite);
    assert_eq!(cfg.row_alignment, 1);
    cfg.validate().unwrap();
}

#[test]
fn json_fields_override_defaults() {
    let cfg: InvertConfig = serde_json::from_str(
        r#"{
            "input": "in.jpg",
            "output": "out/x.bmp",
            "codec": "bmp",
            "overwrite": false,
            "max_packet_size": 512,
            "row_alignment": 32,
            "png": { "compression": "best", "filter": "paeth" }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.input, PathBuf::from("in.jpg"));
    assert_eq!(cfg.codec, Some(CodecId::Bmp));
    assert!(!cfg.overwrite);
    assert_eq!(cfg.max_packet_size, Some(512));
    assert_eq!(cfg.row_alignment, 32);
    assert_eq!(cfg.png.compression, PngCompression::Best);
    assert_eq!(cfg.png.filter, PngFilter::Paeth);
    assert_eq!(cfg.backend_settings().png, cfg.png);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = serde_json::from_str::<InvertConfig>(r#"{"inputt": "a.png"}"#).unwrap_err();
    assert!(err.to_string().contains("inputt"), "{err}");
}

#[test]
fn validate_rejects_degenerate_values() {
    let bad = [
        InvertConfig {
            input: PathBuf::new(),
            ..InvertConfig::default()
        },
        InvertConfig {
            output: PathBuf::new(),
            ..InvertConfig::default()
        },
        InvertConfig {
            max_packet_size: Some(0),
            ..InvertConfig::default()
        },
        InvertConfig {
            row_alignment: 0,
            ..InvertConfig::default()
        },
    ];
    for cfg in bad {
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, InvertError::Validation(_)), "{err}");
    }
}

#[test]
fn output_codec_resolution_order() {
    let mut cfg = InvertConfig {
        output: PathBuf::from("out.jpg"),
        codec: Some(CodecId::Bmp),
        ..InvertConfig::default()
    };
    assert_eq!(cfg.resolve_output_codec(Some(CodecId::Gif)), CodecId::Bmp);

    cfg.codec = None;
    assert_eq!(cfg.resolve_output_codec(Some(CodecId::Gif)), CodecId::Jpeg);

    cfg.output = PathBuf::from("out.raw");
    assert_eq!(cfg.resolve_output_codec(Some(CodecId::Gif)), CodecId::Gif);
    assert_eq!(cfg.resolve_output_codec(None), CodecId::Png);
}

#[test]
fn from_path_reads_and_reports_errors() {
    let dir = PathBuf::from("target").join("config_unit");
    std::fs::create_dir_all(&dir).unwrap();

    let good = dir.join("good.json");
    std::fs::write(&good, r#"{"output": "elsewhere.png"}"#).unwrap();
    let cfg = InvertConfig::from_path(&good).unwrap();
    assert_eq!(cfg.output, PathBuf::from("elsewhere.png"));

    let broken = dir.join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    let err = InvertConfig::from_path(&broken).unwrap_err();
    assert!(format!("{err:#}").contains("parse config JSON"), "{err:#}");

    let err = InvertConfig::from_path(&dir.join("missing.json")).unwrap_err();
    assert!(matches!(err, InvertError::Other(_)), "{err}");
}

#[test]
fn config_round_trips_through_json() {
    let cfg = InvertConfig {
        codec: Some(CodecId::WebP),
        max_packet_size: Some(64),
        ..InvertConfig::default()
    };
    let json = serde_json::to_string(&cfg).unwrap();
    assert!(json.contains("\"webp\""), "{json}");
    let back: InvertConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cfg);
}
