use ndarray::{array, Array2};

use ndvi_core::consts::{LABEL_SCALE_U16, LABEL_SCALE_U8};
use ndvi_core::encode::{encode, encode_labels, EncodedRaster, EncodingConfig, OutputDepth};
use ndvi_core::error::NdviError;

// ---------------------------------------------------------------------------
// encode_labels
// ---------------------------------------------------------------------------

#[test]
fn test_encode_shape_for_requested_channels() {
    let labels = Array2::<u8>::from_elem((4, 6), 1);
    for channels in [1usize, 3, 4] {
        let out = encode_labels(&labels.view(), channels, 85u8).unwrap();
        assert_eq!(out.dim(), (4, 6, channels));
    }
}

#[test]
fn test_encode_zero_labels_stay_zero() {
    let labels = Array2::<u8>::zeros((3, 3));
    for scale in [0u16, 1, 85, 257, u16::MAX] {
        let out = encode_labels(&labels.view(), 3, scale).unwrap();
        assert!(out.iter().all(|&v| v == 0), "scale {scale}");
    }
}

#[test]
fn test_encode_replicates_across_channels() {
    let labels = array![[0u8, 1], [2, 3]];
    let out = encode_labels(&labels.view(), 3, LABEL_SCALE_U8 as u8).unwrap();
    for c in 0..3 {
        assert_eq!(out[[0, 0, c]], 0);
        assert_eq!(out[[0, 1, c]], 85);
        assert_eq!(out[[1, 0, c]], 170);
        assert_eq!(out[[1, 1, c]], 255);
    }
}

#[test]
fn test_encode_widens_before_multiplying() {
    let labels = array![[255u8]];
    let out = encode_labels(&labels.view(), 1, LABEL_SCALE_U16).unwrap();
    assert_eq!(out[[0, 0, 0]], 65535);
}

#[test]
fn test_encode_saturates_on_overflow() {
    let labels = array![[4u8]];
    let out = encode_labels(&labels.view(), 1, 85u8).unwrap();
    assert_eq!(out[[0, 0, 0]], 255);
}

#[test]
fn test_encode_zero_channels_rejected() {
    let labels = Array2::<u8>::zeros((2, 2));
    let err = encode_labels(&labels.view(), 0, 85u8).unwrap_err();
    assert!(matches!(err, NdviError::InvalidShape { .. }), "got {err:?}");
}

// ---------------------------------------------------------------------------
// EncodingConfig
// ---------------------------------------------------------------------------

#[test]
fn test_resolve_scale_from_depth() {
    let eight = EncodingConfig {
        channels: 1,
        depth: OutputDepth::Eight,
        scale: None,
    };
    assert_eq!(eight.resolve_scale(3), 85);

    let sixteen = EncodingConfig::default();
    assert_eq!(sixteen.resolve_scale(3), 21845);
    assert_eq!(sixteen.resolve_scale(255), 257);
    assert_eq!(sixteen.resolve_scale(0), 1);
}

#[test]
fn test_resolve_scale_explicit_wins() {
    let cfg = EncodingConfig {
        scale: Some(257),
        ..Default::default()
    };
    assert_eq!(cfg.resolve_scale(3), 257);
}

#[test]
fn test_encoding_config_default() {
    let cfg = EncodingConfig::default();
    assert_eq!(cfg.channels, 3);
    assert_eq!(cfg.depth, OutputDepth::Sixteen);
    assert_eq!(cfg.scale, None);
}

// ---------------------------------------------------------------------------
// encode
// ---------------------------------------------------------------------------

#[test]
fn test_encode_eight_bit() {
    let labels = array![[2u8, 0], [1, 3]];
    let cfg = EncodingConfig {
        channels: 1,
        depth: OutputDepth::Eight,
        scale: None,
    };
    match encode(&labels.view(), &cfg, 3).unwrap() {
        EncodedRaster::U8(a) => {
            assert_eq!(a.dim(), (2, 2, 1));
            assert_eq!(a[[0, 0, 0]], 170);
            assert_eq!(a[[1, 1, 0]], 255);
        }
        other => panic!("expected 8-bit output, got {:?}", other.depth()),
    }
}

#[test]
fn test_encode_sixteen_bit() {
    let labels = array![[3u8, 1]];
    let encoded = encode(&labels.view(), &EncodingConfig::default(), 3).unwrap();
    assert_eq!(encoded.depth(), OutputDepth::Sixteen);
    assert_eq!(encoded.dim(), (1, 2, 3));
    match encoded {
        EncodedRaster::U16(a) => {
            assert_eq!(a[[0, 0, 2]], 65535);
            assert_eq!(a[[0, 1, 0]], 21845);
        }
        EncodedRaster::U8(_) => panic!("expected 16-bit output"),
    }
}

#[test]
fn test_encode_eight_bit_clamps_wide_scale() {
    let labels = array![[1u8]];
    let cfg = EncodingConfig {
        channels: 1,
        depth: OutputDepth::Eight,
        scale: Some(300),
    };
    match encode(&labels.view(), &cfg, 1).unwrap() {
        EncodedRaster::U8(a) => assert_eq!(a[[0, 0, 0]], 255),
        EncodedRaster::U16(_) => panic!("expected 8-bit output"),
    }
}

#[test]
fn test_output_depth_display() {
    assert_eq!(format!("{}", OutputDepth::Eight), "8-bit");
    assert_eq!(format!("{}", OutputDepth::Sixteen), "16-bit");
    assert_eq!(OutputDepth::Eight.max_value(), 255);
}
