//! End-to-end tests for the artifact engine
//!
//! These tests exercise the full frame pipeline: working-range conversion,
//! padding, motion-driven block-size selection, and the quantization round
//! trip, for both integer and floating-point sample representations.

use jpegsim::engine::{ArtifactConfig, ArtifactEngine, MotionMask, MotionSettings};
use jpegsim::{BlockSizePicker, BlockSizes, PlaneData, SampleFormat, VideoFrame};
use ndarray::Array2;

// ============================================================================
// Helper Functions
// ============================================================================

/// Deterministic fallback picker for tests that need a reproducible
/// no-motion-mask path
struct FixedPicker(usize);

impl BlockSizePicker for FixedPicker {
    fn pick(&self, _sizes: &BlockSizes) -> usize {
        self.0
    }
}

/// 8-bit frame with constant luma and neutral (128) chroma
fn flat_frame_8bit(width: usize, height: usize, luma: u16) -> VideoFrame {
    let mut frame = VideoFrame::new(width, height, SampleFormat::Int { bit_depth: 8 });
    frame.planes[0] = PlaneData::Int(Array2::from_elem((height, width), luma));
    frame.planes[1] = PlaneData::Int(Array2::from_elem((height, width), 128));
    frame.planes[2] = PlaneData::Int(Array2::from_elem((height, width), 128));
    frame
}

/// 8-bit frame with a gradient pattern on every plane
fn gradient_frame_8bit(width: usize, height: usize) -> VideoFrame {
    let mut frame = VideoFrame::new(width, height, SampleFormat::Int { bit_depth: 8 });
    for (i, plane) in frame.planes.iter_mut().enumerate() {
        *plane = PlaneData::Int(Array2::from_shape_fn((height, width), |(r, c)| {
            ((r * 7 + c * 3 + i * 11) % 256) as u16
        }));
    }
    frame
}

fn int_plane(frame: &VideoFrame, index: usize) -> &Array2<u16> {
    match &frame.planes[index] {
        PlaneData::Int(data) => data,
        PlaneData::Float(_) => panic!("expected integer plane"),
    }
}

fn float_plane(frame: &VideoFrame, index: usize) -> &Array2<f32> {
    match &frame.planes[index] {
        PlaneData::Float(data) => data,
        PlaneData::Int(_) => panic!("expected float plane"),
    }
}

fn single_size_engine(width: usize, height: usize, size: usize, quality: u8) -> ArtifactEngine {
    let config = ArtifactConfig::builder()
        .dimensions(width, height)
        .quality(quality)
        .block_sizes([size])
        .build()
        .unwrap();
    ArtifactEngine::new(config).unwrap()
}

// ============================================================================
// DC-only content
// ============================================================================

#[test]
fn test_flat_luma_passes_through_unchanged() {
    // A constant 16x16 plane at quality 90 with a single 8x8 block size:
    // DC-only content survives the round trip exactly after rounding.
    let engine = single_size_engine(16, 16, 8, 90);
    let frame = flat_frame_8bit(16, 16, 100);
    let out = engine.process_frame(&frame, None).unwrap();

    assert!(int_plane(&out, 0).iter().all(|&v| v == 100));
    assert!(int_plane(&out, 1).iter().all(|&v| v == 128));
    assert!(int_plane(&out, 2).iter().all(|&v| v == 128));
}

// ============================================================================
// Ringing and block isolation
// ============================================================================

#[test]
fn test_spike_rings_inside_its_block_only() {
    // An isolated spike at low quality must spread energy across its whole
    // containing block while leaving the flat background untouched. The
    // background value 58 quantizes exactly at quality 10 (DC step 80, and
    // (58 - 128) * 8 is a multiple of it), so any change outside the spike's
    // block would be a cross-block leak.
    let engine = single_size_engine(48, 48, 8, 10);
    let mut frame = flat_frame_8bit(48, 48, 58);
    if let PlaneData::Int(data) = &mut frame.planes[0] {
        data[[20, 20]] = 255;
    }
    let out = engine.process_frame(&frame, None).unwrap();
    let luma = int_plane(&out, 0);

    let mut ringing_pixels = 0;
    for r in 0..48 {
        for c in 0..48 {
            let inside_spike_block = (16..24).contains(&r) && (16..24).contains(&c);
            let diff = (luma[[r, c]] as i32 - 58).abs();
            if inside_spike_block {
                if diff > 1 && (r, c) != (20, 20) {
                    ringing_pixels += 1;
                }
            } else {
                assert!(diff <= 1, "background leaked at ({}, {}): {}", r, c, diff);
            }
        }
    }
    assert!(
        ringing_pixels >= 8,
        "expected the spike's energy to spread, saw {} ringing pixels",
        ringing_pixels
    );
}

// ============================================================================
// Padding
// ============================================================================

#[test]
fn test_padding_never_leaks() {
    let config = ArtifactConfig::builder()
        .dimensions(13, 20)
        .quality(50)
        .block_sizes([4, 8, 16])
        .build()
        .unwrap();
    let engine = ArtifactEngine::with_picker(config, Box::new(FixedPicker(2))).unwrap();
    let frame = gradient_frame_8bit(13, 20);
    let out = engine.process_frame(&frame, None).unwrap();

    assert_eq!(out.width, 13);
    assert_eq!(out.height, 20);
    for plane in &out.planes {
        assert_eq!(plane.dim(), (20, 13));
    }
}

// ============================================================================
// Integer vs float representation
// ============================================================================

#[test]
fn test_int_and_float_paths_agree() {
    // The same content at the same quality must produce numerically
    // consistent artifacts regardless of sample representation. The pattern
    // keeps every DC term away from the quantizer's rounding boundary so the
    // f32 storage of the float frame cannot flip a coefficient.
    let mut int_frame = VideoFrame::new(32, 32, SampleFormat::Int { bit_depth: 8 });
    for plane in &mut int_frame.planes {
        *plane = PlaneData::Int(Array2::from_shape_fn((32, 32), |(r, c)| {
            96 + ((r + c) % 8) as u16
        }));
    }
    let mut float_frame = VideoFrame::new(32, 32, SampleFormat::Float);
    for i in 0..3 {
        let src = int_plane(&int_frame, i);
        float_frame.planes[i] = PlaneData::Float(if i == 0 {
            src.mapv(|v| v as f32 / 255.0)
        } else {
            src.mapv(|v| v as f32 / 255.0 - 0.5)
        });
    }

    let int_engine = single_size_engine(32, 32, 8, 50);
    let float_engine = single_size_engine(32, 32, 8, 50);
    let int_out = int_engine.process_frame(&int_frame, None).unwrap();
    let float_out = float_engine.process_frame(&float_frame, None).unwrap();

    for i in 0..3 {
        let ints = int_plane(&int_out, i);
        let floats = float_plane(&float_out, i);
        for (a, b) in ints.iter().zip(floats.iter()) {
            let b_scaled = if i == 0 {
                *b as f64 * 255.0
            } else {
                (*b as f64 + 0.5) * 255.0
            };
            // The integer path additionally rounds to the nearest code value.
            assert!(
                (*a as f64 - b_scaled).abs() <= 0.75,
                "plane {}: int {} vs float {}",
                i,
                a,
                b_scaled
            );
        }
    }
}

#[test]
fn test_float_flat_frame_close_to_input() {
    let engine = single_size_engine(16, 16, 8, 90);
    let mut frame = VideoFrame::new(16, 16, SampleFormat::Float);
    frame.planes[0] = PlaneData::Float(Array2::from_elem((16, 16), 100.0 / 255.0));
    let out = engine.process_frame(&frame, None).unwrap();

    for (p, (a, b)) in [
        (0, (float_plane(&out, 0), 100.0f32 / 255.0)),
        (1, (float_plane(&out, 1), 0.0)),
        (2, (float_plane(&out, 2), 0.0)),
    ] {
        assert!(
            a.iter().all(|v| (v - b).abs() < 1e-3),
            "plane {} drifted from {}",
            p,
            b
        );
    }
}

#[test]
fn test_ten_bit_flat_frame_within_dc_step() {
    let engine = single_size_engine(24, 24, 8, 50);
    let mut frame = VideoFrame::new(24, 24, SampleFormat::Int { bit_depth: 10 });
    for plane in &mut frame.planes {
        *plane = PlaneData::Int(Array2::from_elem((24, 24), 512));
    }
    let out = engine.process_frame(&frame, None).unwrap();
    assert_eq!(out.format, SampleFormat::Int { bit_depth: 10 });
    for i in 0..3 {
        for &v in int_plane(&out, i) {
            assert!((v as i32 - 512).abs() <= 8, "plane {}: {}", i, v);
        }
    }
}

// ============================================================================
// Motion-driven selection
// ============================================================================

#[test]
fn test_zero_motion_selects_smallest_size() {
    let adaptive = ArtifactEngine::with_picker(
        ArtifactConfig::builder()
            .dimensions(32, 32)
            .block_sizes([4, 8])
            .motion(MotionSettings {
                width: 32,
                height: 32,
                bit_depth: 8,
            })
            .build()
            .unwrap(),
        Box::new(FixedPicker(0)),
    )
    .unwrap();

    let frame = gradient_frame_8bit(32, 32);
    let mask = MotionMask {
        scores: Array2::zeros((32, 32)),
        bit_depth: 8,
    };
    let adaptive_out = adaptive.process_frame(&frame, Some(&mask)).unwrap();
    let reference_out = single_size_engine(32, 32, 4, 50)
        .process_frame(&frame, None)
        .unwrap();

    for i in 0..3 {
        assert_eq!(int_plane(&adaptive_out, i), int_plane(&reference_out, i));
    }
}

#[test]
fn test_saturated_motion_selects_largest_size() {
    let adaptive = ArtifactEngine::with_picker(
        ArtifactConfig::builder()
            .dimensions(32, 32)
            .block_sizes([4, 8])
            .motion(MotionSettings {
                width: 32,
                height: 32,
                bit_depth: 8,
            })
            .build()
            .unwrap(),
        Box::new(FixedPicker(1)),
    )
    .unwrap();

    let frame = gradient_frame_8bit(32, 32);
    let mask = MotionMask {
        scores: Array2::from_elem((32, 32), 255.0),
        bit_depth: 8,
    };
    let adaptive_out = adaptive.process_frame(&frame, Some(&mask)).unwrap();
    let reference_out = single_size_engine(32, 32, 8, 50)
        .process_frame(&frame, None)
        .unwrap();

    for i in 0..3 {
        assert_eq!(int_plane(&adaptive_out, i), int_plane(&reference_out, i));
    }
}

// ============================================================================
// Clip processing
// ============================================================================

#[test]
fn test_clip_without_motion_matches_per_frame() {
    let engine = single_size_engine(16, 16, 8, 35);
    let frames = vec![
        gradient_frame_8bit(16, 16),
        flat_frame_8bit(16, 16, 100),
        gradient_frame_8bit(16, 16),
    ];
    let clip_out = engine.process_clip(&frames).unwrap();
    assert_eq!(clip_out.len(), 3);
    for (frame, expected) in clip_out.iter().zip(&frames) {
        let direct = engine.process_frame(expected, None).unwrap();
        for i in 0..3 {
            assert_eq!(int_plane(frame, i), int_plane(&direct, i));
        }
    }
}

#[test]
fn test_clip_with_motion_source_runs_end_to_end() {
    let config = ArtifactConfig::builder()
        .dimensions(32, 16)
        .quality(25)
        .block_sizes([4, 8, 16])
        .motion(MotionSettings {
            width: 32,
            height: 16,
            bit_depth: 8,
        })
        .build()
        .unwrap();
    let engine = ArtifactEngine::new(config).unwrap();

    let frames = vec![
        flat_frame_8bit(32, 16, 60),
        gradient_frame_8bit(32, 16),
        flat_frame_8bit(32, 16, 200),
        gradient_frame_8bit(32, 16),
    ];
    let out = engine.process_clip(&frames).unwrap();
    assert_eq!(out.len(), frames.len());
    for frame in &out {
        assert_eq!(frame.width, 32);
        assert_eq!(frame.height, 16);
        assert_eq!(frame.format, SampleFormat::Int { bit_depth: 8 });
        frame.validate().unwrap();
    }
}
