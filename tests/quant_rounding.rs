use aqtsim::quant::{self, round_half_up, QuantRange};
use aqtsim::Matrix;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[test]
fn round_half_up_cases() {
    assert_eq!(round_half_up(-0.5), 0.0);
    assert_eq!(round_half_up(0.49), 0.0);
    assert_eq!(round_half_up(0.5), 1.0);
    assert_eq!(round_half_up(-1.5), -1.0);
    // not banker's rounding
    assert_eq!(round_half_up(2.5), 3.0);
    assert_eq!(round_half_up(-2.5), -2.0);
}

#[test]
fn clipped_activations_stay_in_range() {
    let mut rng = SmallRng::seed_from_u64(7);
    let data: Vec<f32> = (0..400).map(|_| rng.gen_range(-100.0f32..100.0)).collect();
    let a = Matrix::new(20, 20, data).unwrap();
    let q = quant::quantize_activation(&a, 3.0, QuantRange::INT8);
    for &v in q.as_slice() {
        assert!((-127.0..=127.0).contains(&v), "out of range: {}", v);
        assert_eq!(v, v.round(), "not integer-valued: {}", v);
    }
}

#[test]
fn in_range_values_unchanged_by_clip() {
    let a = Matrix::from_rows(vec![vec![-127.0, -3.0, 0.0, 42.0, 127.0]]).unwrap();
    let q = quant::quantize_activation(&a, 1.0, QuantRange::INT8);
    assert_eq!(q, a);
}

#[test]
fn weight_scale_maps_max_to_upper() {
    let mut rng = SmallRng::seed_from_u64(11);
    for _ in 0..50 {
        let data: Vec<f32> = (0..24).map(|_| rng.gen_range(-2.0f32..2.0)).collect();
        let w = Matrix::new(4, 6, data).unwrap();
        let s = quant::weight_scale(&w, QuantRange::INT8).unwrap();
        assert!((s * w.max_abs() - 127.0).abs() < 1e-3);
        let q = quant::quantize_weights(&w, s);
        assert!(q.max_abs() <= 127.0);
    }
}

#[test]
fn weight_scale_rejects_zero_and_nan() {
    assert_eq!(quant::weight_scale(&Matrix::zeros(3, 3), QuantRange::INT8), Err(aqtsim::AqtError::DegenerateWeights));
    let w = Matrix::from_rows(vec![vec![1.0, f32::NAN]]).unwrap();
    assert_eq!(quant::weight_scale(&w, QuantRange::INT8), Err(aqtsim::AqtError::NonFinite("weights")));
}
