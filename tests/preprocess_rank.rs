use image::{DynamicImage, Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sketch_nn::{rank, scale, LabelTable, TargetSize, TensorData};

fn random_image(rng: &mut StdRng, width: u32, height: u32) -> DynamicImage {
    let mut img = RgbaImage::new(width, height);
    for px in img.pixels_mut() {
        *px = Rgba([rng.gen(), rng.gen(), rng.gen(), 255]);
    }
    DynamicImage::ImageRgba8(img)
}

fn labels(n: usize) -> LabelTable {
    LabelTable::from_labels((0..n).map(|i| format!("c{}", i)).collect()).unwrap()
}

#[test]
fn scaled_float_tensor_has_target_layout_and_unit_range() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let (w, h) = (rng.gen_range(1..80), rng.gen_range(1..80));
        let img = random_image(&mut rng, w, h);
        let target = TargetSize::new(rng.gen_range(1..40), rng.gen_range(1..40), rng.gen_range(1..=3));

        let tensor = scale(&img, target, false).unwrap();
        let expected = target.height as usize * target.width as usize * target.channels;
        assert_eq!(tensor.len(), expected);
        assert_eq!(tensor.shape(), target.shape());
        match tensor.data() {
            TensorData::Float(values) => {
                assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
            }
            TensorData::Quantized(_) => panic!("expected float tensor"),
        }
    }
}

#[test]
fn quantized_tensor_matches_float_tensor_scaled_by_255() {
    let mut rng = StdRng::seed_from_u64(11);
    let img = random_image(&mut rng, 37, 23);
    let target = TargetSize::new(16, 16, 3);

    let q = scale(&img, target, true).unwrap();
    let f = scale(&img, target, false).unwrap();
    let (TensorData::Quantized(bytes), TensorData::Float(values)) = (q.data(), f.data()) else {
        panic!("unexpected element kinds");
    };
    assert_eq!(bytes.len(), values.len());
    for (b, v) in bytes.iter().zip(values) {
        assert!((*b as f32 / 255.0 - v).abs() < 1e-6);
    }
}

#[test]
fn ranking_is_sorted_stable_and_bounded() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let n = rng.gen_range(1..60);
        // Coarse values so ties are common.
        let output: Vec<f32> = (0..n).map(|_| rng.gen_range(0..5) as f32 / 4.0).collect();
        let top_k = rng.gen_range(1..80);

        let ranked = rank(&output, &labels(n), top_k).unwrap();
        assert_eq!(ranked.len(), top_k.min(n));

        for pair in ranked.predictions.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.confidence >= b.confidence);
            if a.confidence == b.confidence {
                assert!(a.class_index < b.class_index);
            }
        }
        for p in ranked.iter() {
            assert_eq!(p.confidence, output[p.class_index]);
            assert_eq!(p.label, format!("c{}", p.class_index));
        }
        // Nothing left out scores higher than the last kept prediction.
        let last = ranked.predictions.last().unwrap();
        let kept: Vec<usize> = ranked.iter().map(|p| p.class_index).collect();
        for (i, &c) in output.iter().enumerate() {
            if !kept.contains(&i) {
                assert!(c < last.confidence || (c == last.confidence && i > last.class_index));
            }
        }
    }
}
