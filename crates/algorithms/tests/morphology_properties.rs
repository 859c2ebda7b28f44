//! Property and scenario tests for chord-based erosion and dilation
//!
//! Random inputs come from a small LCG so every run sees the same cases.

use chordmorph_algorithms::morphology::{
    closing, decompose_chords, dilate, dilate_with, erode, erode_with, morphology, opening,
    ChordPolicy, MorphOp, MorphologyContext, MorphologyOptions, ProcessingMode, RowCombiner,
    RowLookupTable, StructuringElement,
};
use chordmorph_core::{Raster, RasterElement};

struct Lcg(u64);

impl Lcg {
    fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    fn below(&mut self, n: u32) -> u32 {
        self.next_u32() % n
    }

    fn image_u16(&mut self, width: usize, height: usize) -> Vec<u16> {
        (0..width * height).map(|_| self.next_u32() as u16).collect()
    }

    fn image_u8(&mut self, width: usize, height: usize, levels: u32) -> Vec<u8> {
        (0..width * height)
            .map(|_| (self.below(levels) * (255 / (levels - 1).max(1))) as u8)
            .collect()
    }

    /// Random mask with at least one "on" cell, `density` in percent
    fn element(&mut self, width: usize, height: usize, density: u32) -> StructuringElement {
        let mut mask: Vec<u8> = (0..width * height)
            .map(|_| u8::from(self.below(100) < density))
            .collect();
        if mask.iter().all(|&v| v == 0) {
            let idx = self.below((width * height) as u32) as usize;
            mask[idx] = 1;
        }
        StructuringElement::from_mask(&mask, width, height).unwrap()
    }

    /// Random element equal to its own point reflection, containing its center
    fn symmetric_element(&mut self, radius: usize) -> StructuringElement {
        let side = 2 * radius + 1;
        let mut mask = vec![0u8; side * side];
        for i in 0..=side * side / 2 {
            let on = u8::from(self.below(100) < 45);
            mask[i] = on;
            mask[side * side - 1 - i] = on;
        }
        mask[side * side / 2] = 1;
        StructuringElement::from_mask(&mask, side, side).unwrap()
    }
}

/// Direct min/max over every "on" offset, out-of-frame offsets ignored
fn brute_force<T: RasterElement>(
    op: MorphOp,
    samples: &[T],
    width: usize,
    height: usize,
    element: &StructuringElement,
) -> Vec<T> {
    let offsets = element.offsets();
    let mut out = Vec::with_capacity(samples.len());
    for row in 0..height as isize {
        for col in 0..width as isize {
            let mut acc = op.identity::<T>();
            for &(dr, dc) in &offsets {
                let (r, c) = (row + dr, col + dc);
                if r >= 0 && c >= 0 && r < height as isize && c < width as isize {
                    acc = op.combine(acc, samples[r as usize * width + c as usize]);
                }
            }
            out.push(acc);
        }
    }
    out
}

fn pad() -> MorphologyOptions {
    MorphologyOptions::default().with_policy(ChordPolicy::Pad)
}

fn assert_le<T: RasterElement>(lower: &Raster<T>, upper: &Raster<T>, what: &str) {
    for (i, (a, b)) in lower.data().iter().zip(upper.data().iter()).enumerate() {
        assert!(a <= b, "{what}: {a:?} > {b:?} at index {i}");
    }
}

#[test]
fn test_matches_brute_force_on_random_elements() {
    let mut rng = Lcg(0x5eed);
    let (width, height) = (16, 16);

    for case in 0..120 {
        let se_w = 1 + rng.below(7) as usize;
        let se_h = 1 + rng.below(7) as usize;
        let density = [15, 40, 70, 100][case % 4];
        let se = rng.element(se_w, se_h, density);
        let samples = rng.image_u16(width, height);

        for op in [MorphOp::Erode, MorphOp::Dilate] {
            let fast = match op {
                MorphOp::Erode => erode(&samples, width, height, &se),
                MorphOp::Dilate => dilate(&samples, width, height, &se),
            }
            .unwrap();
            let slow = brute_force(op, &samples, width, height, &se);
            assert_eq!(fast, slow, "case {case}: {} with {se:?}", op.name());
        }
    }
}

#[test]
fn test_matches_brute_force_with_moved_center() {
    let mut rng = Lcg(42);
    let (width, height) = (16, 16);

    for case in 0..40 {
        let se = rng.element(5, 4, 50);
        let center = (rng.below(4) as usize, rng.below(5) as usize);
        let se = se.with_center(center.0, center.1).unwrap();
        let samples = rng.image_u8(width, height, 256);

        for op in [MorphOp::Erode, MorphOp::Dilate] {
            let fast = match op {
                MorphOp::Erode => erode(&samples, width, height, &se),
                MorphOp::Dilate => dilate(&samples, width, height, &se),
            }
            .unwrap();
            assert_eq!(
                fast,
                brute_force(op, &samples, width, height, &se),
                "case {case}: {} centered at {center:?}",
                op.name()
            );
        }
    }
}

#[test]
fn test_disjoint_chords_and_element_larger_than_image() {
    // Two chords per row with a gap, plus a lone cell
    let se = StructuringElement::from_rows(&[
        vec![true, true, false, false, true, true, true],
        vec![false, false, false, true, false, false, false],
        vec![true, false, true, false, true, false, true],
    ])
    .unwrap();
    assert_eq!(decompose_chords(&se).unwrap().len(), 7);

    let mut rng = Lcg(7);
    for (width, height) in [(16, 16), (3, 2), (1, 1), (2, 9)] {
        let samples = rng.image_u16(width, height);
        for op in [MorphOp::Erode, MorphOp::Dilate] {
            let fast = morphology(op, &samples, width, height, &se, &pad()).unwrap();
            assert_eq!(fast, brute_force(op, &samples, width, height, &se), "{width}x{height}");
        }
    }
}

#[test]
fn test_float_samples_match_brute_force() {
    let mut rng = Lcg(99);
    let (width, height) = (11, 13);
    let samples: Vec<f64> = (0..width * height)
        .map(|_| rng.next_u32() as f64 / 1000.0 - 2000.0)
        .collect();
    let se = StructuringElement::disk(3).unwrap();

    let eroded = erode(&samples, width, height, &se).unwrap();
    let dilated = dilate(&samples, width, height, &se).unwrap();
    assert_eq!(eroded, brute_force(MorphOp::Erode, &samples, width, height, &se));
    assert_eq!(dilated, brute_force(MorphOp::Dilate, &samples, width, height, &se));
    assert!(eroded.iter().all(|v| v.is_finite()));
}

#[test]
fn test_center_only_element_is_identity() {
    let mut rng = Lcg(3);
    let se = StructuringElement::from_mask(&[0u8, 0, 0, 0, 1, 0, 0, 0, 0], 3, 3).unwrap();
    for (width, height) in [(16, 16), (1, 1), (7, 1), (1, 7)] {
        let samples = rng.image_u16(width, height);
        assert_eq!(erode(&samples, width, height, &se).unwrap(), samples);
        assert_eq!(dilate(&samples, width, height, &se).unwrap(), samples);
    }
}

#[test]
fn test_erode_below_image_below_dilate() {
    let mut rng = Lcg(11);
    let (width, height) = (20, 17);

    for _ in 0..30 {
        let (se_w, se_h) = (1 + rng.below(7) as usize, 1 + rng.below(7) as usize);
        let mut se = rng.element(se_w, se_h, 50);
        // Ordering needs the anchor cell switched on
        if !se.contains_center() {
            let (cr, cc) = se.center();
            let mut mask: Vec<u8> = se.rows().flatten().map(|&on| u8::from(on)).collect();
            mask[cr * se.width() + cc] = 1;
            se = StructuringElement::from_mask(&mask, se.width(), se.height()).unwrap();
        }
        let image = Raster::from_vec(rng.image_u16(width, height), height, width).unwrap();
        let samples = image.samples();
        let eroded = erode_with(&samples, width, height, &se, &pad()).unwrap();
        let dilated = dilate_with(&samples, width, height, &se, &pad()).unwrap();
        let eroded = Raster::from_vec(eroded, height, width).unwrap();
        let dilated = Raster::from_vec(dilated, height, width).unwrap();

        assert_le(&eroded, &image, "erode <= image");
        assert_le(&image, &dilated, "image <= dilate");
    }
}

#[test]
fn test_opening_is_idempotent() {
    let mut rng = Lcg(1234);
    for radius in 1..=3 {
        let se = rng.symmetric_element(radius);
        let image = Raster::from_vec(rng.image_u8(18, 15, 6), 15, 18).unwrap();

        let once = opening(&image, &se).unwrap();
        let twice = opening(&once, &se).unwrap();
        assert_eq!(twice, once, "opening not idempotent for {se:?}");
    }
}

#[test]
fn test_extensivity_chain() {
    let mut rng = Lcg(555);
    let elements = [
        StructuringElement::square(1).unwrap(),
        StructuringElement::cross(2).unwrap(),
        StructuringElement::disk(3).unwrap(),
        rng.symmetric_element(2),
    ];

    for se in &elements {
        let image = Raster::from_vec(rng.image_u16(21, 19), 19, 21).unwrap();
        let (w, h) = (image.cols(), image.rows());
        let samples = image.samples();

        let eroded = Raster::from_vec(erode(&samples, w, h, se).unwrap(), h, w).unwrap();
        let dilated = Raster::from_vec(dilate(&samples, w, h, se).unwrap(), h, w).unwrap();
        let opened = opening(&image, se).unwrap();
        let closed = closing(&image, se).unwrap();

        assert_le(&eroded, &opened, "erode <= opening");
        assert_le(&opened, &image, "opening <= image");
        assert_le(&image, &closed, "image <= closing");
        assert_le(&closed, &dilated, "closing <= dilate");
    }
}

#[test]
fn test_five_by_five_center_pit() {
    let mut samples = vec![10u16; 25];
    samples[12] = 0;
    let se = StructuringElement::square(1).unwrap();
    assert_eq!(decompose_chords(&se).unwrap().len(), 3);

    let eroded = erode(&samples, 5, 5, &se).unwrap();
    for row in 0..5 {
        for col in 0..5 {
            let near = (1..=3).contains(&row) && (1..=3).contains(&col);
            let expected = if near { 0 } else { 10 };
            assert_eq!(eroded[row * 5 + col], expected, "pixel ({row}, {col})");
        }
    }
}

#[test]
fn test_single_row_image_with_tall_element() {
    let rows = [
        vec![true, true, true, true, true],
        vec![false, true, false, true, false],
        vec![true, false, true, true, false],
        vec![true, true, true, true, true],
        vec![false, false, true, false, false],
    ];
    let tall = StructuringElement::from_rows(&rows).unwrap();
    let middle = StructuringElement::from_rows(&rows[2..3]).unwrap();
    assert_eq!(tall.center(), (2, 2));
    assert_eq!(middle.center(), (0, 2));

    let samples: Vec<i32> = vec![5, -3, 8, 0, 12, -7, 4, 4, 9];
    for op in [MorphOp::Erode, MorphOp::Dilate] {
        let from_tall = morphology(op, &samples, samples.len(), 1, &tall, &pad()).unwrap();
        let from_middle = morphology(op, &samples, samples.len(), 1, &middle, &pad()).unwrap();
        assert_eq!(from_tall, from_middle, "{}", op.name());
    }
}

#[test]
fn test_incremental_rotation_matches_rebuild() {
    let mut rng = Lcg(2024);
    let se = rng.element(5, 9, 55);
    assert_eq!(se.height(), 9);
    let (width, height) = (23, 50);
    let samples = rng.image_u16(width, height);

    let ctx = MorphologyContext::new(decompose_chords(&se).unwrap(), ChordPolicy::Pad).unwrap();
    assert_eq!(ctx.window_height(), 9);

    for op in [MorphOp::Erode, MorphOp::Dilate] {
        let combiner = RowCombiner::new(&ctx, op).unwrap();
        let mut rolling = RowLookupTable::new(&ctx, op, &samples, width, height, 0).unwrap();
        let mut fresh = rolling.clone();

        for row in 0..height {
            if row > 0 {
                rolling.advance();
            }
            fresh.build_at(row);
            assert_eq!(rolling.row(), row);

            for logical in 0..rolling.window_height() {
                for level in 0..rolling.ladder_len() {
                    assert_eq!(
                        rolling.level(logical, level),
                        fresh.level(logical, level),
                        "{} row {row}, slot {logical}, level {level}",
                        op.name()
                    );
                }
            }

            let mut a = vec![op.identity::<u16>(); width];
            let mut b = a.clone();
            combiner.combine_row(&rolling, &mut a);
            combiner.combine_row(&fresh, &mut b);
            assert_eq!(a, b, "{} row {row}", op.name());
        }
    }
}

#[test]
fn test_policies_agree_on_symmetric_elements() {
    let mut rng = Lcg(8);
    let (width, height) = (14, 12);
    for se in [
        StructuringElement::square(2).unwrap(),
        StructuringElement::disk(2).unwrap(),
        rng.symmetric_element(3),
    ] {
        let samples = rng.image_u16(width, height);
        let reference = erode(&samples, width, height, &se).unwrap();
        for policy in [ChordPolicy::Reject, ChordPolicy::Skip, ChordPolicy::Pad] {
            let opts = MorphologyOptions::default().with_policy(policy);
            assert_eq!(erode_with(&samples, width, height, &se, &opts).unwrap(), reference);
        }
    }
}

#[test]
fn test_even_and_one_sided_elements_by_default() {
    let samples: Vec<u8> = vec![5, 1, 7, 3, 9, 2, 4, 8, 6];

    // Anchor (1, 1): the window is the cell and its up-left neighbours
    let square = StructuringElement::rectangle(2, 2).unwrap();
    let eroded = erode(&samples, 3, 3, &square).unwrap();
    assert_eq!(eroded, vec![5, 1, 1, 3, 1, 1, 3, 3, 2]);
    assert_eq!(eroded, brute_force(MorphOp::Erode, &samples, 3, 3, &square));

    // Only the cell below and its right neighbour; the last row sees nothing
    let below = StructuringElement::from_mask(&[0u8, 0, 0, 0, 0, 0, 0, 1, 1], 3, 3).unwrap();
    let dilated = dilate(&samples, 3, 3, &below).unwrap();
    assert_eq!(dilated, vec![9, 9, 2, 8, 8, 6, 0, 0, 0]);
    assert_eq!(dilated, brute_force(MorphOp::Dilate, &samples, 3, 3, &below));
}

#[test]
fn test_policies_on_off_center_element() {
    // Offsets -2..=1; the span only justifies one column of padding
    let se = StructuringElement::horizontal_line(4).unwrap();
    let samples: Vec<u8> = vec![9, 3, 7, 1, 8, 6, 2, 5];
    let width = samples.len();

    let strict = MorphologyOptions::default().with_policy(ChordPolicy::Reject);
    let err = erode_with(&samples, width, 1, &se, &strict).unwrap_err();
    assert!(err.is_invalid_argument(), "unexpected error: {err}");

    let exact = erode_with(&samples, width, 1, &se, &pad()).unwrap();
    assert_eq!(exact, brute_force(MorphOp::Erode, &samples, width, 1, &se));
    assert_eq!(erode(&samples, width, 1, &se).unwrap(), exact);

    let skip = MorphologyOptions::default().with_policy(ChordPolicy::Skip);
    let lossy = erode_with(&samples, width, 1, &se, &skip).unwrap();
    // Column 0's only chord starts left of the padded row and is dropped
    assert_eq!(lossy[0], u8::MAX);
    assert_ne!(lossy[0], exact[0]);
    assert_eq!(lossy[1..], exact[1..]);
}

#[test]
fn test_parallel_matches_sequential() {
    let mut rng = Lcg(77);
    let se = rng.element(7, 7, 60);
    for (width, height) in [(31, 200), (5, 3), (64, 37), (1, 90)] {
        let samples = rng.image_u16(width, height);
        for op in [MorphOp::Erode, MorphOp::Dilate] {
            let seq = morphology(op, &samples, width, height, &se, &pad()).unwrap();
            for mode in [
                ProcessingMode::Parallel,
                ProcessingMode::ParallelWith(2),
                ProcessingMode::ParallelWith(7),
            ] {
                let par =
                    morphology(op, &samples, width, height, &se, &pad().with_mode(mode)).unwrap();
                assert_eq!(par, seq, "{} {width}x{height} {mode:?}", op.name());
            }
        }
    }
}
