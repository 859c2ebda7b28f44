//! Morphology demo: salt-and-pepper cleanup on a synthetic 8-bit image
//!
//! Builds a 240x320 image with a bright bar, a dark disk and single-pixel
//! salt (255) and pepper (0) noise, then writes every operator's output as
//! an 8-bit grayscale TIFF into `output/morphology_demo/`.
//!
//! Run:
//!   cargo run -p chordmorph-algorithms --example morphology_demo

use std::fs;
use std::path::Path;
use std::time::Instant;

use chordmorph_algorithms::morphology::{
    black_hat, closing, dilate_raster, erode_raster, gradient, opening, top_hat,
    StructuringElement,
};
use chordmorph_core::io::{write_tiff, SampleFormat, TiffOptions};
use chordmorph_core::Raster;

const ROWS: usize = 240;
const COLS: usize = 320;
const SALT: u8 = 255;
const PEPPER: u8 = 0;

fn main() {
    let out_dir = Path::new("output/morphology_demo");
    fs::create_dir_all(out_dir).expect("Cannot create output directory");

    let input = build_synthetic_image();
    println!("Synthetic image: {}x{}", COLS, ROWS);
    print_stats("input", &input);
    save(out_dir, "original.tif", &input);

    let se = StructuringElement::disk(1).unwrap();
    println!("\nStructuring element: disk(1), {} cells", se.on_count());

    type Op = fn(&Raster<u8>, &StructuringElement) -> chordmorph_core::Result<Raster<u8>>;
    let ops: [(&str, Op); 7] = [
        ("eroded", erode_raster),
        ("dilated", dilate_raster),
        ("opened", opening),
        ("closed", closing),
        ("gradient", gradient),
        ("tophat", top_hat),
        ("blackhat", black_hat),
    ];

    for (name, op) in ops {
        let start = Instant::now();
        let result = op(&input, &se).unwrap_or_else(|e| panic!("{} failed: {}", name, e));
        println!("{:<10} {:>8.2} ms", name, start.elapsed().as_secs_f64() * 1e3);
        print_stats(name, &result);
        save(out_dir, &format!("{}.tif", name), &result);
    }

    // Opening removes salt, closing then removes pepper
    let opened = opening(&input, &se).expect("opening failed");
    let cleaned = closing(&opened, &se).expect("closing failed");
    save(out_dir, "cleaned.tif", &cleaned);

    println!("\n--- Noise count ---");
    println!("  input:   salt = {}, pepper = {}", count(&input, SALT), count(&input, PEPPER));
    println!("  opened:  salt = {}", count(&opened, SALT));
    println!("  cleaned: salt = {}, pepper = {}", count(&cleaned, SALT), count(&cleaned, PEPPER));
    println!("\nTIFF files written to {}/", out_dir.display());
}

fn build_synthetic_image() -> Raster<u8> {
    let mut img = Raster::filled(ROWS, COLS, 90u8);

    // Bright horizontal bar
    for r in 40..90 {
        for c in 30..290 {
            img.set(r, c, 200).unwrap();
        }
    }

    // Dark disk centered at (165, 160), radius 50
    for r in 0..ROWS {
        for c in 0..COLS {
            let (dr, dc) = (r as f64 - 165.0, c as f64 - 160.0);
            if dr * dr + dc * dc <= 2500.0 {
                img.set(r, c, 30).unwrap();
            }
        }
    }

    // Isolated noise pixels on a coarse jittered grid so no two touch
    let mut seed: u64 = 42;
    let mut next = || {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        (seed >> 33) as usize
    };
    for gr in (4..ROWS - 4).step_by(12) {
        for gc in (4..COLS - 4).step_by(12) {
            let (r, c) = (gr + next() % 4, gc + next() % 4);
            let value = if next() % 2 == 0 { SALT } else { PEPPER };
            img.set(r, c, value).unwrap();
        }
    }

    img
}

fn count(raster: &Raster<u8>, value: u8) -> usize {
    raster.data().iter().filter(|&&v| v == value).count()
}

fn print_stats(label: &str, raster: &Raster<u8>) {
    let s = raster.statistics();
    println!(
        "  {:<10} min={:>3}  max={:>3}  mean={:>6.1}",
        label,
        s.min.unwrap_or_default(),
        s.max.unwrap_or_default(),
        s.mean.unwrap_or(f64::NAN),
    );
}

fn save(dir: &Path, name: &str, raster: &Raster<u8>) {
    let path = dir.join(name);
    let options = TiffOptions {
        format: SampleFormat::U8,
    };
    write_tiff(raster, &path, Some(options))
        .unwrap_or_else(|e| panic!("Failed to write {}: {}", path.display(), e));
}
