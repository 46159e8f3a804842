//! Detect faces in images, save each crop, and print its brightness.
//!
//! Usage:
//!   cargo run --example scan_faces --features rustface -- <model.bin> <image>... [--fast]
//!
//! Crops are written next to each input as `<stem>_face<N>.png`.
//! Set `RUST_LOG=facecrop=debug` to see per-crop brightness sums.

use std::path::Path;

use facecrop::{FaceProcessor, PerformanceMode, RustfaceDetector};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let fast = args.iter().any(|a| a == "--fast");
    args.retain(|a| a != "--fast");

    let Some((model_path, images)) = args.split_first() else {
        eprintln!("usage: scan_faces <model.bin> <image>... [--fast]");
        std::process::exit(2);
    };

    let mode = if fast {
        PerformanceMode::Fast
    } else {
        PerformanceMode::Accurate
    };
    let detector = RustfaceDetector::from_path(model_path)
        .unwrap_or_else(|e| panic!("failed to load {model_path}: {e}"))
        .performance_mode(mode);
    let processor = FaceProcessor::new(Box::new(detector));

    for image_path in images {
        let path = Path::new(image_path);
        println!("=== {image_path} ===");

        let faces = match processor.detect(path) {
            Ok(faces) => faces,
            Err(e) => {
                println!("  error: {e}");
                continue;
            }
        };

        if faces.is_empty() {
            println!("  no faces detected");
            continue;
        }

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
        for (i, face) in faces.iter().enumerate() {
            let b = face.bounds;
            println!(
                "  face {i}: score={:.2}, box=({}, {}, {}, {}), brightness={:.4}",
                face.confidence, b.left, b.top, b.right, b.bottom, face.brightness
            );
            if face.crop.width() == 0 || face.crop.height() == 0 {
                continue;
            }
            let out = path.with_file_name(format!("{stem}_face{i}.png"));
            face.crop
                .save(&out)
                .unwrap_or_else(|e| panic!("failed to write {}: {e}", out.display()));
        }
        println!();
    }
}
