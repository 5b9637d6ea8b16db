use image::{ImageReader, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_circle_mut;
use std::time::Instant;
use track_detect::{ConfiguredDetector, DetectorBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("DetectorBuilder demo");
    println!("====================\n");

    let path = std::env::args().nth(1).unwrap_or_else(|| "frame.png".to_string());
    let img = ImageReader::open(&path)
        .map_err(|e| format!("Failed to open image {}: {}", path, e))?
        .decode()
        .map_err(|e| format!("Failed to decode image: {}", e))?
        .to_luma8();

    let (w, h) = img.dimensions();
    let (width, height) = (w as usize, h as usize);
    println!("Processing image: {}x{}", width, height);

    let runs = [
        ("Shi-Tomasi", DetectorBuilder::new(width, height).preset_shi_tomasi()),
        ("Harris", DetectorBuilder::new(width, height).preset_harris()),
        ("Harris, tolerant overlap", DetectorBuilder::new(width, height).min_response(120.0).max_overlap(0.3)),
        ("FAST", DetectorBuilder::new(width, height).preset_fast()),
        ("FAST, threshold 15", DetectorBuilder::new(width, height).fast_threshold(15)),
    ];

    for (label, builder) in runs {
        println!("\n{}", label);
        let detector = builder.build()?;
        run_detection_demo(&detector, img.as_raw(), &img, label)?;
    }

    println!("\nAll runs completed");
    Ok(())
}

fn run_detection_demo(
    detector: &ConfiguredDetector,
    raw: &[u8],
    img: &image::GrayImage,
    label: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("   {}", detector.config_summary());

    let t0 = Instant::now();
    let keypoints = detector.detect_keypoints(raw)?;
    println!("   {} keypoints in {:.2?}", keypoints.len(), t0.elapsed());

    let mut output: RgbaImage = image::DynamicImage::ImageLuma8(img.clone()).into_rgba8();
    for kp in &keypoints {
        draw_hollow_circle_mut(&mut output, (kp.x as i32, kp.y as i32), (kp.size / 2.0) as i32, Rgba([255, 0, 0, 255]));
    }

    let file = format!("keypoints_{}.png", label.to_lowercase().replace([' ', ','], "_"));
    output.save(&file)?;
    println!("   saved {}", file);
    Ok(())
}
