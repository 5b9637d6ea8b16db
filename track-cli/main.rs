use image::{GrayImage, ImageReader, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};
use log::info;
use std::time::Instant;
use track_cli::{FeatureTracker, Frame, Match, PipelineConfig, TrackError, TrackResult};

const USAGE: &str = "usage: track <previous.png> <current.png> [DETECTOR] [DESCRIPTOR] [SELECTOR] [output.png]";

fn load_gray(path: &str) -> TrackResult<GrayImage> {
    Ok(ImageReader::open(path)?.decode()?.to_luma8())
}

/// Both frames side by side with keypoints in red and matches in green
fn render_matches(previous: &GrayImage, current: &GrayImage, prev: &Frame, curr: &Frame, matches: &[Match]) -> RgbaImage {
    let (w, h) = previous.dimensions();
    let mut output = RgbaImage::new(w * 2, h);
    image::imageops::replace(&mut output, &image::DynamicImage::ImageLuma8(previous.clone()).into_rgba8(), 0, 0);
    image::imageops::replace(&mut output, &image::DynamicImage::ImageLuma8(current.clone()).into_rgba8(), w as i64, 0);

    let red = Rgba([255, 0, 0, 255]);
    for kp in &prev.keypoints {
        draw_hollow_circle_mut(&mut output, (kp.x as i32, kp.y as i32), 3, red);
    }
    for kp in &curr.keypoints {
        draw_hollow_circle_mut(&mut output, (kp.x as i32 + w as i32, kp.y as i32), 3, red);
    }

    let green = Rgba([0, 255, 0, 255]);
    for m in matches {
        let a = prev.keypoints[m.query_idx];
        let b = curr.keypoints[m.reference_idx];
        draw_line_segment_mut(&mut output, (a.x, a.y), (b.x + w as f32, b.y), green);
    }
    output
}

fn run() -> TrackResult<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        return Err(TrackError::Usage(USAGE.to_string()));
    }
    let arg = |i: usize, default: &'static str| args.get(i).map(String::as_str).unwrap_or(default);

    let config = PipelineConfig::from_names(arg(2, "SHITOMASI"), arg(3, "BRIEF"), arg(4, "SEL_KNN"))?;
    let output_path = arg(5, "track_matches.png");
    track_core::init_thread_pool(config.threads)?;

    let previous = load_gray(&args[0])?;
    let current = load_gray(&args[1])?;
    if previous.dimensions() != current.dimensions() {
        return Err(TrackError::Usage(format!(
            "frames differ in size: {:?} vs {:?}",
            previous.dimensions(),
            current.dimensions()
        )));
    }

    let (w, h) = previous.dimensions();
    info!("{}", config.summary());
    let mut tracker = FeatureTracker::new(config, w as usize, h as usize)?;

    let t0 = Instant::now();
    let matches = tracker.track_pair(previous.as_raw(), current.as_raw())?;
    let elapsed = t0.elapsed();

    let (prev, curr) = match (tracker.previous(), tracker.current()) {
        (Some(p), Some(c)) => (p, c),
        _ => return Err(TrackError::Usage("no frames were processed".to_string())),
    };
    println!("Time taken: {:.2?}", elapsed);
    println!("Keypoints: {} / {}", prev.keypoints.len(), curr.keypoints.len());
    println!("Matches: {}", matches.len());

    render_matches(&previous, &current, prev, curr, &matches).save(output_path)?;
    println!("Saved result image as {}", output_path);
    Ok(())
}

fn main() {
    pretty_env_logger::init();
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
