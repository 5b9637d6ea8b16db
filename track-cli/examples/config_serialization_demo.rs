#[cfg(feature = "serde")]
use track_cli::{FocusRect, PipelineConfig};
#[cfg(feature = "serde")]
use track_detect::DetectorConfig;

#[cfg(feature = "serde")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Configuration serialization demo");
    println!("================================\n");

    let detector = DetectorConfig::harris_preset(1242, 375).with_metadata("KITTI Harris", "Harris on KITTI-sized frames");
    println!("Detector: {}", detector.summary());
    detector.save_json("harris_detector.json")?;
    detector.save_toml("harris_detector.toml")?;
    let loaded = DetectorConfig::load_toml("harris_detector.toml")?;
    println!("Reloaded from TOML: {}", loaded.summary());

    let pipeline = PipelineConfig::from_names("FAST", "ORB", "SEL_KNN")?
        .with_max_keypoints(50)
        .with_focus(FocusRect::new(535.0, 180.0, 180.0, 150.0));
    println!("\nPipeline: {}", pipeline.summary());
    println!("{}", pipeline.to_toml()?);

    pipeline.save("pipeline.json")?;
    pipeline.save("pipeline.toml")?;
    let from_json = PipelineConfig::load("pipeline.json")?;
    let from_toml = PipelineConfig::load("pipeline.toml")?;
    assert_eq!(from_json, from_toml);
    println!("JSON and TOML copies agree");

    Ok(())
}

#[cfg(not(feature = "serde"))]
fn main() {
    println!("Configuration serialization demo");
    println!("This demo requires the 'serde' feature to be enabled.");
    println!("   Run with: cargo run --example config_serialization_demo --features=serde");
}
