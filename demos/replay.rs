//! Replay recorded detector output through the estimator
//!
//! ```text
//! cargo run --example replay -- demos/frames.json --output tag-field --red
//! ```
use std::{error::Error, fs::File, io::BufReader, path::PathBuf};

use apriltag_field_pose::{
    field::builtin_names,
    telemetry::{keys, TableValue},
    util::math::{Mat33, Vec3},
    DetectorPose,
    EstimatorBuilder,
    FieldLayout,
    Frame,
    FrameProfileStatistics,
    MemoryTable,
    Origin,
    PoseOutput,
    RawDetection,
    TelemetrySession,
};
use clap::{Parser, ValueEnum, arg, command};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputMode {
    /// Tag pose relative to the camera
    CameraRelative,
    /// Tag pose on the field
    TagField,
    /// Camera pose on the field
    CameraField,
}

impl From<OutputMode> for PoseOutput {
    fn from(value: OutputMode) -> Self {
        match value {
            OutputMode::CameraRelative => Self::CameraRelative,
            OutputMode::TagField => Self::TagField,
            OutputMode::CameraField => Self::CameraField,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Reduce output
    #[arg(short, long, default_value_t=false)]
    quiet: bool,
    /// Built-in field layout
    #[arg(short, long, default_value = "2023-chargedup")]
    layout: String,
    /// Load the field layout from a JSON file instead
    #[arg(long)]
    layout_file: Option<PathBuf>,
    /// Largest tag id on the field (for --layout-file)
    #[arg(long, default_value_t=8)]
    capacity: usize,
    /// Pretend the field management system reports the red alliance
    #[arg(long, default_value_t=false)]
    red: bool,
    /// Which pose to report
    #[arg(short, long, value_enum, default_value_t=OutputMode::CameraRelative)]
    output: OutputMode,
    /// Team number to connect as
    #[arg(long, default_value_t=2199)]
    team: u16,
    /// Discard detections with more than this many corrected bits
    #[arg(short='a', long, default_value_t=1)]
    hamming: u16,
    /// Discard detections with a smaller decision margin
    #[arg(short='m', long, default_value_t=30.0)]
    min_margin: f32,
    /// Repeat processing on the input this many times
    #[arg(short, long, default_value_t=1)]
    iters: usize,
    /// Recorded frames (JSON array)
    input: PathBuf,
}

/// Recorded detection, as written by the capture tool
#[derive(Debug, Deserialize)]
struct RecordedDetection {
    id: u32,
    #[serde(default)]
    hamming: u16,
    decision_margin: f32,
    #[serde(default)]
    pose_error: f64,
    /// Row-major
    rotation: Option<[f64; 9]>,
    translation: Option<[f64; 3]>,
}

impl From<RecordedDetection> for RawDetection {
    fn from(value: RecordedDetection) -> Self {
        let pose = match (value.rotation, value.translation) {
            (Some(rotation), Some(translation)) => Some(DetectorPose::new(Mat33::of(rotation), Vec3::from(translation))),
            _ => None,
        };
        Self {
            id: value.id,
            hamming: value.hamming,
            decision_margin: value.decision_margin,
            pose,
            pose_error: value.pose_error,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RecordedFrame {
    timestamp: f64,
    detections: Vec<RecordedDetection>,
}

fn load_frames(path: &PathBuf) -> Result<Vec<Frame>, Box<dyn Error>> {
    let reader = BufReader::new(File::open(path)?);
    let frames: Vec<RecordedFrame> = serde_json::from_reader(reader)?;
    Ok(frames.into_iter()
        .map(|frame| Frame::new(frame.timestamp, frame.detections.into_iter().map(RawDetection::from)))
        .collect())
}

fn load_layout(args: &Args, is_red: bool) -> Result<FieldLayout, Box<dyn Error>> {
    if let Some(path) = &args.layout_file {
        return Ok(FieldLayout::from_path(path, args.capacity, Origin::for_alliance(is_red))?);
    }
    match FieldLayout::load(&args.layout, is_red) {
        Ok(layout) => Ok(layout),
        Err(e) => {
            eprintln!("Error: Unknown field layout: {}", args.layout);
            eprintln!("Valid layouts:");
            for name in builtin_names() {
                eprintln!(" - {name}");
            }
            Err(e.into())
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let table = MemoryTable::new();
    // Stand-in for the field management system
    table.insert(keys::FMS_INFO, keys::IS_RED_ALLIANCE, TableValue::Boolean(args.red));

    let mut session = TelemetrySession::with_team(table.clone(), args.team);
    session.start()?;
    let is_red = session.is_red_alliance()?.unwrap_or(false);

    let layout = load_layout(&args, is_red)?;
    let mut builder = EstimatorBuilder::default()
        .with_layout(layout)
        .with_output(args.output.into());
    builder.config.filter.max_hamming = args.hamming;
    builder.config.filter.min_confidence = args.min_margin;
    builder.config.filter.tag_ids = 1..=(builder.layout().map(|layout| layout.capacity()).unwrap_or(8) as u32);
    let estimator = builder.build()?;

    let frames = load_frames(&args.input)?;

    let mut stats = FrameProfileStatistics::default();
    for _ in 0..args.iters {
        for frame in frames.iter() {
            let result = estimator.process_and_publish(frame, &mut session)?;
            if !args.quiet {
                let sample = result.sample();
                if sample.target_valid {
                    println!(
                        "t={:8.3} id={:2} xyz=({:7.3}, {:7.3}, {:7.3}) rpy=({:6.3}, {:6.3}, {:6.3}) [{} kept, {} discarded]",
                        sample.timestamp_sec, sample.tag_id,
                        sample.x, sample.y, sample.z,
                        sample.roll, sample.pitch, sample.yaw,
                        result.estimates.len(), result.discarded,
                    );
                } else {
                    println!("t={:8.3} no target [{} discarded]", sample.timestamp_sec, result.discarded);
                }
            }
            stats.add(&result.profile);
        }
    }

    session.stop()?;

    if !args.quiet {
        println!("{}", table.to_json()?);
    }
    println!("{stats}");
    Ok(())
}
