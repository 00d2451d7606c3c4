use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber;

use vidmatte::{
    config::Config,
    pipeline::{Pipeline, ProgressEvent, ProgressFn},
    segmentation::{available_models, DEFAULT_MODEL},
};

#[derive(Parser)]
#[command(
    name = "vidmatte",
    version,
    about = "Remove the background from every frame of a video",
    long_about = "vidmatte decodes a video into frames, runs each frame through a pretrained \
segmentation model to predict a per-pixel alpha matte, and re-encodes the matted frames into \
the output video. Requires ffmpeg on the PATH and ONNX model weights in the model directory."
)]
struct Cli {
    /// Input video file (mp4, avi, mov, mkv, webm)
    input: PathBuf,

    /// Output video file path (defaults to "<input>_no_bg.mp4")
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Segmentation model to use
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Keep the alpha channel (VP9/WebM) instead of compositing over black
    #[arg(long)]
    keep_alpha: bool,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn output_path(&self) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }

        let stem = self
            .input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let extension = if self.keep_alpha { "webm" } else { "mp4" };

        self.input
            .with_file_name(format!("{}_no_bg.{}", stem, extension))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting vidmatte v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };
    if cli.keep_alpha {
        config.output.keep_alpha = true;
    }
    config.validate()?;

    let output_path = cli.output_path();

    info!("Input: {:?}", cli.input);
    info!("Output: {:?}", output_path);
    info!("Model: {} (available: {})", cli.model, available_models().join(", "));

    // Run the pipeline on a worker task; the main task only renders
    // progress events from the channel, so the worker never waits on it.
    let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel::<ProgressEvent>();

    let progress_sender = sender.clone();
    let on_progress: ProgressFn = Box::new(move |current, total| {
        let _ = progress_sender.send(ProgressEvent::Progress { current, total });
    });

    let pipeline = Pipeline::new(config);
    let input = cli.input.clone();
    let output = output_path.clone();
    let model = cli.model.clone();

    tokio::spawn(async move {
        let event = match pipeline.run(&input, &output, &model, Some(on_progress)).await {
            Ok(()) => ProgressEvent::Done { output },
            Err(e) => ProgressEvent::Error {
                message: e.user_message(),
            },
        };
        let _ = sender.send(event);
    });

    while let Some(event) = receiver.recv().await {
        match event {
            ProgressEvent::Progress { current, total } => {
                let percent = event.percent().unwrap_or(0.0);
                print!("\rRemoving backgrounds: frame {} of {}  ({:.0}%)", current, total, percent);
                let _ = std::io::stdout().flush();
            }
            ProgressEvent::Done { output } => {
                println!();
                info!("Output saved to: {:?}", output);
                return Ok(());
            }
            ProgressEvent::Error { message } => {
                println!();
                return Err(anyhow::anyhow!(message));
            }
        }
    }

    // The worker always sends a terminal event; a closed channel without
    // one means it panicked.
    Err(anyhow::anyhow!("processing worker exited unexpectedly"))
}
