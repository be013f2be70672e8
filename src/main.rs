use clap::Parser;
use fluidfield::{
    AnalysisRecorder, FluidConfig, FluidField, ImageExporter, PointerTrail, sample_marks,
};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless run of the fluid trail field")]
struct Args {
    /// Grid width in cells
    #[arg(long, default_value_t = 96)]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value_t = 64)]
    height: usize,

    /// Number of updates to run
    #[arg(long, default_value_t = 120)]
    steps: usize,

    /// Seed for the synthetic pointer path
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// JSON file with solver settings (missing keys use defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for PNG frames and metrics.jsonl
    #[arg(long)]
    out: Option<PathBuf>,

    /// Export a frame every N steps
    #[arg(long, default_value_t = 10)]
    export_every: usize,

    /// Sampling stride for visible marks
    #[arg(long, default_value_t = 2)]
    stride: usize,

    /// Density below which no mark is drawn
    #[arg(long, default_value_t = 0.05)]
    threshold: f32,
}

/// Wandering pointer that bounces inside the grid and occasionally lifts.
struct SyntheticPointer {
    rng: StdRng,
    pos: Vec2,
    heading: f32,
    speed: f32,
    bounds: Vec2,
    down: bool,
}

impl SyntheticPointer {
    fn new(seed: u64, width: usize, height: usize) -> Self {
        let bounds = Vec2::new((width - 1) as f32, (height - 1) as f32);
        Self {
            rng: StdRng::seed_from_u64(seed),
            pos: bounds * 0.5,
            heading: 0.0,
            speed: 1.5,
            bounds,
            down: true,
        }
    }

    fn advance(&mut self) -> Option<Vec2> {
        if self.rng.gen_bool(0.02) {
            self.down = !self.down;
        }
        self.heading += self.rng.gen_range(-0.4..0.4);
        let mut next = self.pos + Vec2::from_angle(self.heading) * self.speed;
        if next.x <= 0.0 || next.x >= self.bounds.x {
            self.heading = std::f32::consts::PI - self.heading;
        }
        if next.y <= 0.0 || next.y >= self.bounds.y {
            self.heading = -self.heading;
        }
        next = next.clamp(Vec2::ZERO, self.bounds);
        self.pos = next;
        self.down.then_some(next)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => FluidConfig::from_json_file(path)?,
        None => FluidConfig::default(),
    };

    let mut field = FluidField::with_config(args.width, args.height, config)?;
    let mut trail = PointerTrail::default();
    let mut pointer = SyntheticPointer::new(args.seed, args.width, args.height);
    let mut recorder = AnalysisRecorder::new();
    let exporter = ImageExporter::new((args.width * 8) as u32, (args.height * 8) as u32);

    if let Some(dir) = &args.out {
        fs::create_dir_all(dir)?;
    }

    log::info!(
        "running {} steps on a {}x{} field (iterations {}, dt {}, damp {})",
        args.steps,
        args.width,
        args.height,
        config.iterations,
        config.dt,
        config.damp
    );

    let export_every = args.export_every.max(1);
    for frame in 1..=args.steps {
        let target = pointer.advance();
        let mut marks = 0;

        field.update(
            |sources| match target {
                Some(pos) => {
                    trail.stamp(sources, pos);
                }
                None => trail.lift(),
            },
            |current| {
                marks = sample_marks(current, args.stride, args.threshold, 10.0).len();
            },
        );

        let Some(snapshot) = field.snapshot() else {
            break;
        };
        let metrics = recorder.record_frame(&snapshot, frame);

        if frame % export_every == 0 {
            metrics.log_summary();
            log::info!("frame {frame}: {marks} visible marks");

            if let Some(dir) = &args.out {
                exporter.export_density_png(&snapshot, &dir.join(format!("density_{frame:04}.png")))?;
                exporter.export_velocity_png(&snapshot, &dir.join(format!("velocity_{frame:04}.png")))?;
            }
        }
    }

    recorder.log_trends();

    if let Some(dir) = &args.out {
        let path = dir.join("metrics.jsonl");
        recorder.write_jsonl(BufWriter::new(File::create(&path)?))?;
        log::info!("wrote {}", path.display());
    }

    Ok(())
}
