// ./src/main.rs
use bevy::app::ScheduleRunnerPlugin;
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use clap::{Parser, ValueEnum};
use echo_sounder_sim::{
    math::probability::SeedResource,
    setup::SurveySetup,
    sim::SurveyPlugin,
    survey::{
        config::{PathKind, SurveyConfig},
        emitter::EmitterSpec,
        error::SurveyResult,
    },
};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliPathKind {
    Parallel,
    Drawn,
}

impl From<CliPathKind> for PathKind {
    fn from(value: CliPathKind) -> Self {
        match value {
            CliPathKind::Parallel => PathKind::Parallel,
            CliPathKind::Drawn => PathKind::Drawn,
        }
    }
}

/// Echo sounder survey simulator: samples a seafloor surface along a path,
/// perturbs each depth reading and emits it.
#[derive(Parser, Debug)]
#[command(name = "echo_sounder_sim", version, about)]
struct Cli {
    /// Surface file (.stl, .xyz, .txt or .csv)
    #[arg(value_name = "SURFACE")]
    surface: Option<PathBuf>,

    /// Samples per second
    #[arg(long, value_name = "HZ")]
    sample_rate: Option<f64>,

    /// Vessel speed in metres per second
    #[arg(long, value_name = "M_PER_S")]
    velocity: Option<f64>,

    /// Path generator
    #[arg(long, value_enum)]
    path: Option<CliPathKind>,

    /// Waypoint file for the drawn path, one "x,y" per line
    #[arg(long, value_name = "FILE")]
    waypoints: Option<PathBuf>,

    /// Error stage, applied in the given order (noise@RATE, fb@AREA, drop@RATE[:DECAY])
    #[arg(short = 'e', long = "error", value_name = "SPEC")]
    errors: Vec<String>,

    /// Reading output (stdout, csv@FILE, tsv@FILE, endpoint@URL)
    #[arg(long, value_name = "SPEC")]
    emitter: Option<String>,

    /// Sample as fast as possible instead of at the sample rate
    #[arg(long)]
    no_wait: bool,

    /// Master seed for all error stages, a number or any text
    #[arg(long)]
    seed: Option<String>,

    /// Spatial index bins per axis (default: sqrt of the face count)
    #[arg(long)]
    bins: Option<usize>,

    /// JSON configuration file; command line flags take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write an SVG plot of the surface, debris and track when finished
    #[arg(long, value_name = "FILE")]
    svg: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> SurveyResult<SurveyConfig> {
        let mut config = match &self.config {
            Some(path) => SurveyConfig::from_json_file(path)?,
            None => SurveyConfig::new(),
        };

        if let Some(surface) = self.surface {
            config.surface = Some(surface);
        }
        if let Some(hz) = self.sample_rate {
            config.sample_rate_hz = hz;
        }
        if let Some(m_s) = self.velocity {
            config.velocity_m_s = m_s;
        }
        if let Some(path) = self.path {
            config.path = path.into();
        }
        if let Some(waypoints) = self.waypoints {
            config.waypoints = Some(waypoints);
        }
        if !self.errors.is_empty() {
            config.errors = self.errors;
        }
        if let Some(emitter) = self.emitter {
            config.emitter = emitter.parse::<EmitterSpec>()?;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(SeedResource::parse(&seed).seed);
        }
        if let Some(bins) = self.bins {
            config.bins_per_axis = Some(bins);
        }
        if let Some(svg) = self.svg {
            config.svg_output = Some(svg);
        }
        config.no_wait |= self.no_wait;
        config.verbose |= self.verbose;

        Ok(config)
    }
}

/// Readings on stdout stay readable when only warnings are logged.
fn log_level(config: &SurveyConfig) -> Level {
    if config.verbose {
        Level::DEBUG
    } else if config.emitter.is_stdout() {
        Level::WARN
    } else {
        Level::INFO
    }
}

fn run(cli: Cli) -> SurveyResult<()> {
    let config = cli.into_config()?;
    config.validate()?;
    let interval = config.sample_interval()?;

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(interval)),
        LogPlugin {
            level: log_level(&config),
            ..default()
        },
    ));

    // nach dem LogPlugin, sonst gehen die Setup-Meldungen verloren
    SurveySetup::from_config(&config)?.insert_into(&mut app);
    app.add_plugins(SurveyPlugin).run();
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
