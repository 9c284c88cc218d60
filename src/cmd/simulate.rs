use crate::reports;
use clap::Args;
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tapzone::clock::ManualClock;
use tapzone::config::Config;
use tapzone::geometry::Point;
use tapzone::recorder::OutcomeRecorder;
use tapzone::{AcquisitionEngine, AttemptOutcome, EngineEvent, Protocol, TzResult};
use tracing::{debug, info};

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short = 'p', long, value_enum, default_value_t = Protocol::Scatter)]
    pub protocol: Protocol,

    #[arg(short = 't', long, default_value_t = 20)]
    pub trials: u32,

    #[arg(short = 's', long, default_value_t = 1)]
    pub sessions: usize,

    #[arg(long, default_value_t = 50)]
    pub targets: usize,

    #[arg(long, default_value_t = 1080.0)]
    pub width: f32,

    #[arg(long, default_value_t = 1920.0)]
    pub height: f32,

    /// Standard deviation of the simulated tap error, in screen units.
    #[arg(long, default_value_t = 25.0)]
    pub noise: f32,

    /// Taps allowed per trial before the participant gives up.
    #[arg(long, default_value_t = 12)]
    pub max_taps: u32,

    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    pub session: usize,
    pub outcomes: Vec<AttemptOutcome>,
    pub completed: u32,
    pub successes: u32,
    pub abandoned: u32,
    pub assists: u32,
    pub mean_radius: f32,
}

impl SessionReport {
    pub fn success_rate(&self) -> f32 {
        if self.completed == 0 {
            0.0
        } else {
            self.successes as f32 / self.completed as f32
        }
    }

    fn completions(&self) -> impl Iterator<Item = &AttemptOutcome> {
        self.outcomes.iter().filter(|o| o.completes_trial)
    }

    pub fn mean_failures(&self) -> f32 {
        mean(self.completions().map(|o| o.failed_attempts as f32))
    }

    pub fn mean_time_ms(&self) -> f32 {
        mean(self.completions().map(|o| o.elapsed_ms as f32))
    }
}

fn mean(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f32
    }
}

/// Approximately standard-normal sample (Irwin-Hall, n = 12).
fn gaussian(rng: &mut fastrand::Rng) -> f32 {
    (0..12).map(|_| rng.f32()).sum::<f32>() - 6.0
}

fn jitter(rng: &mut fastrand::Rng, aim: Point, sigma: f32) -> Point {
    Point::new(aim.x + gaussian(rng) * sigma, aim.y + gaussian(rng) * sigma)
}

/// Where the simulated participant aims for the next tap, in screen space.
fn aim_point(engine: &AcquisitionEngine, scatter_target: Option<usize>) -> Option<Point> {
    match engine.protocol() {
        Protocol::Scatter => scatter_target
            .and_then(|i| engine.targets().get(i))
            .map(|t| t.position),
        Protocol::TwoStep => {
            let pos = engine
                .active_target()
                .and_then(|i| engine.targets().get(i))
                .map(|t| t.position)?;
            Some(match engine.magnifier() {
                Some(zoom) => zoom.forward(pos),
                None => pos,
            })
        }
        Protocol::Ad => engine.fixed_region().map(|r| r.center()),
    }
}

fn run_session(args: &SimulateArgs, config: &Config, session: usize) -> TzResult<SessionReport> {
    let mut session_config = config.clone();
    session_config.session.seed = config.session.seed.map(|s| s.wrapping_add(session as u64));

    let clock = ManualClock::new();
    let mut engine = AcquisitionEngine::builder(args.protocol)
        .with_config(session_config.clone())
        .with_targets(args.targets)
        .with_viewport(args.width, args.height)
        .with_clock(clock.clone())
        .build()?;

    let mut rng = match session_config.session.seed {
        Some(s) => fastrand::Rng::with_seed(s.wrapping_add(9999)),
        None => fastrand::Rng::new(),
    };

    let mut report = SessionReport {
        session,
        ..Default::default()
    };

    for _ in 0..args.trials {
        engine.start_trial()?;
        let scatter_target = if engine.targets().is_empty() {
            None
        } else {
            Some(rng.usize(..engine.targets().len()))
        };

        let mut finished = false;
        for _ in 0..args.max_taps {
            clock.advance(250 + rng.u64(..500));
            let Some(aim) = aim_point(&engine, scatter_target) else {
                break;
            };
            // The scatter assist magnifies around the pointer; the two-step
            // inverse transform already divides the error by the zoom scale.
            let sigma = match args.protocol {
                Protocol::Scatter => args.noise / engine.zoom_level().max(1.0),
                Protocol::TwoStep | Protocol::Ad => args.noise,
            };
            let tap = jitter(&mut rng, aim, sigma);

            for event in engine.pointer_down(tap.x, tap.y)? {
                match event {
                    EngineEvent::Outcome(o) => {
                        if o.completes_trial {
                            finished = true;
                            report.completed += 1;
                            if o.success {
                                report.successes += 1;
                            }
                        }
                        report.outcomes.push(o);
                    }
                    EngineEvent::Assist(a) => {
                        debug!(session, zoom = a.zoom_level, "assist fired");
                        report.assists += 1;
                        engine.pointer_move(aim.x, aim.y);
                    }
                    _ => {}
                }
            }
            if finished {
                engine.pointer_up();
                break;
            }
        }

        if !finished {
            report.abandoned += 1;
            engine.abort_trial();
            engine.pointer_up();
        }
    }

    report.mean_radius = mean(engine.targets().iter().map(|t| t.hit_radius()));
    Ok(report)
}

pub fn run(args: SimulateArgs, config: Config) -> TzResult<()> {
    info!(
        "🎯 Simulating {} session(s) x {} trial(s) [{}]",
        args.sessions, args.trials, args.protocol
    );
    let start = Instant::now();

    let reports: Vec<SessionReport> = (0..args.sessions)
        .into_par_iter()
        .map(|session| run_session(&args, &config, session))
        .collect::<TzResult<Vec<_>>>()?;

    if let Some(path) = &args.output {
        let mut recorder = OutcomeRecorder::open(path)?;
        for report in &reports {
            for outcome in &report.outcomes {
                recorder.record(outcome)?;
            }
        }
        recorder.flush()?;
        info!(
            "📝 Wrote {} outcome rows to {}",
            recorder.rows_written(),
            path.display()
        );
    }

    reports::print_session_table(&reports);
    info!("⏱️  Done in {:.2?}", start.elapsed());
    Ok(())
}
