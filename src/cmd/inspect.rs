use crate::reports;
use clap::Args;
use tapzone::config::Config;
use tapzone::targets::TargetLayout;
use tapzone::{AcquisitionEngine, Protocol, TzResult};

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short = 'p', long, value_enum, default_value_t = Protocol::Scatter)]
    pub protocol: Protocol,

    /// Overrides the protocol's default layout (price-series, uniform).
    #[arg(short = 'l', long)]
    pub layout: Option<TargetLayout>,

    #[arg(long, default_value_t = 50)]
    pub targets: usize,

    #[arg(long, default_value_t = 1080.0)]
    pub width: f32,

    #[arg(long, default_value_t = 1920.0)]
    pub height: f32,
}

pub fn run(args: InspectArgs, config: Config) -> TzResult<()> {
    let mut builder = AcquisitionEngine::builder(args.protocol)
        .with_config(config)
        .with_targets(args.targets)
        .with_viewport(args.width, args.height);
    if let Some(layout) = args.layout {
        builder = builder.with_layout(layout);
    }
    let engine = builder.build()?;

    reports::print_target_table(&engine);
    reports::print_region_table(&engine);
    Ok(())
}
