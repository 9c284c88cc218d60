use crate::error::{TapZoneError, TzResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub radius: RadiusParams,
    #[command(flatten)]
    pub selection: SelectionParams,
    #[command(flatten)]
    pub escalation: EscalationParams,
    #[command(flatten)]
    pub session: SessionParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiusParams {
    #[arg(long, default_value_t = 30.0)]
    pub base_radius: f32,
    #[arg(long, default_value_t = 20.0)]
    pub min_radius: f32,
    #[arg(long, default_value_t = 150.0)]
    pub max_radius: f32,
    #[arg(long, default_value_t = 5)]
    pub region_count: usize,
}

impl Default for RadiusParams {
    fn default() -> Self {
        Self {
            base_radius: 30.0,
            min_radius: 20.0,
            max_radius: 150.0,
            region_count: 5,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionParams {
    // Fixed radius of the first (coarse) tap, not adaptive
    #[arg(long, default_value_t = 100.0)]
    pub coarse_radius: f32,
    #[arg(long, default_value_t = 20.0)]
    pub precise_radius: f32,
    #[arg(long, default_value_t = 2.0)]
    pub zoom_scale: f32,
    #[arg(long, default_value_t = 150.0)]
    pub zoom_radius: f32,

    // false: one precise miss ends the trial
    #[arg(long, default_value_t = false)]
    pub retry_on_precise_miss: bool,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            coarse_radius: 100.0,
            precise_radius: 20.0,
            zoom_scale: 2.0,
            zoom_radius: 150.0,
            retry_on_precise_miss: false,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationParams {
    #[arg(long, default_value_t = 3)]
    pub max_failed_attempts: u32,
    #[arg(long, default_value_t = 0.5)]
    pub zoom_step: f32,
    #[arg(long, default_value_t = 1.0)]
    pub min_zoom_level: f32,
    #[arg(long, default_value_t = 5.0)]
    pub max_zoom_level: f32,
    #[arg(long, default_value_t = 100.0)]
    pub magnifier_radius: f32,
}

impl Default for EscalationParams {
    fn default() -> Self {
        Self {
            max_failed_attempts: 3,
            zoom_step: 0.5,
            min_zoom_level: 1.0,
            max_zoom_level: 5.0,
            magnifier_radius: 100.0,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionParams {
    /// Seed for target generation and trial selection. Unset = entropy.
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long, default_value_t = 50.0)]
    pub viewport_padding: f32,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            seed: None,
            viewport_padding: 50.0,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TzResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Copies values that were explicitly given on the command line over
    /// `self`, leaving file-provided values in place otherwise.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(radius.base_radius);
        update_if_present!(radius.min_radius);
        update_if_present!(radius.max_radius);
        update_if_present!(radius.region_count);

        update_if_present!(selection.coarse_radius);
        update_if_present!(selection.precise_radius);
        update_if_present!(selection.zoom_scale);
        update_if_present!(selection.zoom_radius);
        update_if_present!(selection.retry_on_precise_miss);

        update_if_present!(escalation.max_failed_attempts);
        update_if_present!(escalation.zoom_step);
        update_if_present!(escalation.min_zoom_level);
        update_if_present!(escalation.max_zoom_level);
        update_if_present!(escalation.magnifier_radius);

        update_if_present!(session.seed);
        update_if_present!(session.viewport_padding);
    }

    /// Non-finite values are rejected before any range check.
    pub fn validate(&self) -> TzResult<()> {
        let r = &self.radius;
        let finite = [
            ("base radius", r.base_radius),
            ("min radius", r.min_radius),
            ("max radius", r.max_radius),
            ("coarse radius", self.selection.coarse_radius),
            ("precise radius", self.selection.precise_radius),
            ("zoom scale", self.selection.zoom_scale),
            ("zoom radius", self.selection.zoom_radius),
            ("zoom step", self.escalation.zoom_step),
            ("min zoom level", self.escalation.min_zoom_level),
            ("max zoom level", self.escalation.max_zoom_level),
            ("magnifier radius", self.escalation.magnifier_radius),
            ("viewport padding", self.session.viewport_padding),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(TapZoneError::Config(format!(
                "{} must be finite, got {}",
                name, value
            )));
        }

        if !(r.min_radius > 0.0 && r.min_radius <= r.max_radius) {
            return Err(TapZoneError::Config(format!(
                "radius bounds must satisfy 0 < min ({}) <= max ({})",
                r.min_radius, r.max_radius
            )));
        }
        if r.base_radius < r.min_radius || r.base_radius > r.max_radius {
            return Err(TapZoneError::Config(format!(
                "base radius {} outside [{}, {}]",
                r.base_radius, r.min_radius, r.max_radius
            )));
        }
        if r.region_count == 0 {
            return Err(TapZoneError::Config("region count must be at least 1".into()));
        }

        let s = &self.selection;
        if s.zoom_scale <= 0.0 {
            return Err(TapZoneError::Config(format!(
                "zoom scale must be positive, got {}",
                s.zoom_scale
            )));
        }
        if s.coarse_radius < 0.0 || s.precise_radius < 0.0 || s.zoom_radius < 0.0 {
            return Err(TapZoneError::Config("selection radii must be non-negative".into()));
        }

        let e = &self.escalation;
        if e.max_failed_attempts == 0 {
            return Err(TapZoneError::Config(
                "max failed attempts must be at least 1".into(),
            ));
        }
        if e.min_zoom_level <= 0.0 || e.max_zoom_level < e.min_zoom_level {
            return Err(TapZoneError::Config(format!(
                "zoom levels must satisfy 0 < min ({}) <= max ({})",
                e.min_zoom_level, e.max_zoom_level
            )));
        }
        if e.zoom_step < 0.0 {
            return Err(TapZoneError::Config("zoom step must be non-negative".into()));
        }
        if e.magnifier_radius < 0.0 {
            return Err(TapZoneError::Config(
                "magnifier radius must be non-negative".into(),
            ));
        }

        if self.session.viewport_padding < 0.0 {
            return Err(TapZoneError::Config("viewport padding must be non-negative".into()));
        }
        Ok(())
    }
}
