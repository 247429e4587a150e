//! Fluent builder for constructing a [`Sim`].

use lift_core::{LiftError, SimConfig};
use lift_schedule::{NoTraffic, TrafficSource};

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<T>`].
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                  |
/// |-----------------|------------------------------------------|
/// | `.traffic(t)`   | `NoTraffic` (requests only via `submit`) |
/// | `.hold(true)`   | Hold mode off                            |
///
/// # Example
///
/// ```rust,ignore
/// let script = load_traffic_csv(Path::new("traffic.csv"))?;
/// let mut sim = SimBuilder::new(config).traffic(script).build()?;
/// sim.run(&mut NoopObserver);
/// ```
pub struct SimBuilder<T: TrafficSource = NoTraffic> {
    config:  SimConfig,
    traffic: T,
    hold:    bool,
}

impl SimBuilder<NoTraffic> {
    pub fn new(config: SimConfig) -> Self {
        Self { config, traffic: NoTraffic, hold: false }
    }
}

impl<T: TrafficSource> SimBuilder<T> {
    /// Feed `traffic` into the intake path every tick.
    pub fn traffic<U: TrafficSource>(self, traffic: U) -> SimBuilder<U> {
        SimBuilder { config: self.config, traffic, hold: self.hold }
    }

    /// Start with hold mode on.
    pub fn hold(mut self, on: bool) -> Self {
        self.hold = on;
        self
    }

    /// Validate the config and return a ready-to-run [`Sim`] with every unit
    /// idle at its standby floor.
    pub fn build(self) -> SimResult<Sim<T>> {
        self.config.validate().map_err(|e| match e {
            LiftError::Config(msg) => SimError::Config(msg),
            other => SimError::Config(other.to_string()),
        })?;

        let mut sim = Sim::from_parts(self.config, self.traffic);
        sim.set_hold(self.hold);
        Ok(sim)
    }
}
