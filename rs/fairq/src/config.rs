use std::time::Duration;

/// Tuning knobs for a [ServiceTracker](crate::ServiceTracker).
#[derive(Debug, Clone)]
pub struct TrackerConfig {
	/// Evict server entries that have gone this long without a request or response.
	///
	/// `None` (the default) disables eviction entirely: entries live for the tracker's lifetime
	/// and the map only grows. There is no universally sensible horizon — it depends on how
	/// churny the server population is — so eviction is strictly opt-in.
	///
	/// Evicting an entry forfeits its history: the next contact with that server starts over at
	/// `(delta, rho) = (1, 1)`. That estimate is still a true lower bound on intervening
	/// traffic, so fairness degrades gracefully rather than breaking.
	pub idle_horizon: Option<Duration>,

	/// Run an automatic eviction sweep once every this many tracker operations.
	///
	/// Only meaningful when `idle_horizon` is set. `0` disables the automatic trigger, leaving
	/// [evict_idle](crate::ServiceTracker::evict_idle) as the only sweep.
	pub sweep_every: u32,
}

impl Default for TrackerConfig {
	fn default() -> Self {
		Self {
			idle_horizon: None,
			sweep_every: 1024,
		}
	}
}
