use std::time::{Duration, Instant};

use crate::Counter;

/// Per-server baseline snapshot and local response counts.
///
/// The baselines are the values the tracker's global counters held when a request was last
/// issued to this server; the local counts are the responses *this* server has produced since.
/// Subtracting both from the current globals leaves exactly the traffic that happened elsewhere.
///
/// Only ever touched by [ServiceTracker](crate::ServiceTracker) under its lock.
#[derive(Debug)]
pub(crate) struct ServerEntry {
	pub(crate) delta_baseline: Counter,
	pub(crate) rho_baseline: Counter,
	pub(crate) local_delta: u32,
	pub(crate) local_rho: u32,
	last_touch: Instant,
}

impl ServerEntry {
	pub(crate) fn new(delta_baseline: Counter, rho_baseline: Counter) -> Self {
		Self {
			delta_baseline,
			rho_baseline,
			local_delta: 0,
			local_rho: 0,
			last_touch: Instant::now(),
		}
	}

	/// Restart the counting window: snapshot the globals, zero the local counts.
	///
	/// Called exactly when a request is (re)issued to this server.
	pub(crate) fn reset(&mut self, delta_baseline: Counter, rho_baseline: Counter) {
		self.delta_baseline = delta_baseline;
		self.rho_baseline = rho_baseline;
		self.local_delta = 0;
		self.local_rho = 0;
		self.last_touch = Instant::now();
	}

	/// Fold one completed response from this server into the window.
	pub(crate) fn record_response(&mut self, is_reservation: bool) {
		self.local_delta += 1;
		if is_reservation {
			self.local_rho += 1;
		}
		self.last_touch = Instant::now();
	}

	/// Time since this entry was last read or written through either operation.
	pub(crate) fn idle_for(&self) -> Duration {
		self.last_touch.elapsed()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn record_counts_reservations_separately() {
		let mut entry = ServerEntry::new(3, 1);
		entry.record_response(false);
		entry.record_response(true);
		entry.record_response(false);

		assert_eq!(entry.local_delta, 3);
		assert_eq!(entry.local_rho, 1);
		// Every reservation response is also a response.
		assert!(entry.local_rho <= entry.local_delta);
	}

	#[test]
	fn reset_restarts_the_window() {
		let mut entry = ServerEntry::new(0, 0);
		entry.record_response(true);
		entry.record_response(true);

		entry.reset(10, 4);
		assert_eq!(entry.delta_baseline, 10);
		assert_eq!(entry.rho_baseline, 4);
		assert_eq!(entry.local_delta, 0);
		assert_eq!(entry.local_rho, 0);
	}
}
