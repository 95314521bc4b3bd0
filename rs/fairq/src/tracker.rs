use std::{
	collections::HashMap,
	fmt,
	hash::Hash,
	sync::{Mutex, MutexGuard},
	time::Duration,
};

use crate::{entry::ServerEntry, Phase, ReqParams, TrackerConfig};

/// A monotonically non-decreasing count of completed responses.
///
/// Wraps only at `u64::MAX`, which at any realistic request rate means never.
pub type Counter = u64;

/// A global counter moved behind a baseline it was snapshotted into.
///
/// Can only happen if the counting discipline was broken: a mutation that bypassed the lock, or
/// counters initialized inconsistently. Rendered into the panic on the fatal path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("counter skew: global {global} behind baseline {baseline} + local {local}")]
struct CounterSkew {
	global: Counter,
	baseline: Counter,
	local: u32,
}

/// `1 + global - baseline - local`: responses completed at *other* servers since `baseline` was
/// snapshotted, plus one for the request being formed right now.
///
/// The subtracted terms can never exceed `global` while the counting discipline holds, so an
/// underflow is reported rather than clamped.
fn window(global: Counter, baseline: Counter, local: u32) -> Result<u32, CounterSkew> {
	let elsewhere = global
		.checked_sub(baseline)
		.and_then(|since| since.checked_sub(local as Counter))
		.ok_or(CounterSkew { global, baseline, local })?;

	// The tag is u32 on the wire. Saturating is an overestimate, which is always fairness-safe;
	// an underestimate never is.
	Ok(u32::try_from(elsewhere + 1).unwrap_or(u32::MAX))
}

struct TrackerState<S> {
	global_delta: Counter,
	global_rho: Counter,
	servers: HashMap<S, ServerEntry>,
	ops_since_sweep: u32,
}

/// Client-side bookkeeping for one client session of a distributed QoS scheme.
///
/// Owns two global response counters and a per-server map of baseline snapshots, all behind a
/// single mutex. The two operations are
/// linearizable with respect to each other; each holds the lock for O(1) work and never performs
/// I/O under it, so contention stays negligible even at high request rates.
///
/// `S` identifies a server; copies are assumed cheap.
pub struct ServiceTracker<S> {
	state: Mutex<TrackerState<S>>,
	config: TrackerConfig,
}

impl<S: Clone + Eq + Hash + fmt::Debug> Default for ServiceTracker<S> {
	fn default() -> Self {
		Self::new()
	}
}

impl<S: Clone + Eq + Hash + fmt::Debug> ServiceTracker<S> {
	/// A tracker that keeps every server entry forever.
	pub fn new() -> Self {
		Self::with_config(TrackerConfig::default())
	}

	pub fn with_config(config: TrackerConfig) -> Self {
		Self {
			state: Mutex::new(TrackerState {
				global_delta: 0,
				global_rho: 0,
				servers: HashMap::new(),
				ops_since_sweep: 0,
			}),
			config,
		}
	}

	/// Fold one completed response from `server` into the books.
	///
	/// Must be called exactly once per completed response, regardless of whether the underlying
	/// operation succeeded; `phase` is whatever the server reported.
	pub fn track_response(&self, server: &S, phase: Phase) {
		let mut state = self.lock();

		// Snapshot before folding this response in, so an entry created below does not count
		// its own trigger against itself twice (once via the baseline, once locally).
		let delta_snapshot = state.global_delta;
		let rho_snapshot = state.global_rho;

		state.global_delta += 1;
		if phase.is_reservation() {
			state.global_rho += 1;
		}

		match state.servers.get_mut(server) {
			Some(entry) => entry.record_response(phase.is_reservation()),
			None => {
				// A response with no recorded request: the request predates this tracker, or
				// the entry was evicted while the request was in flight.
				let mut entry = ServerEntry::new(delta_snapshot, rho_snapshot);
				entry.record_response(phase.is_reservation());
				state.servers.insert(server.clone(), entry);
			}
		}

		tracing::trace!(?server, ?phase, "tracked response");
	}

	/// Compute the tag material for a request about to be sent to `server`, and restart that
	/// server's counting window.
	///
	/// Must be called once per outgoing request, before dispatch. `client` is attached to the
	/// result unchanged. Both returned counts are at least 1; a first contact (or the first
	/// after eviction) yields exactly `(1, 1)`.
	///
	/// # Panics
	///
	/// If the window arithmetic would drop below 1. That can only mean the counting discipline
	/// was broken and any value returned would be an underestimate, which would silently corrupt
	/// the fairness guarantee downstream — so this is fatal by contract, not a recoverable
	/// error. The lock is released first so other threads are not wedged if the panic is caught
	/// upstream.
	pub fn request_params<C>(&self, client: C, server: &S) -> ReqParams<C> {
		let mut state = self.lock();
		let global_delta = state.global_delta;
		let global_rho = state.global_rho;

		let (delta, rho) = match state.servers.get_mut(server) {
			None => {
				// No history for this server: assume minimal contention. The request itself
				// counts as 1. This call never advances the global counters.
				state
					.servers
					.insert(server.clone(), ServerEntry::new(global_delta, global_rho));
				(1, 1)
			}
			Some(entry) => {
				let delta = window(global_delta, entry.delta_baseline, entry.local_delta);
				let rho = window(global_rho, entry.rho_baseline, entry.local_rho);
				match (delta, rho) {
					(Ok(delta), Ok(rho)) => {
						entry.reset(global_delta, global_rho);
						(delta, rho)
					}
					(Err(skew), _) | (_, Err(skew)) => {
						drop(state);
						panic!("{skew}");
					}
				}
			}
		};

		tracing::trace!(?server, delta, rho, "issued request params");
		ReqParams { client, delta, rho }
	}

	/// Evict every server entry idle for at least [TrackerConfig::idle_horizon], returning how
	/// many were removed.
	///
	/// A no-op (returning 0) when no horizon is configured.
	pub fn evict_idle(&self) -> usize {
		let Some(horizon) = self.config.idle_horizon else {
			return 0;
		};
		let mut state = self.state.lock().unwrap();
		Self::sweep(&mut state, horizon)
	}

	/// Acquire the state lock, running the automatic eviction sweep first when one is due.
	///
	/// Sweeping before the caller's own mutation means the entry about to be touched is judged
	/// by its previous access.
	fn lock(&self) -> MutexGuard<'_, TrackerState<S>> {
		let mut state = self.state.lock().unwrap();
		if let Some(horizon) = self.config.idle_horizon {
			if self.config.sweep_every > 0 {
				state.ops_since_sweep += 1;
				if state.ops_since_sweep >= self.config.sweep_every {
					state.ops_since_sweep = 0;
					Self::sweep(&mut state, horizon);
				}
			}
		}
		state
	}

	fn sweep(state: &mut TrackerState<S>, horizon: Duration) -> usize {
		let before = state.servers.len();
		state.servers.retain(|_, entry| entry.idle_for() < horizon);

		let evicted = before - state.servers.len();
		if evicted > 0 {
			tracing::debug!(evicted, remaining = state.servers.len(), "evicted idle server entries");
		}
		evicted
	}
}
