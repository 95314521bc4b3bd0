/// The scheduling phase under which a server completed a response.
///
/// Reported by the server alongside each response and fed back via
/// [ServiceTracker::track_response](crate::ServiceTracker::track_response); this crate never
/// derives it. Orthogonal to whether the underlying operation succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
	/// Admitted under the guaranteed-minimum-rate class.
	Reservation,
	/// Admitted under a best-effort class (priority or limit).
	Priority,
}

impl Phase {
	pub const fn is_reservation(self) -> bool {
		matches!(self, Self::Reservation)
	}
}

/// The QoS tag material for one outgoing request.
///
/// Produced by [ServiceTracker::request_params](crate::ServiceTracker::request_params) and
/// embedded unmodified in the request by the tagging layer. Both counts are at least 1: the
/// request being formed counts itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReqParams<C> {
	/// The client identifier, opaque to this crate and attached unchanged.
	pub client: C,

	/// Responses this client completed at *other* servers since the destination server was last
	/// requested, plus one for this request.
	pub delta: u32,

	/// Like `delta`, restricted to reservation-phase responses.
	pub rho: u32,
}
