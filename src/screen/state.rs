//! Screen state and its transitions
//!
//! All mutation goes through the named transitions below. Address lookups are
//! tagged with a per-role sequence number so a completion that arrives after a
//! newer lookup was issued is discarded instead of overwriting a fresher label.

use crate::coord::{GeoPoint, RouteLine, ViewportRegion};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

/// Which pin an address belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Pickup,
    Drop,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pickup => write!(f, "pickup"),
            Self::Drop => write!(f, "drop"),
        }
    }
}

/// Resolved address text for a pin
///
/// `text` is empty until a lookup succeeds, and also when the lookup found no
/// result; `pending` tells the two apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressLabel {
    pub text: String,
    pub pending: bool,
}

/// Handle for one issued address lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTicket {
    pub role: Role,
    pub seq: u64,
}

/// What happened to a completed lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The label was updated
    Applied,
    /// A newer lookup for the same role exists; the result was dropped
    Stale,
    /// The lookup failed; the label keeps its previous text
    Failed,
}

/// In-memory state of the location picker
#[derive(Debug, Clone, Serialize)]
pub struct ScreenState {
    region: ViewportRegion,
    pickup: Option<GeoPoint>,
    drop: Option<GeoPoint>,
    route: RouteLine,
    pickup_label: AddressLabel,
    drop_label: AddressLabel,
    permission_denied: bool,
    #[serde(skip)]
    pickup_seq: u64,
    #[serde(skip)]
    drop_seq: u64,
}

impl ScreenState {
    /// Fresh state showing `region`, with no pins
    pub fn new(region: ViewportRegion) -> Self {
        Self {
            region,
            pickup: None,
            drop: None,
            route: RouteLine::empty(),
            pickup_label: AddressLabel::default(),
            drop_label: AddressLabel::default(),
            permission_denied: false,
            pickup_seq: 0,
            drop_seq: 0,
        }
    }

    pub fn region(&self) -> ViewportRegion {
        self.region
    }

    pub fn pickup(&self) -> Option<GeoPoint> {
        self.pickup
    }

    pub fn drop_point(&self) -> Option<GeoPoint> {
        self.drop
    }

    pub fn route(&self) -> RouteLine {
        self.route
    }

    pub fn label(&self, role: Role) -> &AddressLabel {
        match role {
            Role::Pickup => &self.pickup_label,
            Role::Drop => &self.drop_label,
        }
    }

    pub fn permission_denied(&self) -> bool {
        self.permission_denied
    }

    /// Record a denied foreground permission; never reset
    pub fn deny_permission(&mut self) {
        if !self.permission_denied {
            error!("Permission to access location was denied");
        }
        self.permission_denied = true;
    }

    /// Apply the first position fix
    ///
    /// Recenters the viewport (spans unchanged), sets the pickup and issues
    /// its lookup. Ignored once pickup is set or permission was denied.
    pub fn fix_position(&mut self, point: GeoPoint) -> Option<LookupTicket> {
        if self.permission_denied {
            warn!(%point, "Ignoring position fix after permission denial");
            return None;
        }
        if let Some(pickup) = self.pickup {
            debug!(%pickup, %point, "Pickup already set; ignoring position fix");
            return None;
        }

        self.region = self.region.recentered(point);
        self.pickup = Some(point);
        Some(self.issue_lookup(Role::Pickup))
    }

    /// Handle a tap on the map
    ///
    /// Replaces the drop point, rebuilds the route as `[pickup, drop]` and
    /// issues a drop lookup. Taps before pickup exists are ignored.
    pub fn tap(&mut self, point: GeoPoint) -> Option<LookupTicket> {
        let Some(pickup) = self.pickup else {
            warn!(%point, "Ignoring tap: pickup location is not established yet");
            return None;
        };

        self.drop = Some(point);
        self.route = RouteLine::between(pickup, point);
        Some(self.issue_lookup(Role::Drop))
    }

    /// Start a lookup for `role`, superseding any earlier one
    fn issue_lookup(&mut self, role: Role) -> LookupTicket {
        let seq = match role {
            Role::Pickup => {
                self.pickup_seq += 1;
                self.pickup_seq
            }
            Role::Drop => {
                self.drop_seq += 1;
                self.drop_seq
            }
        };
        self.label_mut(role).pending = true;
        LookupTicket { role, seq }
    }

    /// Whether `ticket` is the most recent lookup for its role
    pub fn is_current(&self, ticket: LookupTicket) -> bool {
        let latest = match ticket.role {
            Role::Pickup => self.pickup_seq,
            Role::Drop => self.drop_seq,
        };
        ticket.seq == latest
    }

    /// Apply a finished lookup
    ///
    /// `Ok(None)` (no results) sets the label to an empty string. Errors are
    /// logged and leave the previous text in place.
    pub fn complete_lookup(
        &mut self,
        ticket: LookupTicket,
        result: Result<Option<String>>,
    ) -> LookupOutcome {
        if !self.is_current(ticket) {
            debug!(role = %ticket.role, seq = ticket.seq, "Discarding stale address lookup");
            return LookupOutcome::Stale;
        }

        let label = self.label_mut(ticket.role);
        label.pending = false;

        match result {
            Ok(address) => {
                label.text = address.unwrap_or_default();
                LookupOutcome::Applied
            }
            Err(e) => {
                warn!(role = %ticket.role, error = %e, "Error fetching location name");
                LookupOutcome::Failed
            }
        }
    }

    fn label_mut(&mut self, role: Role) -> &mut AddressLabel {
        match role {
            Role::Pickup => &mut self.pickup_label,
            Role::Drop => &mut self.drop_label,
        }
    }
}

impl Default for ScreenState {
    fn default() -> Self {
        Self::new(ViewportRegion::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn pickup() -> GeoPoint {
        GeoPoint::new(37.7749, -122.4194)
    }

    fn mounted() -> (ScreenState, LookupTicket) {
        let mut state = ScreenState::default();
        let ticket = state.fix_position(pickup()).unwrap();
        (state, ticket)
    }

    #[test]
    fn test_initial_state() {
        let state = ScreenState::default();
        assert!(state.pickup().is_none());
        assert!(state.drop_point().is_none());
        assert!(state.route().is_empty());
        assert_eq!(state.label(Role::Pickup), &AddressLabel::default());
        assert!(!state.permission_denied());
    }

    #[test]
    fn test_fix_position_recenters_and_sets_pickup() {
        let region = ViewportRegion::new(GeoPoint::new(0.0, 0.0), 0.3, 0.2).unwrap();
        let mut state = ScreenState::new(region);
        let fix = GeoPoint::new(51.5237, -0.1585);

        let ticket = state.fix_position(fix).unwrap();

        assert_eq!(ticket, LookupTicket { role: Role::Pickup, seq: 1 });
        assert_eq!(state.pickup(), Some(fix));
        assert_eq!(state.region().center(), fix);
        assert_eq!(state.region().latitude_span(), 0.3);
        assert_eq!(state.region().longitude_span(), 0.2);
        assert!(state.label(Role::Pickup).pending);
    }

    #[test]
    fn test_pickup_is_set_once() {
        let (mut state, _) = mounted();
        assert!(state.fix_position(GeoPoint::new(1.0, 1.0)).is_none());
        assert_eq!(state.pickup(), Some(pickup()));
        assert_eq!(state.region().center(), pickup());
    }

    #[test]
    fn test_denied_permission_blocks_pickup() {
        let mut state = ScreenState::default();
        state.deny_permission();
        state.deny_permission();

        assert!(state.permission_denied());
        assert!(state.fix_position(pickup()).is_none());
        assert!(state.tap(GeoPoint::new(37.8, -122.4)).is_none());
        assert!(state.pickup().is_none());
        assert!(state.route().is_empty());
    }

    #[test]
    fn test_tap_before_pickup_is_ignored() {
        let mut state = ScreenState::default();
        assert!(state.tap(GeoPoint::new(37.8, -122.4)).is_none());
        assert!(state.drop_point().is_none());
        assert!(state.route().is_empty());
        assert!(!state.label(Role::Drop).pending);
    }

    #[test]
    fn test_last_tap_wins() {
        let (mut state, _) = mounted();
        let taps = [
            GeoPoint::new(37.78, -122.41),
            GeoPoint::new(37.79, -122.40),
            GeoPoint::new(37.80, -122.39),
        ];

        let mut last = None;
        for tap in taps {
            last = state.tap(tap);
        }

        assert_eq!(last, Some(LookupTicket { role: Role::Drop, seq: 3 }));
        assert_eq!(state.drop_point(), Some(taps[2]));
        assert_eq!(state.route().len(), 2);
        assert_eq!(state.route().points(), &[pickup(), taps[2]]);
    }

    #[test]
    fn test_complete_lookup_applies_address() {
        let (mut state, ticket) = mounted();
        let outcome = state.complete_lookup(ticket, Ok(Some("Market St".to_string())));

        assert_eq!(outcome, LookupOutcome::Applied);
        assert_eq!(state.label(Role::Pickup).text, "Market St");
        assert!(!state.label(Role::Pickup).pending);
    }

    #[test]
    fn test_zero_results_yield_empty_label() {
        let (mut state, _) = mounted();
        let ticket = state.tap(GeoPoint::new(0.0, 0.0)).unwrap();
        assert!(state.label(Role::Drop).pending);

        let outcome = state.complete_lookup(ticket, Ok(None));

        assert_eq!(outcome, LookupOutcome::Applied);
        assert_eq!(state.label(Role::Drop).text, "");
        assert!(!state.label(Role::Drop).pending);
    }

    #[test]
    fn test_failed_lookup_keeps_previous_text() {
        let (mut state, _) = mounted();
        let first = state.tap(GeoPoint::new(37.78, -122.41)).unwrap();
        state.complete_lookup(first, Ok(Some("Old address".to_string())));

        let second = state.tap(GeoPoint::new(37.79, -122.40)).unwrap();
        let outcome = state.complete_lookup(second, Err(Error::Geocoding("timeout".to_string())));

        assert_eq!(outcome, LookupOutcome::Failed);
        assert_eq!(state.label(Role::Drop).text, "Old address");
        assert!(!state.label(Role::Drop).pending);
    }

    #[test]
    fn test_out_of_order_completion_is_discarded() {
        let (mut state, _) = mounted();
        let a = state.tap(GeoPoint::new(37.78, -122.41)).unwrap();
        let b = state.tap(GeoPoint::new(37.79, -122.40)).unwrap();

        // B resolves first, then the slower A arrives
        assert_eq!(
            state.complete_lookup(b, Ok(Some("B street".to_string()))),
            LookupOutcome::Applied
        );
        assert_eq!(
            state.complete_lookup(a, Ok(Some("A street".to_string()))),
            LookupOutcome::Stale
        );

        assert_eq!(state.label(Role::Drop).text, "B street");
    }

    #[test]
    fn test_roles_have_independent_sequences() {
        let (mut state, pickup_ticket) = mounted();
        let drop_ticket = state.tap(GeoPoint::new(37.78, -122.41)).unwrap();

        assert_eq!(drop_ticket.seq, 1);
        assert!(state.is_current(pickup_ticket));
        assert_eq!(
            state.complete_lookup(pickup_ticket, Ok(Some("Pickup St".to_string()))),
            LookupOutcome::Applied
        );
        assert_eq!(state.label(Role::Drop).text, "");
    }
}
