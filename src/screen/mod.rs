//! Location picker screen
//!
//! `LocationPickerScreen` owns the screen state and wires it to the device
//! location service and a reverse geocoder. Address lookups run as tokio
//! tasks, one per role; a new lookup aborts the one it supersedes, and the
//! sequence guard in [`ScreenState::complete_lookup`] drops anything that
//! still completes late.

pub mod scene;
pub mod state;

pub use scene::{MapScene, Marker, Polyline};
pub use state::{AddressLabel, LookupOutcome, LookupTicket, Role, ScreenState};

use crate::coord::{GeoPoint, ViewportRegion};
use crate::geo::{LocationProvider, PermissionStatus, ReverseGeocoder};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Headless location picker: pickup from the device, drop from taps
pub struct LocationPickerScreen<L, G> {
    state: Arc<Mutex<ScreenState>>,
    location: L,
    geocoder: Arc<G>,
    /// Latest lookup task per role, with the sequence number it serves
    lookups: Mutex<HashMap<Role, (u64, JoinHandle<()>)>>,
}

impl<L, G> LocationPickerScreen<L, G>
where
    L: LocationProvider,
    G: ReverseGeocoder + 'static,
{
    /// Create a screen showing `region` before any position fix
    pub fn new(region: ViewportRegion, location: L, geocoder: G) -> Self {
        Self {
            state: Arc::new(Mutex::new(ScreenState::new(region))),
            location,
            geocoder: Arc::new(geocoder),
            lookups: Mutex::new(HashMap::new()),
        }
    }

    /// Startup sequence: permission, one position fix, pickup lookup
    ///
    /// Failures are logged and reflected in state; nothing is returned to the
    /// caller. The pickup address resolves in the background.
    pub async fn mount(&self) {
        if self.location.request_foreground_permission().await == PermissionStatus::Denied {
            self.state.lock().await.deny_permission();
            return;
        }

        let position = match self.location.current_position().await {
            Ok(position) => position,
            Err(e) => {
                warn!(error = %e, "Could not get current position; pickup left unset");
                return;
            }
        };

        let ticket = self.state.lock().await.fix_position(position);
        if let Some(ticket) = ticket {
            self.spawn_lookup(ticket, position).await;
        }
    }

    /// Handle a map tap; returns false when the tap was ignored
    pub async fn tap(&self, point: GeoPoint) -> bool {
        let ticket = self.state.lock().await.tap(point);
        match ticket {
            Some(ticket) => {
                self.spawn_lookup(ticket, point).await;
                true
            }
            None => false,
        }
    }

    /// Chat button handler. Intentionally does nothing beyond logging.
    pub fn open_chat(&self) {
        info!("Opening chat...");
    }

    /// Wait until every outstanding address lookup has finished
    pub async fn settle(&self) {
        let handles: Vec<_> = self.lookups.lock().await.drain().map(|(_, (_, h))| h).collect();
        for handle in handles {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!(error = %e, "Address lookup task failed");
                }
            }
        }
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> ScreenState {
        self.state.lock().await.clone()
    }

    /// Current map surface frame
    pub async fn scene(&self) -> MapScene {
        self.state.lock().await.scene()
    }

    async fn spawn_lookup(&self, ticket: LookupTicket, point: GeoPoint) {
        let state = Arc::clone(&self.state);
        let geocoder = Arc::clone(&self.geocoder);

        let handle = tokio::spawn(async move {
            let result = geocoder.reverse_geocode(point).await;
            let outcome = state.lock().await.complete_lookup(ticket, result);
            debug!(role = %ticket.role, seq = ticket.seq, ?outcome, "Address lookup finished");
        });

        // Two taps can register out of order; the higher sequence always stays
        let mut lookups = self.lookups.lock().await;
        let newer_registered =
            matches!(lookups.get(&ticket.role), Some((seq, _)) if *seq > ticket.seq);
        let superseded = if newer_registered {
            Some(handle)
        } else {
            lookups
                .insert(ticket.role, (ticket.seq, handle))
                .map(|(_, previous)| previous)
        };
        if let Some(superseded) = superseded {
            if !superseded.is_finished() {
                debug!(role = %ticket.role, "Aborting superseded address lookup");
            }
            superseded.abort();
        }
    }
}

impl<L, G> Drop for LocationPickerScreen<L, G> {
    fn drop(&mut self) {
        for (_, (_, handle)) in self.lookups.get_mut().drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::geo::FixedLocation;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Geocoder answering from a table keyed by "lat,lng"
    ///
    /// Points missing from the table fail. Points with a gate wait for it.
    #[derive(Default)]
    struct ScriptedGeocoder {
        addresses: HashMap<String, Option<String>>,
        gates: HashMap<String, Arc<Notify>>,
        calls: AtomicUsize,
    }

    impl ScriptedGeocoder {
        fn with(mut self, point: GeoPoint, address: Option<&str>) -> Self {
            self.addresses
                .insert(point.to_string(), address.map(str::to_string));
            self
        }

        fn gated(mut self, point: GeoPoint, gate: Arc<Notify>) -> Self {
            self.gates.insert(point.to_string(), gate);
            self
        }
    }

    impl ReverseGeocoder for ScriptedGeocoder {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn reverse_geocode(&self, point: GeoPoint) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let key = point.to_string();
            if let Some(gate) = self.gates.get(&key) {
                gate.notified().await;
            }
            self.addresses
                .get(&key)
                .cloned()
                .ok_or_else(|| Error::Geocoding(format!("no script for {}", key)))
        }
    }

    fn home() -> GeoPoint {
        GeoPoint::new(37.7749, -122.4194)
    }

    #[tokio::test]
    async fn test_mount_sets_pickup_and_address() {
        let geocoder = ScriptedGeocoder::default().with(home(), Some("Market St, San Francisco"));
        let region = ViewportRegion::new(GeoPoint::new(0.0, 0.0), 0.0922, 0.0421).unwrap();
        let screen = LocationPickerScreen::new(region, FixedLocation::at(home()), geocoder);

        screen.mount().await;
        screen.settle().await;

        let state = screen.snapshot().await;
        assert_eq!(state.pickup(), Some(home()));
        assert_eq!(state.region().center(), home());
        assert_eq!(state.region().latitude_span(), 0.0922);
        assert_eq!(state.region().longitude_span(), 0.0421);
        assert_eq!(state.label(Role::Pickup).text, "Market St, San Francisco");
        assert!(!state.label(Role::Pickup).pending);
    }

    #[tokio::test]
    async fn test_mount_with_denied_permission() {
        let screen = LocationPickerScreen::new(
            ViewportRegion::default(),
            FixedLocation::denied(),
            ScriptedGeocoder::default(),
        );

        screen.mount().await;
        assert!(!screen.tap(GeoPoint::new(37.8, -122.4)).await);
        screen.settle().await;

        let state = screen.snapshot().await;
        assert!(state.permission_denied());
        assert!(state.pickup().is_none());
        assert!(state.route().is_empty());
        assert!(screen.scene().await.warning.is_some());
        assert_eq!(screen.geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_mount_with_unavailable_position() {
        let screen = LocationPickerScreen::new(
            ViewportRegion::default(),
            FixedLocation::unavailable(),
            ScriptedGeocoder::default(),
        );

        screen.mount().await;
        screen.settle().await;

        let state = screen.snapshot().await;
        assert!(!state.permission_denied());
        assert!(state.pickup().is_none());
        assert_eq!(state.region(), ViewportRegion::default());
        assert!(screen.scene().await.warning.is_none());
    }

    #[tokio::test]
    async fn test_taps_replace_drop() {
        let taps = [
            GeoPoint::new(37.78, -122.41),
            GeoPoint::new(37.79, -122.40),
            GeoPoint::new(37.80, -122.39),
        ];
        let geocoder = ScriptedGeocoder::default()
            .with(home(), Some("Home"))
            .with(taps[0], Some("First"))
            .with(taps[1], Some("Second"))
            .with(taps[2], Some("Third"));
        let screen =
            LocationPickerScreen::new(ViewportRegion::default(), FixedLocation::at(home()), geocoder);

        screen.mount().await;
        for tap in taps {
            assert!(screen.tap(tap).await);
        }
        screen.settle().await;

        let state = screen.snapshot().await;
        assert_eq!(state.drop_point(), Some(taps[2]));
        assert_eq!(state.route().points(), &[home(), taps[2]]);
        assert_eq!(state.label(Role::Drop).text, "Third");
        assert_eq!(state.label(Role::Pickup).text, "Home");
    }

    #[tokio::test]
    async fn test_slow_superseded_lookup_does_not_win() {
        let slow = GeoPoint::new(37.78, -122.41);
        let fast = GeoPoint::new(37.79, -122.40);
        let gate = Arc::new(Notify::new());
        let geocoder = ScriptedGeocoder::default()
            .with(home(), Some("Home"))
            .with(slow, Some("Slow street"))
            .with(fast, Some("Fast street"))
            .gated(slow, Arc::clone(&gate));
        let screen =
            LocationPickerScreen::new(ViewportRegion::default(), FixedLocation::at(home()), geocoder);

        screen.mount().await;
        screen.tap(slow).await;
        screen.tap(fast).await;
        screen.settle().await;

        // Releasing the gate late must not resurrect the old result
        gate.notify_waiters();
        tokio::task::yield_now().await;

        let state = screen.snapshot().await;
        assert_eq!(state.drop_point(), Some(fast));
        assert_eq!(state.label(Role::Drop).text, "Fast street");
    }

    #[tokio::test]
    async fn test_late_registration_does_not_abort_newer_lookup() {
        let first = GeoPoint::new(37.78, -122.41);
        let second = GeoPoint::new(37.79, -122.40);
        let geocoder = ScriptedGeocoder::default()
            .with(home(), Some("Home"))
            .with(first, Some("First street"))
            .with(second, Some("Second street"));
        let screen =
            LocationPickerScreen::new(ViewportRegion::default(), FixedLocation::at(home()), geocoder);
        screen.mount().await;

        let older = screen.state.lock().await.tap(first).unwrap();
        let newer = screen.state.lock().await.tap(second).unwrap();
        screen.spawn_lookup(newer, second).await;
        screen.spawn_lookup(older, first).await;
        screen.settle().await;

        let state = screen.snapshot().await;
        assert_eq!(state.drop_point(), Some(second));
        assert_eq!(state.label(Role::Drop).text, "Second street");
        assert!(!state.label(Role::Drop).pending);
    }

    #[tokio::test]
    async fn test_failed_lookup_keeps_label() {
        let geocoder = ScriptedGeocoder::default().with(home(), Some("Home"));
        let screen =
            LocationPickerScreen::new(ViewportRegion::default(), FixedLocation::at(home()), geocoder);

        screen.mount().await;
        screen.tap(GeoPoint::new(10.0, 10.0)).await;
        screen.settle().await;

        let state = screen.snapshot().await;
        assert_eq!(state.drop_point(), Some(GeoPoint::new(10.0, 10.0)));
        assert_eq!(state.label(Role::Drop).text, "");
        assert!(!state.label(Role::Drop).pending);
    }

    #[tokio::test]
    async fn test_zero_results_label_is_empty() {
        let nowhere = GeoPoint::new(0.0, -160.0);
        let geocoder = ScriptedGeocoder::default()
            .with(home(), Some("Home"))
            .with(nowhere, None);
        let screen =
            LocationPickerScreen::new(ViewportRegion::default(), FixedLocation::at(home()), geocoder);

        screen.mount().await;
        screen.tap(nowhere).await;
        screen.settle().await;

        let label = screen.snapshot().await.label(Role::Drop).clone();
        assert_eq!(label, AddressLabel { text: String::new(), pending: false });
    }

    #[tokio::test]
    async fn test_open_chat_is_a_no_op() {
        let screen =
            LocationPickerScreen::new(ViewportRegion::default(), FixedLocation::at(home()), ScriptedGeocoder::default());
        let before = screen.scene().await;
        screen.open_chat();
        assert_eq!(screen.scene().await, before);
    }
}
