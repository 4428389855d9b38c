//! Marker drag gestures.
//!
//! A drag is one gesture session: pointer-down on a boundary marker opens
//! it, pointer moves carrying its token update the range model, and
//! pointer-up closes the subscription before anything else happens. The
//! controller then keeps reporting itself busy for a short settle delay so
//! that the click a platform synthesizes on the same release is seen as
//! part of the drag and ignored. Only when that delay has passed does the
//! range model's `end_drag` run and broadcast the final bounds.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use clipmark_core::{Boundary, OneShotTimer, TrackGeometry};
use clipmark_timeline::{RangeCommit, RangeModel};
use tracing::debug;

/// Process-wide token counter; tokens from two editors never collide.
static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Identifies the pointer subscription of one gesture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GestureToken(u64);

impl GestureToken {
    fn next() -> Self {
        Self(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }
}

/// State owned by a live gesture.
#[derive(Debug, Clone)]
struct GestureSession {
    token: GestureToken,
    target: Boundary,
    /// Latest pointer time, read synchronously by move and release handling.
    latest: Option<f64>,
    moves: usize,
}

/// Turns pointer events on the marker handles into range model drags.
#[derive(Debug)]
pub struct PointerDragController {
    geometry: TrackGeometry,
    active: Option<GestureSession>,
    settling: OneShotTimer<GestureToken>,
    release_settle: Duration,
}

impl PointerDragController {
    pub fn new(release_settle: Duration) -> Self {
        Self {
            geometry: TrackGeometry::default(),
            active: None,
            settling: OneShotTimer::new(),
            release_settle,
        }
    }

    /// Update where the track is on screen.
    pub fn set_geometry(&mut self, geometry: TrackGeometry) {
        self.geometry = geometry;
    }

    pub fn geometry(&self) -> TrackGeometry {
        self.geometry
    }

    /// A pointer subscription is live.
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// A drag is live or was released less than the settle delay ago.
    pub fn is_busy(&self) -> bool {
        self.active.is_some() || self.settling.is_pending()
    }

    /// Latest time reported by the live gesture.
    pub fn latest_time(&self) -> Option<f64> {
        self.active.as_ref().and_then(|session| session.latest)
    }

    /// Time until the settle delay elapses.
    pub fn settle_remaining(&self, now: Instant) -> Option<Duration> {
        self.settling.remaining(now)
    }

    /// Pointer pressed on a boundary marker.
    ///
    /// Swallowed without any state change when `enabled` is false, while
    /// another gesture is live or settling, or when the range cannot be dragged.
    pub fn pointer_down(
        &mut self,
        target: Boundary,
        enabled: bool,
        range: &mut RangeModel,
    ) -> Option<GestureToken> {
        if !enabled || self.is_busy() {
            debug!(?target, enabled, "marker press swallowed");
            return None;
        }
        if let Err(e) = range.begin_drag(target) {
            debug!("marker press ignored: {}", e);
            return None;
        }
        let token = GestureToken::next();
        self.active = Some(GestureSession {
            token,
            target,
            latest: range.range().get(target),
            moves: 0,
        });
        debug!(?token, ?target, "drag started");
        Some(token)
    }

    /// Pointer moved anywhere while subscribed.
    ///
    /// Returns the clamped time written to the range, or `None` for moves
    /// that do not belong to the live gesture.
    pub fn pointer_move(
        &mut self,
        token: GestureToken,
        x: f32,
        range: &mut RangeModel,
    ) -> Option<f64> {
        let session = self.active.as_mut().filter(|s| s.token == token)?;
        let time = self.geometry.time_at_x(x, range.duration());
        let applied = range.update_drag(time).ok()?;
        session.latest = Some(applied);
        session.moves += 1;
        Some(applied)
    }

    /// Pointer released.
    ///
    /// The subscription is dropped first so no later move can touch the
    /// range; the settle timer starts afterwards.
    pub fn pointer_up(&mut self, token: GestureToken, now: Instant) -> bool {
        let Some(session) = self.active.take_if_token(token) else {
            return false;
        };
        self.settling.schedule(now, self.release_settle, session.token);
        debug!(
            token = ?session.token,
            target = ?session.target,
            moves = session.moves,
            latest = ?session.latest,
            "drag released"
        );
        true
    }

    /// Finish a released drag once the settle delay has passed.
    pub fn poll(&mut self, range: &mut RangeModel, now: Instant) -> Option<RangeCommit> {
        let token = self.settling.poll(now)?;
        let commit = range.end_drag();
        debug!(?token, committed = commit.is_some(), "drag settled");
        commit
    }

    /// Drop the live gesture and any settle timer without committing.
    pub fn abort(&mut self) -> bool {
        let had_session = self.active.take().is_some();
        let had_timer = self.settling.cancel().is_some();
        had_session || had_timer
    }
}

trait TakeIfToken {
    fn take_if_token(&mut self, token: GestureToken) -> Option<GestureSession>;
}

impl TakeIfToken for Option<GestureSession> {
    fn take_if_token(&mut self, token: GestureToken) -> Option<GestureSession> {
        match self {
            Some(session) if session.token == token => self.take(),
            _ => None,
        }
    }
}
