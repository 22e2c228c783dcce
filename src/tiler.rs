//! The orchestrator that ties the window system, filter, and layout
//! together.
//!
//! [`WindowTiler`] owns the end-to-end sequence for one trigger:
//!
//! 1. fetch the window snapshot from the [`WindowSystem`];
//! 2. first pass: warn once about off-screen windows, filter, compute the
//!    tiles, issue the geometry updates;
//! 3. sleep for a fixed delay;
//! 4. retry pass: repeat filter/compute/apply against the **same**
//!    snapshot, without the warning.
//!
//! The retry exists because a single application of geometry is sometimes
//! not honored by the compositor. Updates are issued fire-and-forget: the
//! retry timer is armed without waiting for any of them to complete, so the
//! second pass may overlap the host still applying the first. That race is
//! accepted; the second pass is the recovery mechanism.
//!
//! Each `run` owns its snapshot, so concurrent runs never share mutable
//! state inside the daemon. A second trigger while one run is in flight is
//! not guarded against and may interleave on the compositor side.

use crate::command::TileRequest;
use crate::filter::{filter_windows, is_non_minimized, is_within_work_area, Predicate};
use crate::layout::compute_tiles;
use crate::traits::{Notifier, WindowSystem};
use crate::types::{Rect, WindowId, WindowInfo, WindowState};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;

/// Possible errors from a tiling run.
#[derive(Debug, thiserror::Error)]
pub enum TilerError {
    /// The window system failed on a path that cannot degrade gracefully.
    #[error("window system error: {0}")]
    WindowSystem(String),
}

/// Which of the two applications of the layout is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    First,
    Retry,
}

/// Orchestrates one-shot tiling runs.
///
/// The tiler is generic over any [`WindowSystem`] and [`Notifier`]
/// implementation, making it completely independent of Hyprland or any
/// other concrete backend.
///
/// # Typical usage
///
/// ```ignore
/// let wm = Arc::new(HyprlandWm::new(10_000));
/// let tiler = WindowTiler::new(wm.clone(), wm, Duration::from_millis(300));
/// tiler.run(TileRequest::default()).await?;
/// ```
pub struct WindowTiler<S, N> {
    system: Arc<S>,
    notifier: Arc<N>,
    retry_delay: Duration,
}

impl<S, N> WindowTiler<S, N>
where
    S: WindowSystem + 'static,
    N: Notifier + 'static,
{
    /// Create a new tiler.
    ///
    /// `retry_delay` is the pause between the first pass and the retry
    /// pass.
    pub fn new(system: Arc<S>, notifier: Arc<N>, retry_delay: Duration) -> Self {
        Self {
            system,
            notifier,
            retry_delay,
        }
    }

    /// Execute one full tiling sequence: fetch, tile, wait, tile again.
    ///
    /// A failed window query is treated as an empty snapshot: zero windows
    /// tile to zero tiles and the run completes without any update. A
    /// failed work-area read aborts the affected pass instead; there is no
    /// meaningful zone to tile into without it.
    pub async fn run(&self, request: TileRequest) -> Result<(), TilerError> {
        match request.source {
            Some(ref source) => info!("tiling triggered by {}", source),
            None => info!("tiling triggered"),
        }

        let snapshot = match self.system.list_windows(false).await {
            Ok(windows) => windows,
            Err(e) => {
                warn!("window query failed, treating as empty: {}", e);
                Vec::new()
            }
        };
        debug!("snapshot holds {} window(s)", snapshot.len());

        self.tile_pass(&snapshot, Pass::First).await?;
        tokio::time::sleep(self.retry_delay).await;
        self.tile_pass(&snapshot, Pass::Retry).await?;

        info!("tiling sequence complete");
        Ok(())
    }

    /// One filter → compute → apply cycle over `snapshot`.
    ///
    /// The work area is re-read on every pass; the snapshot is not.
    async fn tile_pass(&self, snapshot: &[WindowInfo], pass: Pass) -> Result<(), TilerError> {
        let area = self
            .system
            .work_area()
            .await
            .map_err(|e| TilerError::WindowSystem(e.to_string()))?;

        // The warning counts every snapshot window outside the work area,
        // minimized or not, and fires on the first pass only.
        let off_screen = snapshot
            .iter()
            .filter(|w| !is_within_work_area(w, &area))
            .count();
        if pass == Pass::First && off_screen > 0 {
            let message = format!(
                "{} window(s) are outside of your main screen, and multi-monitor \
                 layouts are not supported. Only windows on your main screen will \
                 be tiled.",
                off_screen
            );
            if let Err(e) = self.notifier.alert(&message).await {
                warn!("could not show exclusion warning: {}", e);
            }
        }

        let within = move |w: &WindowInfo| is_within_work_area(w, &area);
        let predicates: [&Predicate; 2] = [&is_non_minimized, &within];
        let eligible = filter_windows(snapshot, &predicates);

        let tiles = compute_tiles(eligible.len(), area);
        debug!(
            "{:?} pass: {} tile(s) over work area {}",
            pass,
            tiles.len(),
            area
        );

        self.apply(&eligible, &tiles);
        Ok(())
    }

    /// Pair windows with tiles by position and issue one update per pair.
    ///
    /// Updates are spawned and never joined; failures are not inspected.
    /// The unconditional retry pass is the only recovery mechanism.
    fn apply(&self, windows: &[&WindowInfo], tiles: &[Rect]) {
        debug_assert_eq!(windows.len(), tiles.len());
        for (window, tile) in windows.iter().zip(tiles) {
            info!("repositioning window {} to {}", window.id, tile);
            let system = Arc::clone(&self.system);
            let id = window.id.clone();
            let tile = *tile;
            tokio::spawn(async move {
                let _ = system.update_window(&id, tile, WindowState::Normal).await;
                Self::finished(&id);
            });
        }
    }

    /// Per-window completion hook, called when an update resolves.
    ///
    /// Does nothing for now; reserved for confirmation or per-window retry
    /// logic.
    fn finished(_id: &WindowId) {}
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, thiserror::Error)]
    #[error("mock failure")]
    struct MockError;

    /// A window system double that records updates and counts queries.
    struct RecordingSystem {
        windows: Vec<WindowInfo>,
        area: Rect,
        fail_list: bool,
        fail_area: bool,
        list_calls: Mutex<u32>,
        area_calls: Mutex<u32>,
        updates: Mutex<Vec<(WindowId, Rect, WindowState)>>,
    }

    impl RecordingSystem {
        fn new(windows: Vec<WindowInfo>, area: Rect) -> Self {
            Self {
                windows,
                area,
                fail_list: false,
                fail_area: false,
                list_calls: Mutex::new(0),
                area_calls: Mutex::new(0),
                updates: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl WindowSystem for RecordingSystem {
        type Error = MockError;

        async fn list_windows(&self, _populate: bool) -> Result<Vec<WindowInfo>, MockError> {
            *self.list_calls.lock().unwrap() += 1;
            if self.fail_list {
                return Err(MockError);
            }
            Ok(self.windows.clone())
        }

        async fn work_area(&self) -> Result<Rect, MockError> {
            *self.area_calls.lock().unwrap() += 1;
            if self.fail_area {
                return Err(MockError);
            }
            Ok(self.area)
        }

        async fn update_window(
            &self,
            id: &WindowId,
            rect: Rect,
            state: WindowState,
        ) -> Result<(), MockError> {
            self.updates.lock().unwrap().push((id.clone(), rect, state));
            Ok(())
        }
    }

    /// A notifier double that records every alert message.
    #[derive(Default)]
    struct RecordingNotifier {
        alerts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        type Error = MockError;

        async fn alert(&self, message: &str) -> Result<(), MockError> {
            self.alerts.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    fn win(id: &str, left: i32, top: i32, state: WindowState) -> WindowInfo {
        WindowInfo {
            id: WindowId::from(id),
            rect: Rect::new(left, top, 640, 480),
            state,
        }
    }

    fn tiler(
        system: RecordingSystem,
    ) -> (
        WindowTiler<RecordingSystem, RecordingNotifier>,
        Arc<RecordingSystem>,
        Arc<RecordingNotifier>,
    ) {
        let system = Arc::new(system);
        let notifier = Arc::new(RecordingNotifier::default());
        let t = WindowTiler::new(
            Arc::clone(&system),
            Arc::clone(&notifier),
            Duration::from_millis(300),
        );
        (t, system, notifier)
    }

    /// Let spawned update tasks drain before asserting.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn two_windows_are_tiled_twice() {
        let area = Rect::new(0, 0, 1000, 500);
        let windows = vec![
            win("0xa", 0, 0, WindowState::Normal),
            win("0xb", 10, 10, WindowState::Normal),
        ];
        let (t, system, notifier) = tiler(RecordingSystem::new(windows, area));

        t.run(TileRequest::default()).await.unwrap();
        settle().await;

        let updates = system.updates.lock().unwrap();
        // Two windows, two passes.
        assert_eq!(updates.len(), 4);
        for pass in updates.chunks(2) {
            assert_eq!(pass[0].0, WindowId::from("0xa"));
            assert_eq!(pass[0].1, Rect::new(0, 0, 500, 500));
            assert_eq!(pass[1].0, WindowId::from("0xb"));
            assert_eq!(pass[1].1, Rect::new(501, 0, 499, 500));
        }
        // Every update forces the window back to normal.
        assert!(updates.iter().all(|(_, _, s)| *s == WindowState::Normal));
        assert!(notifier.alerts.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_windows_no_updates_no_warning() {
        let (t, system, notifier) =
            tiler(RecordingSystem::new(Vec::new(), Rect::new(0, 0, 1000, 500)));

        t.run(TileRequest::default()).await.unwrap();
        settle().await;

        assert!(system.updates.lock().unwrap().is_empty());
        assert!(notifier.alerts.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_failure_degrades_to_zero_windows() {
        let mut system =
            RecordingSystem::new(vec![win("0xa", 0, 0, WindowState::Normal)], Rect::new(0, 0, 1000, 500));
        system.fail_list = true;
        let (t, system, notifier) = tiler(system);

        t.run(TileRequest::default()).await.unwrap();
        settle().await;

        assert!(system.updates.lock().unwrap().is_empty());
        assert!(notifier.alerts.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn work_area_failure_aborts_the_run() {
        let mut system =
            RecordingSystem::new(vec![win("0xa", 0, 0, WindowState::Normal)], Rect::new(0, 0, 1000, 500));
        system.fail_area = true;
        let (t, system, _notifier) = tiler(system);

        assert!(t.run(TileRequest::default()).await.is_err());
        settle().await;
        assert!(system.updates.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn off_screen_window_warns_exactly_once() {
        let area = Rect::new(0, 0, 1000, 500);
        let windows = vec![
            win("0xin", 100, 100, WindowState::Normal),
            win("0xout", 5000, 100, WindowState::Normal),
        ];
        let (t, system, notifier) = tiler(RecordingSystem::new(windows, area));

        t.run(TileRequest::default()).await.unwrap();
        settle().await;

        // One warning over both passes, naming the excluded count.
        let alerts = notifier.alerts.lock().unwrap();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].starts_with("1 window(s)"));

        // Only the on-screen window is tiled, and it gets the whole area.
        let updates = system.updates.lock().unwrap();
        assert_eq!(updates.len(), 2);
        assert!(updates
            .iter()
            .all(|(id, rect, _)| *id == WindowId::from("0xin") && *rect == area));
    }

    #[tokio::test(start_paused = true)]
    async fn minimized_off_screen_window_still_counts_in_warning() {
        let area = Rect::new(0, 0, 1000, 500);
        let windows = vec![
            win("0xin", 0, 0, WindowState::Normal),
            win("0xgone", -4000, 0, WindowState::Minimized),
        ];
        let (t, _system, notifier) = tiler(RecordingSystem::new(windows, area));

        t.run(TileRequest::default()).await.unwrap();
        settle().await;

        let alerts = notifier.alerts.lock().unwrap();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].starts_with("1 window(s)"));
    }

    #[tokio::test(start_paused = true)]
    async fn minimized_windows_are_not_tiled_and_not_warned_about() {
        let area = Rect::new(0, 0, 1000, 500);
        let windows = vec![
            win("0xa", 0, 0, WindowState::Normal),
            win("0xm", 50, 50, WindowState::Minimized),
        ];
        let (t, system, notifier) = tiler(RecordingSystem::new(windows, area));

        t.run(TileRequest::default()).await.unwrap();
        settle().await;

        // Minimized-but-on-screen is silently excluded: no warning.
        assert!(notifier.alerts.lock().unwrap().is_empty());
        let updates = system.updates.lock().unwrap();
        assert_eq!(updates.len(), 2);
        assert!(updates.iter().all(|(id, _, _)| *id == WindowId::from("0xa")));
    }

    #[tokio::test(start_paused = true)]
    async fn pairing_follows_snapshot_order() {
        let area = Rect::new(0, 0, 1000, 500);
        let windows = vec![
            win("0x1", 0, 0, WindowState::Normal),
            win("0x2", 10, 0, WindowState::Normal),
            win("0x3", 20, 0, WindowState::Normal),
        ];
        let (t, system, _notifier) = tiler(RecordingSystem::new(windows, area));

        t.run(TileRequest::default()).await.unwrap();
        settle().await;

        let updates = system.updates.lock().unwrap();
        let first_pass = &updates[..3];
        assert_eq!(first_pass[0].0, WindowId::from("0x1"));
        assert_eq!(first_pass[0].1, Rect::new(0, 0, 500, 500));
        assert_eq!(first_pass[1].0, WindowId::from("0x2"));
        assert_eq!(first_pass[1].1, Rect::new(501, 0, 499, 250));
        assert_eq!(first_pass[2].0, WindowId::from("0x3"));
        assert_eq!(first_pass[2].1, Rect::new(501, 251, 499, 249));
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_is_fetched_once_work_area_once_per_pass() {
        let area = Rect::new(0, 0, 1000, 500);
        let windows = vec![win("0xa", 0, 0, WindowState::Normal)];
        let (t, system, _notifier) = tiler(RecordingSystem::new(windows, area));

        t.run(TileRequest::default()).await.unwrap();
        settle().await;

        assert_eq!(*system.list_calls.lock().unwrap(), 1);
        assert_eq!(*system.area_calls.lock().unwrap(), 2);
    }
}
