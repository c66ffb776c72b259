//! Route recording state machine
//!
//! A [`RouteRecorder`] lives for exactly one RecordRoute call. It is fed one
//! point per received message and produces a single [`RouteSummary`] when
//! the caller signals end-of-input. The recorder never waits on anything
//! itself; receiving the next point is the caller's job.

use crate::{FeatureStore, GuideError, Point, Result, RouteSummary, distance};
use std::time::Instant;

/// Lifecycle of a recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// Accepting points
    Accumulating,
    /// Summary already produced; terminal
    Closed,
}

/// Aggregates a stream of points into a route summary
#[derive(Debug)]
pub struct RouteRecorder<'a> {
    /// Store used to count features passed along the route
    store: &'a FeatureStore,
    state: RecorderState,
    point_count: i32,
    feature_count: i32,
    distance: i32,
    last_point: Option<Point>,
    started_at: Instant,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<'a> RouteRecorder<'a> {
    /// Start recording now
    pub fn start(store: &'a FeatureStore) -> Self {
        Self::start_at(store, Instant::now())
    }

    /// Start recording with an explicit start time
    pub fn start_at(store: &'a FeatureStore, started_at: Instant) -> Self {
        Self {
            store,
            state: RecorderState::Accumulating,
            point_count: 0,
            feature_count: 0,
            distance: 0,
            last_point: None,
            started_at,
        }
    }

    /// Account for one more point on the route
    ///
    /// Counts every stored feature located exactly at `point` and adds the
    /// leg from the previous point to the running distance.
    pub fn feed(&mut self, point: Point) -> Result<()> {
        if self.state == RecorderState::Closed {
            return Err(GuideError::InvalidState("cannot feed a closed route recorder"));
        }

        self.point_count = self.point_count.saturating_add(1);
        let matches = i32::try_from(self.store.count_at(&point)).unwrap_or(i32::MAX);
        self.feature_count = self.feature_count.saturating_add(matches);
        if let Some(last) = &self.last_point {
            self.distance = self.distance.saturating_add(distance(last, &point));
        }
        self.last_point = Some(point);
        Ok(())
    }

    /// Close the recorder and produce the summary
    pub fn finish(&mut self) -> Result<RouteSummary> {
        self.finish_at(Instant::now())
    }

    /// Close the recorder with an explicit end time
    ///
    /// Elapsed time is reported in whole seconds. A recorder can only be
    /// finished once.
    pub fn finish_at(&mut self, finished_at: Instant) -> Result<RouteSummary> {
        if self.state == RecorderState::Closed {
            return Err(GuideError::InvalidState("route recorder already finished"));
        }
        self.state = RecorderState::Closed;

        let elapsed = finished_at.saturating_duration_since(self.started_at);
        Ok(RouteSummary {
            point_count: self.point_count,
            feature_count: self.feature_count,
            distance: self.distance,
            elapsed_time: i32::try_from(elapsed.as_secs()).unwrap_or(i32::MAX),
        })
    }

    #[inline]
    pub fn state(&self) -> RecorderState {
        self.state
    }

    #[inline]
    pub fn point_count(&self) -> i32 {
        self.point_count
    }

    #[inline]
    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Feature;
    use std::time::Duration;

    const MENDHAM: Point = Point::new(407_838_351, -746_143_763);
    const WHIPPANY: Point = Point::new(408_122_808, -743_999_179);
    const BEDMINSTER: Point = Point::new(406_523_420, -742_135_517);

    fn create_test_store() -> FeatureStore {
        FeatureStore::load(vec![
            Feature::new("Patriots Path, Mendham, NJ", MENDHAM),
            Feature::new("101 New Jersey 10, Whippany, NJ", WHIPPANY),
            Feature::new("Another name for Whippany", WHIPPANY),
            Feature::new("", BEDMINSTER),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_route() {
        let store = create_test_store();
        let mut recorder = RouteRecorder::start(&store);
        assert_eq!(recorder.state(), RecorderState::Accumulating);

        let summary = recorder.finish().unwrap();
        assert_eq!(summary, RouteSummary::default());
        assert_eq!(recorder.state(), RecorderState::Closed);
    }

    #[test]
    fn test_repeated_origin_has_zero_distance() {
        let store = create_test_store();
        let mut recorder = RouteRecorder::start(&store);
        for _ in 0..3 {
            recorder.feed(Point::new(0, 0)).unwrap();
        }

        let summary = recorder.finish().unwrap();
        assert_eq!(summary.point_count, 3);
        assert_eq!(summary.distance, 0);
        assert_eq!(summary.feature_count, 0);
    }

    #[test]
    fn test_distance_is_sum_of_legs() {
        let store = create_test_store();
        let mut recorder = RouteRecorder::start(&store);
        recorder.feed(MENDHAM).unwrap();
        recorder.feed(WHIPPANY).unwrap();
        recorder.feed(BEDMINSTER).unwrap();

        let summary = recorder.finish().unwrap();
        assert_eq!(summary.point_count, 3);
        assert_eq!(
            summary.distance,
            distance(&MENDHAM, &WHIPPANY) + distance(&WHIPPANY, &BEDMINSTER)
        );
    }

    #[test]
    fn test_feature_count_uses_exact_matches() {
        let store = create_test_store();
        let mut recorder = RouteRecorder::start(&store);
        // Two features share Whippany, the unnamed one still counts, the
        // unknown point and the placeholder location never do
        recorder.feed(WHIPPANY).unwrap();
        recorder.feed(BEDMINSTER).unwrap();
        recorder.feed(Point::new(1, 1)).unwrap();
        recorder.feed(crate::PLACEHOLDER_LOCATION).unwrap();

        let summary = recorder.finish().unwrap();
        assert_eq!(summary.point_count, 4);
        assert_eq!(summary.feature_count, 3);
    }

    #[test]
    fn test_elapsed_time_in_whole_seconds() {
        let store = create_test_store();
        let start = Instant::now();
        let mut recorder = RouteRecorder::start_at(&store, start);
        recorder.feed(MENDHAM).unwrap();

        let summary = recorder
            .finish_at(start + Duration::from_millis(2_999))
            .unwrap();
        assert_eq!(summary.elapsed_time, 2);
    }

    #[test]
    fn test_finish_twice_fails() {
        let store = create_test_store();
        let mut recorder = RouteRecorder::start(&store);
        recorder.finish().unwrap();
        assert!(matches!(
            recorder.finish(),
            Err(GuideError::InvalidState(_))
        ));
    }

    #[test]
    fn test_feed_after_finish_fails() {
        let store = create_test_store();
        let mut recorder = RouteRecorder::start(&store);
        recorder.feed(MENDHAM).unwrap();
        recorder.finish().unwrap();

        assert!(matches!(
            recorder.feed(WHIPPANY),
            Err(GuideError::InvalidState(_))
        ));
        assert_eq!(recorder.point_count(), 1);
        assert_eq!(recorder.last_point(), Some(MENDHAM));
    }
}
