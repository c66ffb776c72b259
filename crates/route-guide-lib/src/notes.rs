//! Concurrent registry of route notes keyed by exact location

use crate::{Point, RouteNote};
use dashmap::DashMap;
use smallvec::SmallVec;

/// Most locations only ever collect a handful of notes
type NoteList = SmallVec<[RouteNote; 4]>;

/// Shared map from location to the notes left there, in append order
///
/// The map is sharded, so independent locations never contend. Every
/// operation holds a shard lock only while copying or appending and returns
/// owned data, so no lock is ever held while the caller awaits.
#[derive(Debug, Default)]
pub struct NoteRegistry {
    notes: DashMap<Point, NoteList>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl NoteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a note to the list kept for `point`
    pub fn add_note(&self, point: Point, note: RouteNote) {
        self.notes.entry(point).or_default().push(note);
    }

    /// Snapshot of every note added at `point` so far, oldest first
    ///
    /// The returned vector is a copy; later additions are not visible through it.
    pub fn notes(&self, point: &Point) -> Vec<RouteNote> {
        self.notes
            .get(point)
            .map(|list| list.to_vec())
            .unwrap_or_default()
    }

    /// Record an inbound note and return the notes that preceded it
    ///
    /// The snapshot and the append happen under the same lock, so two
    /// callers exchanging notes at one location each see the other's note
    /// exactly once, whichever goes first.
    pub fn exchange(&self, note: RouteNote) -> Vec<RouteNote> {
        let mut list = self.notes.entry(note.location).or_default();
        let prior = list.to_vec();
        list.push(note);
        prior
    }

    /// Number of notes stored at `point`
    pub fn count(&self, point: &Point) -> usize {
        self.notes.get(point).map(|list| list.len()).unwrap_or(0)
    }

    /// Number of distinct locations with at least one note
    pub fn location_count(&self) -> usize {
        self.notes.len()
    }

    /// Total number of notes across all locations
    pub fn total_notes(&self) -> usize {
        self.notes.iter().map(|entry| entry.value().len()).sum()
    }
}
