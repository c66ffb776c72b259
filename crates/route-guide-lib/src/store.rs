//! FeatureStore - Immutable collection of named features
//!
//! This module provides the read-only feature store that backs every call:
//! exact point lookup with a placeholder fallback and inclusive rectangle
//! range queries. The store is built once at startup and shared behind an
//! `Arc` without any locking.

use crate::types::{Feature, Point, Rectangle, contains_inclusive};
use crate::{CANCELLATION_CHECK_INTERVAL, CallContext, GuideError, Result};

use geo::Rect;
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name of the feature returned by [`FeatureStore::lookup`] when nothing matches
pub const PLACEHOLDER_NAME: &str = "Test feature";

/// Location of the feature returned by [`FeatureStore::lookup`] when nothing matches
pub const PLACEHOLDER_LOCATION: Point = Point::new(15, 20);

/// Fixed feature returned for points with no stored match
pub fn placeholder_feature() -> Feature {
    Feature::new(PLACEHOLDER_NAME, PLACEHOLDER_LOCATION)
}

/// Information about the feature store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StoreInfo {
    /// Number of stored features, named or not
    pub feature_count: usize,
    /// Number of features with a non-empty name
    pub named_count: usize,
    /// Bounding rectangle of all feature locations (None if empty)
    pub bounds: Option<Rectangle>,
}

/// Read-only collection of features in insertion order
#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    /// All loaded features
    features: Vec<Feature>,
    /// Statistics computed once during construction
    info: StoreInfo,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl FeatureStore {
    /// Build the store from already-parsed records
    ///
    /// Fails with [`GuideError::DatasetLoad`] when any record carries a
    /// location outside the valid latitude/longitude range. This is a
    /// startup-only failure; the store never fails once built.
    pub fn load(records: Vec<Feature>) -> Result<Self> {
        #[cfg(feature = "profiling")]
        profiling::scope!("store::load");

        // Validation is embarrassingly parallel; the store itself keeps insertion order
        if let Some((index, feature)) = records
            .par_iter()
            .enumerate()
            .find_first(|(_, feature)| !feature.location.is_valid())
        {
            return Err(GuideError::DatasetLoad(format!(
                "record {} ({:?}) has out-of-range location {}",
                index, feature.name, feature.location
            )));
        }

        let info = Self::compute_info(&records);
        tracing::info!(
            "Feature store loaded: {} features ({} named)",
            info.feature_count,
            info.named_count
        );

        Ok(Self {
            features: records,
            info,
        })
    }

    /// Compute statistics in a single pass over the records
    fn compute_info(records: &[Feature]) -> StoreInfo {
        let mut bounds: Option<Rect<i32>> = None;
        let mut named_count = 0;

        for feature in records {
            if feature.is_named() {
                named_count += 1;
            }
            let coord = feature.location.to_coord();
            bounds = Some(match bounds {
                Some(rect) => Rect::new(
                    geo::Coord {
                        x: rect.min().x.min(coord.x),
                        y: rect.min().y.min(coord.y),
                    },
                    geo::Coord {
                        x: rect.max().x.max(coord.x),
                        y: rect.max().y.max(coord.y),
                    },
                ),
                None => Rect::new(coord, coord),
            });
        }

        StoreInfo {
            feature_count: records.len(),
            named_count,
            bounds: bounds.map(|rect| {
                Rectangle::new(
                    Point::new(rect.min().y, rect.min().x),
                    Point::new(rect.max().y, rect.max().x),
                )
            }),
        }
    }

    /// Find the feature stored at exactly `point`
    ///
    /// When no stored feature matches, the fixed [`placeholder_feature`] is
    /// returned instead of a not-found error.
    pub fn lookup(&self, point: &Point) -> Feature {
        self.find(point)
            .cloned()
            .unwrap_or_else(placeholder_feature)
    }

    /// Find the first feature stored at exactly `point`, if any
    #[inline]
    pub fn find(&self, point: &Point) -> Option<&Feature> {
        self.features
            .iter()
            .find(|feature| feature.location == *point)
    }

    /// Count stored features located exactly at `point`
    ///
    /// Only real matches are counted; the placeholder never counts.
    #[inline]
    pub fn count_at(&self, point: &Point) -> usize {
        self.features
            .iter()
            .filter(|feature| feature.location == *point)
            .count()
    }

    /// Lazily yield every feature inside `rect`, bounds included
    ///
    /// The corners of `rect` may be given in any order. Features are yielded
    /// in insertion order, including features with an empty name.
    pub fn range_query<'a>(
        &'a self,
        rect: &Rectangle,
    ) -> impl Iterator<Item = &'a Feature> + use<'a> {
        let bounds = rect.normalized();
        self.features
            .iter()
            .filter(move |feature| contains_inclusive(&bounds, &feature.location))
    }

    /// Like [`FeatureStore::range_query`], but checks `ctx` while scanning
    ///
    /// The context is checked every [`CANCELLATION_CHECK_INTERVAL`] scanned
    /// features, matching or not. Once the call is over the iterator yields
    /// the reason as an error; callers stop at the first `Err`.
    pub fn range_query_checked<'a>(
        &'a self,
        rect: &Rectangle,
        ctx: &'a CallContext,
    ) -> impl Iterator<Item = Result<&'a Feature>> + use<'a> {
        let bounds = rect.normalized();
        self.features
            .iter()
            .enumerate()
            .filter_map(move |(index, feature)| {
                if index % CANCELLATION_CHECK_INTERVAL == 0
                    && let Err(reason) = ctx.check()
                {
                    return Some(Err(reason));
                }
                contains_inclusive(&bounds, &feature.location).then_some(Ok(feature))
            })
    }

    /// Get total number of stored features
    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if the store is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Get all features in insertion order
    #[inline]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Get store information
    ///
    /// This is O(1) as all values are computed on load.
    #[inline]
    pub fn info(&self) -> &StoreInfo {
        &self.info
    }
}
