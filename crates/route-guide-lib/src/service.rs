//! RouteGuideService - Orchestration of the four call shapes
//!
//! The [`RouteGuide`] trait is the dispatch surface a transport binds to. Each
//! method has a default body that fails with [`GuideError::Unimplemented`], so
//! a partial implementation answers unknown calls with a tagged error instead
//! of panicking. [`RouteGuideService`] implements all four calls on top of the
//! feature store, the route recorder and the note registry.

use crate::stream::{self, Inbound, Outbound};
use crate::{
    CallContext, Feature, FeatureStore, GuideError, NoteRegistry, Point, Rectangle, Result,
    RouteNote, RouteRecorder, RouteSummary,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Shape of a call: how many messages flow in each direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallShape {
    /// One request, one response
    Unary,
    /// One request, a stream of responses
    ServerStreaming,
    /// A stream of requests, one response
    ClientStreaming,
    /// Streams in both directions
    Bidirectional,
}

/// The calls offered by the route guide service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GetFeature,
    ListFeatures,
    RecordRoute,
    RouteChat,
}

impl Method {
    pub const ALL: [Method; 4] = [
        Method::GetFeature,
        Method::ListFeatures,
        Method::RecordRoute,
        Method::RouteChat,
    ];

    /// Short method name
    pub fn name(self) -> &'static str {
        match self {
            Method::GetFeature => "GetFeature",
            Method::ListFeatures => "ListFeatures",
            Method::RecordRoute => "RecordRoute",
            Method::RouteChat => "RouteChat",
        }
    }

    /// Fully qualified RPC path
    pub fn path(self) -> &'static str {
        match self {
            Method::GetFeature => "/routeguide.RouteGuide/GetFeature",
            Method::ListFeatures => "/routeguide.RouteGuide/ListFeatures",
            Method::RecordRoute => "/routeguide.RouteGuide/RecordRoute",
            Method::RouteChat => "/routeguide.RouteGuide/RouteChat",
        }
    }

    pub fn shape(self) -> CallShape {
        match self {
            Method::GetFeature => CallShape::Unary,
            Method::ListFeatures => CallShape::ServerStreaming,
            Method::RecordRoute => CallShape::ClientStreaming,
            Method::RouteChat => CallShape::Bidirectional,
        }
    }

    /// Resolve a fully qualified RPC path
    pub fn from_path(path: &str) -> Option<Method> {
        Method::ALL.into_iter().find(|method| method.path() == path)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Runtime options of the service
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ServiceConfig {
    /// Whether ListFeatures streams features with an empty name (default true)
    pub include_unnamed: bool,
    /// Pause between two streamed features (default none)
    pub list_throttle: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            include_unnamed: true,
            list_throttle: None,
        }
    }
}

/// Dispatch surface of the route guide calls
///
/// Every method defaults to [`GuideError::Unimplemented`] tagged with the
/// method it stands for.
pub trait RouteGuide: Send + Sync + 'static {
    /// Unary: the feature at a point
    fn get_feature(
        &self,
        ctx: &CallContext,
        point: Point,
    ) -> impl Future<Output = Result<Feature>> + Send {
        let _ = (ctx, point);
        async { Err(GuideError::Unimplemented(Method::GetFeature)) }
    }

    /// Server streaming: every feature inside a rectangle
    fn list_features(
        &self,
        ctx: &CallContext,
        rect: Rectangle,
        tx: Outbound<Feature>,
    ) -> impl Future<Output = Result<()>> + Send {
        let _ = (ctx, rect, tx);
        async { Err(GuideError::Unimplemented(Method::ListFeatures)) }
    }

    /// Client streaming: summarize a route sent point by point
    fn record_route(
        &self,
        ctx: &CallContext,
        rx: Inbound<Point>,
    ) -> impl Future<Output = Result<RouteSummary>> + Send {
        let _ = (ctx, rx);
        async { Err(GuideError::Unimplemented(Method::RecordRoute)) }
    }

    /// Bidirectional: exchange notes left at the same locations
    fn route_chat(
        &self,
        ctx: &CallContext,
        rx: Inbound<RouteNote>,
        tx: Outbound<RouteNote>,
    ) -> impl Future<Output = Result<()>> + Send {
        let _ = (ctx, rx, tx);
        async { Err(GuideError::Unimplemented(Method::RouteChat)) }
    }
}

/// The route guide service over a shared feature store and note registry
#[derive(Debug, Clone)]
pub struct RouteGuideService {
    store: Arc<FeatureStore>,
    notes: Arc<NoteRegistry>,
    config: ServiceConfig,
}

impl RouteGuideService {
    /// Create a service owning a fresh note registry
    pub fn new(store: FeatureStore, config: ServiceConfig) -> Self {
        Self::with_shared(Arc::new(store), Arc::new(NoteRegistry::new()), config)
    }

    /// Create a service over already shared state
    pub fn with_shared(
        store: Arc<FeatureStore>,
        notes: Arc<NoteRegistry>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            notes,
            config,
        }
    }

    #[inline]
    pub fn store(&self) -> &Arc<FeatureStore> {
        &self.store
    }

    #[inline]
    pub fn notes(&self) -> &Arc<NoteRegistry> {
        &self.notes
    }

    #[inline]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Sleep between streamed features, giving up early if the call ends
    async fn throttle(&self, ctx: &CallContext) -> Result<()> {
        let Some(delay) = self.config.list_throttle else {
            return Ok(());
        };
        tokio::select! {
            reason = ctx.done() => Err(reason),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }

    async fn stream_features(
        &self,
        ctx: &CallContext,
        rect: Rectangle,
        tx: &Outbound<Feature>,
    ) -> Result<()> {
        let mut sent = 0usize;
        for feature in self.store.range_query_checked(&rect, ctx) {
            let feature = feature?;
            if !self.config.include_unnamed && !feature.is_named() {
                continue;
            }
            if sent > 0 {
                self.throttle(ctx).await?;
            }
            stream::send(ctx, tx, feature.clone()).await?;
            sent += 1;
        }
        tracing::debug!("ListFeatures {:?} streamed {} features", rect, sent);
        Ok(())
    }

    async fn summarize_route(
        &self,
        ctx: &CallContext,
        rx: &mut Inbound<Point>,
    ) -> Result<RouteSummary> {
        // Dropped without a summary if anything below fails
        let mut recorder = RouteRecorder::start(&self.store);
        while let Some(point) = stream::recv(ctx, rx).await? {
            recorder.feed(point)?;
        }
        let summary = recorder.finish()?;
        tracing::debug!("RecordRoute summary: {:?}", summary);
        Ok(summary)
    }

    async fn exchange_notes(
        &self,
        ctx: &CallContext,
        rx: &mut Inbound<RouteNote>,
        tx: &Outbound<RouteNote>,
    ) -> Result<()> {
        while let Some(note) = stream::recv(ctx, rx).await? {
            // The registry lock is released before any send below
            let prior = self.notes.exchange(note);
            for previous in prior {
                stream::send(ctx, tx, previous).await?;
            }
        }
        Ok(())
    }
}

/// Log how a call ended and pass the result through
fn log_outcome<T>(method: Method, result: Result<T>) -> Result<T> {
    match &result {
        Ok(_) => tracing::debug!("{} completed", method.name()),
        Err(err) if err.is_cancellation() => {
            tracing::info!("{} aborted by caller: {}", method.name(), err)
        }
        Err(err) => tracing::warn!("{} failed: {}", method.name(), err),
    }
    result
}

impl RouteGuide for RouteGuideService {
    async fn get_feature(&self, ctx: &CallContext, point: Point) -> Result<Feature> {
        ctx.check()?;
        let feature = self.store.lookup(&point);
        tracing::debug!("GetFeature {} -> {:?}", point, feature.name);
        Ok(feature)
    }

    async fn list_features(
        &self,
        ctx: &CallContext,
        rect: Rectangle,
        tx: Outbound<Feature>,
    ) -> Result<()> {
        let result = self.stream_features(ctx, rect, &tx).await;
        log_outcome(Method::ListFeatures, result)
    }

    async fn record_route(
        &self,
        ctx: &CallContext,
        mut rx: Inbound<Point>,
    ) -> Result<RouteSummary> {
        let result = self.summarize_route(ctx, &mut rx).await;
        log_outcome(Method::RecordRoute, result)
    }

    async fn route_chat(
        &self,
        ctx: &CallContext,
        mut rx: Inbound<RouteNote>,
        tx: Outbound<RouteNote>,
    ) -> Result<()> {
        let result = self.exchange_notes(ctx, &mut rx, &tx).await;
        log_outcome(Method::RouteChat, result)
    }
}
