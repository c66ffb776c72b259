//! In-process client
//!
//! [`LocalClient`] plays the transport: it hands each call a fresh
//! [`CallContext`], runs the handler on its own task and moves messages over
//! bounded channels, so every call shape is exercised the same way a network
//! transport would drive it.

use crate::ClientError;
use route_guide_lib::stream::{inbound, outbound};
use route_guide_lib::{
    CallContext, Feature, Point, Rectangle, RouteGuide, RouteNote, RouteSummary,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Client driving a [`RouteGuide`] implementation in the same process
#[derive(Debug)]
pub struct LocalClient<S> {
    service: Arc<S>,
    channel_capacity: usize,
    timeout: Option<Duration>,
    /// Parent of every call's cancellation token
    shutdown: CancellationToken,
}

impl<S> Clone for LocalClient<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            channel_capacity: self.channel_capacity,
            timeout: self.timeout,
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<S: RouteGuide> LocalClient<S> {
    pub fn new(service: S, channel_capacity: usize) -> Self {
        Self {
            service: Arc::new(service),
            channel_capacity: channel_capacity.max(1),
            timeout: None,
            shutdown: CancellationToken::new(),
        }
    }

    /// Apply a deadline of `timeout` from the start of every call
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[inline]
    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    /// Cancel every call in flight and every later call
    pub fn cancel_all(&self) {
        self.shutdown.cancel();
    }

    /// Fresh context for one call
    fn context(&self) -> CallContext {
        let ctx = CallContext::with_token(self.shutdown.child_token());
        match self.timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }

    /// Unary GetFeature
    pub async fn get_feature(&self, point: Point) -> Result<Feature> {
        let ctx = self.context();
        Ok(self.service.get_feature(&ctx, point).await?)
    }

    /// Server-streaming ListFeatures, calling `on_feature` as each one arrives
    pub async fn list_features_with<F>(&self, rect: Rectangle, mut on_feature: F) -> Result<usize>
    where
        F: FnMut(&Feature),
    {
        let ctx = self.context();
        let (tx, mut rx) = outbound(self.channel_capacity);
        let service = Arc::clone(&self.service);
        let call = tokio::spawn(async move { service.list_features(&ctx, rect, tx).await });

        let mut received = 0;
        while let Some(feature) = rx.recv().await {
            on_feature(&feature);
            received += 1;
        }
        call.await??;
        Ok(received)
    }

    /// Server-streaming ListFeatures, collecting every feature
    pub async fn list_features(&self, rect: Rectangle) -> Result<Vec<Feature>> {
        let mut features = Vec::new();
        self.list_features_with(rect, |feature| features.push(feature.clone()))
            .await?;
        Ok(features)
    }

    /// Client-streaming RecordRoute
    pub async fn record_route(&self, points: Vec<Point>) -> Result<RouteSummary> {
        let ctx = self.context();
        let (tx, rx) = inbound(self.channel_capacity);
        let service = Arc::clone(&self.service);
        let call = tokio::spawn(async move { service.record_route(&ctx, rx).await });

        for point in points {
            tracing::debug!("Sending point {}", point);
            if tx.send(Ok(point)).await.is_err() {
                // The handler stopped early; its result says why
                break;
            }
        }
        drop(tx);
        Ok(call.await??)
    }

    /// Bidirectional RouteChat: send `notes` and collect every reply
    pub async fn route_chat(&self, notes: Vec<RouteNote>) -> Result<Vec<RouteNote>> {
        let ctx = self.context();
        let (in_tx, in_rx) = inbound(self.channel_capacity);
        let (out_tx, mut out_rx) = outbound(self.channel_capacity);
        let service = Arc::clone(&self.service);
        let call = tokio::spawn(async move { service.route_chat(&ctx, in_rx, out_tx).await });

        let reader = tokio::spawn(async move {
            let mut replies = Vec::new();
            while let Some(note) = out_rx.recv().await {
                tracing::debug!("Got message {:?} at {}", note.message, note.location);
                replies.push(note);
            }
            replies
        });

        for note in notes {
            if in_tx.send(Ok(note)).await.is_err() {
                break;
            }
        }
        drop(in_tx);

        call.await??;
        Ok(reader.await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use route_guide_lib::{FeatureStore, GuideError, RouteGuideService, ServiceConfig};

    const MENDHAM: Point = Point::new(407_838_351, -746_143_763);
    const WHIPPANY: Point = Point::new(408_122_808, -743_999_179);

    fn create_test_client(config: ServiceConfig) -> LocalClient<RouteGuideService> {
        let store = FeatureStore::load(vec![
            Feature::new("Patriots Path, Mendham, NJ", MENDHAM),
            Feature::new("101 New Jersey 10, Whippany, NJ", WHIPPANY),
            Feature::new("", Point::new(413_628_156, -749_015_468)),
        ])
        .unwrap();
        LocalClient::new(RouteGuideService::new(store, config), 2)
    }

    fn new_jersey() -> Rectangle {
        Rectangle::new(
            Point::new(420_000_000, -730_000_000),
            Point::new(400_000_000, -750_000_000),
        )
    }

    #[tokio::test]
    async fn test_get_feature() {
        let client = create_test_client(ServiceConfig::default());
        let feature = client.get_feature(MENDHAM).await.unwrap();
        assert_eq!(feature.name, "Patriots Path, Mendham, NJ");

        let placeholder = client.get_feature(Point::new(0, 0)).await.unwrap();
        assert_eq!(placeholder.name, route_guide_lib::PLACEHOLDER_NAME);
    }

    #[tokio::test]
    async fn test_list_features() {
        let client = create_test_client(ServiceConfig::default());
        let features = client.list_features(new_jersey()).await.unwrap();
        assert_eq!(features.len(), 3);

        let client = create_test_client(ServiceConfig {
            include_unnamed: false,
            ..ServiceConfig::default()
        });
        let mut names = Vec::new();
        let count = client
            .list_features_with(new_jersey(), |f| names.push(f.name.clone()))
            .await
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            names,
            vec!["Patriots Path, Mendham, NJ", "101 New Jersey 10, Whippany, NJ"]
        );
    }

    #[tokio::test]
    async fn test_record_route() {
        let client = create_test_client(ServiceConfig::default());
        let summary = client
            .record_route(vec![MENDHAM, WHIPPANY, MENDHAM])
            .await
            .unwrap();
        assert_eq!(summary.point_count, 3);
        assert_eq!(summary.feature_count, 3);
        assert_eq!(
            summary.distance,
            2 * route_guide_lib::distance(&MENDHAM, &WHIPPANY)
        );
    }

    #[tokio::test]
    async fn test_record_empty_route() {
        let client = create_test_client(ServiceConfig::default());
        let summary = client.record_route(Vec::new()).await.unwrap();
        assert_eq!(summary, RouteSummary::default());
    }

    #[tokio::test]
    async fn test_route_chat_across_calls() {
        let client = create_test_client(ServiceConfig::default());
        let here = Point::new(0, 1);

        let first = client
            .route_chat(vec![RouteNote::new(here, "hello")])
            .await
            .unwrap();
        assert!(first.is_empty());

        let second = client
            .route_chat(vec![RouteNote::new(here, "again")])
            .await
            .unwrap();
        assert_eq!(second, vec![RouteNote::new(here, "hello")]);
    }

    #[tokio::test]
    async fn test_cancel_all() {
        let client = create_test_client(ServiceConfig::default());
        client.cancel_all();
        assert!(matches!(
            client.get_feature(MENDHAM).await,
            Err(ClientError::Call(GuideError::Cancelled))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_interrupts_throttled_listing() {
        let client = create_test_client(ServiceConfig {
            list_throttle: Some(Duration::from_secs(1)),
            ..ServiceConfig::default()
        })
        .with_timeout(Some(Duration::from_millis(1_500)));

        let mut seen = 0;
        let result = client.list_features_with(new_jersey(), |_| seen += 1).await;
        assert!(matches!(
            result,
            Err(ClientError::Call(GuideError::DeadlineExceeded))
        ));
        assert_eq!(seen, 2);
    }
}
