//! Command runners
//!
//! Each runner performs one call through the [`LocalClient`] and prints its
//! result to stdout. Progress and diagnostics go through tracing.

use crate::{ClientError, Command, LocalClient};
use rand::seq::SliceRandom;
use route_guide_lib::{
    Feature, FeatureStore, Point, Rectangle, RouteGuideService, RouteNote, RouteSummary,
};

type Client = LocalClient<RouteGuideService>;

/// Rectangle covering the sample dataset
pub const DEMO_RECTANGLE: Rectangle = Rectangle::new(
    Point::new(400_000_000, -750_000_000),
    Point::new(420_000_000, -730_000_000),
);

/// Dispatch a parsed command
pub async fn run_command(client: &Client, command: &Command) -> Result<(), ClientError> {
    match command {
        Command::GetFeature { lat, lon } => {
            get_feature(client, Point::new(*lat, *lon)).await?;
        }
        Command::ListFeatures { .. } => {
            let rect = command.rectangle().unwrap_or(DEMO_RECTANGLE);
            list_features(client, rect).await?;
        }
        Command::RecordRoute { points } => {
            record_route(client, *points).await?;
        }
        Command::RouteChat => {
            route_chat(client).await?;
        }
        Command::Info => print_info(client.service().store())?,
        Command::Demo => demo(client).await?,
    }
    Ok(())
}

fn format_feature(feature: &Feature) -> String {
    if feature.is_named() {
        format!("{:?} at {}", feature.name, feature.location)
    } else {
        format!("<unnamed> at {}", feature.location)
    }
}

pub async fn get_feature(client: &Client, point: Point) -> Result<Feature, ClientError> {
    tracing::info!("Getting feature for point {}", point);
    let feature = client.get_feature(point).await?;
    println!("{}", format_feature(&feature));
    Ok(feature)
}

pub async fn list_features(client: &Client, rect: Rectangle) -> Result<usize, ClientError> {
    tracing::info!("Looking for features within {} .. {}", rect.lo, rect.hi);
    let count = client
        .list_features_with(rect, |feature| {
            println!("Feature: {}", format_feature(feature));
        })
        .await?;
    tracing::info!("Received {} features", count);
    Ok(count)
}

/// Pick `count` random dataset locations, repeats allowed
#[profiling::function]
pub fn random_route(store: &FeatureStore, count: usize) -> Result<Vec<Point>, ClientError> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            store
                .features()
                .choose(&mut rng)
                .map(|feature| feature.location)
                .ok_or(ClientError::EmptyDataset)
        })
        .collect()
}

pub async fn record_route(client: &Client, count: usize) -> Result<RouteSummary, ClientError> {
    let points = random_route(client.service().store(), count)?;
    tracing::info!("Traversing {} points", points.len());
    let summary = client.record_route(points).await?;
    println!(
        "Route summary: {} points, {} features, {} m, {} s",
        summary.point_count, summary.feature_count, summary.distance, summary.elapsed_time
    );
    Ok(summary)
}

/// Notes sent by `route-chat`: two rounds over three locations
pub fn chat_script() -> Vec<RouteNote> {
    vec![
        RouteNote::new(Point::new(0, 1), "First message"),
        RouteNote::new(Point::new(0, 2), "Second message"),
        RouteNote::new(Point::new(0, 3), "Third message"),
        RouteNote::new(Point::new(0, 1), "Fourth message"),
        RouteNote::new(Point::new(0, 2), "Fifth message"),
        RouteNote::new(Point::new(0, 3), "Sixth message"),
    ]
}

pub async fn route_chat(client: &Client) -> Result<Vec<RouteNote>, ClientError> {
    let replies = client.route_chat(chat_script()).await?;
    for note in &replies {
        println!("Got message {:?} at {}", note.message, note.location);
    }
    Ok(replies)
}

pub fn print_info(store: &FeatureStore) -> Result<(), ClientError> {
    println!("{}", serde_json::to_string_pretty(store.info())?);
    Ok(())
}

/// Run all four calls against the loaded dataset
pub async fn demo(client: &Client) -> Result<(), ClientError> {
    let known = client
        .service()
        .store()
        .features()
        .first()
        .map(|feature| feature.location)
        .unwrap_or_default();
    get_feature(client, known).await?;
    get_feature(client, Point::new(10, 10)).await?;
    list_features(client, DEMO_RECTANGLE).await?;
    if client.service().store().is_empty() {
        tracing::warn!("Skipping RecordRoute: dataset is empty");
    } else {
        record_route(client, 10).await?;
    }
    route_chat(client).await?;
    Ok(())
}
