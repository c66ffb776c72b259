//! Route Guide - Application Library
//!
//! Wires the route guide core to a command line: settings parsing, logging,
//! build metadata, an in-process client and one runner per command.

pub mod client;
pub mod commands;
pub mod logging;
pub mod metadata;
pub mod settings;

pub use client::LocalClient;
pub use settings::{Command, Settings};

use route_guide_lib::{GuideError, RouteGuideService, dataset};

/// Errors surfaced by the application
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{} ({})", .0, .0.code())]
    Call(#[from] GuideError),

    #[error("Call task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Dataset has no features to build a route from")]
    EmptyDataset,

    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Load the dataset, build the service and run the requested command
pub async fn run(settings: Settings) -> Result<(), ClientError> {
    metadata::log_version_info();

    let store = dataset::load_features(&settings.dataset)?;
    let service = RouteGuideService::new(store, settings.service_config());
    let client = LocalClient::new(service, settings.channel_capacity)
        .with_timeout(settings.call_timeout());

    commands::run_command(&client, &settings.command).await
}
