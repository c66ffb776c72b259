use clap::{Parser, Subcommand};
use route_guide_lib::{Point, Rectangle, ServiceConfig};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Route Guide - Look up features, stream them by area, record routes and chat about locations
pub struct Settings {
    /// JSON feature dataset to serve
    #[clap(short, long, value_name = "FILE", default_value = "data/route_guide_db.json")]
    pub dataset: PathBuf,

    /// Leave features without a name out of ListFeatures results
    #[clap(long, default_value = "false")]
    pub exclude_unnamed: bool,

    /// Delay between two features streamed by ListFeatures, in milliseconds
    #[clap(long, value_name = "MS", default_value = "0")]
    pub list_throttle_ms: u64,

    /// Capacity of every bounded stream channel
    #[clap(long, value_name = "N", default_value = "16")]
    pub channel_capacity: usize,

    /// Deadline applied by the client to each call, in seconds (none by default)
    #[clap(long, value_name = "S")]
    pub timeout_secs: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[clap(short, long, default_value = "false")]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

/// What to do once the dataset is loaded
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Look up the feature at a point (unary)
    GetFeature {
        /// Latitude in E7 units
        #[clap(long, allow_hyphen_values = true)]
        lat: i32,
        /// Longitude in E7 units
        #[clap(long, allow_hyphen_values = true)]
        lon: i32,
    },
    /// Stream every feature inside a rectangle (server streaming)
    ListFeatures {
        #[clap(long, allow_hyphen_values = true, default_value = "400000000")]
        lo_lat: i32,
        #[clap(long, allow_hyphen_values = true, default_value = "-750000000")]
        lo_lon: i32,
        #[clap(long, allow_hyphen_values = true, default_value = "420000000")]
        hi_lat: i32,
        #[clap(long, allow_hyphen_values = true, default_value = "-730000000")]
        hi_lon: i32,
    },
    /// Send a route of random dataset points and print its summary (client streaming)
    RecordRoute {
        /// Number of points to send
        #[clap(long, default_value = "10")]
        points: usize,
    },
    /// Exchange a fixed script of notes (bidirectional streaming)
    RouteChat,
    /// Print dataset statistics
    Info,
    /// Run all four calls one after the other
    Demo,
}

impl Command {
    /// Rectangle of a `list-features` command
    pub fn rectangle(&self) -> Option<Rectangle> {
        match *self {
            Command::ListFeatures {
                lo_lat,
                lo_lon,
                hi_lat,
                hi_lon,
            } => Some(Rectangle::new(
                Point::new(lo_lat, lo_lon),
                Point::new(hi_lat, hi_lon),
            )),
            _ => None,
        }
    }
}

impl Settings {
    /// Parse the process arguments, exiting with usage on error
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// Service options derived from the flags
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            include_unnamed: !self.exclude_unnamed,
            list_throttle: (self.list_throttle_ms > 0)
                .then(|| Duration::from_millis(self.list_throttle_ms)),
        }
    }

    /// Per-call deadline requested by the user
    pub fn call_timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
