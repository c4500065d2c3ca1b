pub mod app;
pub mod config;
pub mod error;
pub mod feed;
pub mod geo;
pub mod http_client;
pub mod models;
pub mod overlay;
pub mod polyline;
pub mod provider;
pub mod replay;
pub mod risk;
pub mod runtime;
pub mod session;
pub mod step_matcher;

pub use app::{update, Command, Model, Msg, Snapshot, Status};
pub use config::ClientConfig;
pub use error::NavError;
pub use feed::{ManualFeed, PositionFeed, SignalFeed};
pub use http_client::HttpBackend;
pub use runtime::{spawn, NavigatorHandle};
pub use session::{NavigationSession, SessionError, SessionState};
