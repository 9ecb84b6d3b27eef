pub mod config;
pub mod logging;

pub mod archive;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod locator;
pub mod pipeline;
pub mod request;
pub mod resolver;

pub use error::{PipelineError, TransportError};
pub use pipeline::{PipelineOutcome, PipelineReport};
pub use request::VersionRequest;
