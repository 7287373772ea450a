pub mod duration;
mod file;
mod opts;

pub use file::ConnectorConfig;
pub use opts::ConnectionOpts;
