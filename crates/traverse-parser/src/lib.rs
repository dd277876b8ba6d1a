pub mod errors;
pub mod formats;
pub mod model;

pub use errors::ParserError;
pub use formats::{parse_ambient_file, parse_ambient_zip, parse_logger_file, TrackReader};
pub use model::{AmbientSeries, GpsTrack, LoggerSeries};

#[cfg(test)]
mod tests;
