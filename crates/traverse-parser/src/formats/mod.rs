mod antimap;
mod common;
mod hobo;
mod lapup;

pub use antimap::{TrackReader, GPS_FILENAME_FORMAT};
pub use hobo::parse_logger_file;
pub use lapup::{parse_ambient_file, parse_ambient_zip};

pub(crate) use common::{parse_optional_f64, parse_required_f64, parse_required_i64, parse_timestamp};
