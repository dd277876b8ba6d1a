use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("{parser} CSV error: {source}")]
    Csv {
        parser: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{parser} data row {line_index} invalid: {message}")]
    DataRow {
        parser: &'static str,
        line_index: usize,
        message: String,
    },

    #[error("{parser} filename '{name}' does not match expected pattern '{expected}'")]
    MalformedFilename {
        parser: &'static str,
        name: String,
        expected: &'static str,
    },

    #[error("{parser} archive error: {source}")]
    Zip {
        parser: &'static str,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("{parser} archive did not contain a CSV entry")]
    EmptyArchive { parser: &'static str },

    #[error("{parser} I/O error: {source}")]
    Io {
        parser: &'static str,
        #[source]
        source: std::io::Error,
    },
}
