use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("{parser} CSV error: {source}")]
    Csv {
        parser: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{parser} file did not contain a header row")]
    MissingHeader { parser: &'static str },
}
