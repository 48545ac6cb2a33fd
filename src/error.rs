//! Crate-level error type.

use std::io;

/// Errors surfaced while turning a building table into a twin.
///
/// Stepping a constructed twin never fails, so every variant here
/// originates at the input boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The building table does not satisfy the required-column contract.
    #[error("data contract violated: {0}")]
    DataContract(String),
    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// The CSV reader or writer rejected its input.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn data_contract(desc: impl Into<String>) -> Self {
        Self::DataContract(desc.into())
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_contract_display_names_the_violation() {
        let err = Error::data_contract("missing column `lat`");
        assert_eq!(
            err.to_string(),
            "data contract violated: missing column `lat`"
        );
    }

    #[test]
    fn io_errors_convert() {
        let err: Error = io::Error::other("disk gone").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
