use std::fmt;

use crate::model::MemberIndex;

/// Errors raised while assembling the ensemble or location inputs.
///
/// Any of these aborts the run before the first iteration: the engine never
/// aggregates over an incomplete ensemble.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    /// An ensemble member could not be read
    MemberUnavailable {
        member: MemberIndex,
        reason: String,
    },
    /// The location table could not be read
    LocationsUnavailable(String),
    /// Track points appeared before the first `sequence_index == 0` marker
    OrphanTrackPoints { member: MemberIndex, count: usize },
    /// A record could not be interpreted
    MalformedRecord {
        source_name: String,
        line: usize,
        reason: String,
    },
    /// No ensemble members were supplied
    EmptyEnsemble,
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::MemberUnavailable { member, reason } => {
                write!(f, "ensemble member {} unavailable: {reason}", member.0)
            }
            DataError::LocationsUnavailable(reason) => {
                write!(f, "location table unavailable: {reason}")
            }
            DataError::OrphanTrackPoints { member, count } => write!(
                f,
                "ensemble member {} has {count} track points before the first storm start",
                member.0
            ),
            DataError::MalformedRecord {
                source_name,
                line,
                reason,
            } => write!(f, "{source_name}:{line}: {reason}"),
            DataError::EmptyEnsemble => write!(f, "ensemble has no members"),
        }
    }
}

impl std::error::Error for DataError {}

/// Errors related to engine configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
    EmptyWindBins,
    UnsortedWindBins,
    InvertedReferencePeriod,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for `{field}`: {reason}")
            }
            ConfigError::EmptyWindBins => write!(f, "at least one wind-speed bin is required"),
            ConfigError::UnsortedWindBins => {
                write!(f, "wind-speed bins must be finite and strictly ascending")
            }
            ConfigError::InvertedReferencePeriod => {
                write!(f, "reference period ends before it starts")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level error for a return-period run
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    Data(DataError),
    Config(ConfigError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Data(e) => write!(f, "{e}"),
            EngineError::Config(e) => write!(f, "configuration error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Data(e) => Some(e),
            EngineError::Config(e) => Some(e),
        }
    }
}

impl From<DataError> for EngineError {
    fn from(err: DataError) -> Self {
        EngineError::Data(err)
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        EngineError::Config(err)
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DataError::OrphanTrackPoints {
            member: MemberIndex(2),
            count: 3,
        };
        assert_eq!(
            err.to_string(),
            "ensemble member 2 has 3 track points before the first storm start"
        );

        let err: EngineError = ConfigError::EmptyWindBins.into();
        assert_eq!(
            err.to_string(),
            "configuration error: at least one wind-speed bin is required"
        );
    }

    #[test]
    fn test_engine_error_source() {
        use std::error::Error;

        let err: EngineError = DataError::EmptyEnsemble.into();
        assert!(err.source().is_some());
        assert!(matches!(err, EngineError::Data(DataError::EmptyEnsemble)));
    }
}
