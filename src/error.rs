use thiserror::Error;

/// Conversion failures.
///
/// `MissingMandatory` and `InvalidMandatory` abort a whole conversion.
/// `MissingOptional` and `Malformed` are normally absorbed by the optional
/// phases (skipped and logged); callers only see them from list entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("match {match_id}: mandatory {component} data is missing")]
    MissingMandatory {
        match_id: u64,
        component: &'static str,
    },

    #[error("match {match_id}: mandatory {component} data is invalid")]
    InvalidMandatory {
        match_id: u64,
        component: &'static str,
        #[source]
        source: Box<ConvertError>,
    },

    #[error("optional {component} data is missing")]
    MissingOptional { component: &'static str },

    #[error("malformed {entity}: {detail}")]
    Malformed {
        entity: &'static str,
        detail: String,
    },
}

impl ConvertError {
    pub fn malformed(entity: &'static str, detail: impl Into<String>) -> Self {
        ConvertError::Malformed {
            entity,
            detail: detail.into(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ConvertError::MissingMandatory { .. } | ConvertError::InvalidMandatory { .. }
        )
    }
}
