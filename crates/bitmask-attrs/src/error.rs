use thiserror::Error;

#[derive(Error, Debug)]
pub enum BitmaskError {
    /// The attribute definition itself is unusable (empty label list, duplicates, ...).
    #[error("Invalid bitmask definition for {attribute}: {reason}")]
    Configuration { attribute: String, reason: String },

    /// A label that is neither configured nor zero-equivalent.
    #[error("Unsupported value for {attribute}: {label:?}")]
    InvalidLabel { attribute: String, label: String },

    /// A raw integer that is negative or has bits above the configured labels.
    #[error("Unsupported value for {attribute}: {value} is outside 0..=2^{width}-1")]
    OutOfRange {
        attribute: String,
        value: String,
        width: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    ConfigLoad(#[from] confique::Error),

    #[error("Definition parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BitmaskError {
    pub(crate) fn configuration(attribute: &str, reason: impl Into<String>) -> Self {
        BitmaskError::Configuration {
            attribute: attribute.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_label(attribute: &str, label: &str) -> Self {
        BitmaskError::InvalidLabel {
            attribute: attribute.to_string(),
            label: label.to_string(),
        }
    }

    /// True for every failure raised while defining an attribute, as opposed
    /// to failures raised while using one.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BitmaskError::Configuration { .. }
                | BitmaskError::ConfigLoad(_)
                | BitmaskError::Toml(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BitmaskError>;
