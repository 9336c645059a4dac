pub mod constants;
pub mod spark_application;

pub use spark_application::{PollResult, StateClass};

// error definitions for crd
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to deserialize object from yaml with internal error: \n {internal}")]
    FailedDeserializeObjectFromYaml { internal: serde_yaml::Error },

    #[error("Failed to deserialize object from json with internal error: \n {internal}")]
    FailedDeserializeObjectFromJson { internal: serde_json::error::Error },

    #[error("Application descriptor must be a mapping, found: {found}")]
    ApplicationNotAMapping { found: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
