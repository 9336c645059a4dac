// error definitions for the hook, operator and sensor
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("The conn_id [{conn_id}] isn't defined")]
    ConnectionNotFound { conn_id: String },

    #[error("Failed to read connection [{conn_id}]: {reason}")]
    InvalidConnection { conn_id: String, reason: String },

    #[error("Failed to load connections file: {source}")]
    ConnectionsFile { source: common::Error },

    #[error("Failed to parse connections file [{file}]: {reason}")]
    ConnectionsFileNotParsable { file: String, reason: String },

    #[error("Failed to write kube_config of connection [{conn_id}] to a temporary file: {source}")]
    FailedWriteKubeConfig { conn_id: String, source: std::io::Error },

    #[error("Failed to load kube_config for connection [{conn_id}]: {source}")]
    FailedLoadKubeConfig { conn_id: String, source: kube::config::KubeconfigError },

    #[error("Failed to load in-cluster configuration for connection [{conn_id}]: {source}")]
    FailedLoadInClusterConfig { conn_id: String, source: kube::config::InClusterError },

    #[error("Failed to create kube client for connection [{conn_id}]: {source}")]
    FailedCreateClient { conn_id: String, source: kube::Error },

    #[error("Exception when loading application_file: {source}")]
    ApplicationSource { source: common::Error },

    #[error("Exception when loading application_file: {source}")]
    ApplicationParse { source: crd::Error },

    #[error("Exception when calling -> create SparkApplication in namespace [{namespace}]: {source}")]
    Submission { namespace: String, source: kube::Error },

    #[error("Exception when calling -> get SparkApplication [{name}] in namespace [{namespace}]: {source}")]
    RemoteFetch { name: String, namespace: String, source: kube::Error },

    #[error("Spark application [{name}] failed with state: {state}")]
    ApplicationFailed { name: String, state: String, error_message: Option<String> },

    #[error("Unknown spark application [{name}] state: {state}")]
    UnknownState { name: String, state: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
