//! Submit Spark applications to Kubernetes as `SparkApplication` objects of the
//! spark-on-k8s-operator, and poll them until they finish.
//!
//! The scheduler running the tasks owns retries, polling cadence and timeouts;
//! [`SparkKubernetesSensor::poke`] performs a single check per call.

pub mod connection;
pub mod context;
pub mod error;
pub mod hook;
pub mod operator;
pub mod sensor;

#[cfg(test)]
mod testutils;

pub use connection::{
    ConfigSource, Connection, ConnectionStore, EnvConnectionStore, FileConnectionStore,
    InMemoryConnectionStore, KubernetesConnectionConfig, LayeredConnectionStore,
};
pub use context::TaskContext;
pub use error::{Error, Result};
pub use hook::KubernetesHook;
pub use operator::{submit_application, SparkKubernetesOperator};
pub use sensor::{classify_application, poke_application, SparkKubernetesSensor};
