use crd::constants::DEFAULT_CONN_ID;
use crd::spark_application::{api_resource, application_error_message, application_state};
use crd::{PollResult, StateClass};
use kube::api::DynamicObject;
use kube::{Api, Client};

use crate::context::TaskContext;
use crate::error::{Error, Result};

/// Checks the state of a `SparkApplication` object in a Kubernetes cluster.
///
/// Each [`SparkKubernetesSensor::poke`] fetches the object once; how often to poke and when
/// to give up is left to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparkKubernetesSensor {
    pub application_name: String,
    /// Overrides the namespace of the connection.
    pub namespace: Option<String>,
    pub conn_id: String,
}

impl SparkKubernetesSensor {
    pub fn new(application_name: impl Into<String>) -> Self {
        SparkKubernetesSensor {
            application_name: application_name.into(),
            namespace: None,
            conn_id: DEFAULT_CONN_ID.to_string(),
        }
    }

    pub fn namespace(mut self, namespace: impl Into<Option<String>>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn conn_id(mut self, conn_id: impl Into<String>) -> Self {
        self.conn_id = conn_id.into();
        self
    }

    /// `Ok(true)` once the application completed, `Ok(false)` while it is still going.
    pub async fn poke(&self, context: &TaskContext) -> Result<bool> {
        tracing::info!("Poking: {}", self.application_name);
        let hook = context.hook(&self.conn_id)?;
        let client = hook.get_conn().await?;
        let namespace = self.namespace.as_deref().unwrap_or(hook.get_namespace());
        poke_application(client, namespace, &self.application_name)
            .await
            .map(bool::from)
    }
}

/// Fetches the application once and classifies its state.
pub async fn poke_application(client: Client, namespace: &str, name: &str) -> Result<PollResult> {
    let api: Api<DynamicObject> = Api::namespaced_with(client, namespace, &api_resource());
    let application = api.get(name).await.map_err(|source| Error::RemoteFetch {
        name: name.to_string(),
        namespace: namespace.to_string(),
        source,
    })?;
    classify_application(name, &application)
}

pub fn classify_application(name: &str, application: &DynamicObject) -> Result<PollResult> {
    let Some(state) = application_state(application) else {
        tracing::info!("Spark application {name} has not reported a state yet");
        return Ok(PollResult::NotDone);
    };

    match StateClass::of(&state) {
        StateClass::Failure => {
            let error_message = application_error_message(application).map(str::to_string);
            if let Some(message) = &error_message {
                tracing::warn!("Spark application {name} with state [{state}]\n  Error: {message}");
            }
            Err(Error::ApplicationFailed {
                name: name.to_string(),
                state,
                error_message,
            })
        }
        StateClass::Intermediate => {
            tracing::info!("Spark application is still in state: {state}");
            Ok(PollResult::NotDone)
        }
        StateClass::Success => {
            tracing::info!("Spark application ended successfully");
            Ok(PollResult::Done)
        }
        StateClass::Unrecognized => Err(Error::UnknownState {
            name: name.to_string(),
            state,
        }),
    }
}
