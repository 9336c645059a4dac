use crd::constants::DEFAULT_CONN_ID;
use crd::spark_application::{api_resource, parse_application};
use kube::api::{DynamicObject, PostParams};
use kube::{Api, Client};

use crate::context::TaskContext;
use crate::error::{Error, Result};

/// Creates a `SparkApplication` object in a Kubernetes cluster.
///
/// See <https://github.com/GoogleCloudPlatform/spark-on-k8s-operator/blob/master/docs/api-docs.md#sparkapplication>
/// for the object itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparkKubernetesOperator {
    /// Inline YAML/JSON descriptor, or the path of a `.yaml`, `.yml` or `.json` file holding it.
    pub application_file: String,
    /// Overrides the namespace of the connection.
    pub namespace: Option<String>,
    pub conn_id: String,
}

impl SparkKubernetesOperator {
    pub fn new(application_file: impl Into<String>) -> Self {
        SparkKubernetesOperator {
            application_file: application_file.into(),
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

    /// Submits the application and returns the object as created by the API server.
    pub async fn execute(&self, context: &TaskContext) -> Result<DynamicObject> {
        tracing::info!("Creating sparkApplication");
        let hook = context.hook(&self.conn_id)?;
        let client = hook.get_conn().await?;
        let namespace = self.namespace.as_deref().unwrap_or(hook.get_namespace());
        let descriptor =
            common::load_templated_source(&self.application_file, &context.template_searchpath)
                .map_err(|source| Error::ApplicationSource { source })?;
        submit_application(client, namespace, &descriptor).await
    }
}

/// Parses `descriptor` and creates it in `namespace`.
///
/// Nothing is sent to the API server when the descriptor can't be parsed.
pub async fn submit_application(
    client: Client,
    namespace: &str,
    descriptor: &str,
) -> Result<DynamicObject> {
    let application = parse_application(descriptor).map_err(|source| Error::ApplicationParse { source })?;

    let api: Api<DynamicObject> = Api::namespaced_with(client, namespace, &api_resource());
    let response = api
        .create(&PostParams::default(), &application)
        .await
        .map_err(|source| Error::Submission {
            namespace: namespace.to_string(),
            source,
        })?;
    tracing::debug!("Response: {:?}", response);
    Ok(response)
}
