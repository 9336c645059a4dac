use std::path::Path;

use httpmock::MockServer;
use serde_json::{json, Map, Value};

use crate::connection::{Connection, InMemoryConnectionStore};
use crate::context::TaskContext;

pub(crate) const APPLICATIONS_PATH: &str = "/apis/sparkoperator.k8s.io/v1beta2/namespaces";

pub(crate) const SPARK_PI: &str = r#"
apiVersion: sparkoperator.k8s.io/v1beta2
kind: SparkApplication
metadata:
  name: spark-pi
spec:
  type: Scala
  mode: cluster
  image: gcr.io/spark-operator/spark:v3.1.1
  mainClass: org.apache.spark.examples.SparkPi
  mainApplicationFile: local:///opt/spark/examples/jars/spark-examples_2.12-3.1.1.jar
  sparkVersion: 3.1.1
  driver:
    cores: 1
    memory: 512m
  executor:
    cores: 1
    instances: 1
    memory: 512m
"#;

/// A kube-config whose only cluster is the fake API server.
pub(crate) fn kube_config_for(server: &MockServer) -> String {
    format!(
        r#"
apiVersion: v1
kind: Config
clusters:
- name: fake
  cluster:
    server: {}
contexts:
- name: fake
  context:
    cluster: fake
    user: fake
current-context: fake
users:
- name: fake
  user:
    token: fake-token
"#,
        server.base_url()
    )
}

/// A task context with a `kubernetes_default` connection pointing at the fake API server.
pub(crate) fn context_for(server: &MockServer, namespace: Option<&str>, kube_config_dir: &Path) -> TaskContext {
    let mut extra = Map::new();
    extra.insert(
        "extra__kubernetes__kube_config".to_string(),
        Value::String(kube_config_for(server)),
    );
    if let Some(ns) = namespace {
        extra.insert("extra__kubernetes__namespace".to_string(), Value::String(ns.to_string()));
    }

    let mut store = InMemoryConnectionStore::new();
    store.insert("kubernetes_default", Connection::with_extra("kubernetes", extra));
    let mut context = TaskContext::new(store);
    context.kube_config_dir = Some(kube_config_dir.to_path_buf());
    context
}

pub(crate) fn spark_application(namespace: &str, status: Option<Value>) -> Value {
    let mut application = json!({
        "apiVersion": "sparkoperator.k8s.io/v1beta2",
        "kind": "SparkApplication",
        "metadata": {
            "name": "spark-pi",
            "namespace": namespace,
            "uid": "6f3c3b4e-0a4f-4b8e-9c55-1d1c7f0e2b11",
            "resourceVersion": "1",
        },
        "spec": {
            "type": "Scala",
            "mode": "cluster",
        },
    });
    if let Some(status) = status {
        application["status"] = status;
    }
    application
}

pub(crate) fn status_failure(code: u16, reason: &str, message: &str) -> Value {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code,
    })
}
