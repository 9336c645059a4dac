pub const APP_NAME: &str = "spark-k8s-airflow";
pub const APP_LOG_ENV: &str = "SPARK_K8S_AIRFLOW_LOG";

// spark-on-k8s-operator custom resource coordinates
pub const SKO_GROUP: &str = "sparkoperator.k8s.io";
pub const SKO_VERSION: &str = "v1beta2";
pub const SKO_KIND: &str = "SparkApplication";
pub const SKO_PLURAL: &str = "sparkapplications";

// ------------
// application states, as reported in `status.applicationState.state`
pub const INTERMEDIATE_STATES: [&str; 4] = ["SUBMITTED", "RUNNING", "PENDING_RERUN", ""];
pub const FAILURE_STATES: [&str; 2] = ["FAILED", "UNKNOWN"];
pub const SUCCESS_STATE: &str = "COMPLETED";

pub const STATE_POINTER: &str = "/status/applicationState/state";
pub const ERROR_MESSAGE_POINTER: &str = "/status/applicationState/errorMessage";

// ------------
// connections
pub const DEFAULT_CONN_ID: &str = "kubernetes_default";
pub const DEFAULT_NAMESPACE: &str = "default";
pub const CONN_EXTRA_PREFIX: &str = "extra__kubernetes__";
pub const CONN_FIELD_IN_CLUSTER: &str = "in_cluster";
pub const CONN_FIELD_KUBE_CONFIG: &str = "kube_config";
pub const CONN_FIELD_NAMESPACE: &str = "namespace";
pub const CONN_ENV_PREFIX: &str = "AIRFLOW_CONN_";

pub const CONNECTIONS_FILE_ENV: &str = "SPARK_K8S_AIRFLOW_CONNECTIONS_FILE";
pub const CONNECTIONS_FILE_SEARCH_PATHS: [&str; 2] = [
    "/etc/spark-k8s-airflow/connections.yaml",
    "connections.yaml",
];
