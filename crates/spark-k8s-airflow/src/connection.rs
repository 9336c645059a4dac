use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crd::constants::*;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A connection record as stored by the workflow scheduler.
///
/// Only `extra` is consumed here; other attributes of the record are kept opaque.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Connection {
    #[serde(default)]
    pub conn_type: Option<String>,
    #[serde(default)]
    pub extra: Option<Extra>,
}

/// `extra` may be stored as a mapping or as a JSON encoded string.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Extra {
    Mapping(Map<String, Value>),
    Json(String),
}

impl Connection {
    pub fn with_extra(conn_type: &str, extra: Map<String, Value>) -> Self {
        Connection {
            conn_type: Some(conn_type.to_string()),
            extra: Some(Extra::Mapping(extra)),
        }
    }

    /// Parses the value of an `AIRFLOW_CONN_*` variable, either a JSON object or a URI
    /// such as `kubernetes://?extra__kubernetes__in_cluster=true`.
    pub fn from_serialized(conn_id: &str, value: &str) -> Result<Self> {
        let value = value.trim();
        if value.starts_with('{') {
            return serde_json::from_str(value).map_err(|e| Error::InvalidConnection {
                conn_id: conn_id.to_string(),
                reason: e.to_string(),
            });
        }

        let uri = url::Url::parse(value).map_err(|e| Error::InvalidConnection {
            conn_id: conn_id.to_string(),
            reason: e.to_string(),
        })?;
        let extra = uri
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
            .collect::<Map<String, Value>>();
        Ok(Connection {
            conn_type: Some(uri.scheme().replace('-', "_")),
            extra: Some(Extra::Mapping(extra)),
        })
    }

    /// The `extra` attribute as a mapping, decoding it when it is stored as JSON text.
    pub fn extra_dejson(&self, conn_id: &str) -> Result<Map<String, Value>> {
        match &self.extra {
            None => Ok(Map::new()),
            Some(Extra::Mapping(map)) => Ok(map.clone()),
            Some(Extra::Json(text)) if text.trim().is_empty() => Ok(Map::new()),
            Some(Extra::Json(text)) => {
                serde_json::from_str(text).map_err(|e| Error::InvalidConnection {
                    conn_id: conn_id.to_string(),
                    reason: format!("extra is not a JSON object: {e}"),
                })
            }
        }
    }
}

/// Source of connection records, keyed by `conn_id`.
pub trait ConnectionStore {
    /// `Ok(None)` when the store doesn't know `conn_id`.
    fn get_connection(&self, conn_id: &str) -> Result<Option<Connection>>;
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryConnectionStore {
    connections: HashMap<String, Connection>,
}

impl InMemoryConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, conn_id: impl Into<String>, connection: Connection) -> &mut Self {
        self.connections.insert(conn_id.into(), connection);
        self
    }
}

impl ConnectionStore for InMemoryConnectionStore {
    fn get_connection(&self, conn_id: &str) -> Result<Option<Connection>> {
        Ok(self.connections.get(conn_id).cloned())
    }
}

/// Connections read from a YAML (or JSON) file mapping `conn_id` to a record.
///
/// The file is read on every lookup so that each hook sees the current content.
#[derive(Clone, Debug)]
pub struct FileConnectionStore {
    path: PathBuf,
}

impl FileConnectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileConnectionStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, Connection>> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| Error::ConnectionsFile {
            source: common::Error::FileNotReadable {
                file: self.path.clone(),
                source,
            },
        })?;
        if contents.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_yaml::from_str(&contents).map_err(|e| Error::ConnectionsFileNotParsable {
            file: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

impl ConnectionStore for FileConnectionStore {
    fn get_connection(&self, conn_id: &str) -> Result<Option<Connection>> {
        Ok(self.load()?.remove(conn_id))
    }
}

/// Connections defined through `AIRFLOW_CONN_<CONN_ID>` environment variables.
#[derive(Clone, Debug)]
pub struct EnvConnectionStore {
    prefix: String,
}

impl Default for EnvConnectionStore {
    fn default() -> Self {
        EnvConnectionStore {
            prefix: CONN_ENV_PREFIX.to_string(),
        }
    }
}

impl ConnectionStore for EnvConnectionStore {
    fn get_connection(&self, conn_id: &str) -> Result<Option<Connection>> {
        let var = common::utils::connection_env_var(&self.prefix, conn_id);
        match std::env::var(&var) {
            Ok(value) => {
                tracing::debug!("using connection [{conn_id}] from environment variable {var}");
                Connection::from_serialized(conn_id, &value).map(Some)
            }
            Err(_) => Ok(None),
        }
    }
}

/// Asks each store in turn; the first one knowing the `conn_id` wins.
#[derive(Default)]
pub struct LayeredConnectionStore {
    stores: Vec<Box<dyn ConnectionStore + Send + Sync>>,
}

impl LayeredConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, store: impl ConnectionStore + Send + Sync + 'static) -> Self {
        self.stores.push(Box::new(store));
        self
    }
}

impl ConnectionStore for LayeredConnectionStore {
    fn get_connection(&self, conn_id: &str) -> Result<Option<Connection>> {
        for store in &self.stores {
            if let Some(connection) = store.get_connection(conn_id)? {
                return Ok(Some(connection));
            }
        }
        Ok(None)
    }
}

/// Kubernetes settings of a connection, read from its prefixed extras.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KubernetesConnectionConfig {
    pub in_cluster: bool,
    /// Raw content of a kube-config file.
    pub kube_config: Option<String>,
    pub namespace: Option<String>,
}

/// Where the client configuration comes from, in order of priority.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    InCluster,
    DefaultFile,
    Inline(String),
}

impl KubernetesConnectionConfig {
    pub fn from_extras(extras: &Map<String, Value>) -> Self {
        KubernetesConnectionConfig {
            in_cluster: extra_field(extras, CONN_FIELD_IN_CLUSTER).map_or(false, is_truthy),
            kube_config: extra_field(extras, CONN_FIELD_KUBE_CONFIG).and_then(non_empty_text),
            namespace: extra_field(extras, CONN_FIELD_NAMESPACE).and_then(non_empty_text),
        }
    }

    pub fn source(&self) -> ConfigSource {
        if self.in_cluster {
            ConfigSource::InCluster
        } else {
            match &self.kube_config {
                None => ConfigSource::DefaultFile,
                Some(contents) => ConfigSource::Inline(contents.clone()),
            }
        }
    }

    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }
}

fn extra_field<'a>(extras: &'a Map<String, Value>, field_name: &str) -> Option<&'a Value> {
    extras.get(&format!("{CONN_EXTRA_PREFIX}{field_name}"))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0),
        Value::String(s) => !matches!(
            s.trim().to_lowercase().as_str(),
            "" | "false" | "0" | "no" | "off"
        ),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn non_empty_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn extras(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn in_cluster_wins_over_kube_config() {
        let config = KubernetesConnectionConfig::from_extras(&extras(json!({
            "extra__kubernetes__in_cluster": true,
            "extra__kubernetes__kube_config": "apiVersion: v1\nkind: Config\n",
        })));
        assert_eq!(config.source(), ConfigSource::InCluster);
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({ "extra__kubernetes__in_cluster": false }))]
    #[case(json!({ "extra__kubernetes__kube_config": "" }))]
    #[case(json!({ "extra__kubernetes__kube_config": null }))]
    #[case(json!({ "kube_config": "apiVersion: v1" }))]
    fn default_file_without_kube_config(#[case] value: Value) {
        let config = KubernetesConnectionConfig::from_extras(&extras(value));
        assert_eq!(config.source(), ConfigSource::DefaultFile);
    }

    #[test]
    fn inline_kube_config_is_kept_verbatim() {
        let contents = "apiVersion: v1\nkind: Config\nclusters: []\n";
        let config = KubernetesConnectionConfig::from_extras(&extras(json!({
            "extra__kubernetes__in_cluster": "False",
            "extra__kubernetes__kube_config": contents,
        })));
        assert_eq!(config.source(), ConfigSource::Inline(contents.to_string()));
    }

    #[rstest]
    #[case(json!(true), true)]
    #[case(json!("True"), true)]
    #[case(json!("yes"), true)]
    #[case(json!(1), true)]
    #[case(json!(false), false)]
    #[case(json!("false"), false)]
    #[case(json!("0"), false)]
    #[case(json!(""), false)]
    #[case(json!(0), false)]
    #[case(json!(null), false)]
    fn in_cluster_truthiness(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_truthy(&value), expected);
    }

    #[test]
    fn namespace_defaults_to_default() {
        let config = KubernetesConnectionConfig::from_extras(&Map::new());
        assert_eq!(config.namespace(), "default");

        let config = KubernetesConnectionConfig::from_extras(&extras(json!({
            "extra__kubernetes__namespace": "spark-jobs",
        })));
        assert_eq!(config.namespace(), "spark-jobs");
    }

    #[test]
    fn extra_may_be_json_text() {
        let connection = Connection {
            conn_type: Some("kubernetes".to_string()),
            extra: Some(Extra::Json(r#"{"extra__kubernetes__namespace": "spark"}"#.to_string())),
        };
        let extra = connection.extra_dejson("k8s").unwrap();
        assert_eq!(extra["extra__kubernetes__namespace"], "spark");

        let broken = Connection {
            conn_type: None,
            extra: Some(Extra::Json("{not json".to_string())),
        };
        assert!(matches!(
            broken.extra_dejson("k8s"),
            Err(Error::InvalidConnection { .. })
        ));
    }

    #[test]
    fn connection_from_uri() {
        let connection = Connection::from_serialized(
            "k8s",
            "kubernetes://?extra__kubernetes__in_cluster=True&extra__kubernetes__namespace=spark",
        )
        .unwrap();
        assert_eq!(connection.conn_type.as_deref(), Some("kubernetes"));
        let config = KubernetesConnectionConfig::from_extras(&connection.extra_dejson("k8s").unwrap());
        assert!(config.in_cluster);
        assert_eq!(config.namespace(), "spark");
    }

    #[test]
    fn connection_from_json() {
        let connection = Connection::from_serialized(
            "k8s",
            r#"{"conn_type": "kubernetes", "extra": {"extra__kubernetes__in_cluster": true}}"#,
        )
        .unwrap();
        let config = KubernetesConnectionConfig::from_extras(&connection.extra_dejson("k8s").unwrap());
        assert_eq!(config.source(), ConfigSource::InCluster);
    }

    #[test]
    fn file_store_reads_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("connections.yaml");
        std::fs::write(
            &path,
            r#"
kubernetes_default:
  conn_type: kubernetes
  extra:
    extra__kubernetes__namespace: spark-jobs
other:
  conn_type: kubernetes
  extra: '{"extra__kubernetes__in_cluster": true}'
"#,
        )
        .unwrap();

        let store = FileConnectionStore::new(&path);
        let connection = store.get_connection("kubernetes_default").unwrap().unwrap();
        assert_eq!(connection.conn_type.as_deref(), Some("kubernetes"));
        let other = store.get_connection("other").unwrap().unwrap();
        assert!(matches!(other.extra, Some(Extra::Json(_))));
        assert!(store.get_connection("missing").unwrap().is_none());
    }

    #[test]
    fn env_store_reads_prefixed_variable() {
        std::env::set_var(
            "AIRFLOW_CONN_SPARK_ENV_STORE_TEST",
            r#"{"conn_type": "kubernetes", "extra": {"extra__kubernetes__namespace": "spark-jobs"}}"#,
        );
        let store = EnvConnectionStore::default();

        let connection = store
            .get_connection("spark_env_store_test")
            .unwrap()
            .expect("connection defined in the environment");
        assert_eq!(connection.conn_type.as_deref(), Some("kubernetes"));
        let config = KubernetesConnectionConfig::from_extras(
            &connection.extra_dejson("spark_env_store_test").unwrap(),
        );
        assert_eq!(config.namespace(), "spark-jobs");

        assert!(store.get_connection("spark_env_store_absent").unwrap().is_none());
    }

    #[test]
    fn layered_store_prefers_first() {
        let mut first = InMemoryConnectionStore::new();
        first.insert("a", Connection::with_extra("kubernetes", Map::new()));
        let mut second = InMemoryConnectionStore::new();
        second
            .insert("a", Connection::default())
            .insert("b", Connection::default());

        let store = LayeredConnectionStore::new().with(first).with(second);
        assert_eq!(
            store.get_connection("a").unwrap().unwrap().conn_type.as_deref(),
            Some("kubernetes")
        );
        assert!(store.get_connection("b").unwrap().is_some());
        assert!(store.get_connection("c").unwrap().is_none());
    }
}
