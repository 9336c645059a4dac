use std::io::Write;
use std::path::PathBuf;

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

use crate::connection::{ConfigSource, ConnectionStore, KubernetesConnectionConfig};
use crate::error::{Error, Result};

/// Creates Kubernetes API clients from a connection record.
///
/// The record is read once, when the hook is created. Every call of [`KubernetesHook::get_conn`]
/// builds a fresh client.
#[derive(Clone, Debug)]
pub struct KubernetesHook {
    conn_id: String,
    config: KubernetesConnectionConfig,
    kube_config_dir: Option<PathBuf>,
}

impl KubernetesHook {
    pub fn new(store: &dyn ConnectionStore, conn_id: &str) -> Result<Self> {
        let connection = store
            .get_connection(conn_id)?
            .ok_or_else(|| Error::ConnectionNotFound {
                conn_id: conn_id.to_string(),
            })?;
        let extras = connection.extra_dejson(conn_id)?;
        Ok(Self::from_config(conn_id, KubernetesConnectionConfig::from_extras(&extras)))
    }

    pub fn from_config(conn_id: &str, config: KubernetesConnectionConfig) -> Self {
        KubernetesHook {
            conn_id: conn_id.to_string(),
            config,
            kube_config_dir: None,
        }
    }

    /// Directory in which the temporary kube-config file is created, instead of the
    /// system temporary directory.
    pub fn with_kube_config_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.kube_config_dir = dir;
        self
    }

    pub fn conn_id(&self) -> &str {
        &self.conn_id
    }

    pub fn config_source(&self) -> ConfigSource {
        self.config.source()
    }

    /// Namespace defined in the connection, `default` if there is none.
    pub fn get_namespace(&self) -> &str {
        self.config.namespace()
    }

    /// Returns a client for the cluster described by the connection.
    ///
    /// No request is sent to the API server here.
    pub async fn get_conn(&self) -> Result<Client> {
        let config = match self.config_source() {
            ConfigSource::InCluster => {
                tracing::debug!("loading kube_config from: in_cluster configuration");
                Config::incluster().map_err(|source| Error::FailedLoadInClusterConfig {
                    conn_id: self.conn_id.clone(),
                    source,
                })?
            }
            ConfigSource::DefaultFile => {
                tracing::debug!("loading kube_config from: default file");
                Config::from_kubeconfig(&KubeConfigOptions::default())
                    .await
                    .map_err(|source| Error::FailedLoadKubeConfig {
                        conn_id: self.conn_id.clone(),
                        source,
                    })?
            }
            ConfigSource::Inline(contents) => {
                tracing::debug!("loading kube_config from: connection kube_config");
                self.inline_config(&contents).await?
            }
        };

        Client::try_from(config).map_err(|source| Error::FailedCreateClient {
            conn_id: self.conn_id.clone(),
            source,
        })
    }

    async fn inline_config(&self, contents: &str) -> Result<Config> {
        // removed when dropped, whichever way this function returns
        let temp_config = self.write_temp_config(contents)?;
        let kubeconfig = Kubeconfig::read_from(temp_config.path()).map_err(|source| {
            Error::FailedLoadKubeConfig {
                conn_id: self.conn_id.clone(),
                source,
            }
        })?;
        let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .map_err(|source| Error::FailedLoadKubeConfig {
                conn_id: self.conn_id.clone(),
                source,
            })?;
        drop(temp_config);
        Ok(config)
    }

    fn write_temp_config(&self, contents: &str) -> Result<tempfile::NamedTempFile> {
        let map_err = |source| Error::FailedWriteKubeConfig {
            conn_id: self.conn_id.clone(),
            source,
        };
        let dir = self
            .kube_config_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        let mut temp_config = tempfile::Builder::new()
            .prefix("kube_config-")
            .tempfile_in(&dir)
            .map_err(map_err)?;
        temp_config.write_all(contents.as_bytes()).map_err(map_err)?;
        temp_config.flush().map_err(map_err)?;
        Ok(temp_config)
    }
}
