use std::path::PathBuf;
use std::sync::Arc;

use crate::connection::ConnectionStore;
use crate::error::Result;
use crate::hook::KubernetesHook;

/// Everything a task needs from the scheduler that runs it.
#[derive(Clone)]
pub struct TaskContext {
    pub connections: Arc<dyn ConnectionStore + Send + Sync>,
    /// Where temporary kube-config files are written; the system temporary directory if unset.
    pub kube_config_dir: Option<PathBuf>,
    /// Directories searched for templated files given by a relative path.
    pub template_searchpath: Vec<PathBuf>,
}

impl TaskContext {
    pub fn new(connections: impl ConnectionStore + Send + Sync + 'static) -> Self {
        TaskContext {
            connections: Arc::new(connections),
            kube_config_dir: None,
            template_searchpath: vec![],
        }
    }

    /// A new hook for `conn_id`; the connection record is read again on each call.
    pub fn hook(&self, conn_id: &str) -> Result<KubernetesHook> {
        Ok(KubernetesHook::new(self.connections.as_ref(), conn_id)?
            .with_kube_config_dir(self.kube_config_dir.clone()))
    }
}
