use futures::executor::block_on;
use kube::Config;
use kube::config::{InClusterError, KubeConfigOptions, Kubeconfig, KubeconfigError};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum NamespaceError {
    #[error(
        "cannot determine active namespace: kubeconfig: ({kubeconfig}), in-cluster: ({in_cluster})"
    )]
    Undetermined {
        kubeconfig: KubeconfigError,
        in_cluster: InClusterError,
    },
}

/// Source of the namespace the task runs in when none was passed explicitly.
pub trait ActiveNamespace {
    fn active_namespace(&self) -> Result<String, NamespaceError>;
}

impl<F> ActiveNamespace for F
where
    F: Fn() -> Result<String, NamespaceError>,
{
    fn active_namespace(&self) -> Result<String, NamespaceError> {
        self()
    }
}

/// Takes the default namespace of the kube client configuration: the current
/// kubeconfig context first, the pod's service account otherwise.
#[derive(Debug, Clone, Default)]
pub struct ClusterNamespace {
    kubeconfig: Option<Kubeconfig>,
}

impl ClusterNamespace {
    #[cfg(test)]
    pub fn with_kubeconfig(kubeconfig: Kubeconfig) -> Self {
        Self {
            kubeconfig: Some(kubeconfig),
        }
    }

    fn kubeconfig_config(&self) -> Result<Config, KubeconfigError> {
        let kubeconfig = match &self.kubeconfig {
            Some(kubeconfig) => kubeconfig.clone(),
            None => Kubeconfig::read()?,
        };
        // Loading a parsed kubeconfig never waits on I/O.
        block_on(Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions::default(),
        ))
    }
}

impl ActiveNamespace for ClusterNamespace {
    fn active_namespace(&self) -> Result<String, NamespaceError> {
        let config = match self.kubeconfig_config() {
            Ok(config) => config,
            Err(kubeconfig) => {
                debug!(
                    error = %kubeconfig,
                    "no usable kubeconfig, falling back to in-cluster config"
                );
                Config::incluster()
                    .map_err(|in_cluster| NamespaceError::Undetermined {
                        kubeconfig,
                        in_cluster,
                    })?
            }
        };

        debug!(namespace = %config.default_namespace, "using active namespace");
        Ok(config.default_namespace)
    }
}
