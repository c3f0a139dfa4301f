use clap::{ArgAction, Parser};
use std::collections::HashMap;
use tracing::{Level, debug};

use crate::error::CliError;
use crate::k8s::ActiveNamespace;
use crate::model::OutputType;

const TEMPLATE_NAMESPACE_OPTION_NAME: &str = "template-namespace";
const VM_NAMESPACE_OPTION_NAME: &str = "vm-namespace";

const TEMPLATE_PARAM_SEP: char = ':';

// Namespaces are lists so the options can be passed without an argument;
// the last occurrence wins.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-vm",
    version,
    about = "Creates a VirtualMachine from a template."
)]
pub struct CliOptions {
    /// Name of a template to create VM from
    #[arg(long, value_name = "NAME")]
    pub template_name: String,

    /// Namespace of a template to create VM from
    #[arg(
        long = "template-namespace",
        value_name = "NAMESPACE",
        num_args = 0..,
        action = ArgAction::Append
    )]
    pub template_namespaces: Vec<String>,

    /// Template params to pass when processing the template manifest
    #[arg(
        long,
        value_name = "KEY1:VAL1 KEY2:VAL2",
        num_args = 1..,
        action = ArgAction::Append
    )]
    pub template_params: Vec<String>,

    /// Namespace where to create the VM
    #[arg(
        long = "vm-namespace",
        value_name = "NAMESPACE",
        num_args = 0..,
        action = ArgAction::Append
    )]
    pub vm_namespaces: Vec<String>,

    /// Add DataVolumes to VM Volumes
    #[arg(
        long = "dvs",
        value_name = "DV1 DV2",
        num_args = 1..,
        action = ArgAction::Append
    )]
    pub data_volumes: Vec<String>,

    /// Add DataVolumes to VM Volumes and add VM to DV ownerReferences. These DVs will be deleted once the created VM gets deleted.
    #[arg(
        long = "own-dvs",
        value_name = "DV1 DV2",
        num_args = 1..,
        action = ArgAction::Append
    )]
    pub own_data_volumes: Vec<String>,

    /// Add PersistentVolumeClaims to VM Volumes.
    #[arg(
        long = "pvcs",
        value_name = "PVC1 PVC2",
        num_args = 1..,
        action = ArgAction::Append
    )]
    pub persistent_volume_claims: Vec<String>,

    /// Add PersistentVolumeClaims to VM Volumes and add VM to PVC ownerReferences. These PVCs will be deleted once the created VM gets deleted.
    #[arg(
        long = "own-pvcs",
        value_name = "PVC1 PVC2",
        num_args = 1..,
        action = ArgAction::Append
    )]
    pub own_persistent_volume_claims: Vec<String>,

    /// Output format. One of: yaml|json
    #[arg(short = 'o', value_name = "FORMAT", value_enum)]
    pub output: Option<OutputType>,

    /// Sets DEBUG log level
    #[arg(long)]
    pub debug: bool,
}

impl CliOptions {
    pub fn all_pvc_names(&self) -> Vec<&str> {
        concat_names(
            &self.own_persistent_volume_claims,
            &self.persistent_volume_claims,
        )
    }

    pub fn all_dv_names(&self) -> Vec<&str> {
        concat_names(&self.own_data_volumes, &self.data_volumes)
    }

    pub fn all_disk_names(&self) -> Vec<&str> {
        let mut names = self.all_pvc_names();
        names.extend(self.all_dv_names());
        names
    }

    /// Entries without a separator are skipped; later keys overwrite earlier ones.
    pub fn template_param_map(&self) -> HashMap<String, String> {
        let mut result = HashMap::with_capacity(self.template_params.len());
        for key_val in &self.template_params {
            if let Some((key, value)) = key_val.split_once(TEMPLATE_PARAM_SEP) {
                result.insert(key.to_string(), value.to_string());
            }
        }
        result
    }

    pub fn debug_level(&self) -> Level {
        if self.debug { Level::DEBUG } else { Level::INFO }
    }

    pub fn template_namespace(&self) -> &str {
        last_or_empty(&self.template_namespaces)
    }

    pub fn vm_namespace(&self) -> &str {
        last_or_empty(&self.vm_namespaces)
    }

    fn set_template_namespace(&mut self, namespace: String) {
        self.template_namespaces = vec![namespace];
    }

    fn set_vm_namespace(&mut self, namespace: String) {
        self.vm_namespaces = vec![namespace];
    }

    /// Leaves exactly one template and one VM namespace behind, filling empty
    /// ones from `provider`.
    pub fn init(&mut self, provider: &impl ActiveNamespace) -> Result<(), CliError> {
        let result = self.resolve_namespaces(provider);
        debug!(cli_options = ?self, "parsed arguments");
        result
    }

    fn resolve_namespaces(&mut self, provider: &impl ActiveNamespace) -> Result<(), CliError> {
        let template_missing = self.template_namespace().is_empty();
        let vm_missing = self.vm_namespace().is_empty();

        if template_missing || vm_missing {
            let active_namespace = provider.active_namespace().map_err(|reason| {
                CliError::MissingRequiredNamespace {
                    options: self.missing_namespace_option_names(),
                    reason,
                }
            })?;
            if template_missing {
                self.set_template_namespace(active_namespace.clone());
            }
            if vm_missing {
                self.set_vm_namespace(active_namespace);
            }
        }

        if self.template_namespaces.len() > 1 {
            self.set_template_namespace(self.template_namespace().to_string());
        }
        if self.vm_namespaces.len() > 1 {
            self.set_vm_namespace(self.vm_namespace().to_string());
        }

        Ok(())
    }

    fn missing_namespace_option_names(&self) -> String {
        let mut result = Vec::with_capacity(2);
        if self.template_namespace().is_empty() {
            result.push(TEMPLATE_NAMESPACE_OPTION_NAME);
        }
        if self.vm_namespace().is_empty() {
            result.push(VM_NAMESPACE_OPTION_NAME);
        }
        result.join("/")
    }
}

fn concat_names<'a>(first: &'a [String], second: &'a [String]) -> Vec<&'a str> {
    first
        .iter()
        .chain(second)
        .map(String::as_str)
        .collect()
}

fn last_or_empty(values: &[String]) -> &str {
    values.last().map(String::as_str).unwrap_or_default()
}
