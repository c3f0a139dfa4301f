use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::cli::CliOptions;

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum OutputType {
    Yaml,
    Json,
}

impl OutputType {
    pub fn render<T: Serialize>(self, value: &T) -> Result<String> {
        match self {
            Self::Yaml => serde_yaml::to_string(value).context("failed to render yaml output"),
            Self::Json => {
                serde_json::to_string_pretty(value).context("failed to render json output")
            }
        }
    }
}

impl Display for OutputType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yaml => write!(f, "yaml"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum DiskKind {
    PersistentVolumeClaim,
    DataVolume,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct DiskSource {
    pub name: String,
    pub kind: DiskKind,
    /// The VM becomes an owner of the volume and takes it down on deletion.
    pub owned: bool,
}

/// Everything needed to process the template and create the VM.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineRequest {
    pub template_name: String,
    pub template_namespace: String,
    pub template_params: BTreeMap<String, String>,
    pub vm_namespace: String,
    pub disks: Vec<DiskSource>,
}

impl VirtualMachineRequest {
    pub fn from_options(options: &CliOptions) -> Self {
        let groups = [
            (
                &options.own_persistent_volume_claims,
                DiskKind::PersistentVolumeClaim,
                true,
            ),
            (
                &options.persistent_volume_claims,
                DiskKind::PersistentVolumeClaim,
                false,
            ),
            (&options.own_data_volumes, DiskKind::DataVolume, true),
            (&options.data_volumes, DiskKind::DataVolume, false),
        ];
        let disks = groups
            .into_iter()
            .flat_map(|(names, kind, owned)| {
                names.iter().map(move |name| DiskSource {
                    name: name.clone(),
                    kind,
                    owned,
                })
            })
            .collect::<Vec<_>>();

        Self {
            template_name: options.template_name.clone(),
            template_namespace: options.template_namespace().to_string(),
            template_params: options.template_param_map().into_iter().collect(),
            vm_namespace: options.vm_namespace().to_string(),
            disks,
        }
    }

    pub fn owned_disks(&self) -> impl Iterator<Item = &DiskSource> {
        self.disks.iter().filter(|disk| disk.owned)
    }
}
