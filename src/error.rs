use crate::k8s::NamespaceError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A namespace option was left empty and the active namespace could not be
    /// determined either. The lookup failure is part of the message only.
    #[error("{reason}: {options} option is empty")]
    MissingRequiredNamespace {
        options: String,
        reason: NamespaceError,
    },
}
