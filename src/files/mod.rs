mod descriptor;
mod registry;
mod reconciler;
mod validator;

pub use descriptor::{FileDescriptor, FileKey};
pub use reconciler::{reconcile, reconcile_replace, ListDelta};
pub use registry::{FileRegistry, RegistrySignal};
pub use validator::{validate, ValidationResult};

#[cfg(test)]
pub(crate) use descriptor::test_descriptor;
