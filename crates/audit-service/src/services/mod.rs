//! Pipeline services
//!
//! Each stage borrows the shared [`ServiceContext`] the same way, so a
//! stage can be exercised on its own against fake collaborators.

pub mod command;
pub mod config_store;
pub mod context;
pub mod correlator;
pub mod dispatcher;
pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testing;

pub use command::{CommandHandler, CommandOutcome, BIND_COMMAND, BIND_FAILED_REPLY};
pub use config_store::{binding_key, ConfigStore, KEY_PREFIX};
pub use context::ServiceContext;
pub use correlator::{Attribution, AuditCorrelator};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::{ServiceError, ServiceResult};
pub use normalizer::{EventNormalizer, Normalized, VoiceTransition};
pub use pipeline::{AuditPipeline, PipelineOutcome};
pub use resolver::PartialResolver;
