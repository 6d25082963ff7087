//! # audit-service
//!
//! Application layer: turns raw gateway events into audit records and
//! delivers them to each guild's bound log channel.
//!
//! Per event the [`AuditPipeline`] runs resolve → normalize → correlate →
//! dispatch. Failures are contained in the returned [`PipelineOutcome`];
//! nothing propagates back into the gateway loop.

pub mod services;

pub use services::{
    binding_key, Attribution, AuditCorrelator, AuditPipeline, CommandHandler, CommandOutcome,
    ConfigStore, DispatchOutcome, Dispatcher, EventNormalizer, Normalized, PartialResolver,
    PipelineOutcome, ServiceContext, ServiceError, ServiceResult, VoiceTransition,
    BIND_COMMAND, BIND_FAILED_REPLY, KEY_PREFIX,
};
