//! Shared building blocks for the auto-fix pipeline: the canonical diagnostic model, the seam
//! through which a repair service is invoked, configuration, and the LLM client used by the
//! default repair service.

pub mod config;
pub mod diagnostic;
#[cfg(feature = "llm-support")]
pub mod llm;
pub mod repair;
pub mod test_util;
