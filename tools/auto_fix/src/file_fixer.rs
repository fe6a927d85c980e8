//! Adapter between the fix loop and an LLM acting as the repair service.
//!
//! Formats a [`RepairRequest`] into a prompt and turns the model's answer back into plain file
//! content.

use autofix_core::config::LLMConfig;
use autofix_core::llm::{InvokeError, RepairLlm, build_request};
use autofix_core::repair::{RepairRequest, RepairService};
use std::time::Duration;
use tracing::{debug, trace, warn};

const FIXER_PROMPT: &str = include_str!("../system_prompts/fixer.txt");
const FENCE: &str = "```";

/// Repair service backed by a configured LLM backend.
pub struct LlmRepairService {
    llm: RepairLlm,
}

impl LlmRepairService {
    pub fn new(config: &LLMConfig, timeout: Duration) -> Result<Self, InvokeError> {
        debug!(
            "Building {} repair client for model {}",
            config.backend, config.model
        );
        Ok(Self {
            llm: RepairLlm::build(config, FIXER_PROMPT, timeout)?,
        })
    }
}

impl RepairService for LlmRepairService {
    fn propose_fix(&self, request: &RepairRequest, timeout: Duration) -> Option<String> {
        let prompt = build_prompt(request);
        trace!(
            "Calling LLM to fix {}:{} ({} byte prompt)",
            request.error.file,
            request.error.line,
            prompt.len()
        );

        let raw = match self.llm.invoke(&build_request(&prompt), timeout) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Error calling repair service: {e}");
                return None;
            }
        };
        trace!("LLM returned {} bytes", raw.len());
        usable_content(&raw)
    }
}

/// Builds the user prompt for one fix attempt.
pub fn build_prompt(request: &RepairRequest) -> String {
    let error = request.error;
    let mut prompt = format!(
        "Fix the following error in the code.\n\n\
         ERROR DETAILS:\n\
         - File: {}\n\
         - Line: {}\n\
         - Message: {}\n\
         - Rule/Type: {}\n",
        error.file,
        error.line,
        error.message,
        error.rule_or_unknown(),
    );
    if let Some(fix) = &error.suggested_fix {
        prompt.push_str(&format!("- Fix suggested by the tool: {fix}\n"));
    }
    prompt.push_str(&format!(
        "\nCODE CONTEXT (line {} marked with >>>):\n{}\n\n\
         FULL FILE CONTENT:\n{FENCE}\n{}\n{FENCE}\n\n\
         Return the complete fixed file content:",
        error.line, request.context, request.file_content,
    ));
    prompt
}

/// Strips a single fenced-code wrapper from a model response.
///
/// If `raw` starts with a fence, its first line (which may carry a language tag) is dropped, and
/// so is the last line if it is a bare closing fence. Anything else is returned unchanged.
pub fn normalize_response(raw: &str) -> String {
    if !raw.starts_with(FENCE) {
        return raw.to_string();
    }
    let Some((_, body)) = raw.split_once('\n') else {
        return String::new();
    };
    match body.trim_end().rsplit_once('\n') {
        Some((content, last)) if last.trim() == FENCE => content.to_string(),
        None if body.trim() == FENCE => String::new(),
        _ => body.to_string(),
    }
}

/// Normalizes `raw`, returning `None` if nothing but whitespace is left.
pub fn usable_content(raw: &str) -> Option<String> {
    let content = normalize_response(raw);
    (!content.trim().is_empty()).then_some(content)
}
