//! Tool invocation results.
//!
//! Every tool call ends in exactly one of `Success` or `Failure`. Both carry
//! text; the transport serializes them as MCP content blocks, flagging
//! failures with `isError`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One block of tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn as_text(&self) -> &str {
        match self {
            ContentBlock::Text { text } => text,
        }
    }
}

/// Outcome of a single tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationResult {
    Success { content: Vec<ContentBlock> },
    Failure { message: String },
}

impl InvocationResult {
    /// Success with a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        InvocationResult::Success {
            content: vec![ContentBlock::text(text)],
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        InvocationResult::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationResult::Success { .. })
    }

    /// All text carried by the result, blocks joined by newlines.
    pub fn text_content(&self) -> String {
        match self {
            InvocationResult::Success { content } => content
                .iter()
                .map(ContentBlock::as_text)
                .collect::<Vec<_>>()
                .join("\n"),
            InvocationResult::Failure { message } => message.clone(),
        }
    }

    /// MCP `tools/call` result payload.
    pub fn to_mcp_value(&self) -> Value {
        let (content, is_error) = match self {
            InvocationResult::Success { content } => (content.clone(), false),
            InvocationResult::Failure { message } => (vec![ContentBlock::text(message)], true),
        };
        serde_json::json!({
            "content": content,
            "isError": is_error,
        })
    }
}
