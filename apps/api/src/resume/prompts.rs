// Shared prompt constants for the resume pipeline.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Prompt prefix asking the model for the key fields of one page of résumé
/// text. The (already highlighted) page text is appended verbatim.
pub const KEY_INFO_PROMPT: &str = "帮我提取出下面这个简历的关键信息；";
