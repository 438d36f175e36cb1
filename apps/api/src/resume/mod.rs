// Resume ingestion pipeline: upload -> extract -> per-page generation -> highlight.
// All LLM calls go through llm_client — no direct Dashscope calls here.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod render;
