//! Per-request orchestration.
//!
//! Strictly sequential: each page is highlighted, sent to the generation
//! endpoint as one prompt, and its output appended in page order. Pages are
//! never batched into a single request. The first error aborts the whole
//! request — no partial result is returned. After the last page the
//! accumulated text gets one final highlighting pass.

use tracing::debug;

use crate::errors::AppError;
use crate::highlight::highlight;
use crate::llm_client::TextGenerator;
use crate::resume::prompts::KEY_INFO_PROMPT;

/// The per-request result handed to the renderer. Lives for one request.
#[derive(Debug, Clone)]
pub struct Resume {
    pub content: String,
}

/// Runs the per-page generation loop over extracted page texts.
pub async fn summarize(
    pages: &[String],
    generator: &dyn TextGenerator,
) -> Result<Resume, AppError> {
    let mut accumulated = String::new();

    for (index, page) in pages.iter().enumerate() {
        debug!("generating key fields for page {}/{}", index + 1, pages.len());
        let highlighted = highlight(page);
        let prompt = format!("{KEY_INFO_PROMPT}{highlighted}");
        let generated = generator.generate(&prompt, &[]).await?;
        accumulated.push_str(&generated);
    }

    Ok(Resume {
        content: highlight(&accumulated),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{HistoryTurn, LlmError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records prompts and replays canned outputs in call order.
    struct StubGenerator {
        prompts: Mutex<Vec<String>>,
        outputs: Mutex<Vec<Result<String, LlmError>>>,
    }

    impl StubGenerator {
        fn new(outputs: Vec<Result<String, LlmError>>) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                outputs: Mutex::new(outputs),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(
            &self,
            prompt: &str,
            _history: &[HistoryTurn],
        ) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.outputs.lock().unwrap().remove(0)
        }
    }

    #[tokio::test]
    async fn two_pages_yield_two_calls_in_page_order() {
        let pages = vec![
            "姓名: 张三\n电话: 123".to_string(),
            "教育背景: 某大学".to_string(),
        ];
        let stub = StubGenerator::new(vec![
            Ok("姓名：张三；电话：123。".to_string()),
            Ok("教育背景：某大学。".to_string()),
        ]);

        let resume = summarize(&pages, &stub).await.unwrap();

        let prompts = stub.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        // Each prompt is the key-info prefix plus the highlighted page text.
        assert!(prompts[0].starts_with(KEY_INFO_PROMPT));
        assert!(prompts[0].contains("<b>姓名</b>"));
        assert!(prompts[0].contains("<b>电话</b>"));
        assert!(prompts[1].starts_with(KEY_INFO_PROMPT));
        assert!(prompts[1].contains("<b>教育背景</b>"));

        // Outputs concatenated in page order, each keyword-highlighted.
        let first = resume.content.find("<b>姓名</b>：张三").unwrap();
        let second = resume.content.find("<b>教育背景</b>：某大学").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn final_content_is_highlight_of_concatenation() {
        let pages = vec!["page one".to_string(), "page two".to_string()];
        let stub = StubGenerator::new(vec![
            Ok("邮箱: a@b.c\n".to_string()),
            Ok("项目经历: xyz".to_string()),
        ]);

        let resume = summarize(&pages, &stub).await.unwrap();
        assert_eq!(resume.content, highlight("邮箱: a@b.c\n项目经历: xyz"));
    }

    #[tokio::test]
    async fn first_error_aborts_without_partial_output() {
        let pages = vec!["page one".to_string(), "page two".to_string()];
        let stub = StubGenerator::new(vec![
            Err(LlmError::EmptyGeneration),
            Ok("never reached".to_string()),
        ]);

        let err = summarize(&pages, &stub).await.unwrap_err();
        assert!(matches!(err, AppError::Llm(LlmError::EmptyGeneration)));
        // Remaining pages are short-circuited.
        assert_eq!(stub.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn no_pages_yields_empty_content_without_calls() {
        let stub = StubGenerator::new(vec![]);
        let resume = summarize(&[], &stub).await.unwrap();
        assert_eq!(resume.content, "");
        assert!(stub.prompts.lock().unwrap().is_empty());
    }
}
