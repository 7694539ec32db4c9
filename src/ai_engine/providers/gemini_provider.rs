//! Gemini API provider
//!
//! Talks to the Generative Language REST API (`generateContent`). The fast
//! model handles per-selection code suggestions; the stronger model handles
//! theme detection, transcription, and corpus Q&A.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::ai_engine::provider::{AiError, AiProvider, MediaPayload};
use crate::store::models::{
    ChatMessage, Code, Document, Quote, Segment, SuggestedCode, SuggestedTheme,
};

/// Models wrap structured replies in markdown fences often enough that a
/// fence is stripped before JSON parsing.
static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*```(?:json)?\s*(.*?)\s*```\s*$").unwrap());

/// Document text beyond this many characters is elided from suggestion
/// prompts; the segment matters more than the far context.
const SUGGESTION_CONTEXT_CHARS: usize = 4000;

const SUGGEST_SYSTEM: &str = "You are an expert qualitative researcher. Your task is to suggest relevant codes for a given text segment. The user provides a text segment, the full document for context, and a list of existing codes.\n\
- Analyze the segment in the context of the full document.\n\
- If any existing codes are highly relevant, suggest them.\n\
- If the segment introduces a new concept, suggest a new code with a clear name and a brief description.\n\
- Return a JSON array of suggested codes. Each object should have an \"id\", \"name\", \"description\". For new codes, the \"id\" should start with \"new-\".\n\
- For existing codes, use their original \"id\". For new codes, create a temporary \"id\" starting with \"new-\".\n\
- Prioritize concise and meaningful code names.\n\
- If no codes are relevant, return an empty array.";

const THEMES_SYSTEM: &str = "You are an expert qualitative data analyst. Your goal is to identify the main themes in a given document.\n\
- Read the entire document.\n\
- Identify recurring topics, ideas, or patterns that can be considered themes.\n\
- For each theme, propose a concise name and a brief, clear description. This will become a \"code\".\n\
- For each theme, extract a few (3-5) representative quotes from the document that best exemplify it.\n\
- Do NOT use existing code names if provided, generate new ones based on the document.\n\
- The output must be a valid JSON array of themes. Each theme object must contain a \"code\" object (with \"name\" and \"description\") and a \"quotes\" array (of strings).\n\
- If no significant themes are found, return an empty array.";

const CHAT_SYSTEM: &str = "You are a helpful AI research assistant for a qualitative analysis application.\n\
Your role is to answer questions about the user's research data, which includes documents, codes, and quotes.\n\
- Be concise and helpful.\n\
- Base your answers strictly on the provided data context.\n\
- If the question cannot be answered from the context, say so.\n\
- You can summarize documents, compare themes (codes), or find relationships between data points.";

const TRANSCRIBE_SYSTEM: &str = "You are an AI model that transcribes audio and video files. Provide a verbatim transcript of the content. Do not add any commentary or introductory text, just the transcribed speech.";

// === Wire types ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<RequestContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

impl RequestContent {
    fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![RequestPart::text(text)],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl RequestPart {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    fn inline(mime_type: &str, data: &str) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data: data.to_string(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

impl GenerationConfig {
    /// JSON replies constrained by a response schema
    fn structured(schema: serde_json::Value) -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Gemini provider configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    /// Model for quick per-selection suggestions
    pub flash_model: String,
    /// Model for themes, transcription, and corpus Q&A
    pub pro_model: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: String::new(),
            flash_model: "gemini-2.5-flash".to_string(),
            pro_model: "gemini-2.5-pro".to_string(),
            timeout_secs: 120,
        }
    }
}

impl GeminiConfig {
    /// Read the API key from `GEMINI_API_KEY` (or legacy `API_KEY`)
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .unwrap_or_default();
        if api_key.is_empty() {
            log::warn!("GEMINI_API_KEY not set; AI features will fail until it is configured");
        }
        Self {
            api_key,
            ..Self::default()
        }
    }
}

/// Gemini AI provider
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    pub fn from_env() -> Self {
        Self::new(GeminiConfig::from_env())
    }

    async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<String, AiError> {
        if self.config.api_key.is_empty() {
            return Err(AiError::MissingApiKey);
        }

        let url = format!("{}/models/{}:generateContent", self.config.base_url, model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AiError::RequestFailed(format!("Cannot reach Gemini: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AiError::MissingApiKey);
        }
        if !status.is_success() {
            return Err(AiError::RequestFailed(format!(
                "Gemini returned {}",
                status,
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(format!("Malformed response body: {}", e)))?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| content.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| AiError::InvalidResponse("Reply contained no text".to_string()))
    }
}

/// Strip one surrounding markdown fence, if any, before JSON parsing
fn strip_code_fence(reply: &str) -> &str {
    match CODE_FENCE.captures(reply) {
        Some(caps) => caps.get(1).map_or(reply, |m| m.as_str()),
        None => reply.trim(),
    }
}

/// Up to `max_chars` of document text for a prompt, marking any elision
fn prompt_context(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

/// The corpus summary block shared with the assistant for Q&A
fn corpus_context(documents: &[Document], codes: &[Code], quotes: &[Quote]) -> String {
    let document_lines: Vec<String> = documents
        .iter()
        .map(|d| format!("- {} (type: {})", d.title, d.doc_type.as_str()))
        .collect();
    let code_lines: Vec<String> = codes
        .iter()
        .map(|c| format!("- {}: {}", c.name, c.description))
        .collect();

    format!(
        "DOCUMENTS:\n{}\n\nCODES (THEMES):\n{}\n\nQUOTES: {} quotes have been created linking documents to codes.",
        document_lines.join("\n"),
        code_lines.join("\n"),
        quotes.len(),
    )
}

#[async_trait]
impl AiProvider for GeminiProvider {
    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    async fn suggest_codes(
        &self,
        segment: &Segment,
        document: &Document,
        existing_codes: &[Code],
    ) -> Result<Vec<SuggestedCode>, AiError> {
        let existing: Vec<serde_json::Value> = existing_codes
            .iter()
            .map(|c| json!({"id": c.id, "name": c.name, "description": c.description}))
            .collect();
        let existing_json =
            serde_json::to_string_pretty(&existing).unwrap_or_else(|_| "[]".to_string());

        let prompt = format!(
            "DOCUMENT CONTEXT:\n---\n{}\n---\nSELECTED SEGMENT:\n---\n\"{}\"\n---\nEXISTING CODES:\n---\n{}\n---\nBased on the selected segment and its context, suggest relevant codes.",
            prompt_context(&document.content, SUGGESTION_CONTEXT_CHARS),
            segment.text,
            existing_json,
        );

        let schema = json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "id": {"type": "STRING"},
                    "name": {"type": "STRING"},
                    "description": {"type": "STRING"},
                },
                "required": ["id", "name", "description"],
            },
        });

        let request = GenerateRequest {
            contents: vec![RequestContent::text(prompt)],
            system_instruction: Some(RequestContent::text(SUGGEST_SYSTEM)),
            generation_config: Some(GenerationConfig::structured(schema)),
        };

        let reply = self.generate(&self.config.flash_model, &request).await?;
        serde_json::from_str(strip_code_fence(&reply))
            .map_err(|e| AiError::InvalidResponse(format!("Unparsable suggestions: {}", e)))
    }

    async fn detect_themes(
        &self,
        document: &Document,
        existing_codes: &[Code],
    ) -> Result<Vec<SuggestedTheme>, AiError> {
        let existing_names: Vec<&str> = existing_codes.iter().map(|c| c.name.as_str()).collect();
        let names_json =
            serde_json::to_string_pretty(&existing_names).unwrap_or_else(|_| "[]".to_string());

        let prompt = format!(
            "DOCUMENT:\n---\n{}\n---\nEXISTING CODES TO AVOID DUPLICATING:\n---\n{}\n---\nAnalyze the document and identify the major themes as instructed.",
            document.content, names_json,
        );

        let schema = json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "code": {
                        "type": "OBJECT",
                        "properties": {
                            "name": {"type": "STRING"},
                            "description": {"type": "STRING"},
                        },
                        "required": ["name", "description"],
                    },
                    "quotes": {
                        "type": "ARRAY",
                        "items": {"type": "STRING"},
                    },
                },
                "required": ["code", "quotes"],
            },
        });

        let request = GenerateRequest {
            contents: vec![RequestContent::text(prompt)],
            system_instruction: Some(RequestContent::text(THEMES_SYSTEM)),
            generation_config: Some(GenerationConfig::structured(schema)),
        };

        let reply = self.generate(&self.config.pro_model, &request).await?;
        serde_json::from_str(strip_code_fence(&reply))
            .map_err(|e| AiError::InvalidResponse(format!("Unparsable themes: {}", e)))
    }

    async fn transcribe_media(&self, media: &MediaPayload) -> Result<String, AiError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::text("Transcribe this file verbatim."),
                    RequestPart::inline(&media.mime_type, &media.base64_data),
                ],
            }],
            system_instruction: Some(RequestContent::text(TRANSCRIBE_SYSTEM)),
            generation_config: None,
        };

        self.generate(&self.config.pro_model, &request).await
    }

    async fn answer_question(
        &self,
        question: &str,
        history: &[ChatMessage],
        documents: &[Document],
        codes: &[Code],
        quotes: &[Quote],
    ) -> Result<String, AiError> {
        let history_text: Vec<String> = history
            .iter()
            .map(|m| format!("{}: {}", m.sender.label(), m.text))
            .collect();

        let prompt = format!(
            "CONTEXT:\n{}\n---\nCHAT HISTORY:\n{}\n---\nNEW QUESTION: {}",
            corpus_context(documents, codes, quotes),
            history_text.join("\n"),
            question,
        );

        let request = GenerateRequest {
            contents: vec![RequestContent::text(prompt)],
            system_instruction: Some(RequestContent::text(CHAT_SYSTEM)),
            generation_config: None,
        };

        self.generate(&self.config.pro_model, &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{ChatSender, NewDocument};

    #[test]
    fn test_strip_code_fence_unwraps_json_fences() {
        assert_eq!(strip_code_fence("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  [1, 2]  "), "[1, 2]");
    }

    #[test]
    fn test_strip_code_fence_leaves_inner_backticks_alone() {
        let reply = "no fences, just `inline` code";
        assert_eq!(strip_code_fence(reply), reply);
    }

    #[test]
    fn test_prompt_context_truncates_long_documents() {
        let long = "x".repeat(SUGGESTION_CONTEXT_CHARS + 10);
        let context = prompt_context(&long, SUGGESTION_CONTEXT_CHARS);
        assert_eq!(context.len(), SUGGESTION_CONTEXT_CHARS + 3);
        assert!(context.ends_with("..."));

        assert_eq!(prompt_context("short", SUGGESTION_CONTEXT_CHARS), "short");
    }

    #[test]
    fn test_corpus_context_lists_documents_codes_and_quote_count() {
        let documents = vec![Document::new(NewDocument::text("Interview A", "text"))];
        let codes = vec![Code::new("Design", "visual feedback", "#fca5a5")];
        let context = corpus_context(&documents, &codes, &[]);

        assert!(context.contains("- Interview A (type: text)"));
        assert!(context.contains("- Design: visual feedback"));
        assert!(context.contains("QUOTES: 0 quotes"));
    }

    #[test]
    fn test_request_serializes_with_camel_case_fields() {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart::inline("audio/mp3", "AAAA")],
            }],
            system_instruction: Some(RequestContent::text("sys")),
            generation_config: Some(GenerationConfig::structured(json!({"type": "ARRAY"}))),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("systemInstruction").is_some());
        assert!(value["generationConfig"].get("responseMimeType").is_some());
        assert!(value["generationConfig"].get("responseSchema").is_some());
        let part = &value["contents"][0]["parts"][0];
        assert_eq!(part["inlineData"]["mimeType"], "audio/mp3");
        assert!(part.get("text").is_none());
    }

    #[test]
    fn test_history_labels_match_the_chat_transcript() {
        let history = vec![
            ChatMessage::user("what stood out?"),
            ChatMessage::ai("confusion around exports"),
        ];
        assert_eq!(history[0].sender, ChatSender::User);
        let lines: Vec<String> = history
            .iter()
            .map(|m| format!("{}: {}", m.sender.label(), m.text))
            .collect();
        assert_eq!(lines[0], "User: what stood out?");
        assert_eq!(lines[1], "AI: confusion around exports");
    }

    #[test]
    fn test_default_config_points_at_the_public_api() {
        let config = GeminiConfig::default();
        assert!(config.base_url.starts_with("https://generativelanguage"));
        assert_ne!(config.flash_model, config.pro_model);
    }
}
