//! Google Gemini API backend.

use crate::model::{
    Backend, Message, ModelError, ModelRequest, ModelResponse, Part, Role, ToolCall, ToolResult,
    ToolSpec, Usage,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// ─────────────────────────────────────────────────────────────────────────────
// API Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest {
    contents: Vec<ApiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ApiContent>,
    generation_config: ApiGenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ApiTool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ApiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ApiPart>,
}

/// One part of a turn. Gemini sets exactly one payload field per part and may
/// add others (`thoughtSignature`, `inlineData`, ...), which are ignored.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<ApiFunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<ApiFunctionResponse>,
    /// Marks thought-summary text, which is not part of the answer.
    #[serde(default, skip_serializing)]
    thought: bool,
}

impl ApiPart {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiTool {
    function_declarations: Vec<ApiFunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct ApiFunctionDeclaration {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
    #[serde(default)]
    usage_metadata: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiCandidate {
    /// Missing when generation stopped early, e.g. for safety.
    #[serde(default)]
    content: ApiContent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend Implementation
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for creating a Gemini backend.
#[derive(Debug, Clone)]
pub struct GeminiBackendBuilder {
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    base_url: String,
}

impl GeminiBackendBuilder {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: 2000,
            temperature: 0.7,
            base_url: GEMINI_API_URL.to_string(),
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn build(self) -> GeminiBackend {
        GeminiBackend {
            client: reqwest::Client::new(),
            api_key: self.api_key,
            model: self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            base_url: self.base_url,
        }
    }
}

/// Gemini `generateContent` backend.
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    base_url: String,
}

impl GeminiBackend {
    pub fn builder(api_key: impl Into<String>, model: impl Into<String>) -> GeminiBackendBuilder {
        GeminiBackendBuilder::new(api_key, model)
    }

    fn generate_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/models/{}:generateContent", self.model)
    }

    fn message_to_api(msg: &Message) -> ApiContent {
        let role = match msg.role {
            Role::User => "user",
            Role::Assistant => "model",
        };
        let parts = msg
            .parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => ApiPart::text(text.as_str()),
                Part::ToolCall(call) => ApiPart {
                    function_call: Some(ApiFunctionCall {
                        name: call.name.clone(),
                        args: call.input.clone(),
                    }),
                    ..ApiPart::default()
                },
                Part::ToolResult(result) => ApiPart {
                    function_response: Some(ApiFunctionResponse {
                        name: result.tool_name().to_string(),
                        response: match result {
                            ToolResult::Success { output, .. } => json!({ "result": output }),
                            ToolResult::Failure { .. } => result.payload(),
                        },
                    }),
                    ..ApiPart::default()
                },
            })
            .collect();

        ApiContent {
            role: Some(role.to_string()),
            parts,
        }
    }

    fn tools_to_api(specs: &[ToolSpec]) -> Vec<ApiTool> {
        if specs.is_empty() {
            return Vec::new();
        }
        vec![ApiTool {
            function_declarations: specs
                .iter()
                .map(|spec| ApiFunctionDeclaration {
                    name: spec.name.clone(),
                    description: spec.description.clone(),
                    parameters: spec.schema.clone(),
                })
                .collect(),
        }]
    }

    /// Gemini function calls carry no id; one is derived from the position
    /// in the response.
    fn response_to_message(content: ApiContent) -> Message {
        let parts = content
            .parts
            .into_iter()
            .enumerate()
            .filter_map(|(index, part)| {
                if let Some(call) = part.function_call {
                    return Some(Part::ToolCall(ToolCall {
                        id: format!("{}-{index}", call.name),
                        name: call.name,
                        input: call.args,
                    }));
                }
                part.text
                    .filter(|_| !part.thought)
                    .map(Part::Text)
            })
            .collect();

        Message {
            role: Role::Assistant,
            parts,
        }
    }
}

impl std::fmt::Display for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gemini({})", self.model)
    }
}

impl Backend for GeminiBackend {
    async fn call(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        let api_request = ApiRequest {
            contents: request.messages.iter().map(Self::message_to_api).collect(),
            system_instruction: request.system.map(|text| ApiContent {
                role: None,
                parts: vec![ApiPart::text(text)],
            }),
            generation_config: ApiGenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_tokens,
            },
            tools: Self::tools_to_api(request.tools),
        };

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api(format!("{status}: {body}")));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        let candidate = api_response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::InvalidResponse("no candidates".into()))?;

        let usage = api_response
            .usage_metadata
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        Ok(ModelResponse {
            message: Self::response_to_message(candidate.content),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_targets_model() {
        let backend = GeminiBackend::builder("key", "gemini-2.5-flash")
            .base_url("http://localhost:9000/v1beta/")
            .build();
        assert_eq!(
            backend.generate_url(),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn assistant_role_is_model() {
        let msg = Message {
            role: Role::Assistant,
            parts: vec![Part::ToolCall(ToolCall {
                id: "x".into(),
                name: "calculate_nutrition".into(),
                input: json!({"ingredients": ["rice"]}),
            })],
        };
        assert_eq!(
            serde_json::to_value(GeminiBackend::message_to_api(&msg)).unwrap(),
            json!({
                "role": "model",
                "parts": [{"functionCall": {"name": "calculate_nutrition", "args": {"ingredients": ["rice"]}}}]
            })
        );
    }

    #[test]
    fn tool_results_are_function_responses() {
        let msg = Message::tool_results(vec![ToolResult::Success {
            tool_call_id: "calculate_nutrition-0".into(),
            tool_name: "calculate_nutrition".into(),
            output: json!({"calories": 74}),
        }]);
        assert_eq!(
            serde_json::to_value(GeminiBackend::message_to_api(&msg)).unwrap()["parts"][0],
            json!({"functionResponse": {"name": "calculate_nutrition", "response": {"result": {"calories": 74}}}})
        );
    }

    #[test]
    fn function_calls_get_positional_ids() {
        let response: ApiResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"role": "model", "parts": [
                {"text": "Let me check."},
                {"functionCall": {"name": "estimate_cooking_time", "args": {"ingredients": ["beef"]}}}
            ]}}],
            "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 4}
        }))
        .unwrap();

        let content = response.candidates.into_iter().next().unwrap().content;
        let message = GeminiBackend::response_to_message(content);
        let calls = message.tool_calls();
        assert_eq!(message.text(), "Let me check.");
        assert_eq!(calls[0].id, "estimate_cooking_time-1");
        assert_eq!(calls[0].input, json!({"ingredients": ["beef"]}));
    }

    #[test]
    fn extra_part_fields_are_ignored() {
        let response: ApiResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"role": "model", "parts": [
                {"text": "Planning the menu.", "thought": true},
                {"functionCall": {"name": "calculate_nutrition", "args": {"ingredients": ["tofu"]}},
                 "thoughtSignature": "abc"},
                {"inlineData": {"mimeType": "image/png", "data": "AAAA"}},
                {"executableCode": {"language": "PYTHON", "code": "print(1)"}}
            ]}}]
        }))
        .unwrap();

        let content = response.candidates.into_iter().next().unwrap().content;
        let message = GeminiBackend::response_to_message(content);
        assert_eq!(message.parts.len(), 1);
        assert_eq!(message.tool_calls()[0].name, "calculate_nutrition");
        assert_eq!(message.text(), "");
    }

    #[test]
    fn candidate_without_content_is_empty() {
        let response: ApiResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        let content = response.candidates.into_iter().next().unwrap().content;
        assert!(GeminiBackend::response_to_message(content).parts.is_empty());
    }
}
