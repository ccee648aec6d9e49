use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Serialize;

use super::{LanguageModel, LlmError};

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

/// OpenAI-compatible `/chat/completions` client.
pub struct OpenAiChat {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiChat {
    pub fn new(api_base: impl Into<String>, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_base, api_key, model)
    }

    /// Build a client whose requests give up after `timeout`.
    pub fn with_timeout(
        api_base: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;
        Ok(Self::with_client(client, api_base, api_key, model))
    }

    pub fn with_client(
        client: reqwest::Client,
        api_base: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl LanguageModel for OpenAiChat {
    fn name(&self) -> &str {
        "openai"
    }

    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>> {
        Box::pin(async move {
            let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

            let body = ChatRequest {
                model: &self.model,
                messages: [
                    ChatMessage {
                        role: "system",
                        content: system,
                    },
                    ChatMessage {
                        role: "user",
                        content: user,
                    },
                ],
            };

            let resp = self
                .client
                .post(format!("{}/chat/completions", self.api_base))
                .bearer_auth(api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| LlmError::Network(e.to_string()))?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            let data: serde_json::Value = resp
                .json()
                .await
                .map_err(|e| LlmError::Network(e.to_string()))?;

            data["choices"][0]["message"]["content"]
                .as_str()
                .map(str::to_string)
                .ok_or(LlmError::MissingContent)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn completion(content: &str) -> String {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn sends_system_and_user_messages() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::Json(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion("hi there"))
            .create_async()
            .await;

        let chat = OpenAiChat::new(server.url(), Some("sk-test".into()), "gpt-3.5-turbo");
        assert_eq!(chat.model(), "gpt-3.5-turbo");
        let text = chat.complete("be brief", "hello").await.unwrap();

        assert_eq!(text, "hi there");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn trailing_slash_in_base_is_ignored() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(completion("ok"))
            .create_async()
            .await;

        let chat = OpenAiChat::new(format!("{}/", server.url()), Some("k".into()), "m");
        assert_eq!(chat.complete("s", "u").await.unwrap(), "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let chat = OpenAiChat::new(server.url(), Some("k".into()), "m");
        let err = chat.complete("s", "u").await.unwrap_err();

        assert_eq!(
            err,
            LlmError::Api {
                status: 429,
                body: "slow down".into()
            }
        );
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn empty_choices_is_missing_content() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let chat = OpenAiChat::new(server.url(), Some("k".into()), "m");
        assert_eq!(
            chat.complete("s", "u").await.unwrap_err(),
            LlmError::MissingContent
        );
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let chat = OpenAiChat::new("http://127.0.0.1:9", None, "m");
        assert_eq!(
            chat.complete("s", "u").await.unwrap_err(),
            LlmError::MissingApiKey
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        // Port 9 (discard) is almost never listening.
        let chat = OpenAiChat::new("http://127.0.0.1:9", Some("k".into()), "m");
        assert!(matches!(
            chat.complete("s", "u").await.unwrap_err(),
            LlmError::Network(_)
        ));
    }
}
