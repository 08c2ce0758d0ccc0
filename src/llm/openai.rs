//! Chat client for OpenAI-compatible APIs

use async_trait::async_trait;

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use super::ChatClient;
use crate::config::LlmConfig;
use crate::error::{Error, Result};

pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key_env: String,
}

impl OpenAiClient {
    pub fn new(http: reqwest::Client, config: &LlmConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key_env: config.api_key_env.clone(),
        }
    }

    /// Read on every call. An unset variable is sent as an empty bearer token.
    fn api_key(&self) -> String {
        std::env::var(&self.api_key_env).unwrap_or_default()
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens,
        };

        tracing::debug!("Sending {} messages to {} ({})", messages.len(), url, self.model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Language model request failed: {}", status);
            return Err(Error::LanguageModel(format!("{}: {}", status, body)));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::LanguageModel("Completion has no message content".into()))?;

        tracing::debug!("Language model answered with {} bytes", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{header::AUTHORIZATION, HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    /// Completion endpoint recording the authorization header and body of each call
    async fn completion_server(status: StatusCode, answer: Value) -> (String, Seen) {
        let seen: Seen = Arc::default();
        let sink = seen.clone();

        let router = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let sink = sink.clone();
                let answer = answer.clone();
                async move {
                    let auth = headers
                        .get(AUTHORIZATION)
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_string);
                    sink.lock().unwrap().push((auth, body));
                    (status, Json(answer))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        (format!("http://{addr}/v1/"), seen)
    }

    fn client(base_url: String, api_key_env: &str) -> OpenAiClient {
        let config = LlmConfig {
            base_url,
            model: "gpt-4o-mini".into(),
            max_tokens: 500,
            api_key_env: api_key_env.into(),
        };
        OpenAiClient::new(reqwest::Client::new(), &config)
    }

    fn answer(content: Value) -> Value {
        json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })
    }

    #[tokio::test]
    async fn test_completion_request_and_content() {
        let (base_url, seen) = completion_server(StatusCode::OK, answer(json!("hola"))).await;
        let client = client(base_url, "SKINSIGHT_TEST_KEY_REQUEST");

        let messages = [ChatMessage::system("sys"), ChatMessage::user("prompt")];
        let content = client.complete(&messages, 120).await.unwrap();

        assert_eq!(content, "hola");
        let seen = seen.lock().unwrap();
        assert_eq!(
            seen[0].1,
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "prompt"}
                ],
                "max_tokens": 120
            })
        );
    }

    #[tokio::test]
    async fn test_api_key_read_on_every_call() {
        let (base_url, seen) = completion_server(StatusCode::OK, answer(json!("{}"))).await;
        let client = client(base_url, "SKINSIGHT_TEST_KEY_ROTATION");
        let messages = [ChatMessage::user("hola")];

        std::env::set_var("SKINSIGHT_TEST_KEY_ROTATION", "sk-first");
        client.complete(&messages, 10).await.unwrap();
        std::env::set_var("SKINSIGHT_TEST_KEY_ROTATION", "sk-second");
        client.complete(&messages, 10).await.unwrap();

        let headers: Vec<Option<String>> =
            seen.lock().unwrap().iter().map(|(auth, _)| auth.clone()).collect();
        assert_eq!(
            headers,
            [
                Some("Bearer sk-first".to_string()),
                Some("Bearer sk-second".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_unset_api_key_is_still_sent() {
        let (base_url, seen) = completion_server(StatusCode::OK, answer(json!("{}"))).await;
        let client = client(base_url, "SKINSIGHT_TEST_KEY_NEVER_SET");
        std::env::remove_var("SKINSIGHT_TEST_KEY_NEVER_SET");

        client.complete(&[ChatMessage::user("hola")], 10).await.unwrap();

        let seen = seen.lock().unwrap();
        let auth = seen[0].0.as_deref().unwrap();
        assert_eq!(auth.trim_end(), "Bearer");
    }

    #[tokio::test]
    async fn test_error_status_is_language_model_error() {
        let (base_url, _) = completion_server(
            StatusCode::UNAUTHORIZED,
            json!({"error": {"message": "Incorrect API key provided"}}),
        )
        .await;
        let client = client(base_url, "SKINSIGHT_TEST_KEY_REJECTED");

        let err = client
            .complete(&[ChatMessage::user("hola")], 10)
            .await
            .unwrap_err();

        match err {
            Error::LanguageModel(message) => {
                assert!(message.contains("401"), "{message}");
                assert!(message.contains("Incorrect API key"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_content_is_language_model_error() {
        for body in [answer(Value::Null), json!({"choices": []})] {
            let (base_url, _) = completion_server(StatusCode::OK, body).await;
            let client = client(base_url, "SKINSIGHT_TEST_KEY_EMPTY");

            let err = client
                .complete(&[ChatMessage::user("hola")], 10)
                .await
                .unwrap_err();

            assert!(matches!(err, Error::LanguageModel(_)), "unexpected error: {err}");
        }
    }
}
