use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use quiz_core::model::{
    ApiSettings, CategoryId, ContentRecommendation, Difficulty, DifficultyRecommendation, UserId,
};

use crate::error::RecommendationError;

/// Source of remote difficulty suggestions.
#[async_trait]
pub trait DifficultyRecommender: Send + Sync {
    /// Fetch the backend's difficulty suggestion for a category.
    ///
    /// # Errors
    ///
    /// Returns `RecommendationError` if the request fails or the response is not understood.
    async fn difficulty_recommendation(
        &self,
        category: CategoryId,
    ) -> Result<DifficultyRecommendation, RecommendationError>;
}

/// REST client for the backend recommendation endpoints.
#[derive(Clone)]
pub struct RecommendationClient {
    client: Client,
    settings: ApiSettings,
}

impl RecommendationClient {
    /// # Errors
    ///
    /// Returns `RecommendationError::Http` if the HTTP client cannot be built.
    pub fn new(settings: ApiSettings) -> Result<Self, RecommendationError> {
        let client = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self { client, settings })
    }

    #[must_use]
    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    /// Content suggestions for a user, optionally limited to one difficulty.
    ///
    /// # Errors
    ///
    /// Returns `RecommendationError` if the request fails or the response is not understood.
    pub async fn nlp_recommendations(
        &self,
        user: UserId,
        difficulty: Option<Difficulty>,
    ) -> Result<Vec<ContentRecommendation>, RecommendationError> {
        let mut request = self.get(&format!("recommendations/{user}/nlp"));
        if let Some(difficulty) = difficulty {
            request = request.query(&[("difficulty", difficulty.as_str())]);
        }
        send_json(request).await
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let url = self.settings.endpoint(path);
        debug!(%url, "recommendation request");
        let request = self.client.get(url);
        match self.settings.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl DifficultyRecommender for RecommendationClient {
    async fn difficulty_recommendation(
        &self,
        category: CategoryId,
    ) -> Result<DifficultyRecommendation, RecommendationError> {
        send_json(self.get(&format!("recommendations/difficulty/{category}"))).await
    }
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, RecommendationError> {
    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(RecommendationError::HttpStatus(response.status()));
    }
    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::ApiSettingsDraft;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response and hand back the request head.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0_u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&head).into_owned()
        });
        (format!("http://{addr}/api/v1"), handle)
    }

    fn client(base_url: String, token: Option<&str>) -> RecommendationClient {
        let settings = ApiSettingsDraft {
            base_url: Some(base_url),
            token: token.map(str::to_owned),
            timeout_secs: Some(5),
        }
        .validate()
        .unwrap();
        RecommendationClient {
            client: Client::builder().no_proxy().build().unwrap(),
            settings,
        }
    }

    #[tokio::test]
    async fn fetches_difficulty_recommendation() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"currentDifficulty":"beginner","recommendedDifficulty":"advanced","confidence":0.9,"reason":"fast learner"}"#,
        )
        .await;

        let rec = client(base, Some("secret"))
            .difficulty_recommendation(CategoryId::new(4))
            .await
            .unwrap();
        assert_eq!(rec.recommended_difficulty, Difficulty::Advanced);

        let head = server.await.unwrap();
        assert!(head.starts_with("GET /api/v1/recommendations/difficulty/4 "));
        assert!(head.to_ascii_lowercase().contains("authorization: bearer secret"));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let (base, server) = serve_once("503 Service Unavailable", "{}").await;
        let err = client(base, None)
            .difficulty_recommendation(CategoryId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, RecommendationError::HttpStatus(status) if status.as_u16() == 503));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn nlp_recommendations_pass_difficulty_filter() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[{"id":1,"contentId":9,"title":"Traits","difficulty":"intermediate","confidence":0.7,"reason":"","type":"nlp"}]"#,
        )
        .await;

        let recs = client(base, None)
            .nlp_recommendations(UserId::new(3), Some(Difficulty::Intermediate))
            .await
            .unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].content_id, 9);

        let head = server.await.unwrap();
        assert!(head.starts_with("GET /api/v1/recommendations/3/nlp?difficulty=intermediate "));
    }
}
