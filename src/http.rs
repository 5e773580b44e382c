//! HTTP access to the quiz web application
//!
//! Two calls are made against the server: the creator search endpoint and
//! the form post that submits a quiz. Both carry the configured session
//! cookie so the server sees the same user as the browser would.

use std::time::Duration;

use reqwest::header::{COOKIE, REFERER};
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, info};

use crate::config::QuizpilotConfig;
use crate::quiz::Submission;
use crate::search::{Creator, CreatorSearch, CreatorsResponse};
use crate::{QuizpilotError, Result};

/// Path of the creator search endpoint, absolute like form actions
pub const SEARCH_CREATORS_PATH: &str = "/search-creators/";

const MAX_ERROR_DETAIL_CHARS: usize = 300;

/// Where a submitted form ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    /// Final URL after redirects, normally the results page
    pub url: Url,
    pub status: StatusCode,
}

#[derive(Debug, Clone)]
pub struct ServerClient {
    client: Client,
    base: Url,
    session_cookie: Option<String>,
}

impl ServerClient {
    pub fn new(config: &QuizpilotConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("quizpilot/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base: config.server_url.clone(),
            session_cookie: config.session_cookie.clone(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve a path from a page document against the server base.
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| QuizpilotError::Http(format!("invalid url {path:?}: {e}")))
    }

    fn with_session(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }

    /// Post a quiz form. Redirects are followed and the final location is
    /// reported back.
    pub async fn submit(&self, submission: &Submission) -> Result<SubmitReceipt> {
        let url = self.url(&submission.action)?;
        info!(
            "Posting {} field(s) to {} ({:?})",
            submission.fields.len(),
            url,
            submission.reason
        );

        let request = self
            .client
            .post(url.clone())
            .header(REFERER, url.as_str())
            .form(&submission.fields);
        let response = self
            .with_session(request)
            .send()
            .await
            .map_err(Self::map_reqwest_error)?;
        let response = Self::check_response_status(response).await?;

        let receipt = SubmitReceipt {
            url: response.url().clone(),
            status: response.status(),
        };
        debug!("Submission landed on {}", receipt.url);
        Ok(receipt)
    }

    async fn check_response_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let detail = Self::extract_error_detail(&body);
        if !detail.is_empty() {
            return Err(QuizpilotError::Http(format!("server error {status}: {detail}")));
        }
        Err(QuizpilotError::Http(format!("server error {status}")))
    }

    fn extract_error_detail(body: &str) -> String {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return String::new();
        }

        if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
            if let Some(msg) = value.get("error").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(msg) = value.get("detail").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
        }

        if trimmed.chars().count() <= MAX_ERROR_DETAIL_CHARS {
            return trimmed.to_string();
        }
        let mut truncated = trimmed.chars().take(MAX_ERROR_DETAIL_CHARS).collect::<String>();
        truncated.push_str("... [truncated]");
        truncated
    }

    fn map_reqwest_error(e: reqwest::Error) -> QuizpilotError {
        if e.is_timeout() {
            QuizpilotError::Http(format!("timeout: {e}"))
        } else if e.is_connect() {
            QuizpilotError::Http(format!("network: {e}"))
        } else if e.is_decode() {
            QuizpilotError::Http(format!("malformed response: {e}"))
        } else {
            QuizpilotError::Http(e.to_string())
        }
    }
}

impl CreatorSearch for ServerClient {
    async fn search_creators(&self, query: &str) -> Result<Vec<Creator>> {
        let mut url = self.url(SEARCH_CREATORS_PATH)?;
        url.query_pairs_mut().append_pair("q", query);

        let request = self.client.get(url);
        let response = self
            .with_session(request)
            .send()
            .await
            .map_err(Self::map_reqwest_error)?;
        let response = Self::check_response_status(response).await?;
        let body: CreatorsResponse = response.json().await.map_err(Self::map_reqwest_error)?;
        Ok(body.creators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::SubmitReason;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Accept one connection, answer it with a canned response and hand back
    /// the raw request.
    async fn serve_once(status: &str, body: &str) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });
        (Url::parse(&format!("http://{addr}/")).unwrap(), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn client(base: Url) -> ServerClient {
        let config = QuizpilotConfig::new(std::env::temp_dir())
            .with_server_url(base.as_str())
            .unwrap()
            .with_session_cookie("sessionid=abc; csrftoken=tok");
        ServerClient::new(&config)
    }

    #[tokio::test]
    async fn test_search_creators_sends_query_and_cookie() {
        let (base, server) =
            serve_once("200 OK", r#"{"creators": [{"username": "alice"}]}"#).await;
        let creators = client(base).search_creators("ali ce").await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(
            creators,
            vec![Creator {
                username: "alice".to_string()
            }]
        );
        assert!(request.starts_with("GET /search-creators/?q=ali+ce HTTP/1.1"));
        assert!(request
            .to_ascii_lowercase()
            .contains("cookie: sessionid=abc; csrftoken=tok"));
    }

    #[tokio::test]
    async fn test_search_creators_server_error() {
        let (base, _server) = serve_once("500 Internal Server Error", r#"{"error": "boom"}"#).await;
        let err = client(base).search_creators("bob").await.unwrap_err();
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn test_search_creators_malformed_body() {
        let (base, _server) = serve_once("200 OK", "<html>").await;
        let err = client(base).search_creators("bob").await.unwrap_err();
        assert!(matches!(err, QuizpilotError::Http(_)));
    }

    #[tokio::test]
    async fn test_search_creators_body_without_creators() {
        let (base, _server) = serve_once("200 OK", r#"{"error": "oops"}"#).await;
        let err = client(base).search_creators("bob").await.unwrap_err();
        assert!(matches!(err, QuizpilotError::Http(_)));
    }

    #[tokio::test]
    async fn test_search_path_ignores_base_prefix() {
        let (base, server) = serve_once("200 OK", r#"{"creators": []}"#).await;
        let prefixed = base.join("app/").unwrap();
        let creators = client(prefixed).search_creators("al").await.unwrap();
        let request = server.await.unwrap();

        assert!(creators.is_empty());
        assert!(request.starts_with("GET /search-creators/?q=al HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_submit_posts_form_fields() {
        let (base, server) = serve_once("200 OK", "{}").await;
        let submission = Submission {
            action: "/quiz/4/take/".to_string(),
            fields: vec![
                ("csrfmiddlewaretoken".to_string(), "tok".to_string()),
                ("question_10".to_string(), "1".to_string()),
                ("question_12".to_string(), "seven hills".to_string()),
            ],
            reason: SubmitReason::Manual,
        };
        let receipt = client(base.clone()).submit(&submission).await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(receipt.status, StatusCode::OK);
        assert_eq!(receipt.url, base.join("/quiz/4/take/").unwrap());
        assert!(request.starts_with("POST /quiz/4/take/ HTTP/1.1"));
        assert!(request.ends_with("csrfmiddlewaretoken=tok&question_10=1&question_12=seven+hills"));
        assert!(request
            .to_ascii_lowercase()
            .contains("content-type: application/x-www-form-urlencoded"));
    }

    #[test]
    fn test_extract_error_detail_truncates() {
        let body = "x".repeat(MAX_ERROR_DETAIL_CHARS + 10);
        let detail = ServerClient::extract_error_detail(&body);
        assert!(detail.ends_with("... [truncated]"));
        assert_eq!(ServerClient::extract_error_detail(r#"{"detail": "nope"}"#), "nope");
    }
}
