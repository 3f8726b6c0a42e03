//! HTTP client for an IntelX instance. One attempt per call, no retries.

use bytes::Bytes;
use reqwest::{
    Certificate, Client, Method, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue},
};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::{
    config::IntelXConfig,
    error::{IntelXError, map_reqwest_error},
    jobs::JobService,
};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Status code and raw body of a 2xx response.
#[derive(Debug, Clone)]
pub struct SuccessResponse {
    pub status: StatusCode,
    pub data: Bytes,
}

impl SuccessResponse {
    pub fn is_no_content(&self) -> bool {
        self.status == StatusCode::NO_CONTENT
    }
}

#[derive(Clone)]
pub struct IntelXClient {
    base: Url,
    http: Client,
    authorization: HeaderValue,
}

impl std::fmt::Debug for IntelXClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntelXClient")
            .field("base", &self.base)
            .field("http", &self.http)
            .field("authorization", &"<present>")
            .finish()
    }
}

impl IntelXClient {
    pub fn new(config: &IntelXConfig) -> Result<Self, IntelXError> {
        let mut builder =
            Client::builder().user_agent(concat!("intelx-client/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(path) = &config.ca_certificate {
            let pem = std::fs::read(path).map_err(|e| {
                IntelXError::RequestConstruction(format!(
                    "failed to read CA certificate {}: {e}",
                    path.display()
                ))
            })?;
            let cert = Certificate::from_pem(&pem)
                .map_err(|e| IntelXError::RequestConstruction(e.to_string()))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder
            .build()
            .map_err(|e| IntelXError::RequestConstruction(e.to_string()))?;

        let mut authorization =
            HeaderValue::from_str(&format!("Token {}", config.token.expose_secret()))
                .map_err(|e| IntelXError::RequestConstruction(format!("invalid token: {e}")))?;
        authorization.set_sensitive(true);

        Ok(Self {
            base: config.base_url.clone(),
            http,
            authorization,
        })
    }

    /// Returns the base URL for the client.
    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Job endpoints.
    pub fn jobs(&self) -> JobService<'_> {
        JobService::new(self)
    }

    /// Resolves `segments` below the base URL, keeping any path prefix the
    /// base URL carries. Each segment is percent-encoded on its own; the base
    /// URL's query and fragment are dropped.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, IntelXError> {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| {
                IntelXError::RequestConstruction(format!("{} is not a base url", self.base))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends one request to an absolute URL and classifies the response.
    ///
    /// 2xx answers come back as [`SuccessResponse`]; any other status becomes
    /// [`IntelXError::Remote`] carrying the body as sent.
    pub async fn send(
        &self,
        method: Method,
        content_type: &str,
        body: Option<Bytes>,
        url: &str,
    ) -> Result<SuccessResponse, IntelXError> {
        let url = Url::parse(url).map_err(|e| IntelXError::RequestConstruction(e.to_string()))?;
        let content_type = HeaderValue::from_str(content_type)
            .map_err(|e| IntelXError::RequestConstruction(format!("invalid content type: {e}")))?;

        let mut req = self
            .http
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, content_type)
            .header(AUTHORIZATION, self.authorization.clone());

        if let Some(b) = body.filter(|b| !b.is_empty()) {
            req = req.body(b);
        }

        let res = req.send().await.map_err(map_reqwest_error)?;
        let status = res.status();
        let data = res.bytes().await.map_err(map_reqwest_error)?;

        debug!(%method, %url, status = status.as_u16(), "IntelX request completed");

        if status.is_success() {
            Ok(SuccessResponse { status, data })
        } else {
            warn!(%method, %url, status = status.as_u16(), "IntelX request rejected");
            Err(IntelXError::Remote {
                status: status.as_u16(),
                body: data,
            })
        }
    }

    pub(crate) async fn get_json<T>(&self, url: Url) -> Result<T, IntelXError>
    where
        T: DeserializeOwned,
    {
        let res = self
            .send(Method::GET, JSON_CONTENT_TYPE, None, url.as_str())
            .await?;
        serde_json::from_slice(&res.data).map_err(|e| {
            warn!(%url, error = %e, "Failed to decode IntelX response");
            IntelXError::Decode(e)
        })
    }

    pub(crate) async fn get_bytes(&self, url: Url) -> Result<Bytes, IntelXError> {
        let res = self
            .send(Method::GET, JSON_CONTENT_TYPE, None, url.as_str())
            .await?;
        Ok(res.data)
    }

    /// State-changing call whose success is signalled by 204 No Content.
    /// Other 2xx answers yield `false`.
    pub(crate) async fn action(&self, method: Method, url: Url) -> Result<bool, IntelXError> {
        let res = self
            .send(method, JSON_CONTENT_TYPE, None, url.as_str())
            .await?;
        Ok(res.is_no_content())
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        Router,
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{get, post},
    };
    use tokio::net::TcpListener;

    use super::{test_support::*, *};

    #[tokio::test]
    async fn test_send_attaches_token_and_content_type() {
        let router = Router::new().route(
            "/echo",
            get(|headers: HeaderMap| async move {
                let header = |name: &str| {
                    headers
                        .get(name)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string()
                };
                format!("{}|{}", header("authorization"), header("content-type"))
            }),
        );
        let client = spawn_client(router).await;
        let url = client.endpoint(&["echo"]).unwrap();

        let res = client
            .send(Method::GET, JSON_CONTENT_TYPE, None, url.as_str())
            .await
            .unwrap();

        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(&res.data[..], b"Token test-token|application/json");
    }

    #[tokio::test]
    async fn test_send_forwards_non_empty_body() {
        let router = Router::new().route("/echo", post(|body: String| async move { body }));
        let client = spawn_client(router).await;
        let url = client.endpoint(&["echo"]).unwrap();

        let res = client
            .send(
                Method::POST,
                JSON_CONTENT_TYPE,
                Some(Bytes::from_static(br#"{"observable_name":"8.8.8.8"}"#)),
                url.as_str(),
            )
            .await
            .unwrap();
        assert_eq!(&res.data[..], br#"{"observable_name":"8.8.8.8"}"#);

        let res = client
            .send(Method::POST, JSON_CONTENT_TYPE, Some(Bytes::new()), url.as_str())
            .await
            .unwrap();
        assert!(res.data.is_empty());
    }

    #[tokio::test]
    async fn test_send_non_success_keeps_body() {
        let router = Router::new().route(
            "/broken",
            get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "worker crashed") }),
        );
        let client = spawn_client(router).await;
        let url = client.endpoint(&["broken"]).unwrap();

        let err = client
            .send(Method::GET, JSON_CONTENT_TYPE, None, url.as_str())
            .await
            .unwrap_err();

        match err {
            IntelXError::Remote { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(&body[..], b"worker crashed");
            }
            e => panic!("Wrong error type: {e:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_invalid_url() {
        let client = client_for("http://127.0.0.1:9/");
        let err = client
            .send(Method::GET, JSON_CONTENT_TYPE, None, "not a valid url")
            .await
            .unwrap_err();
        assert!(matches!(err, IntelXError::RequestConstruction(_)));
    }

    #[tokio::test]
    async fn test_send_invalid_content_type() {
        let client = client_for("http://127.0.0.1:9/");
        let err = client
            .send(Method::GET, "application/json\n", None, "http://127.0.0.1:9/")
            .await
            .unwrap_err();
        assert!(matches!(err, IntelXError::RequestConstruction(_)));
    }

    #[tokio::test]
    async fn test_send_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{addr}/"));
        let url = client.endpoint(&["api", "jobs"]).unwrap();
        let err = client
            .send(Method::GET, JSON_CONTENT_TYPE, None, url.as_str())
            .await
            .unwrap_err();
        assert!(matches!(err, IntelXError::Transport(_)), "got {err:?}");
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_send_times_out() {
        let router = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let base = serve(router).await;
        let config = IntelXConfig::new(&base, TEST_TOKEN)
            .unwrap()
            .with_timeout(Duration::from_millis(100));
        let client = IntelXClient::new(&config).unwrap();
        let url = client.endpoint(&["slow"]).unwrap();

        let err = client
            .send(Method::GET, JSON_CONTENT_TYPE, None, url.as_str())
            .await
            .unwrap_err();
        assert!(matches!(err, IntelXError::Timeout), "got {err:?}");
    }

    #[test]
    fn test_endpoint_keeps_base_prefix() {
        let client = client_for("https://intelx.example.org/intelx/");
        let url = client.endpoint(&["api", "jobs", "12"]).unwrap();
        assert_eq!(url.as_str(), "https://intelx.example.org/intelx/api/jobs/12");

        let client = client_for("https://intelx.example.org");
        let url = client.endpoint(&["api", "jobs"]).unwrap();
        assert_eq!(url.as_str(), "https://intelx.example.org/api/jobs");
    }

    #[test]
    fn test_endpoint_drops_base_query() {
        let client = client_for("https://intelx.example.org/intelx/?x=1#top");
        let url = client.endpoint(&["api", "jobs", "5", "kill"]).unwrap();
        assert_eq!(url.as_str(), "https://intelx.example.org/intelx/api/jobs/5/kill");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = client_for("https://intelx.example.org/");
        let url = client
            .endpoint(&["api", "jobs", "1", "analyzer", "Yara Scan/v2", "kill"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://intelx.example.org/api/jobs/1/analyzer/Yara%20Scan%2Fv2/kill"
        );
    }

    #[test]
    fn test_missing_ca_certificate_file() {
        let config = IntelXConfig::new("https://intelx.example.org", TEST_TOKEN)
            .unwrap()
            .with_ca_certificate("/nonexistent/intelx-ca.pem");
        let err = IntelXClient::new(&config).unwrap_err();
        assert!(matches!(err, IntelXError::RequestConstruction(_)));
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let config = IntelXConfig::new("https://intelx.example.org", "bad\ntoken").unwrap();
        let err = IntelXClient::new(&config).unwrap_err();
        assert!(matches!(err, IntelXError::RequestConstruction(_)));
    }

    #[test]
    fn test_debug_hides_authorization() {
        let client = client_for("https://intelx.example.org/");
        assert!(!format!("{client:?}").contains(TEST_TOKEN));
    }
}
