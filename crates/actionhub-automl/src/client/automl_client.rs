//! AutoML client implementation
//!
//! This module provides the REST client for the AutoML v1 API. It handles
//! service account authentication, request/response processing and the
//! Google error envelope.

use std::collections::HashSet;
use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::{Client as HttpClient, ClientBuilder, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{AutoMlConfig, AutoMlCredentials, ServiceAccountCredentials};
use crate::error::{Error, Result};
use crate::model::{Dataset, ErrorEnvelope, ImportDataRequest, ListDatasetsResponse, Operation};
use crate::{AutoMlProvider, TRACING_TARGET_CLIENT};

/// Grant type of the OAuth 2.0 JWT-bearer flow.
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Cached tokens are refreshed once they are this close to expiry.
const TOKEN_REFRESH_MARGIN: SignedDuration = SignedDuration::from_secs(60);

/// Upper bound on the lifetime reported by the token endpoint.
const MAX_TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// AutoML client for interacting with the AutoML v1 REST API
///
/// Cloning is cheap; clones share the HTTP connection pool and the access
/// token cache.
///
/// # Examples
///
/// ```rust,no_run
/// use actionhub_automl::client::{AutoMlClient, AutoMlConfig, AutoMlCredentials};
/// use actionhub_automl::{AutoMlProvider, location_path};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = AutoMlCredentials::service_account("sa@foo.iam.gserviceaccount.com", "<pem>");
/// let client = AutoMlClient::new(AutoMlConfig::default(), credentials, "foo")?;
///
/// let datasets = client.list_datasets(&location_path("foo", "us-central1")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AutoMlClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: HttpClient,
    config: AutoMlConfig,
    credentials: AutoMlCredentials,
    project_id: String,
    token: RwLock<Option<CachedToken>>,
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Timestamp,
}

impl CachedToken {
    fn is_fresh(&self, now: Timestamp) -> bool {
        self.expires_at.duration_since(now) > TOKEN_REFRESH_MARGIN
    }
}

/// Claims of the signed service account assertion.
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl AutoMlClient {
    /// Create a new AutoML client bound to a project
    ///
    /// No network call is made: the credentials are first used, and
    /// therefore first validated, by the initial API request.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(
        config: AutoMlConfig,
        credentials: AutoMlCredentials,
        project_id: impl Into<String>,
    ) -> Result<Self> {
        let project_id = project_id.into();

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            base_url = %config.base_url,
            project_id = %project_id,
            credentials = credentials.kind(),
            "Creating AutoML client"
        );

        let http_client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                config,
                credentials,
                project_id,
                token: RwLock::new(None),
            }),
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &AutoMlConfig {
        &self.inner.config
    }

    /// Project the client was created for.
    pub fn project_id(&self) -> &str {
        &self.inner.project_id
    }

    /// Get the credential kind (for logging purposes only)
    pub fn credentials_type(&self) -> &'static str {
        self.inner.credentials.kind()
    }

    /// Returns a valid access token, exchanging a new assertion when the
    /// cached one is missing or about to expire.
    async fn access_token(&self) -> Result<String> {
        let account = match &self.inner.credentials {
            AutoMlCredentials::BearerToken(token) => return Ok(token.clone()),
            AutoMlCredentials::ServiceAccount(account) => account,
        };

        let now = Timestamp::now();
        if let Some(cached) = self.inner.token.read().await.as_ref()
            && cached.is_fresh(now)
        {
            return Ok(cached.access_token.clone());
        }

        let mut token = self.inner.token.write().await;
        if let Some(cached) = token.as_ref()
            && cached.is_fresh(now)
        {
            return Ok(cached.access_token.clone());
        }

        let exchanged = self.exchange_assertion(account, now).await?;
        let access_token = exchanged.access_token.clone();
        *token = Some(exchanged);

        Ok(access_token)
    }

    async fn exchange_assertion(
        &self,
        account: &ServiceAccountCredentials,
        now: Timestamp,
    ) -> Result<CachedToken> {
        let config = &self.inner.config;
        let iat = now.as_second();
        let claims = AssertionClaims {
            iss: &account.client_email,
            scope: &config.scope,
            aud: config.token_url.as_str(),
            iat,
            exp: iat + config.token_lifetime.as_secs() as i64,
        };

        let key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())?;
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            client_email = %account.client_email,
            token_url = %config.token_url,
            "Exchanging service account assertion"
        );

        let response = self
            .inner
            .http_client
            .post(config.token_url.clone())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = match serde_json::from_slice::<TokenErrorResponse>(&body) {
                Ok(TokenErrorResponse {
                    error,
                    error_description: Some(description),
                }) => format!("{error}: {description}"),
                Ok(TokenErrorResponse { error, .. }) => error,
                Err(_) => status.to_string(),
            };

            tracing::warn!(
                target: TRACING_TARGET_CLIENT,
                status = status.as_u16(),
                message = %message,
                "Token exchange rejected"
            );

            return Err(Error::Token(message));
        }

        let token: TokenResponse = serde_json::from_slice(&body)?;
        let expires_in = token
            .expires_in
            .unwrap_or(config.token_lifetime.as_secs() as i64)
            .clamp(0, MAX_TOKEN_LIFETIME_SECS);

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: now + SignedDuration::from_secs(expires_in),
        })
    }

    /// Create a new request builder for a path relative to the base URL
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.inner.config.base_url.join(path)?;
        Ok(self.inner.http_client.request(method, url))
    }

    /// Authenticates and sends a request, decoding the JSON response.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let access_token = self.access_token().await?;
        let response = request.bearer_auth(access_token).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&body)?);
        }

        let (message, reason) = match serde_json::from_slice::<ErrorEnvelope>(&body) {
            Ok(envelope) if !envelope.error.message.is_empty() => {
                (envelope.error.message, envelope.error.status)
            }
            _ if !body.is_empty() => (String::from_utf8_lossy(&body).into_owned(), None),
            _ => (status.to_string(), None),
        };

        tracing::warn!(
            target: TRACING_TARGET_CLIENT,
            status = status.as_u16(),
            reason = reason.as_deref().unwrap_or_default(),
            url = %url,
            message = %message,
            "AutoML request failed"
        );

        Err(Error::api_error(status.as_u16(), message))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let request = self.request(Method::GET, path)?.query(query);
        self.send(request).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path)?.json(body);
        self.send(request).await
    }
}

impl std::fmt::Debug for AutoMlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoMlClient")
            .field("base_url", &self.inner.config.base_url.as_str())
            .field("project_id", &self.inner.project_id)
            .field("credentials", &self.inner.credentials.kind())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl AutoMlProvider for AutoMlClient {
    async fn list_datasets(&self, parent: &str) -> actionhub_core::Result<Vec<Dataset>> {
        let path = format!("{parent}/datasets");
        let mut datasets = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let query: Vec<(&str, &str)> = match page_token.as_deref() {
                Some(token) => vec![("pageToken", token)],
                None => Vec::new(),
            };

            let page: ListDatasetsResponse = self.get_json(&path, &query).await?;
            datasets.extend(page.datasets);

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) if seen_tokens.insert(token.clone()) => page_token = Some(token),
                Some(token) => {
                    tracing::warn!(
                        target: TRACING_TARGET_CLIENT,
                        parent = %parent,
                        page_token = %token,
                        "Repeated page token, stopping dataset listing"
                    );
                    break;
                }
                None => break,
            }
        }

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            parent = %parent,
            count = datasets.len(),
            "Listed datasets"
        );

        Ok(datasets)
    }

    async fn create_dataset(
        &self,
        parent: &str,
        dataset: &Dataset,
    ) -> actionhub_core::Result<Operation> {
        let operation: Operation = self
            .post_json(&format!("{parent}/datasets"), dataset)
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            parent = %parent,
            display_name = %dataset.display_name,
            operation = %operation.name,
            "Requested dataset creation"
        );

        Ok(operation)
    }

    async fn import_data(
        &self,
        dataset: &str,
        request: &ImportDataRequest,
    ) -> actionhub_core::Result<Operation> {
        let operation: Operation = self
            .post_json(&format!("{dataset}:importData"), request)
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            dataset = %dataset,
            operation = %operation.name,
            "Requested data import"
        );

        Ok(operation)
    }

    async fn get_operation(&self, name: &str) -> actionhub_core::Result<Operation> {
        Ok(self.get_json(name, &[]).await?)
    }
}

#[cfg(test)]
mod tests {
    use actionhub_core::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{
        body_json, body_string_contains, header, method, path, query_param,
    };
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::model::location_path;

    const PARENT: &str = "projects/foo/locations/us-central1";
    const TEST_KEY: &str = include_str!("../../testdata/service_account_key.pem");

    fn config(server: &MockServer) -> AutoMlConfig {
        AutoMlConfig::builder()
            .with_base_url(&format!("{}/v1", server.uri()))
            .unwrap()
            .with_token_url(&format!("{}/token", server.uri()))
            .unwrap()
            .build()
            .unwrap()
    }

    fn client(server: &MockServer) -> AutoMlClient {
        AutoMlClient::new(
            config(server),
            AutoMlCredentials::bearer_token("test-token"),
            "foo",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_datasets_follows_pages() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/{PARENT}/datasets")))
            .and(query_param("pageToken", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "datasets": [{ "name": format!("{PARENT}/datasets/TBL2"), "displayName": "second" }]
            })))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/{PARENT}/datasets")))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "datasets": [{ "name": format!("{PARENT}/datasets/TBL1"), "displayName": "first" }],
                "nextPageToken": "page-2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let datasets = client(&server)
            .list_datasets(&location_path("foo", "us-central1"))
            .await
            .unwrap();

        let names: Vec<_> = datasets.iter().map(|d| d.display_name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/{PARENT}/datasets")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let datasets = client(&server).list_datasets(PARENT).await.unwrap();
        assert!(datasets.is_empty());
    }

    #[tokio::test]
    async fn test_error_envelope_message_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/v1/{PARENT}/datasets/TBL1:importData")))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "error importing ds", "status": "INVALID_ARGUMENT" }
            })))
            .mount(&server)
            .await;

        let error = client(&server)
            .import_data(
                &format!("{PARENT}/datasets/TBL1"),
                &ImportDataRequest::from_gcs(["gs://bucket/file.csv"]),
            )
            .await
            .unwrap_err();

        assert_eq!(error.kind, ErrorKind::UpstreamFailure);
        assert_eq!(error.user_message(), "error importing ds");
    }

    #[tokio::test]
    async fn test_permission_denied_is_authentication_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/{PARENT}/datasets")))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "code": 403, "message": "Permission denied", "status": "PERMISSION_DENIED" }
            })))
            .mount(&server)
            .await;

        let error = client(&server).list_datasets(PARENT).await.unwrap_err();

        assert_eq!(error.kind, ErrorKind::Authentication);
        assert_eq!(error.user_message(), "Permission denied");
    }

    #[tokio::test]
    async fn test_import_posts_gcs_source() {
        let server = MockServer::start().await;
        let dataset = format!("{PARENT}/datasets/TBL1");

        Mock::given(method("POST"))
            .and(path(format!("/v1/{dataset}:importData")))
            .and(body_json(json!({
                "inputConfig": { "gcsSource": { "inputUris": ["gs://bucket/file.csv"] } }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": format!("{PARENT}/operations/ICN1")
            })))
            .expect(1)
            .mount(&server)
            .await;

        let operation = client(&server)
            .import_data(&dataset, &ImportDataRequest::from_gcs(["gs://bucket/file.csv"]))
            .await
            .unwrap();

        assert_eq!(operation.name, format!("{PARENT}/operations/ICN1"));
        assert!(!operation.done);
    }

    #[tokio::test]
    async fn test_create_dataset_posts_metadata() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/v1/{PARENT}/datasets")))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(json!({
                "displayName": "sales",
                "translationDatasetMetadata": {
                    "sourceLanguageCode": "en",
                    "targetLanguageCode": "es"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": format!("{PARENT}/operations/TRL1")
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dataset = Dataset::new("sales").with_metadata(
            "translationDatasetMetadata",
            json!({ "sourceLanguageCode": "en", "targetLanguageCode": "es" }),
        );
        let operation = client(&server)
            .create_dataset(PARENT, &dataset)
            .await
            .unwrap();

        assert_eq!(operation.name, format!("{PARENT}/operations/TRL1"));
        assert!(!operation.done);
    }

    #[tokio::test]
    async fn test_repeated_page_token_stops_listing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/{PARENT}/datasets")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "datasets": [{ "name": format!("{PARENT}/datasets/TBL1"), "displayName": "first" }],
                "nextPageToken": "same"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let datasets = client(&server).list_datasets(PARENT).await.unwrap();

        assert_eq!(datasets.len(), 2);
    }

    #[tokio::test]
    async fn test_get_operation() {
        let server = MockServer::start().await;
        let name = format!("{PARENT}/operations/ICN1");

        Mock::given(method("GET"))
            .and(path(format!("/v1/{name}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": name,
                "done": true,
                "response": {}
            })))
            .mount(&server)
            .await;

        let operation = client(&server).get_operation(&name).await.unwrap();

        assert!(operation.done);
        assert!(operation.error.is_none());
    }

    #[tokio::test]
    async fn test_service_account_token_is_exchanged_once() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
            .and(body_string_contains("assertion="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "exchanged-token",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/{PARENT}/datasets")))
            .and(header("authorization", "Bearer exchanged-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "datasets": [] })))
            .expect(2)
            .mount(&server)
            .await;

        let escaped_key = TEST_KEY.replace('\n', "\\n");
        let client = AutoMlClient::new(
            config(&server),
            AutoMlCredentials::service_account("sa@foo.iam.gserviceaccount.com", escaped_key),
            "foo",
        )
        .unwrap();

        client.list_datasets(PARENT).await.unwrap();
        client.list_datasets(PARENT).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_assertion_is_authentication_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid JWT Signature."
            })))
            .mount(&server)
            .await;

        let client = AutoMlClient::new(
            config(&server),
            AutoMlCredentials::service_account("sa@foo.iam.gserviceaccount.com", TEST_KEY),
            "foo",
        )
        .unwrap();

        let error = client.list_datasets(PARENT).await.unwrap_err();

        assert_eq!(error.kind, ErrorKind::Authentication);
        assert!(error.user_message().contains("Invalid JWT Signature."));
    }

    #[tokio::test]
    async fn test_malformed_key_fails_on_first_use() {
        let server = MockServer::start().await;

        let client = AutoMlClient::new(
            config(&server),
            AutoMlCredentials::service_account("sa@foo.iam.gserviceaccount.com", "not a key"),
            "foo",
        )
        .unwrap();

        let error = client.list_datasets(PARENT).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::Authentication);
    }
}
