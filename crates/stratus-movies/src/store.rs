//! Movie queries against the document database.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretSlice, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use stratus_core::client::{
    map_status_to_error, RetryPolicy, ServiceClient, ServiceClientBuilder,
    DOCUMENT_DB_DEFAULT_TIMEOUT,
};
use stratus_core::credentials::TokenCredential;
use stratus_core::types::Service;
use stratus_core::Error;
use tracing::debug;

use crate::models::{MovieListing, MovieRecord};
use crate::Result;

const USER_AGENT: &str = concat!("stratus-movies/", env!("CARGO_PKG_VERSION"));

/// REST API version sent with every query.
pub const DOCUMENT_DB_API_VERSION: &str = "2018-12-31";
/// Content type of query requests.
pub const QUERY_CONTENT_TYPE: &str = "application/query+json";
/// Header carrying the paging token in both directions.
pub const CONTINUATION_HEADER: &str = "x-ms-continuation";

/// Every movie.
pub const ALL_MOVIES_QUERY: &str = "SELECT c.title Title, c.year Year, c.genres Genres FROM c";
/// Movies released in `@year`.
pub const MOVIES_BY_YEAR_QUERY: &str =
    "SELECT c.title Title, c.year Year, c.genres Genres FROM c WHERE c.year = @year";
/// Movies titled `@title`, ignoring case.
pub const MOVIE_BY_TITLE_QUERY: &str =
    "SELECT c.title, c.year, c.genres FROM c WHERE LOWER(c.title) = LOWER(@title)";

/// Read access to the movie collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Every movie.
    async fn all_movies(&self) -> Result<Vec<MovieListing>>;
    /// Movies released in `year`.
    async fn movies_by_year(&self, year: &str) -> Result<Vec<MovieListing>>;
    /// Movies whose title equals `title`, ignoring case.
    async fn find_by_title(&self, title: &str) -> Result<Vec<MovieRecord>>;
}

/// Parameterized SQL query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlQuery {
    /// Query text.
    pub query: String,
    /// Named parameters.
    pub parameters: Vec<SqlParameter>,
}

/// Named query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlParameter {
    /// Parameter name including the `@`.
    pub name: String,
    /// Parameter value.
    pub value: String,
}

impl SqlQuery {
    /// Query without parameters.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            parameters: Vec::new(),
        }
    }

    /// Bind `name` to `value`.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(SqlParameter {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}

#[derive(Debug, Deserialize)]
struct QueryPage<T> {
    #[serde(rename = "Documents", default = "Vec::new")]
    documents: Vec<T>,
}

/// How requests to the document database are authorized.
pub enum DocumentDbAuth {
    /// Account master key, base64 encoded as the account shows it.
    MasterKey(SecretString),
    /// Entra ID access tokens.
    Token(Arc<dyn TokenCredential>),
}

enum Authorizer {
    MasterKey(SecretSlice<u8>),
    Token(Arc<dyn TokenCredential>),
}

impl Authorizer {
    fn new(auth: DocumentDbAuth) -> Result<Self> {
        match auth {
            DocumentDbAuth::MasterKey(key) => {
                let bytes = BASE64.decode(key.expose_secret().trim()).map_err(|e| {
                    Error::ConfigError(format!("Account key is not valid base64: {e}"))
                })?;
                Ok(Self::MasterKey(SecretSlice::from(bytes)))
            }
            DocumentDbAuth::Token(credential) => Ok(Self::Token(credential)),
        }
    }

    /// `Authorization` header for one request. `date` must equal the `x-ms-date` sent.
    async fn header(
        &self,
        verb: &Method,
        resource_type: &str,
        resource_link: &str,
        date: &str,
    ) -> Result<String> {
        match self {
            Self::MasterKey(key) => master_key_authorization(
                key.expose_secret(),
                verb,
                resource_type,
                resource_link,
                date,
            ),
            Self::Token(credential) => {
                let token = credential.token().await?;
                Ok(aad_authorization(token.expose_secret()))
            }
        }
    }
}

/// Builder for [`CosmosMovieStore`].
#[derive(Debug, Clone)]
pub struct CosmosMovieStoreBuilder {
    inner: ServiceClientBuilder,
    database: String,
    container: String,
}

impl CosmosMovieStoreBuilder {
    /// Create a builder for the account endpoint and collection.
    ///
    /// # Errors
    ///
    /// Returns an error if `account_uri` is not a valid URL.
    pub fn new(
        account_uri: impl AsRef<str>,
        database: impl Into<String>,
        container: impl Into<String>,
    ) -> Result<Self> {
        let inner = ServiceClientBuilder::new(
            Service::DocumentDb,
            account_uri,
            Duration::from_secs(DOCUMENT_DB_DEFAULT_TIMEOUT),
        )?
        .with_user_agent(USER_AGENT);

        Ok(Self {
            inner,
            database: database.into(),
            container: container.into(),
        })
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.inner = self.inner.with_retry_policy(retry);
        self
    }

    /// Build the store, authorizing every request with `auth`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a master key that is not base64, or an error
    /// if the HTTP client cannot be created.
    pub fn build(self, auth: DocumentDbAuth) -> Result<CosmosMovieStore> {
        let collection_link = format!("dbs/{}/colls/{}", self.database, self.container);
        Ok(CosmosMovieStore {
            inner: self.inner.build()?,
            authorizer: Authorizer::new(auth)?,
            docs_path: format!("{collection_link}/docs"),
            collection_link,
        })
    }
}

/// Movie store backed by the document database REST API.
pub struct CosmosMovieStore {
    inner: ServiceClient,
    authorizer: Authorizer,
    collection_link: String,
    docs_path: String,
}

impl CosmosMovieStore {
    /// Path documents are queried on, relative to the account endpoint.
    #[must_use]
    pub fn docs_path(&self) -> &str {
        &self.docs_path
    }

    /// Run `query` across all partitions and collect every page.
    ///
    /// # Errors
    ///
    /// Returns the mapped service error or a parse error for malformed pages.
    pub async fn query<T>(&self, query: &SqlQuery) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(query)?;

        let mut items = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
            let authorization = self
                .authorizer
                .header(&Method::POST, "docs", &self.collection_link, &date)
                .await?;
            let response = self
                .inner
                .execute_with_retry(
                    Method::POST,
                    &self.docs_path,
                    &[],
                    |request| {
                        let request = request
                            .header(AUTHORIZATION, authorization.as_str())
                            .header("x-ms-date", date.as_str())
                            .header("x-ms-version", DOCUMENT_DB_API_VERSION)
                            .header("x-ms-documentdb-isquery", "True")
                            .header("x-ms-documentdb-query-enablecrosspartition", "True")
                            .header(CONTENT_TYPE, QUERY_CONTENT_TYPE)
                            .body(body.clone());
                        match &continuation {
                            Some(token) => request.header(CONTINUATION_HEADER, token.as_str()),
                            None => request,
                        }
                    },
                    |status, text| map_status_to_error(Service::DocumentDb, status, text),
                )
                .await?;

            let next = response
                .headers()
                .get(CONTINUATION_HEADER)
                .and_then(|value| value.to_str().ok())
                .filter(|value| !value.is_empty())
                .map(str::to_string);
            let bytes = response.bytes().await?;
            let page: QueryPage<T> = serde_json::from_slice(&bytes)?;
            debug!(count = page.documents.len(), "query page received");
            items.extend(page.documents);

            match next {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl MovieStore for CosmosMovieStore {
    async fn all_movies(&self) -> Result<Vec<MovieListing>> {
        self.query(&SqlQuery::new(ALL_MOVIES_QUERY)).await
    }

    async fn movies_by_year(&self, year: &str) -> Result<Vec<MovieListing>> {
        self.query(&SqlQuery::new(MOVIES_BY_YEAR_QUERY).with_parameter("@year", year))
            .await
    }

    async fn find_by_title(&self, title: &str) -> Result<Vec<MovieRecord>> {
        self.query(&SqlQuery::new(MOVIE_BY_TITLE_QUERY).with_parameter("@title", title))
            .await
    }
}

/// Authorization header value signed with the account master key.
///
/// The signed payload is the lowercased verb, resource type and date around the
/// case-sensitive resource link, each followed by a newline, plus a trailing newline.
fn master_key_authorization(
    key: &[u8],
    verb: &Method,
    resource_type: &str,
    resource_link: &str,
    date: &str,
) -> Result<String> {
    let payload = format!(
        "{}\n{}\n{}\n{}\n\n",
        verb.as_str().to_lowercase(),
        resource_type.to_lowercase(),
        resource_link,
        date.to_lowercase()
    );
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| Error::ConfigError(format!("Unusable account key: {e}")))?;
    mac.update(payload.as_bytes());
    let signature = BASE64.encode(mac.finalize().into_bytes());

    let raw = format!("type=master&ver=1.0&sig={signature}");
    Ok(url::form_urlencoded::byte_serialize(raw.as_bytes()).collect())
}

/// Authorization header value for an Entra ID access token.
fn aad_authorization(token: &str) -> String {
    let raw = format!("type=aad&ver=1.0&sig={token}");
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Year;
    use serde_json::json;
    use stratus_core::credentials::StaticTokenCredential;
    use wiremock::matchers::{body_json, header, header_exists, header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DOCS: &str = "/dbs/movies/colls/movie-info/docs";

    // Example key and signature published with the REST API's access control docs.
    const SAMPLE_KEY: &str =
        "dsZQi3KtZmCv1ljt3VNWNm7sQUF1y5rJfC6kv5JiwvW0EndXdDku/dkKBp8/ufDToSxLzR4y+O/0H/t4bQtVNw==";
    const SAMPLE_DATE: &str = "Thu, 27 Apr 2017 00:51:12 GMT";

    fn token_auth() -> DocumentDbAuth {
        DocumentDbAuth::Token(Arc::new(StaticTokenCredential::new("db-token")))
    }

    fn store_with(server: &MockServer, auth: DocumentDbAuth) -> CosmosMovieStore {
        CosmosMovieStoreBuilder::new(server.uri(), "movies", "movie-info")
            .unwrap()
            .with_retry_policy(RetryPolicy::no_retry())
            .build(auth)
            .unwrap()
    }

    fn store(server: &MockServer) -> CosmosMovieStore {
        store_with(server, token_auth())
    }

    fn sample_key() -> Vec<u8> {
        BASE64.decode(SAMPLE_KEY).unwrap()
    }

    #[test]
    fn master_key_signature_matches_published_example() {
        let header =
            master_key_authorization(&sample_key(), &Method::GET, "dbs", "dbs/ToDoList", SAMPLE_DATE)
                .unwrap();
        assert_eq!(
            header,
            "type%3Dmaster%26ver%3D1.0%26sig%3Dc09PEVJrgp2uQRkr934kFbTqhByc7TVr3OHyqlu%2Bc%2Bc%3D"
        );
    }

    #[test]
    fn master_key_signs_document_queries() {
        let header = master_key_authorization(
            &sample_key(),
            &Method::POST,
            "docs",
            "dbs/movies/colls/movie-info",
            SAMPLE_DATE,
        )
        .unwrap();
        assert_eq!(
            header,
            "type%3Dmaster%26ver%3D1.0%26sig%3DkszUxwv7zaLZAZXRPincBMw82HslPEI%2F9bXevNLprVI%3D"
        );
    }

    #[test]
    fn master_key_must_be_base64() {
        let result = CosmosMovieStoreBuilder::new("https://db.example.com/", "movies", "movie-info")
            .unwrap()
            .build(DocumentDbAuth::MasterKey(SecretString::from("not base64!")));
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[tokio::test]
    async fn master_key_requests_are_signed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DOCS))
            .and(header_regex("authorization", "^type%3Dmaster%26ver%3D1.0%26sig%3D.+"))
            .and(header_exists("x-ms-date"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Documents": []})))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_with(&server, DocumentDbAuth::MasterKey(SecretString::from(SAMPLE_KEY)));
        assert!(store.all_movies().await.unwrap().is_empty());
    }

    #[test]
    fn authorization_is_url_encoded() {
        assert_eq!(
            aad_authorization("abc"),
            "type%3Daad%26ver%3D1.0%26sig%3Dabc"
        );
    }

    #[test]
    fn query_wire_format() {
        let query = SqlQuery::new(MOVIES_BY_YEAR_QUERY).with_parameter("@year", "1999");
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "query": MOVIES_BY_YEAR_QUERY,
                "parameters": [{"name": "@year", "value": "1999"}]
            })
        );
    }

    #[tokio::test]
    async fn all_movies_sends_query_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DOCS))
            .and(header("x-ms-documentdb-isquery", "True"))
            .and(header("x-ms-documentdb-query-enablecrosspartition", "True"))
            .and(header("content-type", QUERY_CONTENT_TYPE))
            .and(header("x-ms-version", DOCUMENT_DB_API_VERSION))
            .and(header("authorization", "type%3Daad%26ver%3D1.0%26sig%3Ddb-token"))
            .and(header_exists("x-ms-date"))
            .and(body_json(json!({"query": ALL_MOVIES_QUERY, "parameters": []})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_rid": "abc",
                "Documents": [
                    {"Title": "Heat", "Year": "1995", "Genres": ["Crime"]}
                ],
                "_count": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let movies = store(&server).all_movies().await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].year, Year::Text("1995".into()));
    }

    #[tokio::test]
    async fn follows_continuation_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DOCS))
            .and(header(CONTINUATION_HEADER, "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Documents": [{"Title": "Alien", "Year": "1979", "Genres": []}]
            })))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(DOCS))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(CONTINUATION_HEADER, "page-2")
                    .set_body_json(json!({
                        "Documents": [{"Title": "Heat", "Year": "1995", "Genres": []}]
                    })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let movies = store(&server).all_movies().await.unwrap();
        let titles: Vec<_> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Heat", "Alien"]);
    }

    #[tokio::test]
    async fn title_lookup_binds_parameter() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DOCS))
            .and(body_json(json!({
                "query": MOVIE_BY_TITLE_QUERY,
                "parameters": [{"name": "@title", "value": "heat"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Documents": [{"title": "Heat", "year": "1995", "genres": ["Crime", "Drama"]}]
            })))
            .mount(&server)
            .await;

        let records = store(&server).find_by_title("heat").await.unwrap();
        assert_eq!(records[0].title, "Heat");
        assert_eq!(records[0].genres, vec!["Crime", "Drama"]);
    }

    #[tokio::test]
    async fn rejected_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DOCS))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let err = store(&server).movies_by_year("1999").await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn malformed_page() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(DOCS))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = store(&server).all_movies().await.unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }
}
