use anyhow::{anyhow, Context, Result};
use archivist_core::domain::{normalize_host, RepoRef, RepositorySnapshot, DEFAULT_HOST};
use archivist_core::ports::{FetchError, IdentityPort, RepositoryPort};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::persistence::AppConfig;

const USER_AGENT: &str = concat!("archivist/", env!("CARGO_PKG_VERSION"));

const VIEWER_QUERY: &str = "query UserCurrent { viewer { login } }";

const ARCHIVE_MUTATION: &str = "mutation ArchiveRepository($input: ArchiveRepositoryInput!) {
  archiveRepository(input: $input) { repository { id } }
}";

/// GraphQL endpoint for a host
pub fn graphql_url(host: &str) -> String {
    let host = normalize_host(host);
    if host == DEFAULT_HOST {
        "https://api.github.com/graphql".to_string()
    } else {
        format!("https://{host}/api/graphql")
    }
}

/// Build the repository query selecting `fields`
pub fn repository_query(fields: &[&str]) -> String {
    let selection: Vec<&str> = fields
        .iter()
        .map(|field| match *field {
            "owner" => "owner { login }",
            other => other,
        })
        .collect();
    format!(
        "query RepositoryInfo($owner: String!, $name: String!) {{\n  repository(owner: $owner, name: $name) {{ {} }}\n}}",
        selection.join(" ")
    )
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlErrorItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlErrorItem {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Errors reported in a GraphQL response body
#[derive(Debug, Clone)]
pub struct GraphqlErrors(pub Vec<GraphqlErrorItem>);

impl GraphqlErrors {
    pub fn is_not_found(&self) -> bool {
        self.0.iter().any(|e| e.kind.as_deref() == Some("NOT_FOUND"))
    }
}

impl std::fmt::Display for GraphqlErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        write!(f, "GraphQL: {}", messages.join(", "))
    }
}

impl std::error::Error for GraphqlErrors {}

/// Decode a GraphQL body, turning reported errors into `GraphqlErrors`
pub fn decode_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    let response: GraphqlResponse<T> =
        serde_json::from_str(body).context("Failed to decode GraphQL response")?;

    if !response.errors.is_empty() {
        return Err(GraphqlErrors(response.errors).into());
    }

    response
        .data
        .ok_or_else(|| anyhow!("GraphQL response contained no data"))
}

#[derive(Debug, Deserialize)]
struct ViewerData {
    viewer: Viewer,
}

#[derive(Debug, Deserialize)]
struct Viewer {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryData {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    id: String,
    name: String,
    owner: OwnerNode,
    is_archived: bool,
}

#[derive(Debug, Deserialize)]
struct OwnerNode {
    login: String,
}

/// Turn a repository query body into a snapshot
pub fn decode_repository(repo: &RepoRef, body: &str) -> std::result::Result<RepositorySnapshot, FetchError> {
    let not_found = || FetchError::NotFound {
        repo: repo.full_name(),
    };

    let data: RepositoryData = match decode_response(body) {
        Ok(data) => data,
        Err(e) => {
            let missing = e
                .downcast_ref::<GraphqlErrors>()
                .is_some_and(GraphqlErrors::is_not_found);
            return Err(if missing { not_found() } else { FetchError::Transport(e) });
        }
    };

    let node = data.repository.ok_or_else(not_found)?;
    Ok(RepositorySnapshot {
        id: node.id,
        name: node.name,
        owner: node.owner.login,
        is_archived: node.is_archived,
    })
}

/// Check an archive mutation body; reported errors fail the call
pub fn decode_archive_response(body: &str) -> Result<()> {
    let _: Value = decode_response(body)?;
    Ok(())
}

/// Blocking GitHub GraphQL client
pub struct GithubClient {
    http: Client,
    config: AppConfig,
}

impl GithubClient {
    pub fn new(config: AppConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.http_timeout())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { http, config })
    }

    fn token(&self, host: &str) -> Result<String> {
        self.config.token_for(host).ok_or_else(|| {
            anyhow!(
                "not authenticated to {host}; set GH_TOKEN or add oauth_token under [hosts.\"{host}\"] in the config file"
            )
        })
    }

    /// POST one GraphQL document and return the raw body
    fn post(&self, host: &str, query: &str, variables: Value) -> Result<String> {
        let token = self.token(host)?;
        let url = graphql_url(host);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .with_context(|| format!("Failed to connect to {url}"))?;

        let status = response.status();
        let body = response.text().context("Failed to read response body")?;
        if status == StatusCode::UNAUTHORIZED {
            return Err(anyhow!("HTTP 401: bad credentials for {host}"));
        }
        if !status.is_success() {
            return Err(anyhow!("HTTP {}: {}", status.as_u16(), body.trim()));
        }
        Ok(body)
    }
}

impl IdentityPort for GithubClient {
    fn current_login(&self, host: &str) -> Result<String> {
        if let Some(user) = self.config.user_for(host) {
            debug!("Using configured user {} for {}", user, host);
            return Ok(user);
        }
        let body = self.post(host, VIEWER_QUERY, json!({}))?;
        let data: ViewerData = decode_response(&body)?;
        Ok(data.viewer.login)
    }
}

impl RepositoryPort for GithubClient {
    fn fetch_repository(
        &self,
        repo: &RepoRef,
        fields: &[&str],
    ) -> std::result::Result<RepositorySnapshot, FetchError> {
        let variables = json!({ "owner": repo.owner, "name": repo.name });
        let body = self.post(&repo.host, &repository_query(fields), variables)?;
        decode_repository(repo, &body)
    }

    fn archive_repository(&self, repo: &RepoRef, id: &str) -> Result<()> {
        let variables = json!({ "input": { "repositoryId": id } });
        let body = self.post(&repo.host, ARCHIVE_MUTATION, variables)?;
        decode_archive_response(&body)?;
        info!("Archived {} ({})", repo, id);
        Ok(())
    }
}
