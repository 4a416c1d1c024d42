use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use standard_error::{Interpolate, StandardError};
use uuid::Uuid;

use super::session::ClientSession;
use crate::{
    pkg::internal::adaptors::jobs::spec::{JobEntry, JobPatch, NewJob},
    prelude::Result,
};

fn transport(e: impl ToString) -> StandardError {
    StandardError::new("ERR-CLI-001").interpolate_err(e.to_string())
}

async fn expect_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(transport(format!("{}: {}", status, body)))
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = request.send().await.map_err(transport)?;
    expect_success(response)
        .await?
        .json::<T>()
        .await
        .map_err(transport)
}

/// Thin wrappers over the job endpoints.
#[derive(Debug, Clone)]
pub struct JobsClient {
    base_url: String,
    http: Client,
}

impl JobsClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: &str, http: Client) -> Self {
        JobsClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Never fails: a transport or decoding error is logged and reported as
    /// an empty board.
    pub async fn list(&self) -> Vec<JobEntry> {
        match send_json::<Vec<JobEntry>>(self.http.get(self.url("/jobs"))).await {
            Ok(jobs) => jobs,
            Err(e) => {
                tracing::error!("Error fetching jobs: {:?}", e);
                Vec::new()
            }
        }
    }

    pub async fn create(&self, job: &NewJob) -> Result<JobEntry> {
        send_json(self.http.post(self.url("/jobs")).json(job)).await
    }

    pub async fn update(&self, id: Uuid, patch: &JobPatch) -> Result<JobEntry> {
        send_json(self.http.put(self.url(&format!("/jobs/{}", id))).json(patch)).await
    }

    /// Returns the server's confirmation message.
    pub async fn delete(&self, id: &str) -> Result<String> {
        let body: Value = send_json(self.http.delete(self.url(&format!("/jobs/{}", id)))).await?;
        Ok(body["message"].as_str().unwrap_or_default().to_string())
    }
}

#[derive(Debug, Clone)]
pub struct AccountsClient {
    base_url: String,
    http: Client,
}

#[derive(Deserialize)]
struct LoginResponse {
    username: String,
    token: Uuid,
}

impl AccountsClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: &str, http: Client) -> Self {
        AccountsClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn signup(&self, username: &str, password: &str) -> Result<()> {
        let _: Value = send_json(
            self.http
                .post(self.url("/signup"))
                .json(&json!({ "username": username, "password": password })),
        )
        .await?;
        Ok(())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<ClientSession> {
        let body: LoginResponse = send_json(
            self.http
                .post(self.url("/login"))
                .json(&json!({ "username": username, "password": password })),
        )
        .await?;
        Ok(ClientSession {
            username: body.username,
            token: body.token.to_string(),
        })
    }

    pub async fn logout(&self, session: &ClientSession) -> Result<()> {
        let _: Value =
            send_json(self.http.post(self.url("/logout")).bearer_auth(&session.token)).await?;
        Ok(())
    }

    /// The username the server associates with this session.
    pub async fn whoami(&self, session: &ClientSession) -> Result<String> {
        let body: Value =
            send_json(self.http.get(self.url("/session")).bearer_auth(&session.token)).await?;
        Ok(body["username"].as_str().unwrap_or_default().to_string())
    }
}
