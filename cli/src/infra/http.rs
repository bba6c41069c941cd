//! Scheduler transport over the `/v2/apps` REST API.
//!
//! Implements both halves of the [`Scheduler`](crate::application::ports::Scheduler)
//! port. A 404 becomes [`ConvergeError::NotFound`]; every other failure
//! (connect error, timeout, non-2xx, undecodable body) becomes
//! [`ConvergeError::Transient`] so the poller can retry it.

use anyhow::{Context, Result};
use converge_common::{
    ApplicationDefinition, ApplicationEnvelope, ApplicationState, ApplicationVersion, ApplicationVersions, Applications,
    DeploymentId, RestartRequest, ScaleRequest, app_path, paths, restart_path, versions_path,
};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::application::ports::{ApplicationCatalog, DeploymentSubmitter};
use crate::domain::config::ClientConfig;
use crate::domain::error::ConvergeError;

/// HTTP client for the scheduler's application API.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("converge/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{path}", self.base_url))
    }

    /// Send, map the status, and decode the JSON body.
    ///
    /// `subject` names what a 404 refers to.
    async fn call<T: DeserializeOwned>(&self, req: RequestBuilder, subject: &str) -> Result<T> {
        let response = req
            .send()
            .await
            .map_err(|e| ConvergeError::Transient(format!("request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ConvergeError::NotFound(subject.to_string()).into());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConvergeError::Transient(format!("API error ({status}): {}", body.trim())).into());
        }

        response
            .json()
            .await
            .map_err(|e| ConvergeError::Transient(format!("Failed to parse response: {e}")).into())
    }
}

impl ApplicationCatalog for HttpCatalog {
    async fn list_application_ids(&self) -> Result<Vec<String>> {
        Ok(self
            .list_applications()
            .await?
            .into_iter()
            .map(|app| app.id)
            .collect())
    }

    async fn fetch_application(&self, id: &str) -> Result<ApplicationState> {
        let req = self.request(Method::GET, &app_path(id));
        let envelope: ApplicationEnvelope = self.call(req, id).await?;
        envelope
            .app
            .ok_or_else(|| ConvergeError::NotFound(id.to_string()).into())
    }

    async fn list_applications(&self) -> Result<Vec<ApplicationState>> {
        let req = self.request(Method::GET, paths::APPS);
        let list: Applications = self.call(req, paths::APPS).await?;
        Ok(list.apps)
    }

    async fn application_versions(&self, id: &str) -> Result<ApplicationVersions> {
        let req = self.request(Method::GET, &versions_path(id));
        self.call(req, id).await
    }
}

impl DeploymentSubmitter for HttpCatalog {
    async fn submit_create(&self, app: &ApplicationDefinition) -> Result<ApplicationState> {
        tracing::debug!(app = %app.id, "POST {}", paths::APPS);
        let req = self.request(Method::POST, paths::APPS).json(app);
        self.call(req, &app.id).await
    }

    async fn submit_update(&self, app: &ApplicationDefinition, force: bool) -> Result<DeploymentId> {
        let path = app_path(&app.id);
        tracing::debug!(app = %app.id, force, "PUT {path}");
        let req = self
            .request(Method::PUT, &path)
            .query(&[("force", force)])
            .json(app);
        self.call(req, &app.id).await
    }

    async fn submit_scale(&self, id: &str, instances: i64, force: bool) -> Result<DeploymentId> {
        let path = app_path(id);
        tracing::debug!(app = id, instances, force, "PUT {path}");
        let body = ScaleRequest {
            id: id.to_string(),
            instances,
        };
        let req = self
            .request(Method::PUT, &path)
            .query(&[("force", force)])
            .json(&body);
        self.call(req, id).await
    }

    async fn submit_restart(&self, id: &str, force: bool) -> Result<DeploymentId> {
        let path = restart_path(id);
        tracing::debug!(app = id, force, "POST {path}");
        let req = self
            .request(Method::POST, &path)
            .json(&RestartRequest { force });
        self.call(req, id).await
    }

    async fn submit_delete(&self, id: &str) -> Result<DeploymentId> {
        let path = app_path(id);
        tracing::debug!(app = id, "DELETE {path}");
        self.call(self.request(Method::DELETE, &path), id).await
    }

    async fn submit_version(&self, id: &str, version: &str) -> Result<DeploymentId> {
        let path = app_path(id);
        tracing::debug!(app = id, version, "PUT {path}");
        let body = ApplicationVersion {
            version: version.to_string(),
        };
        let req = self.request(Method::PUT, &path).json(&body);
        self.call(req, id).await
    }
}
