//! Project resource fetchers.
//!
//! Each call is independent: no caching, no de-duplication. Views decide
//! which results still matter.

use crate::api::ForecastApi;
use crate::error::{FetchError, FetchResult};
use crate::http::HttpMethod;
use crate::model::{NewProject, Project, ProjectId, ProjectUpdate};
use crate::wire::{self, NewProjectBody, ProjectEnvelope, ProjectListEnvelope, ProjectUpdateBody};
use serde_json::Value;

const PROJECTS_PATH: &str = "/api/projects/";

fn project_path(id: ProjectId) -> String {
    format!("/api/projects/{id}")
}

fn malformed(error: wire::MappingError) -> FetchError {
    FetchError::MalformedResponse(error.0)
}

fn to_json<T: serde::Serialize>(body: &T) -> FetchResult<Value> {
    serde_json::to_value(body).map_err(|e| FetchError::MalformedResponse(e.to_string()))
}

fn project_from(value: Value) -> FetchResult<Project> {
    let envelope = wire::decode::<ProjectEnvelope>(value).map_err(malformed)?;
    Ok(Project::from(envelope.project))
}

impl ForecastApi {
    /// `GET /api/projects/`, in server order.
    ///
    /// # Errors
    ///
    /// See [`FetchError`].
    pub async fn list_projects(&self) -> FetchResult<Vec<Project>> {
        let value = self.http.request(HttpMethod::Get, PROJECTS_PATH, None).await?;
        let envelope = wire::decode::<ProjectListEnvelope>(value).map_err(malformed)?;
        let projects: Vec<Project> = envelope.projects.into_iter().map(Project::from).collect();
        tracing::debug!(count = projects.len(), "Listed projects");
        Ok(projects)
    }

    /// `GET /api/projects/:id`.
    ///
    /// # Errors
    ///
    /// [`FetchError::NotFound`], [`FetchError::Forbidden`] or
    /// [`FetchError::Unauthorized`] as the server reports them.
    pub async fn get_project(&self, id: ProjectId) -> FetchResult<Project> {
        let value = self
            .http
            .request(HttpMethod::Get, &project_path(id), None)
            .await?;
        project_from(value)
    }

    /// `POST /api/projects/`. The caller checks that the name is not empty.
    ///
    /// # Errors
    ///
    /// [`FetchError::Validation`] with the server message on rejection.
    pub async fn create_project(&self, project: &NewProject) -> FetchResult<Project> {
        let body = to_json(&NewProjectBody::from(project))?;
        let value = self
            .http
            .request(HttpMethod::Post, PROJECTS_PATH, Some(body))
            .await?;
        let created = project_from(value)?;
        tracing::debug!(project_id = %created.id, "Created project");
        Ok(created)
    }

    /// `PUT /api/projects/:id` with only the changed fields.
    ///
    /// # Errors
    ///
    /// See [`FetchError`].
    pub async fn update_project(
        &self,
        id: ProjectId,
        update: &ProjectUpdate,
    ) -> FetchResult<Project> {
        let body = to_json(&ProjectUpdateBody::from(update))?;
        let value = self
            .http
            .request(HttpMethod::Put, &project_path(id), Some(body))
            .await?;
        project_from(value)
    }

    /// `DELETE /api/projects/:id`.
    ///
    /// # Errors
    ///
    /// See [`FetchError`].
    pub async fn delete_project(&self, id: ProjectId) -> FetchResult<()> {
        self.http
            .request(HttpMethod::Delete, &project_path(id), None)
            .await?;
        tracing::debug!(project_id = %id, "Deleted project");
        Ok(())
    }
}
