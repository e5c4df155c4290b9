//! REST
//!
//! Client for the catalog server. The transport is abstracted by `SendRequest`, so that the
//! request handling can be tested without a server.
//!
//! The server stores exercises and workouts. It has no settings and cannot delete workouts, so
//! settings are kept by the client and deleting a workout fails with `RESTError::Unsupported`.

use std::sync::{PoisonError, RwLock};

use chrono::Utc;
use roulette_domain as domain;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::json;

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, SendError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl Request {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: vec![],
            body: None,
        }
    }

    fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    fn json<T: Serialize>(mut self, body: &T) -> Result<Self, RESTError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SendError {
    #[error("no connection")]
    NoConnection,
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

pub struct ReqwestSendRequest {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestSendRequest {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl SendRequest for ReqwestSendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, SendError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self
            .client
            .request(method, format!("{}/{}", self.base_url, request.path))
            .query(&request.query);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder.send().await.map_err(send_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(send_error)?;
        Ok(Response { status, body })
    }
}

fn send_error(err: reqwest::Error) -> SendError {
    if err.is_connect() || err.is_timeout() {
        SendError::NoConnection
    } else {
        SendError::Other(Box::new(err))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RESTError {
    #[error("no connection")]
    NoConnection,
    #[error("not found")]
    NotFound,
    #[error("unexpected response status {0}")]
    Status(u16),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidData(#[from] json::ExerciseError),
    #[error(transparent)]
    Send(Box<dyn std::error::Error + Send + Sync>),
    #[error("{0} is not supported by the server")]
    Unsupported(&'static str),
}

impl From<SendError> for RESTError {
    fn from(value: SendError) -> Self {
        match value {
            SendError::NoConnection => RESTError::NoConnection,
            SendError::Other(err) => RESTError::Send(err),
        }
    }
}

impl From<RESTError> for domain::StorageError {
    fn from(value: RESTError) -> Self {
        match value {
            RESTError::NoConnection => domain::StorageError::NoConnection,
            err => domain::StorageError::Other(Box::new(err)),
        }
    }
}

impl From<RESTError> for domain::ReadError {
    fn from(value: RESTError) -> Self {
        match value {
            RESTError::NotFound => domain::ReadError::NotFound,
            err => domain::ReadError::Storage(err.into()),
        }
    }
}

impl From<RESTError> for domain::CreateError {
    fn from(value: RESTError) -> Self {
        domain::CreateError::Storage(value.into())
    }
}

impl From<RESTError> for domain::UpdateError {
    fn from(value: RESTError) -> Self {
        match value {
            RESTError::NotFound => domain::UpdateError::NotFound,
            err => domain::UpdateError::Storage(err.into()),
        }
    }
}

impl From<RESTError> for domain::DeleteError {
    fn from(value: RESTError) -> Self {
        match value {
            RESTError::NotFound => domain::DeleteError::NotFound,
            err => domain::DeleteError::Storage(err.into()),
        }
    }
}

pub struct REST<S: SendRequest> {
    pub sender: S,
    settings: RwLock<domain::Settings>,
}

impl REST<ReqwestSendRequest> {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_sender(ReqwestSendRequest::new(base_url))
    }
}

impl<S: SendRequest> REST<S> {
    #[must_use]
    pub fn with_sender(sender: S) -> Self {
        Self {
            sender,
            settings: RwLock::new(domain::Settings::default()),
        }
    }

    async fn fetch<T>(&self, request: Request) -> Result<T, RESTError>
    where
        T: DeserializeOwned,
    {
        let response = self.sender.send_request(request).await?;
        check_status(&response)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    async fn fetch_no_content<T>(&self, request: Request, result: T) -> Result<T, RESTError> {
        let response = self.sender.send_request(request).await?;
        check_status(&response)?;
        Ok(result)
    }
}

fn path(collection: &str, id: Uuid) -> String {
    format!("api/{collection}/{}", json::ID::from(id))
}

fn check_status(response: &Response) -> Result<(), RESTError> {
    match response.status {
        _ if response.ok() => Ok(()),
        404 => Err(RESTError::NotFound),
        status => Err(RESTError::Status(status)),
    }
}

impl<S: SendRequest> domain::ExerciseRepository for REST<S> {
    async fn read_exercises(
        &self,
        filter: &domain::ExerciseFilter,
    ) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        let mut request = Request::get("api/exercises");
        if let Some(category) = filter.category {
            request = request.query("category", category);
        }
        if let Some(equipment) = &filter.equipment {
            request = request.query("equipment", equipment);
        }
        let exercises = self
            .fetch::<Vec<json::Exercise>>(request)
            .await?
            .into_iter()
            .map(domain::Exercise::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RESTError::from)?;
        // The server also returns equipment-free exercises for an equipment filter.
        Ok(exercises.into_iter().filter(|e| filter.matches(e)).collect())
    }

    async fn read_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::Exercise, domain::ReadError> {
        let exercise = self
            .fetch::<json::Exercise>(Request::get(path("exercises", *id)))
            .await?;
        Ok(domain::Exercise::try_from(exercise).map_err(RESTError::from)?)
    }

    async fn create_exercise(
        &self,
        name: domain::Name,
        category: domain::Category,
        description: String,
        equipment: domain::Equipment,
    ) -> Result<domain::Exercise, domain::CreateError> {
        let request = Request::post("api/exercises").json(&json::NewExercise {
            name: name.to_string(),
            category: category.to_string(),
            description,
            equipment: equipment.to_string(),
        })?;
        let exercise = self.fetch::<json::Exercise>(request).await?;
        Ok(domain::Exercise::try_from(exercise).map_err(RESTError::from)?)
    }

    async fn replace_exercise(
        &self,
        exercise: domain::Exercise,
    ) -> Result<domain::Exercise, domain::UpdateError> {
        let request =
            Request::put(path("exercises", *exercise.id)).json(&json::Exercise::from(&exercise))?;
        let exercise = self.fetch::<json::Exercise>(request).await?;
        Ok(domain::Exercise::try_from(exercise).map_err(RESTError::from)?)
    }

    async fn delete_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::ExerciseID, domain::DeleteError> {
        Ok(self
            .fetch_no_content(Request::delete(path("exercises", *id)), id)
            .await?)
    }
}

impl<S: SendRequest> domain::WorkoutRepository for REST<S> {
    async fn read_workouts(
        &self,
        limit: usize,
    ) -> Result<Vec<domain::SavedWorkout>, domain::ReadError> {
        Ok(self
            .fetch::<Vec<json::ServerSavedWorkout>>(
                Request::get("api/workouts").query("limit", limit),
            )
            .await?
            .into_iter()
            .map(domain::SavedWorkout::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RESTError::from)?)
    }

    async fn read_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::SavedWorkout, domain::ReadError> {
        let workout = self
            .fetch::<json::ServerSavedWorkout>(Request::get(path("workouts", *id)))
            .await?;
        Ok(domain::SavedWorkout::try_from(workout).map_err(RESTError::from)?)
    }

    async fn create_workout(
        &self,
        workout: domain::Workout,
    ) -> Result<domain::SavedWorkout, domain::CreateError> {
        let request = Request::post("api/workouts").json(&json::ServerWorkout::from(&workout))?;
        let created = self.fetch::<json::Created>(request).await?;
        Ok(domain::SavedWorkout {
            id: Uuid::from(created.id).into(),
            created_at: Utc::now(),
            workout,
        })
    }

    async fn delete_workout(
        &self,
        _: domain::WorkoutID,
    ) -> Result<domain::WorkoutID, domain::DeleteError> {
        Err(RESTError::Unsupported("deleting workouts").into())
    }
}

impl<S: SendRequest> domain::SettingsRepository for REST<S> {
    async fn read_settings(&self) -> Result<domain::Settings, domain::ReadError> {
        Ok(*self.settings.read().unwrap_or_else(PoisonError::into_inner))
    }

    async fn write_settings(
        &self,
        settings: domain::Settings,
    ) -> Result<domain::Settings, domain::UpdateError> {
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = settings;
        Ok(settings)
    }
}
