//! The HTTP seam between the client state machines and the backend.
//!
//! Everything network-shaped implements [`JobBoardApi`]; the real
//! implementation is [`HttpApi`], tests drive the machines with scripted
//! in-memory doubles.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AuthError, FetchError, ProfileError};

/// Request timeout for every backend call. The backend itself imposes none,
/// so without this a dead network leaves the UI spinning forever.
const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

/// Profile payload for create/update. Wire names stay camelCase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub full_name: String,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub mobile_number: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub highest_qualification: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub work_experience: String,
    #[serde(default)]
    pub interests: String,
    #[serde(default)]
    pub profile_picture: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// One job listing as the search proxy returns it. Only `Id` and `JobTitle`
/// are reliably present; everything else is best-effort upstream data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "JobTitle")]
    pub title: String,
    #[serde(rename = "CompanyName", default)]
    pub company: Option<String>,
    #[serde(rename = "JobLocationDistrict", default)]
    pub district: Option<String>,
    #[serde(rename = "JobLocationState", default)]
    pub state: Option<String>,
    #[serde(rename = "MinCtcMonthly", default)]
    pub min_ctc_monthly: Option<u64>,
    #[serde(rename = "MinExperience", default)]
    pub min_experience: Option<u32>,
    #[serde(rename = "MinEduQual", default)]
    pub min_qualification: Option<String>,
    #[serde(rename = "VacancyCount", default)]
    pub vacancies: Option<u32>,
    #[serde(rename = "PostedOn", default)]
    pub posted_on: Option<String>,
}

/// Search request the backend forwards upstream, field names verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSearchRequest {
    #[serde(rename = "PageNumber")]
    pub page_number: u32,
    #[serde(rename = "PageSize")]
    pub page_size: u32,
    #[serde(rename = "JobStatus")]
    pub job_status: String,
    #[serde(rename = "Sector")]
    pub sector: Vec<String>,
    #[serde(rename = "Country")]
    pub country: Vec<String>,
    #[serde(rename = "State")]
    pub state: Vec<String>,
    #[serde(rename = "SourceSystem")]
    pub source_system: Vec<String>,
    #[serde(rename = "MinSalary")]
    pub min_salary: u64,
    #[serde(rename = "MaxSalary")]
    pub max_salary: u64,
    #[serde(rename = "Field")]
    pub field: String,
    #[serde(rename = "Order")]
    pub order: String,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(rename = "Results", default)]
    results: Vec<Job>,
}

/// Every network call the client layer makes.
#[async_trait]
pub trait JobBoardApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError>;

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError>;

    /// `Ok(Some)` when a profile exists, `Ok(None)` on the service's
    /// not-found answer, `Err` for anything indeterminate.
    async fn get_profile(&self, token: &str) -> Result<Option<Value>, FetchError>;

    async fn create_profile(&self, token: &str, form: &ProfileForm) -> Result<(), ProfileError>;

    async fn update_profile(&self, token: &str, form: &ProfileForm) -> Result<(), ProfileError>;

    async fn search_jobs(&self, request: &JobSearchRequest) -> Result<Vec<Job>, FetchError>;

    async fn get_job(&self, id: &str) -> Result<Option<Job>, FetchError>;
}

/// Error body the backend emits: `{"error":{"code","message"}}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

async fn error_detail(response: reqwest::Response) -> (String, String) {
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => (parsed.error.code, parsed.error.message),
        Err(_) => (String::new(), body),
    }
}

/// Reqwest-backed implementation of [`JobBoardApi`].
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl JobBoardApi for HttpApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::ServiceUnavailable(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(AuthError::InvalidCredentials),
            status if status.is_success() => response
                .json::<LoginResponse>()
                .await
                .map_err(|e| AuthError::ServiceUnavailable(e.to_string())),
            status => {
                let (_, message) = error_detail(response).await;
                Err(AuthError::ServiceUnavailable(format!("{status}: {message}")))
            }
        }
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.url("/register"))
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .map_err(|e| AuthError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let (code, message) = error_detail(response).await;
        // Older backends report a duplicate account as a plain 400; the code
        // in the body disambiguates either way.
        match (status, code.as_str()) {
            (StatusCode::CONFLICT, _) | (_, "DUPLICATE") => Err(AuthError::DuplicateAccount),
            (_, "WEAK_PASSWORD") => Err(AuthError::WeakPassword),
            _ => Err(AuthError::ServiceUnavailable(format!("{status}: {message}"))),
        }
    }

    async fn get_profile(&self, token: &str) -> Result<Option<Value>, FetchError> {
        let response = self
            .client
            .get(self.url("/profile/"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| FetchError::Failed(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json::<Value>()
                .await
                .map(Some)
                .map_err(|e| FetchError::Failed(e.to_string())),
            status => Err(FetchError::Failed(format!("profile probe returned {status}"))),
        }
    }

    async fn create_profile(&self, token: &str, form: &ProfileForm) -> Result<(), ProfileError> {
        let response = self
            .client
            .post(self.url("/profile/"))
            .bearer_auth(token)
            .json(form)
            .send()
            .await
            .map_err(|e| ProfileError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let (_, message) = error_detail(response).await;
        match status {
            StatusCode::BAD_REQUEST => Err(ProfileError::ValidationFailed(message)),
            StatusCode::UNAUTHORIZED => Err(ProfileError::Unauthorized),
            StatusCode::CONFLICT => Err(ProfileError::AlreadyExists),
            _ => Err(ProfileError::ServiceUnavailable(format!(
                "{status}: {message}"
            ))),
        }
    }

    async fn update_profile(&self, token: &str, form: &ProfileForm) -> Result<(), ProfileError> {
        let response = self
            .client
            .put(self.url("/profile/"))
            .bearer_auth(token)
            .json(form)
            .send()
            .await
            .map_err(|e| ProfileError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let (_, message) = error_detail(response).await;
        match status {
            StatusCode::BAD_REQUEST => Err(ProfileError::ValidationFailed(message)),
            StatusCode::UNAUTHORIZED => Err(ProfileError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ProfileError::NotFound),
            _ => Err(ProfileError::ServiceUnavailable(format!(
                "{status}: {message}"
            ))),
        }
    }

    async fn search_jobs(&self, request: &JobSearchRequest) -> Result<Vec<Job>, FetchError> {
        let response = self
            .client
            .post(self.url("/job/"))
            .json(request)
            .send()
            .await
            .map_err(|e| FetchError::Failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Failed(format!("job search returned {status}")));
        }

        response
            .json::<SearchResults>()
            .await
            .map(|body| body.results)
            .map_err(|e| FetchError::Failed(e.to_string()))
    }

    async fn get_job(&self, id: &str) -> Result<Option<Job>, FetchError> {
        let response = self
            .client
            .get(self.url(&format!("/job/{id}")))
            .send()
            .await
            .map_err(|e| FetchError::Failed(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json::<Job>()
                .await
                .map(Some)
                .map_err(|e| FetchError::Failed(e.to_string())),
            status => Err(FetchError::Failed(format!("job lookup returned {status}"))),
        }
    }
}
