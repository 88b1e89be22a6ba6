//! End-to-end flows over a scripted in-memory transport: login, session
//! persistence, profile gating, and the paginated feed.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{json, Value};

use client::api::{Job, JobSearchRequest, LoginResponse, LoginUser, ProfileForm};
use client::auth::{self, AuthGateway};
use client::feed::{FeedPhase, JobFeed};
use client::gate::{self, GateDecision, PROFILE_PATH};
use client::session::{MemoryDisk, SessionStore};
use client::{AuthError, AuthState, FetchError, JobBoardApi, ProfileError, ProfileStatus};

const PASSWORD: &str = "sardines";

fn make_token(id: &str, role: &str) -> String {
    let payload = json!({ "id": id, "role": role, "exp": 4_102_444_800i64 }).to_string();
    format!("eyJhbGciOiJIUzI1NiJ9.{}.c2ln", URL_SAFE_NO_PAD.encode(payload))
}

fn job(id: &str) -> Job {
    Job {
        id: id.to_string(),
        title: format!("Job {id}"),
        company: None,
        district: None,
        state: None,
        min_ctc_monthly: None,
        min_experience: None,
        min_qualification: None,
        vacancies: None,
        posted_on: None,
    }
}

fn page(prefix: &str, count: usize) -> Vec<Job> {
    (0..count).map(|i| job(&format!("{prefix}-{i}"))).collect()
}

/// Backend double: one known account, a toggleable profile row, and a queue
/// of scripted job-search responses.
struct ScriptedApi {
    token: String,
    profile_exists: Mutex<bool>,
    job_pages: Mutex<VecDeque<Result<Vec<Job>, FetchError>>>,
}

impl ScriptedApi {
    fn new() -> Self {
        Self {
            token: make_token("u-1", "user"),
            profile_exists: Mutex::new(false),
            job_pages: Mutex::new(VecDeque::new()),
        }
    }

    fn queue_page(&self, result: Result<Vec<Job>, FetchError>) {
        self.job_pages.lock().unwrap().push_back(result);
    }
}

#[async_trait]
impl JobBoardApi for ScriptedApi {
    async fn login(&self, _email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        if password != PASSWORD {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(LoginResponse {
            token: self.token.clone(),
            user: LoginUser {
                username: "asha".to_string(),
                email: "asha@example.com".to_string(),
            },
        })
    }

    async fn register(&self, _: &str, _: &str, _: &str) -> Result<(), AuthError> {
        Err(AuthError::DuplicateAccount)
    }

    async fn get_profile(&self, token: &str) -> Result<Option<Value>, FetchError> {
        if token != self.token {
            return Err(FetchError::Failed("bad token".to_string()));
        }
        if *self.profile_exists.lock().unwrap() {
            Ok(Some(json!({ "fullName": "Asha Verma" })))
        } else {
            Ok(None)
        }
    }

    async fn create_profile(&self, _: &str, _: &ProfileForm) -> Result<(), ProfileError> {
        let mut exists = self.profile_exists.lock().unwrap();
        if *exists {
            return Err(ProfileError::AlreadyExists);
        }
        *exists = true;
        Ok(())
    }

    async fn update_profile(&self, _: &str, _: &ProfileForm) -> Result<(), ProfileError> {
        if *self.profile_exists.lock().unwrap() {
            Ok(())
        } else {
            Err(ProfileError::NotFound)
        }
    }

    async fn search_jobs(&self, _: &JobSearchRequest) -> Result<Vec<Job>, FetchError> {
        self.job_pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn get_job(&self, id: &str) -> Result<Option<Job>, FetchError> {
        if id == "known" {
            Ok(Some(job("known")))
        } else {
            Ok(None)
        }
    }
}

#[tokio::test]
async fn login_without_profile_gates_to_completion_then_home() {
    let api = Arc::new(ScriptedApi::new());
    let gateway = AuthGateway::new(api.clone());
    let store = SessionStore::new(MemoryDisk::default());
    let mut state = AuthState::new();

    // Fresh user: login succeeds, probe says the profile is missing.
    let status = auth::sign_in(&gateway, &store, &mut state, "asha@example.com", PASSWORD)
        .await
        .unwrap();
    assert_eq!(status, ProfileStatus::Missing);

    // Every protected path redirects to the completion form...
    assert_eq!(gate::protected(&mut state, "/"), GateDecision::RequireProfile);
    // ...except the form itself.
    assert_eq!(
        gate::protected(&mut state, PROFILE_PATH),
        GateDecision::Allowed
    );
    assert_eq!(
        gate::require_login_only(&mut state, PROFILE_PATH),
        GateDecision::Allowed
    );

    // Completing the profile flips the gate without another probe.
    api.create_profile(&state.identity().unwrap().token, &ProfileForm::default())
        .await
        .unwrap();
    state.mark_profile_created();
    assert_eq!(gate::protected(&mut state, "/"), GateDecision::Allowed);
}

#[tokio::test]
async fn session_survives_restart_and_logout_clears_it() {
    let api = Arc::new(ScriptedApi::new());
    let gateway = AuthGateway::new(api);
    let store = SessionStore::new(MemoryDisk::default());
    let mut state = AuthState::new();

    auth::sign_in(&gateway, &store, &mut state, "asha@example.com", PASSWORD)
        .await
        .unwrap();

    // "Restart": a fresh state restored from the same store is signed in.
    let mut restored = AuthState::restore(&store);
    assert_eq!(restored.identity().unwrap().subject_id, "u-1");
    assert_eq!(
        gate::redirect_if_authenticated(&mut restored),
        gate::AuthRedirect::Redirect("/".to_string())
    );

    auth::sign_out(&store, &mut state);
    let mut after_logout = AuthState::restore(&store);
    assert!(after_logout.identity().is_none());
    assert!(matches!(
        gate::protected(&mut after_logout, "/"),
        GateDecision::RequireLogin { .. }
    ));
}

#[tokio::test]
async fn failed_login_leaves_state_untouched() {
    let api = Arc::new(ScriptedApi::new());
    let gateway = AuthGateway::new(api);
    let store = SessionStore::new(MemoryDisk::default());
    let mut state = AuthState::new();

    let err = auth::sign_in(&gateway, &store, &mut state, "asha@example.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::InvalidCredentials);
    assert!(state.identity().is_none());
    assert!(store.load().is_none());
}

#[tokio::test]
async fn existing_profile_gates_straight_home() {
    let api = Arc::new(ScriptedApi::new());
    *api.profile_exists.lock().unwrap() = true;
    let gateway = AuthGateway::new(api);
    let store = SessionStore::new(MemoryDisk::default());
    let mut state = AuthState::new();

    let status = auth::sign_in(&gateway, &store, &mut state, "asha@example.com", PASSWORD)
        .await
        .unwrap();
    assert_eq!(status, ProfileStatus::Exists);
    assert_eq!(gate::protected(&mut state, "/"), GateDecision::Allowed);
}

#[tokio::test]
async fn feed_paginates_until_short_page() {
    let api = ScriptedApi::new();
    api.queue_page(Ok(page("p1", 12)));
    api.queue_page(Ok(page("p2", 12)));
    api.queue_page(Ok(page("p3", 4)));

    let mut feed = JobFeed::new();
    feed.fetch_page(&api, false).await;
    assert_eq!(feed.items().len(), 12);
    assert!(feed.has_more());

    feed.load_more(&api).await.unwrap();
    feed.load_more(&api).await.unwrap();
    assert_eq!(feed.items().len(), 28);
    assert!(!feed.has_more());
    assert!(feed.load_more(&api).await.is_none());
    assert_eq!(feed.filters().page_number, 3);
}

#[tokio::test]
async fn feed_append_failure_preserves_first_page() {
    let api = ScriptedApi::new();
    api.queue_page(Ok(page("p1", 12)));
    api.queue_page(Err(FetchError::Failed("gateway timeout".to_string())));

    let mut feed = JobFeed::new();
    feed.fetch_page(&api, false).await;
    feed.load_more(&api).await.unwrap();

    assert_eq!(feed.items().len(), 12);
    assert!(!feed.has_more());
    assert!(matches!(feed.phase(), FeedPhase::Error(_)));
}

#[tokio::test]
async fn feed_empty_first_page_reports_no_results() {
    let api = ScriptedApi::new();
    api.queue_page(Ok(Vec::new()));

    let mut feed = JobFeed::new();
    feed.fetch_page(&api, false).await;
    assert_eq!(*feed.phase(), FeedPhase::NoResults);
    assert!(!feed.has_more());
}
