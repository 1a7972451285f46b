//! In-memory repositories and an app harness so tests run without PostgreSQL

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use uuid::Uuid;

use crate::core::app::{build_router, AppServices, Repositories, RouterOptions};
use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::articles::models::{Article, ArticleStatus, CreateArticle, UpdateArticle};
use crate::features::articles::repositories::ArticleRepository;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::TokenService;
use crate::features::reports::models::{
    CreateReport, CreateReportAction, Report, ReportActionWithActor, ReportStatus,
    ReportWithOwner, UpdateReportContent,
};
use crate::features::reports::models::report_action::ReportAction;
use crate::features::reports::repositories::ReportRepository;
use crate::features::users::models::{CreateUser, UpdateUser, User, UserRole};
use crate::features::users::repositories::UserRepository;
use crate::features::users::services::NewUser;
use crate::modules::storage::LocalDiskStorage;

pub const TEST_PASSWORD: &str = "rahasia123";
pub const TEST_BASE_URL: &str = "http://localhost:3000";

#[derive(Default)]
struct StoreState {
    users: Vec<User>,
    reports: Vec<Report>,
    actions: Vec<ReportAction>,
    articles: Vec<Article>,
}

/// One store backing every repository trait. Vectors keep insertion order,
/// so "newest first" is a reverse walk.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
    fail_report_insert: AtomicBool,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes the next report insert fail as if the database were down
    pub fn fail_next_report_insert(&self) {
        self.fail_report_insert.store(true, Ordering::SeqCst);
    }

    pub fn report_count(&self) -> usize {
        self.lock().reports.len()
    }

    pub fn action_count(&self) -> usize {
        self.lock().actions.len()
    }

    pub fn report_status(&self, id: Uuid) -> Option<ReportStatus> {
        self.lock()
            .reports
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.status)
    }
}

fn owner_name(state: &StoreState, user_id: Uuid) -> Option<String> {
    state
        .users
        .iter()
        .find(|u| u.id == user_id)
        .map(|u| u.full_name.clone())
}

fn count<K: Eq + std::hash::Hash + Copy>(keys: impl Iterator<Item = K>) -> Vec<(K, i64)> {
    let mut counts: HashMap<K, i64> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    counts.into_iter().collect()
}

fn set<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, data: &CreateUser) -> Result<User> {
        let mut state = self.lock();
        if state.users.iter().any(|u| u.email == data.email) {
            return Err(AppError::Conflict(format!(
                "Email {} is already registered",
                data.email
            )));
        }
        let now = Utc::now();
        let user = User {
            id: data.id,
            full_name: data.full_name.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            phone_number: data.phone_number.clone(),
            address: data.address.clone(),
            rt: data.rt.clone(),
            rw: data.rw.clone(),
            role: data.role,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self, role: Option<UserRole>) -> Result<Vec<User>> {
        Ok(self
            .lock()
            .users
            .iter()
            .rev()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, data: &UpdateUser) -> Result<Option<User>> {
        let mut state = self.lock();
        if let Some(email) = &data.email {
            if state.users.iter().any(|u| &u.email == email && u.id != id) {
                return Err(AppError::Conflict(format!(
                    "Email {} is already registered",
                    email
                )));
            }
        }
        let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        set(&mut user.full_name, &data.full_name);
        set(&mut user.email, &data.email);
        set(&mut user.password_hash, &data.password_hash);
        if data.phone_number.is_some() {
            user.phone_number = data.phone_number.clone();
        }
        if data.address.is_some() {
            user.address = data.address.clone();
        }
        if data.rt.is_some() {
            user.rt = data.rt.clone();
        }
        if data.rw.is_some() {
            user.rw = data.rw.clone();
        }
        set(&mut user.role, &data.role);
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut state = self.lock();
        let referenced = state.reports.iter().any(|r| r.owner_user_id == id)
            || state.actions.iter().any(|a| a.actor_user_id == id);
        if referenced {
            return Err(AppError::Conflict(
                "User still has reports or report actions".to_string(),
            ));
        }
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        Ok(state.users.len() < before)
    }

    async fn count_by_role(&self) -> Result<Vec<(UserRole, i64)>> {
        Ok(count(self.lock().users.iter().map(|u| u.role)))
    }
}

#[async_trait]
impl ReportRepository for InMemoryStore {
    async fn create(&self, data: &CreateReport) -> Result<Report> {
        if self.fail_report_insert.swap(false, Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let now = Utc::now();
        let report = Report {
            id: data.id,
            title: data.title.clone(),
            description: data.description.clone(),
            category: data.category,
            address: data.address.clone(),
            rt: data.rt.clone(),
            rw: data.rw.clone(),
            images: data.images.clone(),
            status: ReportStatus::Pending,
            owner_user_id: data.owner_user_id,
            created_at: now,
            updated_at: now,
        };
        self.lock().reports.push(report.clone());
        Ok(report)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReportWithOwner>> {
        let state = self.lock();
        Ok(state
            .reports
            .iter()
            .find(|r| r.id == id)
            .map(|r| ReportWithOwner {
                report: r.clone(),
                owner_name: owner_name(&state, r.owner_user_id),
            }))
    }

    async fn list_by_owner(&self, owner_user_id: Uuid) -> Result<Vec<Report>> {
        Ok(self
            .lock()
            .reports
            .iter()
            .rev()
            .filter(|r| r.owner_user_id == owner_user_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<ReportWithOwner>> {
        let state = self.lock();
        Ok(state
            .reports
            .iter()
            .rev()
            .map(|r| ReportWithOwner {
                report: r.clone(),
                owner_name: owner_name(&state, r.owner_user_id),
            })
            .collect())
    }

    async fn exists_for_owner(&self, owner_user_id: Uuid) -> Result<bool> {
        Ok(self
            .lock()
            .reports
            .iter()
            .any(|r| r.owner_user_id == owner_user_id))
    }

    async fn update_content(
        &self,
        id: Uuid,
        owner_user_id: Uuid,
        data: &UpdateReportContent,
    ) -> Result<Option<Report>> {
        let mut state = self.lock();
        let Some(report) = state.reports.iter_mut().find(|r| {
            r.id == id && r.owner_user_id == owner_user_id && r.status == ReportStatus::Pending
        }) else {
            return Ok(None);
        };
        set(&mut report.title, &data.title);
        set(&mut report.description, &data.description);
        set(&mut report.category, &data.category);
        set(&mut report.address, &data.address);
        set(&mut report.rt, &data.rt);
        set(&mut report.rw, &data.rw);
        report.updated_at = Utc::now();
        Ok(Some(report.clone()))
    }

    async fn update_status_with_action(
        &self,
        id: Uuid,
        status: ReportStatus,
        action: &CreateReportAction,
    ) -> Result<bool> {
        // single lock scope stands in for the transaction
        let mut state = self.lock();
        let now = Utc::now();
        let Some(report) = state.reports.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        report.status = status;
        report.updated_at = now;
        state.actions.push(ReportAction {
            id: action.id,
            report_id: action.report_id,
            actor_user_id: action.actor_user_id,
            description: action.description.clone(),
            created_at: now,
        });
        Ok(true)
    }

    async fn add_action(&self, action: &CreateReportAction) -> Result<bool> {
        let mut state = self.lock();
        let now = Utc::now();
        let Some(report) = state.reports.iter_mut().find(|r| r.id == action.report_id) else {
            return Ok(false);
        };
        report.updated_at = now;
        state.actions.push(ReportAction {
            id: action.id,
            report_id: action.report_id,
            actor_user_id: action.actor_user_id,
            description: action.description.clone(),
            created_at: now,
        });
        Ok(true)
    }

    async fn list_actions(&self, report_id: Uuid) -> Result<Vec<ReportActionWithActor>> {
        let state = self.lock();
        Ok(state
            .actions
            .iter()
            .filter(|a| a.report_id == report_id)
            .map(|a| ReportActionWithActor {
                action: a.clone(),
                actor_name: owner_name(&state, a.actor_user_id),
            })
            .collect())
    }

    async fn count_by_status(&self) -> Result<Vec<(ReportStatus, i64)>> {
        Ok(count(self.lock().reports.iter().map(|r| r.status)))
    }
}

#[async_trait]
impl ArticleRepository for InMemoryStore {
    async fn create(&self, data: &CreateArticle) -> Result<Article> {
        let now = Utc::now();
        let article = Article {
            id: data.id,
            title: data.title.clone(),
            content: data.content.clone(),
            author: data.author.clone(),
            image: data.image.clone(),
            status: ArticleStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.lock().articles.push(article.clone());
        Ok(article)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>> {
        Ok(self.lock().articles.iter().find(|a| a.id == id).cloned())
    }

    async fn list(&self, status: Option<ArticleStatus>) -> Result<Vec<Article>> {
        Ok(self
            .lock()
            .articles
            .iter()
            .rev()
            .filter(|a| status.is_none_or(|s| a.status == s))
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, data: &UpdateArticle) -> Result<Option<Article>> {
        let mut state = self.lock();
        let Some(article) = state.articles.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        set(&mut article.title, &data.title);
        set(&mut article.content, &data.content);
        set(&mut article.author, &data.author);
        article.updated_at = Utc::now();
        Ok(Some(article.clone()))
    }

    async fn update_status(&self, id: Uuid, status: ArticleStatus) -> Result<Option<Article>> {
        let mut state = self.lock();
        let Some(article) = state.articles.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        article.status = status;
        article.updated_at = Utc::now();
        Ok(Some(article.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut state = self.lock();
        let before = state.articles.len();
        state.articles.retain(|a| a.id != id);
        Ok(state.articles.len() < before)
    }

    async fn count_by_status(&self) -> Result<Vec<(ArticleStatus, i64)>> {
        Ok(count(self.lock().articles.iter().map(|a| a.status)))
    }
}

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".to_string(),
        jwt_expires_in: Duration::from_secs(3600),
        jwt_leeway: Duration::from_secs(0),
    }
}

/// Fresh empty directory under the system temp dir
pub fn temp_upload_dir() -> PathBuf {
    std::env::temp_dir().join(format!("laporwarga-test-{}", Uuid::new_v4()))
}

pub fn new_user(full_name: &str, email: &str, role: UserRole) -> NewUser {
    NewUser {
        full_name: full_name.to_string(),
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
        phone_number: None,
        address: None,
        rt: None,
        rw: None,
        role,
    }
}

/// Services wired to one in-memory store and a temp upload directory
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub services: AppServices,
    pub upload_dir: PathBuf,
}

impl TestContext {
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let upload_dir = temp_upload_dir();
        let storage = LocalDiskStorage::new(&upload_dir)
            .await
            .expect("create temp upload dir");

        let repositories = Repositories {
            users: store.clone(),
            reports: store.clone(),
            articles: store.clone(),
        };
        let services = AppServices::new(
            repositories,
            Arc::new(storage),
            &auth_config(),
            TEST_BASE_URL,
        );

        Self {
            store,
            services,
            upload_dir,
        }
    }

    pub async fn create_user(&self, full_name: &str, role: UserRole) -> AuthenticatedUser {
        let email = format!(
            "{}.{}",
            Uuid::new_v4().simple(),
            SafeEmail().fake::<String>()
        );
        let user = self
            .services
            .users
            .create_user(new_user(full_name, &email, role))
            .await
            .expect("create test user");
        AuthenticatedUser::from(&user)
    }

    /// Bearer token for an existing user
    pub async fn token_for(&self, user: &AuthenticatedUser) -> String {
        let user = self
            .services
            .users
            .get_user(user.id)
            .await
            .expect("load test user");
        TokenService::new(&auth_config())
            .issue(&user)
            .expect("issue test token")
            .access_token
    }

    pub fn uploaded_file_count(&self) -> usize {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub fn server(&self) -> TestServer {
        let router = build_router(
            &self.services,
            RouterOptions {
                upload_dir: self.upload_dir.clone(),
                max_body_size: 30 * 1024 * 1024,
            },
        );
        TestServer::new(router).expect("start test server")
    }
}
