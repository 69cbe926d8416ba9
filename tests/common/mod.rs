#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use shortlink::api::routes::public_routes;
use shortlink::application::services::Shortener;
use shortlink::domain::entities::ShortLink;
use shortlink::domain::errors::StorageError;
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::persistence::MemoryLinkRepository;
use shortlink::state::AppState;
use shortlink::utils::code_generator::{CodeGenerator, RandomnessError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "http://s.test";

/// Memory-backed state with the default code length and retry budget.
pub fn create_test_state() -> (AppState, Arc<MemoryLinkRepository>) {
    let repo = Arc::new(MemoryLinkRepository::new());
    let shortener = Shortener::new(repo.clone(), BASE_URL, 6, 5);

    (AppState::new(Arc::new(shortener)), repo)
}

pub fn state_with(shortener: Shortener) -> AppState {
    AppState::new(Arc::new(shortener))
}

pub fn test_server(state: AppState) -> TestServer {
    let app: Router = public_routes().with_state(state);
    TestServer::new(app).unwrap()
}

pub fn is_alphanumeric_code(code: &str, length: usize) -> bool {
    code.len() == length && code.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Yields a fixed list of codes, then repeats the last one.
pub struct SequenceGenerator {
    codes: Mutex<VecDeque<String>>,
    last: Mutex<String>,
}

impl SequenceGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            last: Mutex::new(codes.last().copied().unwrap_or("AAAAAA").to_string()),
        }
    }
}

impl CodeGenerator for SequenceGenerator {
    fn generate(&self, _length: usize) -> Result<String, RandomnessError> {
        let next = self.codes.lock().unwrap().pop_front();
        match next {
            Some(code) => {
                *self.last.lock().unwrap() = code.clone();
                Ok(code)
            }
            None => Ok(self.last.lock().unwrap().clone()),
        }
    }
}

/// Storage whose every call fails, as when the backend is unreachable.
pub struct UnreachableRepository;

#[async_trait]
impl LinkRepository for UnreachableRepository {
    async fn create(&self, _code: &str, _original_url: &str) -> Result<(), StorageError> {
        Err(StorageError::backend("connection refused"))
    }

    async fn get_and_touch(&self, _code: &str) -> Result<ShortLink, StorageError> {
        Err(StorageError::backend("connection refused"))
    }

    async fn list(&self) -> Result<Vec<ShortLink>, StorageError> {
        Err(StorageError::backend("connection refused"))
    }

    async fn health_check(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "unreachable"
    }
}
