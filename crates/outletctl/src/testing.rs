//! Fake catalog service for tests

use async_trait::async_trait;
use outlet_common::Outlet;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::client::{CatalogApi, ClientError};

/// Serves a fixed outlet list (or refuses connections) and scripted answers
pub struct FakeCatalog {
    outlets: Option<Vec<Outlet>>,
    answers: Mutex<VecDeque<Result<String, ClientError>>>,
    questions: Mutex<Vec<String>>,
    fetches: AtomicUsize,
}

impl FakeCatalog {
    pub fn with_outlets(outlets: Vec<Outlet>) -> Self {
        Self {
            outlets: Some(outlets),
            answers: Mutex::new(VecDeque::new()),
            questions: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Every call fails as if outletd were down
    pub fn unreachable() -> Self {
        Self {
            outlets: None,
            ..Self::with_outlets(Vec::new())
        }
    }

    pub fn with_answers(mut self, answers: Vec<Result<String, ClientError>>) -> Self {
        self.answers = Mutex::new(answers.into());
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

fn refused() -> ClientError {
    ClientError::Connection("error sending request: connection refused".to_string())
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn fetch_outlets(&self) -> Result<Vec<Outlet>, ClientError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match &self.outlets {
            Some(outlets) if outlets.is_empty() => Err(ClientError::Api {
                status: 404,
                detail: "No outlets found".to_string(),
            }),
            Some(outlets) => Ok(outlets.clone()),
            None => Err(refused()),
        }
    }

    async fn ask(&self, question: &str) -> Result<String, ClientError> {
        self.questions.lock().unwrap().push(question.to_string());
        if self.outlets.is_none() {
            return Err(refused());
        }
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}
