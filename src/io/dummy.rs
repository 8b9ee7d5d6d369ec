use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use log::info;

use crate::io::transport::{AuthenticatedTransport, TransportError};

/// Answers requests from canned responses and remembers what was posted.
#[derive(Default)]
pub struct Dummy {
    responses: HashMap<String, Result<String, u16>>,
    posted: Mutex<Vec<(String, String)>>,
}

impl Dummy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.to_owned(), Ok(body.to_owned()));
        self
    }

    pub fn fail(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_owned(), Err(status));
        self
    }

    /// Every (url, body) posted so far, oldest first.
    pub fn get_posted(&self) -> Vec<(String, String)> {
        match self.posted.lock() {
            Ok(posted) => posted.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn answer(&self, url: &str) -> Result<String, TransportError> {
        match self.responses.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(TransportError::Status {
                status: *status,
                body: "Dummy failure".to_owned(),
            }),
            None => Err(TransportError::Other(format!("No dummy response for {}", url))),
        }
    }
}

#[async_trait]
impl AuthenticatedTransport for Dummy {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        info!("Dummy GET {}", url);
        self.answer(url)
    }

    async fn post(&self, url: &str, body: String) -> Result<String, TransportError> {
        info!("Dummy POST {}: {}", url, body);
        match self.posted.lock() {
            Ok(mut posted) => posted.push((url.to_owned(), body)),
            Err(poisoned) => poisoned.into_inner().push((url.to_owned(), body)),
        }
        self.answer(url)
    }
}
