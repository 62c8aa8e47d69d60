use async_trait::async_trait;

use finder_common::error::SubmissionError;
use finder_common::model::{AttachedFile, ResultSet};
use finder_common::search_api::SearchApiClient;

use crate::error::InputError;

/// A query and spreadsheet that passed validation and are ready to send.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub file: AttachedFile,
}

impl SearchRequest {
    /// Checks run before anything leaves the page, in the order the user
    /// sees the notices.
    pub fn validate(query: &str, attachment: Option<&AttachedFile>) -> Result<Self, InputError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(InputError::EmptyQuery);
        }
        let file = attachment.ok_or(InputError::MissingAttachment)?;
        Ok(Self {
            query: query.to_string(),
            file: file.clone(),
        })
    }
}

/// Whatever answers searches for the controller.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<ResultSet, SubmissionError>;
}

#[async_trait]
impl SearchBackend for SearchApiClient {
    async fn search(&self, request: &SearchRequest) -> Result<ResultSet, SubmissionError> {
        SearchApiClient::search(self, &request.query, &request.file).await
    }
}
