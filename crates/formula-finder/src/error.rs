use finder_common::error::SubmissionError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Problems with the user's input, caught before anything is sent.
///
/// The display text is the notice shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Please enter a search query")]
    EmptyQuery,

    #[error("Please input xlsx or csv file to search in")]
    MissingAttachment,
}
