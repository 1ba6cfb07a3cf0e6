use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use thiserror::Error;

/// The two artifacts produced for every published post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Markdown,
    Html,
}

impl ArtifactKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Markdown => "md",
            ArtifactKind::Html => "html",
        }
    }
}

impl Display for ArtifactKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Markdown => write!(f, "markdown"),
            ArtifactKind::Html => write!(f, "html"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("failed to publish {kind} artifact to {}", path.display())]
    PublishFailed { path: PathBuf, kind: ArtifactKind },
    #[error("render request failed: {message}")]
    RenderTransport { status: Option<u16>, message: String },
}

impl PublishError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn transport(err: impl Display) -> Self {
        Self::RenderTransport {
            status: None,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PublishError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_failed_message() {
        let err = PublishError::PublishFailed {
            path: PathBuf::from("html/2024/01/02/hello-world.html"),
            kind: ArtifactKind::Html,
        };
        assert_eq!(err.to_string(), "failed to publish html artifact to html/2024/01/02/hello-world.html");
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ArtifactKind::Markdown.extension(), "md");
        assert_eq!(ArtifactKind::Html.extension(), "html");
    }
}
