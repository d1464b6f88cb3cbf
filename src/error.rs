//! Errors for competition operations and their mapping onto HTTP responses.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use uuid::Uuid;

/// Broad category of a [`CompetitionError`], used to pick the response status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Missing or malformed input (400).
    Validation,
    /// Referenced entity absent (404).
    NotFound,
    /// Duplicate name/match or capacity exceeded (400).
    Conflict,
    /// Storage failure or unexpected state (500).
    Internal,
}

/// Errors that can occur during competition operations.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum CompetitionError {
    #[error("{0}")]
    Validation(String),
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: Uuid },
    /// A match that cannot take part in the standings.
    #[error("Invalid match: {0}")]
    InvalidMatch(String),
    /// Round robin needs at least two teams.
    #[error("At least 2 teams are required to generate matches (found {found})")]
    InsufficientTeams { found: usize },
    /// Bracket input of the wrong shape.
    #[error("{0}")]
    InvalidInput(String),
    /// A match between these two teams already exists in this phase.
    #[error("A match between these teams already exists")]
    DuplicateMatch,
    #[error("A team with this name already exists in this competition")]
    DuplicateTeamName,
    #[error("Maximum of {max} teams reached for this competition")]
    TeamLimitReached { max: u32 },
    #[error("Maximum of {max} participants per team")]
    ParticipantLimitReached { max: u32 },
    /// Internal failure; detail is logged, never sent to the client.
    #[error("Internal server error")]
    Internal(String),
}

impl CompetitionError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        CompetitionError::NotFound { entity, id }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        CompetitionError::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        use CompetitionError::*;
        match self {
            Validation(_) | InvalidMatch(_) | InsufficientTeams { .. } | InvalidInput(_) => {
                ErrorKind::Validation
            }
            NotFound { .. } => ErrorKind::NotFound,
            DuplicateMatch
            | DuplicateTeamName
            | TeamLimitReached { .. }
            | ParticipantLimitReached { .. } => ErrorKind::Conflict,
            Internal(_) => ErrorKind::Internal,
        }
    }
}

impl ResponseError for CompetitionError {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::Conflict => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let CompetitionError::Internal(detail) = self {
            log::error!("Internal error: {}", detail);
        }
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}
