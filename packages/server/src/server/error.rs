//! HTTP error mapping.
//!
//! Domain errors cross the route boundary as `ApiError`, which picks the
//! status code and renders a `{error, detail}` JSON body. Database and
//! internal errors are logged here and surfaced as an opaque 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::common::AuthError;
use crate::domains::breeding::BreedingError;
use crate::domains::husbandry::HusbandryError;
use crate::domains::stock::StockError;

/// A domain error ready to leave the process as an HTTP response.
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    detail: String,
}

impl ApiError {
    fn new(status: StatusCode, error: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status,
            error,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", detail)
    }

    fn internal(e: impl std::fmt::Display) -> Self {
        tracing::error!(error = %e, "request failed");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "internal server error",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.error,
            "detail": self.detail,
        }));
        (self.status, body).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match &e {
            AuthError::AuthenticationRequired => {
                Self::new(StatusCode::UNAUTHORIZED, "unauthenticated", e.to_string())
            }
            AuthError::PermissionDenied(_) => {
                Self::new(StatusCode::FORBIDDEN, "forbidden", e.to_string())
            }
        }
    }
}

impl From<BreedingError> for ApiError {
    fn from(e: BreedingError) -> Self {
        match &e {
            BreedingError::Validation(_) => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, "validation", e.to_string())
            }
            BreedingError::Sequence(_) => {
                Self::new(StatusCode::CONFLICT, "sequence_violated", e.to_string())
            }
            BreedingError::Conflict(_) => {
                Self::new(StatusCode::CONFLICT, "conflict", e.to_string())
            }
            BreedingError::NotFound(..) => Self::not_found(e.to_string()),
            BreedingError::Database(_) | BreedingError::Internal(_) => Self::internal(e),
        }
    }
}

impl From<StockError> for ApiError {
    fn from(e: StockError) -> Self {
        match &e {
            StockError::NotFound(_) => Self::not_found(e.to_string()),
            StockError::InvalidAmount(_) => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, "validation", e.to_string())
            }
            StockError::InsufficientStock { .. }
            | StockError::BelowMinimum { .. }
            | StockError::WouldBreachMinimum { .. } => {
                Self::new(StatusCode::CONFLICT, "stock_rule", e.to_string())
            }
            StockError::Database(_) => Self::internal(e),
        }
    }
}

impl From<HusbandryError> for ApiError {
    fn from(e: HusbandryError) -> Self {
        match e {
            HusbandryError::Validation(_) => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, "validation", e.to_string())
            }
            HusbandryError::NotFound(..) => Self::not_found(e.to_string()),
            HusbandryError::Stock(stock) => stock.into(),
            HusbandryError::Database(_) | HusbandryError::Internal(_) => Self::internal(e),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::internal(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::breeding::SequenceBlock;

    #[test]
    fn test_validation_maps_to_422() {
        let api: ApiError = BreedingError::Validation("bad input".into()).into();
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api.error, "validation");
    }

    #[test]
    fn test_sequence_block_maps_to_409() {
        let api: ApiError =
            BreedingError::Sequence(SequenceBlock::MissingDiagnosis { sequence: 2 }).into();
        assert_eq!(api.status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_stock_rules_map_to_409() {
        let api: ApiError = StockError::WouldBreachMinimum {
            requested: 991,
            would_leave: 9,
            reserve: 10,
        }
        .into();
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.error, "stock_rule");
    }

    #[test]
    fn test_auth_maps_to_401_and_403() {
        let unauth: ApiError = AuthError::AuthenticationRequired.into();
        assert_eq!(unauth.status, StatusCode::UNAUTHORIZED);

        let forbidden: ApiError = AuthError::PermissionDenied("nope".into()).into();
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_database_errors_stay_opaque() {
        let api: ApiError = BreedingError::Database(sqlx::Error::PoolClosed).into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.detail, "internal server error");
    }
}
