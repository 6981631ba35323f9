use api_types::error::{FieldError, InternalError, NotFound, NotFoundDetails, ValidationFailed};
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine::{EngineError, ValidationError, ValidationErrors};

pub use middleware::{CORRELATION_ID_HEADER, CorrelationId};
pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod expenses;
mod middleware;
mod server;
mod validation;

pub mod types {
    pub mod expense {
        pub use api_types::expense::{
            ExpenseListQuery, ExpenseListResponse, ExpenseNew, ExpenseUpdate, ExpenseView,
            Pagination,
        };
    }

    pub mod health {
        pub use api_types::health::Health;
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    /// The request was rejected before reaching the engine.
    Request(ValidationErrors),
}

fn validation_failed(errors: ValidationErrors) -> Response {
    let details = errors
        .into_iter()
        .map(|err| FieldError {
            field: err.field,
            message: err.message,
        })
        .collect();

    (
        StatusCode::BAD_REQUEST,
        Json(ValidationFailed {
            error: "Validation failed".to_string(),
            details,
        }),
    )
        .into_response()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::Request(errors) | ServerError::Engine(EngineError::Validation(errors)) => {
                validation_failed(errors)
            }
            ServerError::Engine(EngineError::NotFound { resource, id }) => {
                let message = format!("{resource} with id '{id}' not found");
                (
                    StatusCode::NOT_FOUND,
                    Json(NotFound {
                        error: "Resource not found".to_string(),
                        details: NotFoundDetails {
                            resource_type: resource.to_string(),
                            resource_id: id,
                            message,
                        },
                    }),
                )
                    .into_response()
            }
            ServerError::Engine(EngineError::Database(db_err)) => {
                tracing::error!("database error: {db_err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(InternalError {
                        error: "Internal server error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<ValidationErrors> for ServerError {
    fn from(value: ValidationErrors) -> Self {
        Self::Request(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Request(ValidationError::new("body", value.body_text()).into())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Request(ValidationError::new("query", value.body_text()).into())
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use sea_orm::DbErr;

    use super::*;

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn engine_validation_maps_to_400_with_details() {
        let errors = ValidationErrors::from(vec![
            ValidationError::new("description", "Description is required"),
            ValidationError::new("amount", "Amount is required"),
        ]);
        let res = ServerError::from(EngineError::Validation(errors)).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body = body_json(res).await;
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"][0]["field"], "description");
        assert_eq!(body["details"][1]["message"], "Amount is required");
    }

    #[tokio::test]
    async fn request_errors_map_to_400() {
        let errors = ValidationErrors::from(ValidationError::new("limit", "too big"));
        let res = ServerError::from(errors).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::NotFound {
            resource: "Expense",
            id: "abc".to_string(),
        })
        .into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body = body_json(res).await;
        assert_eq!(body["error"], "Resource not found");
        assert_eq!(body["details"]["resourceType"], "Expense");
        assert_eq!(body["details"]["resourceId"], "abc");
        assert_eq!(
            body["details"]["message"],
            "Expense with id 'abc' not found"
        );
    }

    #[tokio::test]
    async fn database_error_maps_to_500_without_leaking() {
        let res = ServerError::from(EngineError::Database(DbErr::Custom(
            "disk I/O error".to_string(),
        )))
        .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(res).await;
        assert_eq!(body["error"], "Internal server error");
        assert!(!body.to_string().contains("disk"));
    }
}
