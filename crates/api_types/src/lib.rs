use serde::{Deserialize, Serialize};

pub mod expense {
    use super::*;

    /// Request body for creating an expense.
    ///
    /// Every field is optional at the serde level so the server can report
    /// all missing or invalid fields at once instead of failing on the first.
    /// `currency` and `category` are validated against the known values,
    /// `expenseDate` is an ISO-8601 timestamp and defaults to the request time.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseNew {
        pub description: Option<String>,
        pub amount: Option<f64>,
        pub currency: Option<String>,
        pub category: Option<String>,
        pub expense_date: Option<String>,
    }

    /// Request body for a partial update; absent fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseUpdate {
        pub description: Option<String>,
        pub amount: Option<f64>,
        pub currency: Option<String>,
        pub category: Option<String>,
        pub expense_date: Option<String>,
    }

    /// Query string of `GET /api/v1/expenses`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseListQuery {
        pub page: Option<u64>,
        pub limit: Option<u64>,
        pub category: Option<String>,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseView {
        pub id: String,
        pub description: String,
        pub amount: f64,
        pub currency: String,
        pub category: String,
        pub expense_date: String,
        pub created_at: String,
        pub updated_at: String,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Pagination {
        pub page: u64,
        pub limit: u64,
        pub total: u64,
        pub total_pages: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub data: Vec<ExpenseView>,
        pub pagination: Pagination,
    }
}

pub mod error {
    use super::*;

    /// One invalid field of a rejected request.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FieldError {
        pub field: String,
        pub message: String,
    }

    /// Body of a 400 response.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ValidationFailed {
        pub error: String,
        pub details: Vec<FieldError>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NotFoundDetails {
        pub resource_type: String,
        pub resource_id: String,
        pub message: String,
    }

    /// Body of a 404 response.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct NotFound {
        pub error: String,
        pub details: NotFoundDetails,
    }

    /// Body of a 500 response.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct InternalError {
        pub error: String,
        pub message: String,
    }
}

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
        pub timestamp: String,
    }
}
