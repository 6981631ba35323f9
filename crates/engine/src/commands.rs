//! Command structs for engine write operations.
//!
//! These types group the raw inputs of create/update so call sites stay
//! readable. Values are validated by the engine, not here.

use chrono::{DateTime, Utc};

use crate::{Currency, ExpenseCategory};

/// Create a new expense.
#[derive(Clone, Debug)]
pub struct CreateExpenseCmd {
    pub description: String,
    pub amount: f64,
    pub currency: Currency,
    pub category: ExpenseCategory,
    pub expense_date: DateTime<Utc>,
}

impl CreateExpenseCmd {
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        currency: Currency,
        expense_date: DateTime<Utc>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            currency,
            category: ExpenseCategory::default(),
            expense_date,
        }
    }

    #[must_use]
    pub fn category(mut self, category: ExpenseCategory) -> Self {
        self.category = category;
        self
    }
}

/// Partial update of an existing expense; `None` leaves a field unchanged.
///
/// `amount` and `currency` may be given independently; the missing half is
/// taken from the stored value.
#[derive(Clone, Debug, Default)]
pub struct UpdateExpenseCmd {
    pub id: String,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<Currency>,
    pub category: Option<ExpenseCategory>,
    pub expense_date: Option<DateTime<Utc>>,
}

impl UpdateExpenseCmd {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    #[must_use]
    pub fn category(mut self, category: ExpenseCategory) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn expense_date(mut self, expense_date: DateTime<Utc>) -> Self {
        self.expense_date = Some(expense_date);
        self
    }

    /// `true` when the command would not change anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.currency.is_none()
            && self.category.is_none()
            && self.expense_date.is_none()
    }
}
