//! Fluent assembly of [`Expense`] values.
//!
//! The builder only checks that the required fields are present; business
//! rules stay in [`Expense::create`]. `build` therefore fails in one of two
//! ways: a list of "is required" errors when fields are missing, or the
//! entity's own validation errors once everything is present.

use chrono::{DateTime, Utc};

use crate::{
    Currency, Expense, ExpenseCategory, ExpenseId, ExpenseProps, Money, ValidationError,
    ValidationErrors,
};

/// Single-use builder for [`Expense`].
///
/// ```rust
/// use chrono::{Duration, Utc};
/// use engine::{Currency, ExpenseBuilder, ExpenseCategory};
///
/// let expense = ExpenseBuilder::new()
///     .with_description("Lunch")
///     .with_amount(25.555, Currency::Usd)
///     .with_category(ExpenseCategory::Food)
///     .with_expense_date(Utc::now() - Duration::days(1))
///     .build()
///     .unwrap();
///
/// assert_eq!(expense.amount().amount(), 25.56);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExpenseBuilder {
    id: Option<ExpenseId>,
    description: Option<String>,
    amount: Option<Money>,
    category: ExpenseCategory,
    expense_date: Option<DateTime<Utc>>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl ExpenseBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep an existing identifier (reconstruction from storage).
    #[must_use]
    pub fn with_id(mut self, id: ExpenseId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the amount from a raw decimal value.
    ///
    /// An amount [`Money::new`] rejects is dropped and the previous value (if
    /// any) is kept, so a missing amount is what `build` reports.
    #[must_use]
    pub fn with_amount(mut self, value: f64, currency: Currency) -> Self {
        if let Ok(money) = Money::new(value, currency) {
            self.amount = Some(money);
        }
        self
    }

    #[must_use]
    pub fn with_money(mut self, money: Money) -> Self {
        self.amount = Some(money);
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: ExpenseCategory) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_expense_date(mut self, expense_date: DateTime<Utc>) -> Self {
        self.expense_date = Some(expense_date);
        self
    }

    /// Defaults to the build time.
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Defaults to the build time.
    #[must_use]
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    pub fn build(self) -> Result<Expense, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.description.is_none() {
            errors.push(ValidationError::new("description", "Description is required"));
        }
        if self.amount.is_none() {
            errors.push(ValidationError::new("amount", "Amount is required"));
        }
        if self.expense_date.is_none() {
            errors.push(ValidationError::new("expenseDate", "Expense date is required"));
        }

        let (Some(description), Some(amount), Some(expense_date)) =
            (self.description, self.amount, self.expense_date)
        else {
            return Err(errors);
        };

        let now = Utc::now();
        Expense::create(ExpenseProps {
            id: self.id.unwrap_or_else(ExpenseId::generate),
            description,
            amount,
            category: self.category,
            expense_date,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        })
    }
}
