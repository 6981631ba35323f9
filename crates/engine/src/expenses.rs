//! Expense entity.
//!
//! An [`Expense`] is immutable: every `update_*` method validates its input
//! and returns a new instance with `updated_at` refreshed, leaving the
//! original untouched. The only way to obtain one is [`Expense::create`]
//! (usually through [`ExpenseBuilder`](crate::ExpenseBuilder)), so every
//! instance satisfies the entity invariants:
//!
//! - the description is non-empty after trimming and at most
//!   [`MAX_DESCRIPTION_LENGTH`] characters;
//! - the expense date is not after the moment it was validated.

use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;

use crate::{
    Currency, EngineError, ExpenseBuilder, ExpenseCategory, ExpenseId, Money, ValidationError,
    ValidationErrors,
};

pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Full field set of an [`Expense`], validated by [`Expense::create`].
#[derive(Clone, Debug)]
pub struct ExpenseProps {
    pub id: ExpenseId,
    pub description: String,
    pub amount: Money,
    pub category: ExpenseCategory,
    pub expense_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct Expense {
    id: ExpenseId,
    description: String,
    amount: Money,
    category: ExpenseCategory,
    expense_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Plain serializable view of an [`Expense`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub currency: String,
    pub category: String,
    pub expense_date: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Expense {
    /// Validates `props` and builds the entity.
    ///
    /// Every rule is checked; the error carries one entry per violated rule.
    pub fn create(props: ExpenseProps) -> Result<Self, ValidationErrors> {
        let description = validate_description(&props.description);
        let expense_date = validate_expense_date(props.expense_date);

        match (description, expense_date) {
            (Ok(description), Ok(())) => Ok(Self {
                id: props.id,
                description,
                amount: props.amount,
                category: props.category,
                expense_date: props.expense_date,
                created_at: props.created_at,
                updated_at: props.updated_at,
            }),
            (description, expense_date) => Err(description
                .err()
                .into_iter()
                .chain(expense_date.err())
                .collect::<Vec<_>>()
                .into()),
        }
    }

    pub fn id(&self) -> &ExpenseId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> &Money {
        &self.amount
    }

    pub fn category(&self) -> ExpenseCategory {
        self.category
    }

    pub fn expense_date(&self) -> DateTime<Utc> {
        self.expense_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns a copy with a new (trimmed) description.
    pub fn update_description(&self, description: &str) -> Result<Self, ValidationError> {
        let description = validate_description(description)?;
        Ok(Self {
            description,
            ..self.touched()
        })
    }

    #[must_use]
    pub fn update_category(&self, category: ExpenseCategory) -> Self {
        Self {
            category,
            ..self.touched()
        }
    }

    #[must_use]
    pub fn update_amount(&self, amount: Money) -> Self {
        Self {
            amount,
            ..self.touched()
        }
    }

    /// Returns a copy with a new expense date, which must not be in the future.
    pub fn update_expense_date(&self, expense_date: DateTime<Utc>) -> Result<Self, ValidationError> {
        validate_expense_date(expense_date)?;
        Ok(Self {
            expense_date,
            ..self.touched()
        })
    }

    pub fn to_record(&self) -> ExpenseRecord {
        ExpenseRecord {
            id: self.id.to_string(),
            description: self.description.clone(),
            amount: self.amount.amount(),
            currency: self.amount.currency().code().to_string(),
            category: self.category.as_str().to_string(),
            expense_date: iso_timestamp(self.expense_date),
            created_at: iso_timestamp(self.created_at),
            updated_at: iso_timestamp(self.updated_at),
        }
    }

    /// Copy of `self` with `updated_at` moved to now; never moves it backwards.
    fn touched(&self) -> Self {
        Self {
            updated_at: Utc::now().max(self.updated_at),
            ..self.clone()
        }
    }
}

/// Entities are equal when their identifiers are.
impl PartialEq for Expense {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Expense {}

/// Trims a description and checks it is non-empty and within
/// [`MAX_DESCRIPTION_LENGTH`] characters.
pub fn validate_description(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("description", "Description is required"));
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::new(
            "description",
            format!("Description must be at most {MAX_DESCRIPTION_LENGTH} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_expense_date(value: DateTime<Utc>) -> Result<(), ValidationError> {
    if value > Utc::now() {
        return Err(ValidationError::new(
            "expenseDate",
            "Expense date cannot be in the future",
        ));
    }
    Ok(())
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub(crate) fn iso_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub description: String,
    pub amount_minor: i64,
    pub currency: String,
    pub category: String,
    pub expense_date: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            description: ActiveValue::Set(expense.description.clone()),
            amount_minor: ActiveValue::Set(expense.amount.minor()),
            currency: ActiveValue::Set(expense.amount.currency().code().to_string()),
            category: ActiveValue::Set(expense.category.as_str().to_string()),
            expense_date: ActiveValue::Set(expense.expense_date),
            created_at: ActiveValue::Set(expense.created_at),
            updated_at: ActiveValue::Set(expense.updated_at),
        }
    }
}

/// Rebuilds an entity from a stored row.
///
/// Rows are re-validated; corrupted data fails with
/// [`EngineError::Validation`] instead of producing an invalid entity.
impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = ExpenseId::parse(&model.id)?;
        let currency = Currency::try_from(model.currency.as_str())?;
        let amount = Money::from_minor(model.amount_minor, currency)?;
        let category = ExpenseCategory::try_from(model.category.as_str())?;

        let expense = ExpenseBuilder::new()
            .with_id(id)
            .with_description(model.description)
            .with_money(amount)
            .with_category(category)
            .with_expense_date(model.expense_date)
            .with_created_at(model.created_at)
            .with_updated_at(model.updated_at)
            .build()?;
        Ok(expense)
    }
}
