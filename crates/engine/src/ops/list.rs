use chrono::{DateTime, Utc};
use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{
    Expense, ExpenseCategory, ResultEngine, ValidationError, ValidationErrors, expenses,
};

use super::{Engine, with_tx};

/// Filters for listing expenses.
///
/// `start_date` and `end_date` are both inclusive, in UTC.
#[derive(Clone, Debug, Default)]
pub struct ExpenseListFilter {
    pub category: Option<ExpenseCategory>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

fn validate_list_filter(filter: &ExpenseListFilter) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (filter.start_date, filter.end_date)
        && start > end
    {
        return Err(ValidationError::new(
            "startDate",
            "Start date must not be after end date",
        ));
    }
    Ok(())
}

/// One-based page number plus page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    limit: u64,
}

impl Pagination {
    pub const DEFAULT_LIMIT: u64 = 20;
    pub const MAX_LIMIT: u64 = 100;

    /// Validates `page >= 1` and `1 <= limit <= MAX_LIMIT`.
    ///
    /// The row offset `(page - 1) * limit` must also fit in an `i64`, the
    /// range the database binds offsets with.
    pub fn new(page: u64, limit: u64) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let limit_valid = (1..=Self::MAX_LIMIT).contains(&limit);
        if page == 0 {
            errors.push(ValidationError::new("page", "Page must be a positive integer"));
        } else if limit_valid
            && (page - 1)
                .checked_mul(limit)
                .is_none_or(|offset| offset > i64::MAX as u64)
        {
            errors.push(ValidationError::new("page", "Page is out of range"));
        }
        if !limit_valid {
            errors.push(ValidationError::new(
                "limit",
                format!("Limit must be between 1 and {}", Self::MAX_LIMIT),
            ));
        }
        errors.into_result()?;
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// A page of expenses, newest `expense_date` first.
#[derive(Clone, Debug)]
pub struct ExpensePage {
    pub data: Vec<Expense>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

trait ApplyExpenseFilters: QueryFilter + Sized {
    fn apply_expense_filters(self, filter: &ExpenseListFilter) -> Self;
}

impl<T> ApplyExpenseFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_expense_filters(mut self, filter: &ExpenseListFilter) -> Self {
        if let Some(category) = filter.category {
            self = self.filter(expenses::Column::Category.eq(category.as_str()));
        }
        if let Some(start) = filter.start_date {
            self = self.filter(expenses::Column::ExpenseDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            self = self.filter(expenses::Column::ExpenseDate.lte(end));
        }
        self
    }
}

impl Engine {
    /// Lists expenses matching `filter`, one page at a time.
    ///
    /// Ordering is `(expense_date DESC, id DESC)` so pages are stable.
    pub async fn list_expenses(
        &self,
        filter: &ExpenseListFilter,
        pagination: Pagination,
    ) -> ResultEngine<ExpensePage> {
        validate_list_filter(filter)?;

        with_tx!(self, |db_tx| {
            let query = expenses::Entity::find().apply_expense_filters(filter);
            let total = query.clone().count(&db_tx).await?;

            let models = query
                .order_by_desc(expenses::Column::ExpenseDate)
                .order_by_desc(expenses::Column::Id)
                .offset(pagination.offset())
                .limit(pagination.limit())
                .all(&db_tx)
                .await?;

            let data = models
                .into_iter()
                .map(Expense::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            Ok(ExpensePage {
                data,
                total,
                page: pagination.page(),
                limit: pagination.limit(),
                total_pages: total.div_ceil(pagination.limit()),
            })
        })
    }
}
