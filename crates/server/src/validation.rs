//! Request payload validation.
//!
//! Turns the loosely typed DTOs into engine commands, collecting one
//! [`ValidationError`] per invalid field so the client sees every problem in
//! a single 400 response.

use api_types::expense::{ExpenseListQuery, ExpenseNew, ExpenseUpdate};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use engine::{
    CreateExpenseCmd, Currency, ExpenseCategory, ExpenseListFilter, Money, Pagination,
    UpdateExpenseCmd, ValidationError, ValidationErrors, validate_description,
};

pub fn expense_new(
    payload: ExpenseNew,
    now: DateTime<Utc>,
) -> Result<CreateExpenseCmd, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let description = match payload.description {
        Some(description) => check(validate_description(&description), &mut errors),
        None => missing("description", "Description is required", &mut errors),
    };
    let amount = match payload.amount {
        Some(amount) => check(request_amount(amount), &mut errors),
        None => missing("amount", "Amount is required", &mut errors),
    };
    let currency = match payload.currency.as_deref() {
        Some(currency) => check(request_currency(currency), &mut errors),
        None => missing("currency", "Currency is required", &mut errors),
    };
    let category = match payload.category.as_deref() {
        Some(category) => check(ExpenseCategory::try_from(category), &mut errors),
        None => Some(ExpenseCategory::default()),
    };
    let expense_date = match payload.expense_date.as_deref() {
        Some(date) => check(timestamp("expenseDate", date, false), &mut errors),
        None => Some(now),
    };

    let (Some(description), Some(amount), Some(currency), Some(category), Some(expense_date)) =
        (description, amount, currency, category, expense_date)
    else {
        return Err(errors);
    };

    Ok(CreateExpenseCmd::new(description, amount, currency, expense_date).category(category))
}

pub fn expense_update(
    id: String,
    payload: ExpenseUpdate,
) -> Result<UpdateExpenseCmd, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut cmd = UpdateExpenseCmd::new(id);

    if let Some(description) = payload.description.as_deref() {
        cmd.description = check(validate_description(description), &mut errors);
    }
    if let Some(amount) = payload.amount {
        cmd.amount = check(request_amount(amount), &mut errors);
    }
    if let Some(currency) = payload.currency.as_deref() {
        cmd.currency = check(request_currency(currency), &mut errors);
    }
    if let Some(category) = payload.category.as_deref() {
        cmd.category = check(ExpenseCategory::try_from(category), &mut errors);
    }
    if let Some(date) = payload.expense_date.as_deref() {
        cmd.expense_date = check(timestamp("expenseDate", date, false), &mut errors);
    }

    errors.into_result()?;
    Ok(cmd)
}

pub fn expense_list(
    query: ExpenseListQuery,
) -> Result<(ExpenseListFilter, Pagination), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let pagination = Pagination::new(
        query.page.unwrap_or(1),
        query.limit.unwrap_or(Pagination::DEFAULT_LIMIT),
    )
    .map_err(|pagination_errors| {
        for error in pagination_errors {
            errors.push(error);
        }
    })
    .ok();

    let mut filter = ExpenseListFilter::default();
    if let Some(category) = query.category.as_deref() {
        filter.category = check(ExpenseCategory::try_from(category), &mut errors);
    }
    if let Some(start) = query.start_date.as_deref() {
        filter.start_date = check(timestamp("startDate", start, false), &mut errors);
    }
    if let Some(end) = query.end_date.as_deref() {
        filter.end_date = check(timestamp("endDate", end, true), &mut errors);
    }

    match pagination {
        Some(pagination) if errors.is_empty() => Ok((filter, pagination)),
        _ => Err(errors),
    }
}

fn check<T>(result: Result<T, ValidationError>, errors: &mut ValidationErrors) -> Option<T> {
    result.map_err(|err| errors.push(err)).ok()
}

fn missing<T>(field: &str, message: &str, errors: &mut ValidationErrors) -> Option<T> {
    errors.push(ValidationError::new(field, message));
    None
}

/// Runs the money rules up front, so an amount that rounds to zero minor
/// units is reported as such rather than as missing.
fn request_amount(value: f64) -> Result<f64, ValidationError> {
    Money::minor_units(value).map(|_| value)
}

/// Only the exact upper-case codes are accepted on the wire.
fn request_currency(value: &str) -> Result<Currency, ValidationError> {
    Currency::ALL
        .into_iter()
        .find(|currency| currency.code() == value)
        .ok_or_else(|| {
            ValidationError::new("currency", "Currency must be one of: USD, EUR, GBP, JPY")
        })
}

/// Parses an RFC 3339 timestamp or a bare `YYYY-MM-DD` date.
///
/// A bare date means the start of that day in UTC, or its last millisecond
/// when `end_of_day` is set.
fn timestamp(field: &str, value: &str, end_of_day: bool) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ValidationError::new(field, "Must be a valid ISO-8601 date"))?;
    let time = if end_of_day {
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)
    };
    time.map(|time| date.and_time(time).and_utc())
        .ok_or_else(|| ValidationError::new(field, "Must be a valid ISO-8601 date"))
}
