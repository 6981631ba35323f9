use sea_orm::{TransactionTrait, prelude::*};

use crate::{
    CreateExpenseCmd, EngineError, Expense, ExpenseBuilder, ExpenseId, Money, ResultEngine,
    UpdateExpenseCmd, expenses,
};

use super::{Engine, with_tx};

impl Engine {
    /// Validates and stores a new expense.
    ///
    /// Follows [`ExpenseBuilder::with_amount`]: a non-positive amount is
    /// reported as a missing amount.
    pub async fn create_expense(&self, cmd: CreateExpenseCmd) -> ResultEngine<Expense> {
        let expense = ExpenseBuilder::new()
            .with_description(cmd.description)
            .with_amount(cmd.amount, cmd.currency)
            .with_category(cmd.category)
            .with_expense_date(cmd.expense_date)
            .build()?;

        expenses::ActiveModel::from(&expense)
            .insert(&self.database)
            .await?;

        Ok(expense)
    }

    /// Loads an expense by id.
    pub async fn expense(&self, id: &str) -> ResultEngine<Expense> {
        let id = ExpenseId::parse(id)?;
        let model = expenses::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::expense_not_found(id.as_str()))?;

        Expense::try_from(model)
    }

    /// Applies a partial update and stores the result.
    ///
    /// Fields are applied in order description, category, amount, expense
    /// date; the first invalid one aborts the update and nothing is written.
    pub async fn update_expense(&self, cmd: UpdateExpenseCmd) -> ResultEngine<Expense> {
        let id = ExpenseId::parse(&cmd.id)?;

        with_tx!(self, |db_tx| {
            let model = expenses::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::expense_not_found(id.as_str()))?;
            let mut expense = Expense::try_from(model)?;

            if cmd.is_empty() {
                return Ok(expense);
            }

            if let Some(description) = cmd.description.as_deref() {
                expense = expense.update_description(description)?;
            }
            if let Some(category) = cmd.category {
                expense = expense.update_category(category);
            }
            let current = *expense.amount();
            let amount = match (cmd.amount, cmd.currency) {
                (None, None) => None,
                (Some(value), currency) => Some(Money::new(
                    value,
                    currency.unwrap_or(current.currency()),
                )?),
                (None, Some(currency)) => Some(Money::from_minor(current.minor(), currency)?),
            };
            if let Some(amount) = amount {
                expense = expense.update_amount(amount);
            }
            if let Some(expense_date) = cmd.expense_date {
                expense = expense.update_expense_date(expense_date)?;
            }

            expenses::ActiveModel::from(&expense).update(&db_tx).await?;
            Ok(expense)
        })
    }

    /// Deletes an expense; fails with `NotFound` when nothing was removed.
    pub async fn delete_expense(&self, id: &str) -> ResultEngine<()> {
        let id = ExpenseId::parse(id)?;
        let result = expenses::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::expense_not_found(id.as_str()));
        }
        Ok(())
    }
}
