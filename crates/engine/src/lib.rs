//! Expense tracking domain and persistence.
//!
//! The domain core is made of the [`Money`] and [`ExpenseId`] value objects,
//! the [`Expense`] entity and the [`ExpenseBuilder`]. None of them performs
//! I/O; [`Engine`] wires them to the `expenses` table.

pub use builder::ExpenseBuilder;
pub use category::ExpenseCategory;
pub use commands::{CreateExpenseCmd, UpdateExpenseCmd};
pub use currency::Currency;
pub use error::{EngineError, ValidationError, ValidationErrors};
pub use expense_id::ExpenseId;
pub use expenses::{
    Expense, ExpenseProps, ExpenseRecord, MAX_DESCRIPTION_LENGTH, validate_description,
};
pub use money::Money;
pub use ops::{Engine, EngineBuilder, ExpenseListFilter, ExpensePage, Pagination};

mod builder;
mod category;
mod commands;
mod currency;
mod error;
mod expense_id;
pub mod expenses;
mod money;
mod ops;

type ResultEngine<T> = Result<T, EngineError>;
