//! The module contains the `Expense` type, the single record kept by the
//! engine, and its database model.
use core::fmt;

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};

/// A stored spending event.
#[derive(Clone, Debug, PartialEq)]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
}

/// Fields of an expense before it is stored.
///
/// `date` falls back to the current day on insert.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: f64,
    pub date: Option<NaiveDate>,
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.2} {} ({})",
            self.date, self.amount, self.description, self.id
        )
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub description: String,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub date: NaiveDate,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Expense {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            amount: model.amount,
            date: model.date,
        }
    }
}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.clone()),
            description: ActiveValue::Set(expense.description.clone()),
            amount: ActiveValue::Set(expense.amount),
            date: ActiveValue::Set(expense.date),
        }
    }
}
