use sea_orm::{QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseDraft, ResultEngine, expenses,
    util::{today, validate_amount, validate_description},
};

use super::Engine;

const EXPENSE: &str = "Expense";

impl Engine {
    /// Validate and store a new expense, returning it with its generated id.
    pub async fn insert(&self, draft: ExpenseDraft) -> ResultEngine<Expense> {
        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            description: validate_description(&draft.description)?,
            amount: validate_amount(draft.amount)?,
            date: draft.date.unwrap_or_else(today),
        };

        let model = expenses::ActiveModel::from(&expense)
            .insert(&self.database)
            .await?;
        tracing::debug!("stored expense {}", model.id);

        Ok(model.into())
    }

    /// Every stored expense, oldest date first.
    pub async fn list_all(&self) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .order_by_asc(expenses::Column::Date)
            .order_by_asc(expenses::Column::Id)
            .all(&self.database)
            .await?;

        Ok(models.into_iter().map(Expense::from).collect())
    }

    pub async fn get(&self, id: &str) -> ResultEngine<Expense> {
        expenses::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .map(Expense::from)
            .ok_or_else(|| EngineError::KeyNotFound(EXPENSE.to_string()))
    }

    /// Remove an expense. Deleting a missing id is `KeyNotFound`, every time.
    pub async fn delete(&self, id: &str) -> ResultEngine<()> {
        let result = expenses::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(EXPENSE.to_string()));
        }
        tracing::debug!("deleted expense {id}");

        Ok(())
    }
}
