use serde::{Deserialize, Serialize};

pub mod expense {
    use super::*;
    use chrono::NaiveDate;

    /// Request body for `POST /expenses`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub description: String,
        pub amount: f64,
        /// Calendar date of the expense (`YYYY-MM-DD`).
        ///
        /// When missing the server uses the current date.
        #[serde(default)]
        pub date: Option<NaiveDate>,
    }

    /// A stored expense as returned by every expense endpoint.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: String,
        pub description: String,
        pub amount: f64,
        pub date: NaiveDate,
    }
}

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
        pub app: String,
    }
}

#[cfg(test)]
mod tests {
    use super::expense::*;

    #[test]
    fn expense_new_date_is_optional() {
        let parsed: ExpenseNew =
            serde_json::from_str(r#"{"description":"Coffee","amount":3.5}"#).unwrap();
        assert_eq!(parsed.description, "Coffee");
        assert_eq!(parsed.amount, 3.5);
        assert!(parsed.date.is_none());
    }

    #[test]
    fn expense_new_accepts_iso_date() {
        let parsed: ExpenseNew =
            serde_json::from_str(r#"{"description":"A","amount":1,"date":"2024-03-09"}"#)
                .unwrap();
        assert_eq!(
            parsed.date,
            chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
        );
    }
}
