//! Storage and receipt parsing for ExpenseBuddy.
//!
//! [`Engine`] is the record store over a SeaORM connection. The
//! [`receipt`] module turns OCR text into an [`ExpenseDraft`].

pub use error::EngineError;
pub use expenses::{Expense, ExpenseDraft};
pub use ops::{Engine, EngineBuilder};
pub use receipt::{ReceiptDraft, extract};

mod error;
mod expenses;
mod ops;
pub mod receipt;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
