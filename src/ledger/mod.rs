//! Receivables derived from invoices and payments: party ledgers, payment
//! status, aging and sales totals

pub mod aging;
pub mod statement;
pub mod status;
pub mod summary;

pub use aging::*;
pub use statement::*;
pub use status::*;
pub use summary::*;
