// Entity Models
//
// Each entity keeps its own state behind a narrow API:
// - Transaction: immutable record of one balance change
// - Account: balance, history, and the shared transaction algorithm
// - Customer: identity plus references to owned accounts

pub mod account;
pub mod customer;
pub mod transaction;

pub use account::{Account, AccountKind, AccountType};
pub use customer::Customer;
pub use transaction::{Transaction, TransactionType};
