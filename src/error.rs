// Error taxonomy for the banking core
// Every validation failure surfaces to the caller as a typed error;
// nothing is swallowed or retried inside the core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    /// Bad construction or update data (empty names, malformed email,
    /// duplicate email, negative opening balance)
    #[error("Invalid account data: {0}")]
    InvalidAccount(String),

    /// Non-positive amount, inactive account, same-account transfer,
    /// or an operation applied to the wrong account type
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Withdrawal rejected by the account's policy
    #[error("Insufficient funds: requested ${requested:.2}, available ${available:.2}")]
    InsufficientFunds { requested: f64, available: f64 },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Customer not found: {0}")]
    CustomerNotFound(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
