// 🧾 Transaction - immutable record of one balance-affecting event
//
// Created by an Account when it applies a balance change and appended to
// that account's history. Never edited afterwards; the balance snapshot is
// taken at the moment the change applied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// TRANSACTION TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    TransferIn,
    TransferOut,
    InterestCredit,
    FeeDebit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdrawal => "Withdrawal",
            TransactionType::TransferIn => "Transfer In",
            TransactionType::TransferOut => "Transfer Out",
            TransactionType::InterestCredit => "Interest Credit",
            TransactionType::FeeDebit => "Fee Debit",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,

    /// Number of the account whose history owns this record
    pub account_number: String,

    pub transaction_type: TransactionType,

    /// Positive magnitude; direction comes from the type
    pub amount: f64,

    pub timestamp: DateTime<Utc>,

    pub description: String,

    /// Account balance immediately after this transaction applied
    pub balance_after: f64,
}

impl Transaction {
    pub fn new(
        id: String,
        account_number: String,
        transaction_type: TransactionType,
        amount: f64,
        description: String,
        balance_after: f64,
    ) -> Self {
        Transaction {
            id,
            account_number,
            transaction_type,
            amount,
            timestamp: Utc::now(),
            description,
            balance_after,
        }
    }

    /// Did this transaction increase the balance?
    pub fn is_credit(&self) -> bool {
        matches!(
            self.transaction_type,
            TransactionType::Deposit
                | TransactionType::TransferIn
                | TransactionType::InterestCredit
        )
    }

    pub fn is_debit(&self) -> bool {
        !self.is_credit()
    }

    /// Human-readable single-line rendering for statements
    pub fn formatted(&self) -> String {
        format!(
            "{} - {}: ${:.2} (Balance: ${:.2}) [{}]",
            self.timestamp.format("%b %d, %Y %H:%M"),
            self.transaction_type,
            self.amount,
            self.balance_after,
            self.description
        )
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<18} | {:<15} | {:>10.2} | {} | {:>10.2} | {}",
            self.id,
            self.transaction_type,
            self.amount,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.balance_after,
            self.description
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
