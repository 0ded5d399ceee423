// 🏦 Account - shared ledger state plus a type-specific policy
//
// Every balance change flows through the fixed deposit/withdraw algorithm
// or a system-initiated fee/interest posting, and each change appends
// exactly one Transaction carrying the resulting balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::transaction::{Transaction, TransactionType};
use crate::error::{LedgerError, LedgerResult};
use crate::policy::{CheckingPolicy, SavingsPolicy};

// ============================================================================
// ACCOUNT TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Savings,
    Checking,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "Savings Account",
            AccountType::Checking => "Checking Account",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ACCOUNT KIND (variant state)
// ============================================================================

/// Type-specific policy and per-cycle counters.
///
/// The shared record in [`Account`] never inspects these directly; the
/// withdrawal/maintenance steps below select behavior by variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AccountKind {
    Savings {
        policy: SavingsPolicy,
        /// Withdrawals made since the last maintenance cycle
        withdrawals_this_month: u32,
    },
    Checking {
        policy: CheckingPolicy,
        overdraft_protection: bool,
        /// Checks written since the last maintenance cycle
        checks_written_this_month: u32,
    },
}

impl AccountKind {
    pub fn savings(policy: SavingsPolicy) -> Self {
        AccountKind::Savings {
            policy,
            withdrawals_this_month: 0,
        }
    }

    pub fn checking(policy: CheckingPolicy, overdraft_protection: bool) -> Self {
        AccountKind::Checking {
            policy,
            overdraft_protection,
            checks_written_this_month: 0,
        }
    }

    pub fn account_type(&self) -> AccountType {
        match self {
            AccountKind::Savings { .. } => AccountType::Savings,
            AccountKind::Checking { .. } => AccountType::Checking,
        }
    }

    pub fn minimum_balance(&self) -> f64 {
        match self {
            AccountKind::Savings { policy, .. } => policy.minimum_balance,
            AccountKind::Checking { policy, .. } => policy.minimum_balance,
        }
    }
}

// ============================================================================
// ACCOUNT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    number: String,
    holder_name: String,
    balance: f64,
    active: bool,
    opened_at: DateTime<Utc>,
    /// Append-only; each entry snapshots the balance it left behind
    history: Vec<Transaction>,
    kind: AccountKind,
    /// Sequence for transaction ids minted by this account
    next_txn_seq: u64,
}

impl Account {
    /// Open an account.
    ///
    /// An opening deposit below the kind's minimum balance is topped up to
    /// the minimum, with the shortfall recorded as its own transaction.
    pub fn open(
        number: String,
        holder_name: &str,
        initial_balance: f64,
        kind: AccountKind,
    ) -> LedgerResult<Self> {
        let holder_name = holder_name.trim();
        if holder_name.is_empty() {
            return Err(LedgerError::InvalidAccount(
                "Account holder name cannot be empty".to_string(),
            ));
        }
        if initial_balance < 0.0 {
            return Err(LedgerError::InvalidAccount(
                "Initial balance cannot be negative".to_string(),
            ));
        }

        let mut account = Account {
            number,
            holder_name: holder_name.to_string(),
            balance: 0.0,
            active: true,
            opened_at: Utc::now(),
            history: Vec::new(),
            kind,
            next_txn_seq: 0,
        };

        if initial_balance > 0.0 {
            account.balance = initial_balance;
            account.record(
                TransactionType::Deposit,
                initial_balance,
                "Initial deposit".to_string(),
            );
        }

        let minimum = account.kind.minimum_balance();
        if account.balance < minimum {
            let shortfall = minimum - account.balance;
            account.balance = minimum;
            account.record(
                TransactionType::Deposit,
                shortfall,
                "Minimum balance requirement deposit".to_string(),
            );
        }

        Ok(account)
    }

    // ========================================================================
    // SHARED TRANSACTION ALGORITHM
    // ========================================================================

    pub fn deposit(&mut self, amount: f64) -> LedgerResult<()> {
        self.validate_amount(amount)?;
        self.apply_deposit(amount, TransactionType::Deposit, "Cash deposit".to_string());
        Ok(())
    }

    pub fn withdraw(&mut self, amount: f64) -> LedgerResult<()> {
        self.validate_amount(amount)?;
        self.validate_withdrawal(amount)?;
        self.apply_withdrawal(
            amount,
            TransactionType::Withdrawal,
            "Cash withdrawal".to_string(),
        );
        Ok(())
    }

    /// Debit half of a transfer; the credit half is a separate mutation on
    /// the counterparty account with no shared rollback.
    pub fn transfer_out(&mut self, amount: f64, to_account: &str) -> LedgerResult<()> {
        self.validate_amount(amount)?;
        self.validate_withdrawal(amount)?;
        self.apply_withdrawal(
            amount,
            TransactionType::TransferOut,
            format!("Transfer to {}", to_account),
        );
        Ok(())
    }

    pub fn transfer_in(&mut self, amount: f64, from_account: &str) -> LedgerResult<()> {
        self.validate_amount(amount)?;
        self.apply_deposit(
            amount,
            TransactionType::TransferIn,
            format!("Transfer from {}", from_account),
        );
        Ok(())
    }

    /// Validated-withdrawal path that also counts the check and names the
    /// payee in the transaction description. Checking accounts only.
    pub fn write_check(&mut self, amount: f64, payee: &str) -> LedgerResult<()> {
        if self.account_type() != AccountType::Checking {
            return Err(LedgerError::InvalidTransaction(
                "Check writing is only available for checking accounts".to_string(),
            ));
        }
        self.validate_amount(amount)?;
        self.validate_withdrawal(amount)?;
        self.apply_withdrawal(
            amount,
            TransactionType::Withdrawal,
            format!("Check written to {}", payee),
        );
        if let AccountKind::Checking {
            checks_written_this_month,
            ..
        } = &mut self.kind
        {
            *checks_written_this_month += 1;
        }
        Ok(())
    }

    /// Shared preconditions for every user-initiated transaction
    fn validate_amount(&self, amount: f64) -> LedgerResult<()> {
        if amount <= 0.0 {
            return Err(LedgerError::InvalidTransaction(
                "Transaction amount must be positive".to_string(),
            ));
        }
        if !self.active {
            return Err(LedgerError::InvalidTransaction(format!(
                "Account {} is not active",
                self.number
            )));
        }
        Ok(())
    }

    fn validate_withdrawal(&self, amount: f64) -> LedgerResult<()> {
        if !self.can_withdraw(amount) {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        Ok(())
    }

    /// Type-specific withdrawal policy.
    ///
    /// Savings: never below the minimum balance; past the free monthly
    /// limit the withdrawal must also leave room for the excess fee.
    /// Checking: any amount down to zero; below zero only with overdraft
    /// protection and within the overdraft limit.
    pub fn can_withdraw(&self, amount: f64) -> bool {
        let balance_after = self.balance - amount;
        match &self.kind {
            AccountKind::Savings {
                policy,
                withdrawals_this_month,
            } => {
                if balance_after < policy.minimum_balance {
                    return false;
                }
                if *withdrawals_this_month < policy.free_withdrawals_per_month {
                    return true;
                }
                balance_after >= policy.minimum_balance + policy.excess_withdrawal_fee
            }
            AccountKind::Checking {
                policy,
                overdraft_protection,
                ..
            } => {
                if balance_after >= 0.0 {
                    return true;
                }
                *overdraft_protection && balance_after.abs() <= policy.overdraft_limit
            }
        }
    }

    fn apply_deposit(&mut self, amount: f64, tx_type: TransactionType, description: String) {
        self.balance += amount;
        self.record(tx_type, amount, description);
    }

    /// Fixed withdrawal step shared by the withdraw/transfer/check paths:
    /// apply the debit, record it, then let the kind post any fee it owes.
    fn apply_withdrawal(&mut self, amount: f64, tx_type: TransactionType, description: String) {
        let balance_before = self.balance;
        self.balance -= amount;
        self.record(tx_type, amount, description);
        self.on_withdrawal_applied(balance_before);
    }

    /// Kind-specific side effects after a withdrawal has been recorded
    fn on_withdrawal_applied(&mut self, balance_before: f64) {
        let balance_after = self.balance;
        let fee = match &mut self.kind {
            AccountKind::Savings {
                policy,
                withdrawals_this_month,
            } => {
                *withdrawals_this_month += 1;
                if *withdrawals_this_month > policy.free_withdrawals_per_month {
                    Some((policy.excess_withdrawal_fee, "Excess withdrawal fee"))
                } else {
                    None
                }
            }
            AccountKind::Checking {
                policy,
                overdraft_protection,
                ..
            } => {
                // The fee is charged once, on the debit that crosses zero
                if *overdraft_protection && balance_before >= 0.0 && balance_after < 0.0 {
                    Some((policy.overdraft_fee, "Overdraft fee"))
                } else {
                    None
                }
            }
        };

        if let Some((amount, description)) = fee {
            self.post_fee(amount, description);
        }
    }

    // ========================================================================
    // SYSTEM POSTINGS & MAINTENANCE
    // ========================================================================

    /// System-initiated debit; skips the user-facing validation path
    fn post_fee(&mut self, amount: f64, description: &str) {
        if amount <= 0.0 {
            return;
        }
        self.balance -= amount;
        self.record(TransactionType::FeeDebit, amount, description.to_string());
    }

    /// System-initiated credit; skips the user-facing validation path
    fn post_interest(&mut self, amount: f64) {
        if amount <= 0.0 {
            return;
        }
        self.balance += amount;
        self.record(
            TransactionType::InterestCredit,
            amount,
            "Monthly interest credit".to_string(),
        );
    }

    /// Monthly cycle: reset the per-cycle counters, assess the maintenance
    /// fee, then credit interest on whatever balance the fee left behind.
    pub fn apply_monthly_maintenance(&mut self) {
        match &mut self.kind {
            AccountKind::Savings {
                withdrawals_this_month,
                ..
            } => *withdrawals_this_month = 0,
            AccountKind::Checking {
                checks_written_this_month,
                ..
            } => *checks_written_this_month = 0,
        }

        match self.kind.clone() {
            AccountKind::Savings { policy, .. } => {
                if self.balance < policy.maintenance_fee_waiver_balance
                    && self.balance >= policy.monthly_maintenance_fee
                {
                    self.post_fee(policy.monthly_maintenance_fee, "Monthly maintenance fee");
                }

                let monthly_interest = self.balance * (policy.annual_interest_rate / 12.0);
                if monthly_interest >= 0.01 {
                    self.post_interest(monthly_interest);
                }
            }
            AccountKind::Checking { policy, .. } => {
                if self.balance < policy.maintenance_fee_waiver_balance {
                    if self.balance >= policy.monthly_maintenance_fee {
                        self.post_fee(policy.monthly_maintenance_fee, "Monthly maintenance fee");
                    } else if self.balance > 0.0 {
                        // Balance cannot cover the full fee; take what is there
                        self.post_fee(self.balance, "Partial monthly maintenance fee");
                    }
                }

                if self.balance > policy.premium_interest_threshold {
                    let monthly_interest = self.balance * (policy.premium_interest_rate / 12.0);
                    if monthly_interest >= 0.01 {
                        self.post_interest(monthly_interest);
                    }
                }
            }
        }
    }

    fn record(&mut self, tx_type: TransactionType, amount: f64, description: String) {
        self.next_txn_seq += 1;
        let id = format!("TXN-{}-{}", self.number, self.next_txn_seq);
        self.history.push(Transaction::new(
            id,
            self.number.clone(),
            tx_type,
            amount,
            description,
            self.balance,
        ));
    }

    // ========================================================================
    // ACTIVATION
    // ========================================================================

    /// Balance-mutating operations fail while inactive; queries still work
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn kind(&self) -> &AccountKind {
        &self.kind
    }

    pub fn account_type(&self) -> AccountType {
        self.kind.account_type()
    }

    pub fn minimum_balance(&self) -> f64 {
        self.kind.minimum_balance()
    }

    pub fn is_overdrawn(&self) -> bool {
        self.balance < 0.0
    }

    /// Independent copy of the full transaction history
    pub fn transaction_history(&self) -> Vec<Transaction> {
        self.history.clone()
    }

    /// Last `count` transactions, oldest first
    pub fn recent_transactions(&self, count: usize) -> Vec<Transaction> {
        let start = self.history.len().saturating_sub(count);
        self.history[start..].to_vec()
    }

    pub fn transaction_count(&self) -> usize {
        self.history.len()
    }

    pub fn last_transaction(&self) -> Option<&Transaction> {
        self.history.last()
    }

    // ========================================================================
    // SAVINGS QUERIES
    // ========================================================================

    pub fn withdrawals_this_month(&self) -> u32 {
        match &self.kind {
            AccountKind::Savings {
                withdrawals_this_month,
                ..
            } => *withdrawals_this_month,
            AccountKind::Checking { .. } => 0,
        }
    }

    pub fn remaining_free_withdrawals(&self) -> u32 {
        match &self.kind {
            AccountKind::Savings {
                policy,
                withdrawals_this_month,
            } => policy
                .free_withdrawals_per_month
                .saturating_sub(*withdrawals_this_month),
            AccountKind::Checking { .. } => 0,
        }
    }

    // ========================================================================
    // CHECKING QUERIES
    // ========================================================================

    pub fn overdraft_protection_enabled(&self) -> bool {
        matches!(
            self.kind,
            AccountKind::Checking {
                overdraft_protection: true,
                ..
            }
        )
    }

    pub fn set_overdraft_protection(&mut self, enabled: bool) -> LedgerResult<()> {
        match &mut self.kind {
            AccountKind::Checking {
                overdraft_protection,
                ..
            } => {
                *overdraft_protection = enabled;
                Ok(())
            }
            AccountKind::Savings { .. } => Err(LedgerError::InvalidTransaction(
                "Overdraft protection is only available for checking accounts".to_string(),
            )),
        }
    }

    /// Overdraft headroom still available: the full limit while the balance
    /// is non-negative, the unused remainder while overdrawn, zero without
    /// protection (or on savings accounts).
    pub fn available_overdraft(&self) -> f64 {
        match &self.kind {
            AccountKind::Checking {
                policy,
                overdraft_protection: true,
                ..
            } => {
                if self.balance >= 0.0 {
                    policy.overdraft_limit
                } else {
                    (policy.overdraft_limit + self.balance).max(0.0)
                }
            }
            _ => 0.0,
        }
    }

    pub fn checks_written_this_month(&self) -> u32 {
        match &self.kind {
            AccountKind::Checking {
                checks_written_this_month,
                ..
            } => *checks_written_this_month,
            AccountKind::Savings { .. } => 0,
        }
    }

    // ========================================================================
    // REPORTING
    // ========================================================================

    /// Multi-line account report with kind-specific detail
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Account Summary ===\n");
        out.push_str(&format!("Account Number: {}\n", self.number));
        out.push_str(&format!("Account Type: {}\n", self.account_type()));
        out.push_str(&format!("Account Holder: {}\n", self.holder_name));
        out.push_str(&format!("Current Balance: ${:.2}\n", self.balance));
        out.push_str(&format!("Minimum Balance: ${:.2}\n", self.minimum_balance()));
        out.push_str(&format!(
            "Account Status: {}\n",
            if self.active { "Active" } else { "Inactive" }
        ));
        out.push_str(&format!(
            "Date Opened: {}\n",
            self.opened_at.format("%Y-%m-%d")
        ));
        out.push_str(&format!("Total Transactions: {}\n", self.history.len()));

        match &self.kind {
            AccountKind::Savings {
                policy,
                withdrawals_this_month,
            } => {
                out.push_str(&format!(
                    "Interest Rate: {:.2}% annually\n",
                    policy.annual_interest_rate * 100.0
                ));
                out.push_str(&format!(
                    "Monthly Maintenance Fee: ${:.2}\n",
                    policy.monthly_maintenance_fee
                ));
                out.push_str(&format!(
                    "Fee Waiver Balance: ${:.2}\n",
                    policy.maintenance_fee_waiver_balance
                ));
                out.push_str(&format!(
                    "Withdrawals This Month: {}\n",
                    withdrawals_this_month
                ));
                out.push_str(&format!(
                    "Free Withdrawals Remaining: {}\n",
                    self.remaining_free_withdrawals()
                ));
            }
            AccountKind::Checking {
                policy,
                overdraft_protection,
                checks_written_this_month,
            } => {
                out.push_str(&format!(
                    "Overdraft Protection: {}\n",
                    if *overdraft_protection {
                        "Enabled"
                    } else {
                        "Disabled"
                    }
                ));
                if *overdraft_protection {
                    out.push_str(&format!("Overdraft Limit: ${:.2}\n", policy.overdraft_limit));
                    out.push_str(&format!(
                        "Available Overdraft: ${:.2}\n",
                        self.available_overdraft()
                    ));
                    out.push_str(&format!("Overdraft Fee: ${:.2}\n", policy.overdraft_fee));
                }
                out.push_str(&format!(
                    "Monthly Maintenance Fee: ${:.2}\n",
                    policy.monthly_maintenance_fee
                ));
                out.push_str(&format!(
                    "Fee Waiver Balance: ${:.2}\n",
                    policy.maintenance_fee_waiver_balance
                ));
                out.push_str(&format!(
                    "Checks Written This Month: {}\n",
                    checks_written_this_month
                ));
                if self.is_overdrawn() {
                    out.push_str(&format!(
                        "*** ACCOUNT OVERDRAWN BY ${:.2} ***\n",
                        self.balance.abs()
                    ));
                }
            }
        }

        out
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Account: {} | Type: {} | Holder: {} | Balance: ${:.2} | Status: {}",
            self.number,
            self.account_type(),
            self.holder_name,
            self.balance,
            if self.active { "Active" } else { "Inactive" }
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn savings(initial: f64) -> Account {
        Account::open(
            "100001".to_string(),
            "Test Holder",
            initial,
            AccountKind::savings(SavingsPolicy::default()),
        )
        .unwrap()
    }

    fn checking(initial: f64, overdraft_protection: bool) -> Account {
        Account::open(
            "100002".to_string(),
            "Test Holder",
            initial,
            AccountKind::checking(CheckingPolicy::default(), overdraft_protection),
        )
        .unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {} to be close to {}",
            actual,
            expected
        );
    }

    // ========================================================================
    // OPENING
    // ========================================================================

    #[test]
    fn test_open_rejects_blank_holder_name() {
        let result = Account::open(
            "100001".to_string(),
            "   ",
            500.0,
            AccountKind::savings(SavingsPolicy::default()),
        );
        assert!(matches!(result, Err(LedgerError::InvalidAccount(_))));
    }

    #[test]
    fn test_open_rejects_negative_initial_balance() {
        let result = Account::open(
            "100001".to_string(),
            "Test Holder",
            -1.0,
            AccountKind::savings(SavingsPolicy::default()),
        );
        assert!(matches!(result, Err(LedgerError::InvalidAccount(_))));
    }

    #[test]
    fn test_open_records_initial_deposit() {
        let account = savings(500.0);
        assert_eq!(account.balance(), 500.0);
        assert_eq!(account.transaction_count(), 1);

        let history = account.transaction_history();
        assert_eq!(history[0].transaction_type, TransactionType::Deposit);
        assert_eq!(history[0].amount, 500.0);
        assert_eq!(history[0].description, "Initial deposit");
        assert_eq!(history[0].balance_after, 500.0);
    }

    #[test]
    fn test_open_checking_below_minimum_tops_up() {
        // Opening with $10 against a $25 minimum: both the deposit and the
        // $15 shortfall are recorded, and the account opens at the minimum
        let account = checking(10.0, true);
        assert_eq!(account.balance(), 25.0);

        let history = account.transaction_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].amount, 10.0);
        assert_eq!(history[0].balance_after, 10.0);
        assert_eq!(history[1].amount, 15.0);
        assert_eq!(history[1].description, "Minimum balance requirement deposit");
        assert_eq!(history[1].balance_after, 25.0);
    }

    #[test]
    fn test_open_savings_below_minimum_tops_up() {
        let account = savings(40.0);
        assert_eq!(account.balance(), 100.0);
        assert_eq!(account.transaction_count(), 2);
        assert_eq!(
            account.last_transaction().unwrap().description,
            "Minimum balance requirement deposit"
        );
    }

    #[test]
    fn test_open_with_zero_initial_records_only_top_up() {
        let account = savings(0.0);
        assert_eq!(account.balance(), 100.0);

        let history = account.transaction_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount, 100.0);
        assert_eq!(history[0].description, "Minimum balance requirement deposit");
    }

    // ========================================================================
    // DEPOSIT / WITHDRAW
    // ========================================================================

    #[test]
    fn test_deposit_updates_balance_and_history() {
        let mut account = savings(500.0);
        account.deposit(150.0).unwrap();

        assert_eq!(account.balance(), 650.0);
        let last = account.last_transaction().unwrap();
        assert_eq!(last.transaction_type, TransactionType::Deposit);
        assert_eq!(last.amount, 150.0);
        assert_eq!(last.description, "Cash deposit");
        assert_eq!(last.balance_after, 650.0);
    }

    #[test]
    fn test_non_positive_amounts_fail_and_change_nothing() {
        let mut account = savings(500.0);
        let before = account.transaction_count();

        for amount in [0.0, -25.0] {
            assert!(matches!(
                account.deposit(amount),
                Err(LedgerError::InvalidTransaction(_))
            ));
            assert!(matches!(
                account.withdraw(amount),
                Err(LedgerError::InvalidTransaction(_))
            ));
        }

        assert_eq!(account.balance(), 500.0);
        assert_eq!(account.transaction_count(), before);
    }

    #[test]
    fn test_inactive_account_rejects_mutations_but_answers_queries() {
        let mut account = savings(500.0);
        account.deactivate();
        assert!(!account.is_active());

        assert!(matches!(
            account.deposit(10.0),
            Err(LedgerError::InvalidTransaction(_))
        ));
        assert!(matches!(
            account.withdraw(10.0),
            Err(LedgerError::InvalidTransaction(_))
        ));
        assert_eq!(account.balance(), 500.0);
        assert_eq!(account.transaction_count(), 1);

        account.activate();
        account.deposit(10.0).unwrap();
        assert_eq!(account.balance(), 510.0);
    }

    #[test]
    fn test_withdraw_happy_path() {
        let mut account = savings(500.0);
        account.withdraw(200.0).unwrap();

        assert_eq!(account.balance(), 300.0);
        let last = account.last_transaction().unwrap();
        assert_eq!(last.transaction_type, TransactionType::Withdrawal);
        assert_eq!(last.description, "Cash withdrawal");
        assert_eq!(account.withdrawals_this_month(), 1);
        assert_eq!(account.remaining_free_withdrawals(), 5);
    }

    #[test]
    fn test_savings_minimum_balance_guard() {
        // Below-minimum results fail regardless of the withdrawal count
        let mut account = savings(150.0);
        let err = account.withdraw(51.0).unwrap_err();
        match err {
            LedgerError::InsufficientFunds {
                requested,
                available,
            } => {
                assert_eq!(requested, 51.0);
                assert_eq!(available, 150.0);
            }
            other => panic!("expected InsufficientFunds, got {:?}", other),
        }
        assert_eq!(account.balance(), 150.0);

        // Down to exactly the minimum is allowed
        account.withdraw(50.0).unwrap();
        assert_eq!(account.balance(), 100.0);
    }

    #[test]
    fn test_savings_seventh_withdrawal_posts_fee_after_withdrawal() {
        let mut account = savings(1000.0);
        for _ in 0..6 {
            account.withdraw(10.0).unwrap();
        }
        assert_eq!(account.remaining_free_withdrawals(), 0);
        let count_before = account.transaction_count();

        account.withdraw(10.0).unwrap();

        let history = account.transaction_history();
        assert_eq!(history.len(), count_before + 2);
        // Withdrawal first, fee after it
        assert_eq!(
            history[count_before].transaction_type,
            TransactionType::Withdrawal
        );
        assert_eq!(
            history[count_before + 1].transaction_type,
            TransactionType::FeeDebit
        );
        assert_eq!(history[count_before + 1].amount, 2.0);
        assert_eq!(
            history[count_before + 1].description,
            "Excess withdrawal fee"
        );
        // 1000 - 7 * 10 - 2.00 fee
        assert_eq!(account.balance(), 928.0);
    }

    #[test]
    fn test_savings_excess_withdrawal_must_leave_room_for_fee() {
        let mut account = savings(1000.0);
        for _ in 0..6 {
            account.withdraw(100.0).unwrap();
        }
        // Balance 400; taking 299 would leave 101, too tight for the $2 fee
        assert!(matches!(
            account.withdraw(299.0),
            Err(LedgerError::InsufficientFunds { .. })
        ));

        // Leaving exactly minimum + fee is allowed
        account.withdraw(298.0).unwrap();
        assert_eq!(account.balance(), 100.0);
    }

    #[test]
    fn test_checking_overdraft_crossing_posts_fee() {
        let mut account = checking(50.0, true);
        account.withdraw(100.0).unwrap();

        // 50 - 100 - 35 overdraft fee
        assert_eq!(account.balance(), -85.0);
        assert!(account.is_overdrawn());

        let history = account.transaction_history();
        let fee = history.last().unwrap();
        assert_eq!(fee.transaction_type, TransactionType::FeeDebit);
        assert_eq!(fee.amount, 35.0);
        assert_eq!(fee.description, "Overdraft fee");
    }

    #[test]
    fn test_checking_without_protection_rejects_overdraft() {
        let mut account = checking(50.0, false);
        assert!(matches!(
            account.withdraw(100.0),
            Err(LedgerError::InsufficientFunds { .. })
        ));
        assert_eq!(account.balance(), 50.0);
    }

    #[test]
    fn test_checking_overdraft_limit_is_enforced() {
        let mut account = checking(25.0, true);
        account.withdraw(25.0).unwrap();
        assert_eq!(account.balance(), 0.0);

        // 600 past a zero balance exceeds the 500 limit even with protection
        assert!(matches!(
            account.withdraw(600.0),
            Err(LedgerError::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn test_overdraft_fee_charged_only_on_the_crossing_debit() {
        let mut account = checking(50.0, true);
        account.withdraw(100.0).unwrap();
        assert_eq!(account.balance(), -85.0);

        // Already negative: a further withdrawal inside the limit adds no fee
        account.withdraw(15.0).unwrap();
        assert_eq!(account.balance(), -100.0);
        assert_eq!(
            account.last_transaction().unwrap().transaction_type,
            TransactionType::Withdrawal
        );
    }

    #[test]
    fn test_write_check_counts_and_names_the_payee() {
        let mut account = checking(500.0, true);
        account.write_check(120.0, "Electric Co").unwrap();

        assert_eq!(account.balance(), 380.0);
        assert_eq!(account.checks_written_this_month(), 1);
        let last = account.last_transaction().unwrap();
        assert_eq!(last.transaction_type, TransactionType::Withdrawal);
        assert_eq!(last.description, "Check written to Electric Co");
    }

    #[test]
    fn test_write_check_is_checking_only() {
        let mut account = savings(500.0);
        assert!(matches!(
            account.write_check(50.0, "Anyone"),
            Err(LedgerError::InvalidTransaction(_))
        ));
        assert_eq!(account.balance(), 500.0);
        assert_eq!(account.transaction_count(), 1);
    }

    #[test]
    fn test_write_check_respects_withdrawal_policy() {
        let mut account = checking(100.0, false);
        assert!(matches!(
            account.write_check(150.0, "Too Much Inc"),
            Err(LedgerError::InsufficientFunds { .. })
        ));
        assert_eq!(account.checks_written_this_month(), 0);
    }

    // ========================================================================
    // TRANSFER HALVES
    // ========================================================================

    #[test]
    fn test_transfer_halves_tag_type_and_counterparty() {
        let mut from = savings(500.0);
        let mut to = checking(100.0, true);

        from.transfer_out(150.0, "100002").unwrap();
        to.transfer_in(150.0, "100001").unwrap();

        let out_tx = from.last_transaction().unwrap();
        assert_eq!(out_tx.transaction_type, TransactionType::TransferOut);
        assert_eq!(out_tx.description, "Transfer to 100002");

        let in_tx = to.last_transaction().unwrap();
        assert_eq!(in_tx.transaction_type, TransactionType::TransferIn);
        assert_eq!(in_tx.description, "Transfer from 100001");

        assert_eq!(from.balance(), 350.0);
        assert_eq!(to.balance(), 250.0);
    }

    #[test]
    fn test_transfer_out_counts_as_a_savings_withdrawal() {
        let mut account = savings(500.0);
        account.transfer_out(50.0, "100002").unwrap();
        assert_eq!(account.withdrawals_this_month(), 1);
    }

    // ========================================================================
    // MONTHLY MAINTENANCE
    // ========================================================================

    #[test]
    fn test_savings_maintenance_above_waiver_credits_interest_only() {
        let mut account = savings(600.0);
        account.apply_monthly_maintenance();

        // No fee above the $500 waiver; 600 * 0.035 / 12 = 1.75 interest
        let last = account.last_transaction().unwrap();
        assert_eq!(last.transaction_type, TransactionType::InterestCredit);
        assert_close(last.amount, 1.75);
        assert_close(account.balance(), 601.75);
    }

    #[test]
    fn test_savings_maintenance_below_waiver_charges_fee_then_interest() {
        let mut account = savings(200.0);
        for _ in 0..3 {
            account.withdraw(10.0).unwrap();
        }
        assert_eq!(account.withdrawals_this_month(), 3);

        account.apply_monthly_maintenance();

        assert_eq!(account.withdrawals_this_month(), 0);
        let history = account.transaction_history();
        let fee = &history[history.len() - 2];
        assert_eq!(fee.transaction_type, TransactionType::FeeDebit);
        assert_eq!(fee.amount, 5.0);
        assert_eq!(fee.description, "Monthly maintenance fee");

        // Interest accrues on the post-fee balance: 165 * 0.035 / 12
        let interest = history.last().unwrap();
        assert_eq!(interest.transaction_type, TransactionType::InterestCredit);
        assert_close(interest.amount, 165.0 * 0.035 / 12.0);
    }

    #[test]
    fn test_savings_maintenance_skips_uncoverable_fee_and_sub_cent_interest() {
        let mut low = Account::open(
            "100003".to_string(),
            "Low Balance",
            0.0,
            AccountKind::savings(SavingsPolicy {
                minimum_balance: 3.0,
                ..SavingsPolicy::default()
            }),
        )
        .unwrap();
        assert_eq!(low.balance(), 3.0);

        let before = low.transaction_count();
        low.apply_monthly_maintenance();

        // 3 < 5 fee, and 3 * 0.035 / 12 < 0.01: nothing posted
        assert_eq!(low.transaction_count(), before);
        assert_eq!(low.balance(), 3.0);
    }

    #[test]
    fn test_checking_maintenance_partial_fee_when_balance_short() {
        let mut account = checking(25.0, true);
        account.withdraw(18.0).unwrap();
        assert_eq!(account.balance(), 7.0);

        account.apply_monthly_maintenance();

        // 7 < 10 full fee: the remaining balance is taken instead
        let fee = account.last_transaction().unwrap();
        assert_eq!(fee.transaction_type, TransactionType::FeeDebit);
        assert_eq!(fee.amount, 7.0);
        assert_eq!(fee.description, "Partial monthly maintenance fee");
        assert_eq!(account.balance(), 0.0);
    }

    #[test]
    fn test_checking_maintenance_no_fee_while_overdrawn() {
        let mut account = checking(50.0, true);
        account.withdraw(100.0).unwrap();
        let before = account.transaction_count();

        account.apply_monthly_maintenance();

        // Negative balance: no fee, no interest
        assert_eq!(account.transaction_count(), before);
        assert_eq!(account.balance(), -85.0);
    }

    #[test]
    fn test_checking_maintenance_premium_interest_above_threshold() {
        let mut account = checking(6000.0, true);
        account.apply_monthly_maintenance();

        // Above the $1000 waiver: no fee. 6000 * 0.001 / 12 = 0.50 interest
        let last = account.last_transaction().unwrap();
        assert_eq!(last.transaction_type, TransactionType::InterestCredit);
        assert_close(last.amount, 0.50);
        assert_close(account.balance(), 6000.50);
    }

    #[test]
    fn test_checking_maintenance_no_premium_interest_at_mid_balance() {
        let mut account = checking(2000.0, true);
        let before = account.transaction_count();
        account.apply_monthly_maintenance();

        // Above waiver, below premium threshold: nothing happens
        assert_eq!(account.transaction_count(), before);
        assert_eq!(account.balance(), 2000.0);
    }

    #[test]
    fn test_checking_maintenance_resets_check_counter() {
        let mut account = checking(2000.0, true);
        account.write_check(10.0, "Payee").unwrap();
        account.write_check(10.0, "Payee").unwrap();
        assert_eq!(account.checks_written_this_month(), 2);

        account.apply_monthly_maintenance();
        assert_eq!(account.checks_written_this_month(), 0);
    }

    // ========================================================================
    // OVERDRAFT QUERIES
    // ========================================================================

    #[test]
    fn test_available_overdraft() {
        let mut account = checking(50.0, true);
        assert_eq!(account.available_overdraft(), 500.0);

        account.withdraw(100.0).unwrap();
        // Overdrawn by 85: 500 - 85 remains
        assert_eq!(account.available_overdraft(), 415.0);

        account.set_overdraft_protection(false).unwrap();
        assert_eq!(account.available_overdraft(), 0.0);

        let savings_account = savings(500.0);
        assert_eq!(savings_account.available_overdraft(), 0.0);
    }

    #[test]
    fn test_set_overdraft_protection_is_checking_only() {
        let mut account = savings(500.0);
        assert!(matches!(
            account.set_overdraft_protection(true),
            Err(LedgerError::InvalidTransaction(_))
        ));
    }

    // ========================================================================
    // HISTORY INVARIANTS
    // ========================================================================

    #[test]
    fn test_balance_always_matches_last_snapshot() {
        let mut account = checking(50.0, true);
        account.deposit(125.0).unwrap();
        account.withdraw(30.0).unwrap();
        account.transfer_in(10.0, "100009").unwrap();
        account.withdraw(200.0).unwrap(); // crosses zero, posts the fee
        account.write_check(5.0, "Payee").unwrap();
        account.apply_monthly_maintenance();

        assert_eq!(
            account.balance(),
            account.last_transaction().unwrap().balance_after
        );
    }

    #[test]
    fn test_recent_transactions_returns_tail_oldest_first() {
        let mut account = savings(500.0);
        account.deposit(1.0).unwrap();
        account.deposit(2.0).unwrap();
        account.deposit(3.0).unwrap();

        let recent = account.recent_transactions(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].amount, 2.0);
        assert_eq!(recent[1].amount, 3.0);

        // Asking for more than exists returns everything
        assert_eq!(account.recent_transactions(100).len(), 4);
    }

    #[test]
    fn test_transaction_ids_are_unique_and_monotonic() {
        let mut account = savings(500.0);
        account.deposit(10.0).unwrap();
        account.withdraw(20.0).unwrap();

        let history = account.transaction_history();
        let ids: Vec<&str> = history.iter().map(|tx| tx.id.as_str()).collect();
        assert_eq!(ids, vec!["TXN-100001-1", "TXN-100001-2", "TXN-100001-3"]);
    }

    #[test]
    fn test_display_one_liner() {
        let account = savings(500.0);
        let line = account.to_string();
        assert!(line.contains("100001"));
        assert!(line.contains("Savings Account"));
        assert!(line.contains("$500.00"));
        assert!(line.contains("Active"));
    }

    #[test]
    fn test_summary_reports_kind_detail() {
        let account = checking(50.0, true);
        let summary = account.summary();
        assert!(summary.contains("=== Account Summary ==="));
        assert!(summary.contains("Checking Account"));
        assert!(summary.contains("Overdraft Protection: Enabled"));
        assert!(summary.contains("Overdraft Limit: $500.00"));

        let summary = savings(500.0).summary();
        assert!(summary.contains("Interest Rate: 3.50% annually"));
        assert!(summary.contains("Free Withdrawals Remaining: 6"));
    }
}
