// 🏛️ Banking Service - registry and orchestration
//
// Sole creator of Customer and Account instances. Owns the authoritative
// customerId→Customer and accountNumber→Account maps plus the id
// sequences, and delegates every balance operation to the resolved
// account's own algorithm.

use std::collections::HashMap;

use crate::entities::{Account, AccountKind, AccountType, Customer};
use crate::error::{LedgerError, LedgerResult};
use crate::policy::PolicySet;

/// Customer ids render as "CUST{seq}", starting at CUST1001
const CUSTOMER_ID_PREFIX: &str = "CUST";
const FIRST_CUSTOMER_SEQ: u64 = 1000;

/// Account numbers are plain sequential integers, starting at 100001
const FIRST_ACCOUNT_SEQ: u64 = 100_000;

pub struct BankingService {
    bank_name: String,
    bank_code: String,
    customers: HashMap<String, Customer>,
    accounts: HashMap<String, Account>,
    policies: PolicySet,
    next_customer_seq: u64,
    next_account_seq: u64,
}

impl BankingService {
    /// A bank running the standard policy terms
    pub fn new(bank_name: &str, bank_code: &str) -> Self {
        Self::with_policies(bank_name, bank_code, PolicySet::default())
    }

    pub fn with_policies(bank_name: &str, bank_code: &str, policies: PolicySet) -> Self {
        BankingService {
            bank_name: bank_name.to_string(),
            bank_code: bank_code.to_string(),
            customers: HashMap::new(),
            accounts: HashMap::new(),
            policies,
            next_customer_seq: FIRST_CUSTOMER_SEQ,
            next_account_seq: FIRST_ACCOUNT_SEQ,
        }
    }

    pub fn bank_name(&self) -> &str {
        &self.bank_name
    }

    pub fn bank_code(&self) -> &str {
        &self.bank_code
    }

    pub fn policies(&self) -> &PolicySet {
        &self.policies
    }

    // ========================================================================
    // CUSTOMERS
    // ========================================================================

    /// Register a new customer. The email must not already be registered
    /// (case-insensitive); this is the only point where uniqueness is
    /// enforced.
    pub fn create_customer(
        &mut self,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> LedgerResult<&Customer> {
        let normalized = email.trim().to_lowercase();
        if self.customers.values().any(|c| c.email() == normalized) {
            return Err(LedgerError::InvalidAccount(format!(
                "Customer with email {} already exists",
                email.trim()
            )));
        }

        let id = format!("{}{}", CUSTOMER_ID_PREFIX, self.next_customer_seq + 1);
        let customer = Customer::new(id.clone(), first_name, last_name, email)?;
        self.next_customer_seq += 1;
        Ok(self.customers.entry(id).or_insert(customer))
    }

    pub fn customer(&self, customer_id: &str) -> LedgerResult<&Customer> {
        self.customers
            .get(customer_id)
            .ok_or_else(|| LedgerError::CustomerNotFound(customer_id.to_string()))
    }

    fn customer_mut(&mut self, customer_id: &str) -> LedgerResult<&mut Customer> {
        self.customers
            .get_mut(customer_id)
            .ok_or_else(|| LedgerError::CustomerNotFound(customer_id.to_string()))
    }

    /// All customers, ordered by id
    pub fn customers(&self) -> Vec<&Customer> {
        let mut customers: Vec<&Customer> = self.customers.values().collect();
        customers.sort_by(|a, b| a.id().cmp(b.id()));
        customers
    }

    pub fn active_customers(&self) -> Vec<&Customer> {
        self.customers()
            .into_iter()
            .filter(|c| c.is_active())
            .collect()
    }

    /// Case-insensitive lookup by the (unique-at-creation) email
    pub fn find_customer_by_email(&self, email: &str) -> Option<&Customer> {
        let normalized = email.trim().to_lowercase();
        self.customers.values().find(|c| c.email() == normalized)
    }

    /// Update a customer's contact email. The format is re-validated, but
    /// uniqueness is not re-checked (creation-time only).
    pub fn update_customer_email(&mut self, customer_id: &str, email: &str) -> LedgerResult<()> {
        self.customer_mut(customer_id)?.set_email(email)
    }

    /// Deactivate the customer and every account they own
    pub fn deactivate_customer(&mut self, customer_id: &str) -> LedgerResult<()> {
        let numbers = {
            let customer = self.customer_mut(customer_id)?;
            customer.deactivate();
            customer.account_numbers()
        };
        for number in numbers {
            if let Some(account) = self.accounts.get_mut(&number) {
                account.deactivate();
            }
        }
        Ok(())
    }

    /// Reactivate only the customer; accounts stay as they are
    pub fn activate_customer(&mut self, customer_id: &str) -> LedgerResult<()> {
        self.customer_mut(customer_id)?.activate();
        Ok(())
    }

    // ========================================================================
    // ACCOUNTS
    // ========================================================================

    pub fn create_savings_account(
        &mut self,
        customer_id: &str,
        initial_balance: f64,
    ) -> LedgerResult<&Account> {
        let kind = AccountKind::savings(self.policies.savings.clone());
        self.create_account(customer_id, initial_balance, kind)
    }

    pub fn create_checking_account(
        &mut self,
        customer_id: &str,
        initial_balance: f64,
        overdraft_protection: bool,
    ) -> LedgerResult<&Account> {
        let kind = AccountKind::checking(self.policies.checking.clone(), overdraft_protection);
        self.create_account(customer_id, initial_balance, kind)
    }

    fn create_account(
        &mut self,
        customer_id: &str,
        initial_balance: f64,
        kind: AccountKind,
    ) -> LedgerResult<&Account> {
        let holder_name = self.customer(customer_id)?.full_name();
        let number = (self.next_account_seq + 1).to_string();
        let account = Account::open(number.clone(), &holder_name, initial_balance, kind)?;
        self.next_account_seq += 1;
        self.customer_mut(customer_id)?.add_account(&number);
        Ok(self.accounts.entry(number).or_insert(account))
    }

    pub fn account(&self, account_number: &str) -> LedgerResult<&Account> {
        self.accounts
            .get(account_number)
            .ok_or_else(|| LedgerError::AccountNotFound(account_number.to_string()))
    }

    fn account_mut(&mut self, account_number: &str) -> LedgerResult<&mut Account> {
        self.accounts
            .get_mut(account_number)
            .ok_or_else(|| LedgerError::AccountNotFound(account_number.to_string()))
    }

    /// All accounts, ordered by number
    pub fn accounts(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by(|a, b| a.number().cmp(b.number()));
        accounts
    }

    pub fn active_accounts(&self) -> Vec<&Account> {
        self.accounts()
            .into_iter()
            .filter(|a| a.is_active())
            .collect()
    }

    pub fn accounts_of_type(&self, account_type: AccountType) -> Vec<&Account> {
        self.accounts()
            .into_iter()
            .filter(|a| a.account_type() == account_type)
            .collect()
    }

    pub fn accounts_for_customer(&self, customer_id: &str) -> LedgerResult<Vec<&Account>> {
        let customer = self.customer(customer_id)?;
        Ok(customer
            .account_numbers()
            .iter()
            .filter_map(|number| self.accounts.get(number))
            .collect())
    }

    pub fn active_accounts_for_customer(&self, customer_id: &str) -> LedgerResult<Vec<&Account>> {
        Ok(self
            .accounts_for_customer(customer_id)?
            .into_iter()
            .filter(|a| a.is_active())
            .collect())
    }

    pub fn customer_total_balance(&self, customer_id: &str) -> LedgerResult<f64> {
        Ok(self
            .accounts_for_customer(customer_id)?
            .iter()
            .map(|a| a.balance())
            .sum())
    }

    pub fn deactivate_account(&mut self, account_number: &str) -> LedgerResult<()> {
        self.account_mut(account_number)?.deactivate();
        Ok(())
    }

    pub fn activate_account(&mut self, account_number: &str) -> LedgerResult<()> {
        self.account_mut(account_number)?.activate();
        Ok(())
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    pub fn deposit(&mut self, account_number: &str, amount: f64) -> LedgerResult<()> {
        self.account_mut(account_number)?.deposit(amount)
    }

    pub fn withdraw(&mut self, account_number: &str, amount: f64) -> LedgerResult<()> {
        self.account_mut(account_number)?.withdraw(amount)
    }

    pub fn write_check(
        &mut self,
        account_number: &str,
        amount: f64,
        payee: &str,
    ) -> LedgerResult<()> {
        self.account_mut(account_number)?.write_check(amount, payee)
    }

    pub fn account_balance(&self, account_number: &str) -> LedgerResult<f64> {
        Ok(self.account(account_number)?.balance())
    }

    /// Move funds between two accounts.
    ///
    /// Not atomic: the debit and the credit are independent mutations. A
    /// credit failure after the debit has applied (for example, an inactive
    /// destination) leaves the debit in place with no rollback.
    pub fn transfer(
        &mut self,
        from_account: &str,
        to_account: &str,
        amount: f64,
    ) -> LedgerResult<()> {
        if from_account == to_account {
            return Err(LedgerError::InvalidTransaction(
                "Cannot transfer to the same account".to_string(),
            ));
        }

        // Resolve both ends before touching either balance
        self.account(from_account)?;
        self.account(to_account)?;

        self.account_mut(from_account)?
            .transfer_out(amount, to_account)?;
        self.account_mut(to_account)?
            .transfer_in(amount, from_account)?;
        Ok(())
    }

    /// Run the monthly cycle on every active account
    pub fn apply_monthly_maintenance_to_all(&mut self) {
        for account in self.accounts.values_mut() {
            if account.is_active() {
                account.apply_monthly_maintenance();
            }
        }
    }

    /// Run the monthly cycle on one account, active or not
    pub fn apply_monthly_maintenance(&mut self, account_number: &str) -> LedgerResult<()> {
        self.account_mut(account_number)?.apply_monthly_maintenance();
        Ok(())
    }

    // ========================================================================
    // REPORTING
    // ========================================================================

    pub fn total_bank_balance(&self) -> f64 {
        self.accounts.values().map(|a| a.balance()).sum()
    }

    pub fn total_customer_count(&self) -> usize {
        self.customers.len()
    }

    pub fn active_customer_count(&self) -> usize {
        self.customers.values().filter(|c| c.is_active()).count()
    }

    pub fn total_account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn active_account_count(&self) -> usize {
        self.accounts.values().filter(|a| a.is_active()).count()
    }

    pub fn account_type_counts(&self) -> HashMap<AccountType, usize> {
        let mut counts = HashMap::new();
        for account in self.accounts.values() {
            *counts.entry(account.account_type()).or_insert(0) += 1;
        }
        counts
    }

    /// Multi-line report over the whole bank
    pub fn bank_summary(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Bank Summary ===\n");
        out.push_str(&format!("Bank Name: {}\n", self.bank_name));
        out.push_str(&format!("Bank Code: {}\n", self.bank_code));
        out.push_str(&format!("Total Customers: {}\n", self.total_customer_count()));
        out.push_str(&format!(
            "Active Customers: {}\n",
            self.active_customer_count()
        ));
        out.push_str(&format!("Total Accounts: {}\n", self.total_account_count()));
        out.push_str(&format!(
            "Active Accounts: {}\n",
            self.active_account_count()
        ));
        out.push_str(&format!(
            "Total Bank Balance: ${:.2}\n",
            self.total_bank_balance()
        ));

        let counts = self.account_type_counts();
        if !counts.is_empty() {
            out.push_str("\n--- Account Types ---\n");
            let mut entries: Vec<(&AccountType, &usize)> = counts.iter().collect();
            entries.sort_by_key(|(account_type, _)| account_type.as_str());
            for (account_type, count) in entries {
                out.push_str(&format!("• {}: {} accounts\n", account_type, count));
            }
        }

        out
    }

    /// Multi-line report for one customer and their accounts
    pub fn customer_summary(&self, customer_id: &str) -> LedgerResult<String> {
        let customer = self.customer(customer_id)?;
        let accounts = self.accounts_for_customer(customer_id)?;

        let mut out = String::new();
        out.push_str("=== Customer Summary ===\n");
        out.push_str(&format!("Customer ID: {}\n", customer.id()));
        out.push_str(&format!("Name: {}\n", customer.full_name()));
        out.push_str(&format!("Email: {}\n", customer.email()));
        if let Some(phone) = customer.phone_number() {
            out.push_str(&format!("Phone: {}\n", phone));
        }
        if let Some(address) = customer.address() {
            out.push_str(&format!("Address: {}\n", address));
        }
        out.push_str(&format!(
            "Date Joined: {}\n",
            customer.joined_at().format("%Y-%m-%d")
        ));
        out.push_str(&format!(
            "Status: {}\n",
            if customer.is_active() {
                "Active"
            } else {
                "Inactive"
            }
        ));
        out.push_str(&format!("Total Accounts: {}\n", accounts.len()));
        out.push_str(&format!(
            "Active Accounts: {}\n",
            accounts.iter().filter(|a| a.is_active()).count()
        ));
        out.push_str(&format!(
            "Total Balance: ${:.2}\n",
            accounts.iter().map(|a| a.balance()).sum::<f64>()
        ));

        if !accounts.is_empty() {
            out.push_str("\n--- Accounts ---\n");
            for account in &accounts {
                out.push_str(&format!("• {}\n", account));
            }
        }

        Ok(out)
    }
}

impl std::fmt::Display for BankingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bank: {} ({}) | Customers: {} | Accounts: {} | Total Balance: ${:.2}",
            self.bank_name,
            self.bank_code,
            self.customers.len(),
            self.accounts.len(),
            self.total_bank_balance()
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
