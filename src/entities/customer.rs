// 👤 Customer - identity, contact details, and owned account numbers
//
// Accounts are referenced by number; their lifecycle belongs to the
// service. Contact fields are validated on construction and on every
// setter call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    id: String,
    first_name: String,
    last_name: String,
    /// Stored trimmed and lower-cased
    email: String,
    phone_number: Option<String>,
    address: Option<String>,
    joined_at: DateTime<Utc>,
    active: bool,
    account_numbers: Vec<String>,
}

impl Customer {
    pub fn new(id: String, first_name: &str, last_name: &str, email: &str) -> LedgerResult<Self> {
        Ok(Customer {
            id,
            first_name: validate_name(first_name, "First name")?,
            last_name: validate_name(last_name, "Last name")?,
            email: normalize_email(email)?,
            phone_number: None,
            address: None,
            joined_at: Utc::now(),
            active: true,
            account_numbers: Vec::new(),
        })
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    // ========================================================================
    // SETTERS (validated)
    // ========================================================================

    pub fn set_first_name(&mut self, first_name: &str) -> LedgerResult<()> {
        self.first_name = validate_name(first_name, "First name")?;
        Ok(())
    }

    pub fn set_last_name(&mut self, last_name: &str) -> LedgerResult<()> {
        self.last_name = validate_name(last_name, "Last name")?;
        Ok(())
    }

    /// Re-validates the format only. Uniqueness across the bank is checked
    /// by the service at creation time and not re-checked here.
    pub fn set_email(&mut self, email: &str) -> LedgerResult<()> {
        self.email = normalize_email(email)?;
        Ok(())
    }

    pub fn set_phone_number(&mut self, phone_number: Option<&str>) {
        self.phone_number = phone_number.map(|p| p.trim().to_string());
    }

    pub fn set_address(&mut self, address: Option<&str>) {
        self.address = address.map(|a| a.trim().to_string());
    }

    // ========================================================================
    // ACTIVATION
    // ========================================================================

    /// Flips only the customer flag; the service cascades to owned accounts
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    // ========================================================================
    // ACCOUNT REFERENCES
    // ========================================================================

    /// Idempotent; a number is recorded at most once
    pub fn add_account(&mut self, account_number: &str) {
        if !self.owns_account(account_number) {
            self.account_numbers.push(account_number.to_string());
        }
    }

    /// Returns whether the number was present
    pub fn remove_account(&mut self, account_number: &str) -> bool {
        let before = self.account_numbers.len();
        self.account_numbers.retain(|n| n != account_number);
        self.account_numbers.len() < before
    }

    pub fn owns_account(&self, account_number: &str) -> bool {
        self.account_numbers.iter().any(|n| n == account_number)
    }

    /// Independent copy of the owned account numbers
    pub fn account_numbers(&self) -> Vec<String> {
        self.account_numbers.clone()
    }

    pub fn account_count(&self) -> usize {
        self.account_numbers.len()
    }
}

impl std::fmt::Display for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Customer: {} | Name: {} | Email: {} | Accounts: {} | Status: {}",
            self.id,
            self.full_name(),
            self.email,
            self.account_numbers.len(),
            if self.active { "Active" } else { "Inactive" }
        )
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

fn validate_name(value: &str, field: &str) -> LedgerResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidAccount(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_email(email: &str) -> LedgerResult<String> {
    let trimmed = email.trim();
    if !is_valid_email(trimmed) {
        return Err(LedgerError::InvalidAccount(
            "Valid email address is required".to_string(),
        ));
    }
    Ok(trimmed.to_lowercase())
}

/// Exactly one '@' with a non-empty local part, followed by a dotted
/// domain whose segments are all non-empty
fn is_valid_email(email: &str) -> bool {
    if email.matches('@').count() != 1 {
        return false;
    }
    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };
    if local.is_empty() {
        return false;
    }
    domain.contains('.') && domain.split('.').all(|segment| !segment.is_empty())
}

// ============================================================================
// TESTS
// ============================================================================
