// 📋 Account Policies - Rules as Data
// Business parameters for each account type, with defaults matching the
// bank's standard product terms and optional overrides from a JSON file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// SAVINGS POLICY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingsPolicy {
    /// A withdrawal may never take the balance below this
    pub minimum_balance: f64,

    /// Annual interest rate (0.035 = 3.5%), credited monthly
    pub annual_interest_rate: f64,

    pub monthly_maintenance_fee: f64,

    /// Balance at or above this skips the maintenance fee
    pub maintenance_fee_waiver_balance: f64,

    /// Withdrawals beyond this count per cycle incur the excess fee
    pub free_withdrawals_per_month: u32,

    pub excess_withdrawal_fee: f64,
}

impl Default for SavingsPolicy {
    fn default() -> Self {
        SavingsPolicy {
            minimum_balance: 100.00,
            annual_interest_rate: 0.035,
            monthly_maintenance_fee: 5.00,
            maintenance_fee_waiver_balance: 500.00,
            free_withdrawals_per_month: 6,
            excess_withdrawal_fee: 2.00,
        }
    }
}

// ============================================================================
// CHECKING POLICY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckingPolicy {
    /// Opening deposits below this are topped up to it
    pub minimum_balance: f64,

    pub monthly_maintenance_fee: f64,

    /// Balance at or above this skips the maintenance fee
    pub maintenance_fee_waiver_balance: f64,

    /// Deepest permitted negative balance when protection is enabled
    pub overdraft_limit: f64,

    /// Charged once when a debit takes the balance negative
    pub overdraft_fee: f64,

    /// Premium interest applies only while balance exceeds this
    pub premium_interest_threshold: f64,

    /// Annual premium interest rate (0.001 = 0.1%)
    pub premium_interest_rate: f64,
}

impl Default for CheckingPolicy {
    fn default() -> Self {
        CheckingPolicy {
            minimum_balance: 25.00,
            monthly_maintenance_fee: 10.00,
            maintenance_fee_waiver_balance: 1000.00,
            overdraft_limit: 500.00,
            overdraft_fee: 35.00,
            premium_interest_threshold: 5000.00,
            premium_interest_rate: 0.001,
        }
    }
}

// ============================================================================
// POLICY SET
// ============================================================================

/// The pair of policies a bank runs with.
///
/// `PolicySet::default()` carries the standard terms; `from_file` lets a
/// deployment override individual figures without restating the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySet {
    pub savings: SavingsPolicy,
    pub checking: CheckingPolicy,
}

impl PolicySet {
    /// Load policies from a JSON file; missing fields fall back to defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read policy file: {:?}", path.as_ref()))?;

        let policies: PolicySet =
            serde_json::from_str(&content).context("Failed to parse policy JSON")?;

        Ok(policies)
    }
}

// ============================================================================
// TESTS
// ============================================================================
