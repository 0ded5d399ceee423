// Scripted walkthrough of the banking ledger.
// All printing lives here; the library itself stays silent.

use anyhow::Result;

use banking_ledger::{AccountType, BankingService, LedgerError};

fn main() -> Result<()> {
    println!("🏦 Retail Banking Ledger - Demo");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut bank = BankingService::new("First Example Bank", "FEB001");

    // 1. Customers
    println!("\n👤 Creating customers...");
    let alice = bank
        .create_customer("Alice", "Nguyen", "alice@example.com")?
        .id()
        .to_string();
    let bob = bank
        .create_customer("Bob", "Smith", "bob@example.com")?
        .id()
        .to_string();
    println!("✓ {}", bank.customer(&alice)?);
    println!("✓ {}", bank.customer(&bob)?);

    // 2. Accounts
    println!("\n💳 Opening accounts...");
    let alice_savings = bank.create_savings_account(&alice, 750.0)?.number().to_string();
    let alice_checking = bank
        .create_checking_account(&alice, 10.0, true)?
        .number()
        .to_string();
    let bob_checking = bank
        .create_checking_account(&bob, 300.0, false)?
        .number()
        .to_string();
    println!("✓ {}", bank.account(&alice_savings)?);
    // Opened with $10 against a $25 minimum: topped up automatically
    println!("✓ {}", bank.account(&alice_checking)?);
    println!("✓ {}", bank.account(&bob_checking)?);

    // 3. Everyday operations
    println!("\n💸 Running transactions...");
    bank.deposit(&alice_checking, 200.0)?;
    bank.withdraw(&alice_savings, 150.0)?;
    bank.transfer(&alice_savings, &bob_checking, 100.0)?;
    bank.write_check(&alice_checking, 60.0, "City Utilities")?;
    println!("✓ Deposit, withdrawal, transfer, and check applied");

    // A business-rule violation surfaces as a typed error
    match bank.withdraw(&bob_checking, 10_000.0) {
        Err(LedgerError::InsufficientFunds {
            requested,
            available,
        }) => println!(
            "✗ Withdrawal rejected: requested ${:.2}, available ${:.2}",
            requested, available
        ),
        other => other?,
    }

    // 4. Month end
    println!("\n📅 Applying monthly maintenance...");
    bank.apply_monthly_maintenance_to_all();
    println!("✓ Fees assessed and interest credited");

    // 5. Reports
    println!("\n{}", bank.bank_summary());
    println!("{}", bank.customer_summary(&alice)?);
    println!("{}", bank.account(&alice_checking)?.summary());

    println!("Recent activity on {}:", alice_checking);
    for tx in bank.account(&alice_checking)?.recent_transactions(5) {
        println!("  {}", tx.formatted());
    }

    println!("\nSavings accounts open: {}", bank.accounts_of_type(AccountType::Savings).len());
    println!("{}", bank);

    Ok(())
}
