//! Positive pay review session example

use positive_pay_core::{Decision, ExceptionKey, RawTable, ReconConfig, ReviewSession};
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
[[ach.authorizations]]
company_id = "98765"
vendor = "AWS Cloud"
max_amount = "1500.00"

[[ach.authorizations]]
company_id = "54321"
vendor = "Verizon"
max_amount = "250.00"
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("🛡️ Positive Pay - Exception Review Example\n");

    let mut session = ReviewSession::new(ReconConfig::from_toml(CONFIG)?);

    // 1. Check positive pay
    let issued = RawTable::new(["Check #", "Amount", "Payee"])
        .row(["5001", "1000.00", "Office Depot"])
        .row(["5002", "50.00", "Local Cafe"]);
    let presented = RawTable::new(["Check #", "Amount", "Payee"])
        .row(["5001", "1000.00", "Office Depot"])
        .row(["5002", "500.00", "Local Cafe"])
        .row(["5003", "2400.00", "Unknown LLC"]);

    let run = session.run_checks(&issued, &presented)?;
    println!(
        "📋 Checks: {} presented, {} cleared, {} exceptions",
        run.summary.presented, run.summary.cleared, run.summary.exceptions
    );

    // 2. ACH debit filter
    let incoming = RawTable::new(["Vendor", "ID", "Amount"])
        .row(["Verizon", "54321", "280.00"])
        .row(["Suspicious Inc", "99999", "500.00"]);
    let run = session.run_ach(&incoming)?;
    println!(
        "📟 ACH: {} presented, {} cleared, {} exceptions\n",
        run.summary.presented, run.summary.cleared, run.summary.exceptions
    );

    println!("🚩 Detected Exceptions:");
    for item in session.pending()? {
        let exception = &item.exception;
        println!(
            "  [{}] {} - {} for ${}: {}",
            item.status(),
            exception.key,
            exception.payee,
            exception.amount,
            exception.reason_text()
        );
    }
    println!();

    // 3. Reviewer decisions
    session.set_notes(
        &ExceptionKey::check("5002"),
        "Per email from AP, amount on the check was altered",
    )?;
    session.record_decision(&ExceptionKey::check("5002"), Decision::Denied)?;
    session.record_decision(&ExceptionKey::check("5003"), Decision::Denied)?;
    session.record_decision(&ExceptionKey::ach("54321"), Decision::Approved)?;

    if let Err(e) = session.record_decision(&ExceptionKey::check("5003"), Decision::Approved) {
        println!("  ✗ {e}\n");
    }

    // 4. Audit trail
    println!("📜 Session Audit Log:");
    for entry in session.audit_log()? {
        println!(
            "  {} | {} | {} | {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.exception,
            entry.action,
            entry.notes_display()
        );
    }

    let still_pending = session.pending()?.len();
    println!("\n  {still_pending} exception(s) still pending");

    session.reset()?;
    println!("🔄 Decisions cleared");

    Ok(())
}
