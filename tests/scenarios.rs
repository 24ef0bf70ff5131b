//! End-to-end token scenarios against the public calculator API.

use auditcalc::audit::{AuditAction, AuditEntry};
use auditcalc::identity::StaticIdentity;
use auditcalc::machine::{Calculator, Outcome};
use auditcalc::signature::{PendingAction, SignatureResult};
use auditcalc::storage::FileSlots;
use auditcalc::CalculatorConfig;
use tempfile::TempDir;

fn press_all(calc: &mut Calculator, tokens: &[&str]) {
    for token in tokens {
        calc.press(token);
    }
}

fn entries_with(calc: &Calculator, action: AuditAction) -> Vec<AuditEntry> {
    calc.audit()
        .get_all()
        .into_iter()
        .filter(|e| e.action == action)
        .collect()
}

#[test]
fn two_plus_two() {
    let mut calc = Calculator::new();
    press_all(&mut calc, &["2", "+", "2", "="]);

    assert_eq!(calc.display(), "4");
    let computes = entries_with(&calc, AuditAction::Compute);
    assert_eq!(computes.len(), 1);
    assert_eq!(computes[0].after.as_ref().unwrap().input_a, "4");
}

#[test]
fn multiplication_then_fresh_subtraction() {
    let mut calc = Calculator::new();

    press_all(&mut calc, &["5", "*", "6", "="]);
    assert_eq!(calc.display(), "30");

    press_all(&mut calc, &["9", "-", "3", "="]);
    assert_eq!(calc.display(), "6");

    assert_eq!(entries_with(&calc, AuditAction::Compute).len(), 2);
}

#[test]
fn decimals_trim_trailing_zeros() {
    let mut calc = Calculator::new();
    press_all(&mut calc, &["1", ".", "5", "+", "0", ".", "5", "="]);
    assert_eq!(calc.display(), "2");
}

#[test]
fn division_and_backspace() {
    let mut calc = Calculator::new();
    press_all(&mut calc, &["8", "/", "2", "="]);
    assert_eq!(calc.display(), "4");

    press_all(&mut calc, &["3", "BS", "7", "BS", "7"]);
    assert_eq!(calc.display(), "7");
}

#[test]
fn typing_on_long_result_is_ignored() {
    let mut calc = Calculator::new();
    press_all(&mut calc, &["9"; 16]);
    press_all(&mut calc, &["*", "9", "9", "=", "BS"]);
    assert_eq!(calc.display(), "98999999999999990");
    let audited = calc.audit().len();

    assert_eq!(calc.press("1"), Outcome::Ignored);
    assert_eq!(calc.press("."), Outcome::Ignored);
    assert_eq!(calc.display(), "98999999999999990");
    assert_eq!(calc.audit().len(), audited);
}

#[test]
fn chaining_continues_from_intermediate_result() {
    let mut calc = Calculator::new();
    press_all(&mut calc, &["5", "*", "6", "-"]);
    assert_eq!(calc.display(), "30");

    press_all(&mut calc, &["1", "0", "="]);
    assert_eq!(calc.display(), "20");

    let operators = entries_with(&calc, AuditAction::Operator);
    assert_eq!(operators.len(), 2);
    assert_eq!(operators[1].reason(), Some("chain"));
}

#[test]
fn confirmed_clear_resets_display() {
    let mut calc = Calculator::builder()
        .confirm(|_: &str| true)
        .build()
        .unwrap();
    press_all(&mut calc, &["9", "C"]);

    assert_eq!(calc.display(), "0");
    let clears = entries_with(&calc, AuditAction::Clear);
    assert_eq!(clears.len(), 1);
    assert_eq!(clears[0].before.input_a, "9");
    assert!(calc.state().is_empty());
}

#[test]
fn declined_clear_preserves_state() {
    let mut calc = Calculator::builder()
        .confirm(|_: &str| false)
        .build()
        .unwrap();
    press_all(&mut calc, &["1", "2", "3", "C"]);

    assert_eq!(calc.display(), "123");
    assert!(entries_with(&calc, AuditAction::Clear).is_empty());
}

#[test]
fn every_transition_appends_exactly_one_entry() {
    let mut calc = Calculator::new();
    let mut expected = 0;

    for token in ["1", "2", ".", ".", "+", "0", "=", "4", "/", "0", "=", "x", "BS", "2", "="] {
        let outcome = calc.press(token);
        if matches!(outcome, Outcome::Applied(_) | Outcome::Failed(_)) {
            expected += 1;
        }
        assert_eq!(calc.audit().len(), expected, "after {token:?}");
    }

    calc.audit_mut().clear();
    assert!(calc.audit().get_all().is_empty());
}

#[test]
fn signed_clear_carries_signature() {
    let mut calc = Calculator::builder()
        .require_signature(true)
        .identity(StaticIdentity::new("user-001", "Ada", "2468"))
        .build()
        .unwrap();

    press_all(&mut calc, &["4", "2"]);
    assert_eq!(calc.press("C"), Outcome::AwaitingSignature(PendingAction::Clear));
    assert_eq!(calc.display(), "42");

    assert_eq!(calc.sign("2468"), Outcome::Applied(AuditAction::Clear));
    assert_eq!(calc.display(), "0");

    let clears = entries_with(&calc, AuditAction::Clear);
    assert_eq!(clears.len(), 1);
    assert_eq!(clears[0].subject_id, "user-001");
    assert_eq!(clears[0].signature(), Some(&SignatureResult::pin(true)));
}

#[test]
fn signed_compute_failure_is_audited_with_signature() {
    let mut calc = Calculator::builder()
        .require_signature(true)
        .identity(StaticIdentity::new("user-001", "Ada", "2468"))
        .build()
        .unwrap();

    press_all(&mut calc, &["4", "/", "0", "="]);
    assert!(matches!(calc.sign("2468"), Outcome::Failed(_)));
    assert_eq!(calc.error_message(), Some("Cannot divide by zero"));

    let errors = entries_with(&calc, AuditAction::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].signature(), Some(&SignatureResult::pin(true)));
    assert_eq!(errors[0].before.input_b, "0");
}

#[test]
fn audit_log_persists_as_json_array() {
    let dir = TempDir::new().unwrap();
    let config = CalculatorConfig::default();
    let mut calc = Calculator::builder()
        .config(config.clone())
        .slots(FileSlots::open(dir.path()).unwrap())
        .build()
        .unwrap();
    press_all(&mut calc, &["2", "+", "2", "="]);

    let path = dir.path().join(format!("{}.json", config.storage.audit_slot));
    let raw = std::fs::read_to_string(path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let array = value.as_array().unwrap();

    assert_eq!(array.len(), 4);
    assert_eq!(array[3]["action"], "COMPUTE");
    assert_eq!(array[3]["before"]["operator"], "+");
    assert!(array[3]["subjectId"].is_string());

    let exported: Vec<AuditEntry> =
        serde_json::from_str(&calc.audit().export_json().unwrap()).unwrap();
    assert_eq!(exported, calc.audit().get_all());
}
