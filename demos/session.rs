//! Calculator Session
//!
//! Feeds tokens from the command line to an audited calculator and prints
//! the display after each one, then the exported audit log.
//!
//! Key concepts:
//! - Token input contract (`0`-`9`, `+ - * /`, `.`, `=`, `C`, `BS`)
//! - File-backed audit log that survives restarts
//! - Optional PIN signature for compute and clear
//!
//! Run with:
//!   cargo run --example session -- 5 '*' 6 - 9 =
//!   AUDITCALC_PIN=1234 cargo run --example session -- 2 + 2 = pin:1234
//!
//! Set `AUDITCALC_DIR` to choose where slots are stored and
//! `RUST_LOG=auditcalc=debug` to see transition logs.

use auditcalc::identity::StaticIdentity;
use auditcalc::machine::{Calculator, Outcome};
use auditcalc::CalculatorConfig;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let dir = env::var_os("AUDITCALC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("auditcalc"));

    let mut config = CalculatorConfig::load(&dir.join("config.toml")).unwrap_or_default();
    config.storage.dir.get_or_insert(dir);

    let mut builder = Calculator::builder().config(config);
    if let Ok(pin) = env::var("AUDITCALC_PIN") {
        builder = builder
            .require_signature(true)
            .identity(StaticIdentity::new("operator-1", "Operator", pin));
    }
    let mut calc = builder.build()?;

    println!("=== Calculator Session ===");
    println!("Subject: {}\n", calc.subject_id());

    for arg in env::args().skip(1) {
        let outcome = match arg.strip_prefix("pin:") {
            Some(pin) => calc.sign(pin),
            None if arg == "cancel" => calc.cancel(),
            None => calc.press(&arg),
        };

        match &outcome {
            Outcome::AwaitingSignature(_) => {
                let prompt = calc.signature_prompt().unwrap_or_default();
                println!("{arg:>6}  -> [{prompt}]");
            }
            Outcome::Failed(_) => {
                let message = calc.error_message().unwrap_or("Error");
                println!("{arg:>6}  -> {} ({message})", calc.display());
            }
            _ => println!("{arg:>6}  -> {}", calc.display()),
        }
    }

    println!("\n=== Audit Log ({} entries) ===", calc.audit().len());
    println!("{}", calc.audit().export_json()?);
    Ok(())
}
