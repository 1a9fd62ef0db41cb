//! Installer State Machine
//!
//! This example walks a package installer through its lifecycle and
//! checkpoints it halfway through.
//!
//! Key concepts:
//! - String states and a static transition table
//! - Identified callbacks that observe or redirect a transition
//! - Snapshots restored against a callback registry
//! - Terminal states computed from the table
//!
//! Run with: cargo run --example installer

use std::any::Any;
use tablefsm::{checkpoint, Callback, CallbackRegistry, StateMachineBuilder};

fn main() {
    println!("=== Installer State Machine ===\n");

    let registry = CallbackRegistry::new();

    // Retry budget travels as the payload; an exhausted budget redirects to Damaged
    let retry = Callback::new("retry-or-give-up", |from, to, payload| {
        let attempts = payload.and_then(|p| p.downcast_ref::<u32>()).copied();
        println!("  [callback] {from} -> {to}, attempts so far: {attempts:?}");
        match attempts {
            Some(n) if n >= 3 => Some("Damaged".to_string()),
            _ => None,
        }
    });
    let audit = Callback::new("audit", |from, to, _| {
        println!("  [callback] audit {from} -> {to}");
        None
    });

    let mut machine = StateMachineBuilder::new("installer")
        .initial("Unchecked")
        .edge_with("Unchecked", "Ready", audit.clone())
        .edge("Ready", "Installing")
        .edge("Ready", "Damaged")
        .edge_with("Installing", "Running", audit)
        .edge("Installing", "Failed")
        .edge("Running", "Ready")
        .edge("Failed", "Damaged")
        .edge_with("Failed", "Ready", retry)
        .registry(&registry)
        .build()
        .unwrap();

    println!("Initial state: {}", machine.current());
    println!("Terminal states: {:?}\n", machine.terminate_states());

    machine.transition("Ready", None).unwrap();
    machine.transition("Installing", None).unwrap();
    machine.transition("Failed", None).unwrap();
    println!("After a failed install: {}", machine.current());
    println!("Next states: {:?}\n", machine.transitions());

    let json = checkpoint::to_json_pretty(&machine).unwrap();
    println!("Checkpoint:\n{json}\n");

    let mut resumed = checkpoint::from_json(&json, &registry).unwrap();
    println!("Resumed equals original: {}", resumed == machine);

    let attempts: u32 = 3;
    resumed
        .transition("Ready", Some(&attempts as &dyn Any))
        .unwrap();
    println!("After retrying with {attempts} attempts: {}", resumed.current());
    println!("Terminated: {}", resumed.is_terminated());

    if let Err(err) = resumed.transition("Ready", None) {
        println!("Rejected: {err}");
    }

    println!("\n=== Example Complete ===");
}
