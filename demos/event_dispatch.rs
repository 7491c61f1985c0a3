//! Example: dispatching deserialized domain events
//!
//! Shows the intended call-site shape: a service component constructs a
//! typed worker for its event type, registers one handler, and feeds it
//! events parsed off the wire.
//!
//! Run with: `cargo run --example event_dispatch`

use message_worker::prelude::*;
use serde::Deserialize;
use std::thread;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct DomainEvent {
    kind: String,
    account: String,
    #[serde(default)]
    amount: i64,
}

fn main() -> Result<()> {
    env_logger::init();

    let worker = MessageWorker::<DomainEvent>::new(4, 256);

    worker.set_processor(|ctx, event| {
        // Skip late work once shutdown has begun
        ctx.check()?;

        match event.kind.as_str() {
            "deposit" => {
                println!("{} deposited {}", event.account, event.amount);
                Ok(())
            }
            "withdrawal" => {
                println!("{} withdrew {}", event.account, event.amount);
                Ok(())
            }
            other => Err(format!("unhandled event kind '{}'", other).into()),
        }
    });

    worker.start()?;

    let incoming = [
        r#"{"kind": "deposit", "account": "acct-1", "amount": 250}"#,
        r#"{"kind": "withdrawal", "account": "acct-1", "amount": 100}"#,
        r#"{"kind": "transfer", "account": "acct-2", "amount": 50}"#,
        r#"{"kind": "deposit", "account": "acct-2", "amount": 75}"#,
    ];

    for line in incoming {
        match serde_json::from_str::<DomainEvent>(line) {
            Ok(event) => worker.queue(event),
            Err(e) => eprintln!("skipping malformed event: {}", e),
        }
    }

    thread::sleep(Duration::from_millis(200));
    worker.stop()?;
    Ok(())
}
