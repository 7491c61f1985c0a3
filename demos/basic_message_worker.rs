//! Example: basic typed message worker
//!
//! Run with: `cargo run --example basic_message_worker`
//!
//! Set `RUST_LOG=trace` to see the per-message enqueue diagnostics.

use message_worker::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    // Two workers; the queue defaults to workers * 100
    let worker = MessageWorker::<String>::new(2, 0);
    println!(
        "created worker: {} threads, queue capacity {}",
        worker.num_workers(),
        worker.queue_capacity()
    );

    let processed = Arc::new(AtomicUsize::new(0));
    let processed_clone = Arc::clone(&processed);

    worker.set_processor(move |_ctx, msg| {
        if msg.is_empty() {
            return Err("empty message".into());
        }
        println!("processing: {}", msg);
        processed_clone.fetch_add(1, Ordering::Relaxed);
        Ok(())
    });

    worker.start()?;

    for name in ["alpha", "beta", "gamma", "delta"] {
        worker.queue(name.to_string());
    }
    // This one fails in isolation; the pool keeps going
    worker.queue(String::new());
    worker.queue("epsilon".to_string());

    thread::sleep(Duration::from_millis(200));
    worker.stop()?;

    println!("processed {} messages", processed.load(Ordering::Relaxed));
    Ok(())
}
