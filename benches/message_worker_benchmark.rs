use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use message_worker::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

fn benchmark_pool_lifecycle(c: &mut Criterion) {
    c.bench_function("pool_start_shutdown", |b| {
        b.iter(|| {
            let pool = WorkerPool::new(4, 100).expect("failed to create pool");
            pool.start().expect("failed to start pool");
            pool.shutdown().expect("failed to shutdown pool");
        });
    });
}

fn benchmark_message_queueing(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_queueing");

    group.bench_function("queue_100_messages", |b| {
        b.iter_batched(
            || {
                let worker = MessageWorker::<u64>::new(4, 1000);
                let counter = Arc::new(AtomicU64::new(0));
                let counter_clone = Arc::clone(&counter);
                worker.set_processor(move |_, value| {
                    counter_clone.fetch_add(black_box(value), Ordering::Relaxed);
                    Ok(())
                });
                worker.start().expect("failed to start worker");
                worker
            },
            |worker| {
                for i in 0..100u64 {
                    worker.queue(i);
                }
                worker.stop().expect("failed to stop worker");
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn benchmark_task_execution(c: &mut Criterion) {
    let mut group = c.benchmark_group("task_execution");

    group.bench_function("compute_tasks_100", |b| {
        b.iter_batched(
            || {
                let pool = WorkerPool::new(4, 1000).expect("failed to create pool");
                pool.start().expect("failed to start pool");
                pool
            },
            |pool| {
                for _ in 0..100 {
                    pool.execute(|_| {
                        let mut sum = 0u64;
                        for i in 0..1000 {
                            sum = sum.wrapping_add(i);
                        }
                        black_box(sum);
                        Ok(())
                    })
                    .expect("failed to submit task");
                }
                pool.shutdown().expect("failed to shutdown pool");
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_pool_lifecycle,
    benchmark_message_queueing,
    benchmark_task_execution
);
criterion_main!(benches);
