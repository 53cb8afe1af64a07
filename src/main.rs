//! Ouro - Fixed-Capacity Concurrent Byte Ring Buffer
//!
//! Demo binary: inline throughput run untuk kedua varian ring.
//!
//! - Locked: Mutex di-hold selama copy
//! - SPSC: atomic-only, satu producer + satu consumer

use std::thread;
use std::time::Instant;

use ouro::{RingBuffer, SpscRing};

const CHUNK: usize = 64;
const ITERATIONS: usize = 1_000_000;

fn main() {
    println!("🚀 Ouro Byte Ring Buffer - Demo");
    println!("================================\n");

    benchmark_locked_ring();
    benchmark_spsc_ring();
    demo_spsc_threads();

    println!("\n✅ All runs complete!");
}

fn benchmark_locked_ring() {
    println!("📊 Locked Ring (Mutex, 64-byte chunks)");
    println!("--------------------------------------");

    let rb = RingBuffer::with_capacity(65535).expect("allocation failed");
    let chunk = [0xABu8; CHUNK];
    let mut sink = [0u8; CHUNK];

    // Warm up
    for _ in 0..1000 {
        rb.write(&chunk);
        rb.read(&mut sink);
    }
    rb.reset();

    let start = Instant::now();
    for _ in 0..ITERATIONS {
        rb.write(&chunk);
        rb.read(&mut sink);
    }
    let duration = start.elapsed();

    let total_bytes = (ITERATIONS * CHUNK) as f64;
    let throughput = total_bytes / duration.as_secs_f64() / 1_000_000.0;
    println!("  write+read cycle: {:?} total", duration);
    println!("  throughput:       {:.1} MB/s\n", throughput);
}

fn benchmark_spsc_ring() {
    println!("📊 SPSC Ring (Lock-Free, 64-byte chunks)");
    println!("----------------------------------------");

    let rb = SpscRing::with_capacity(65536).expect("allocation failed");
    let chunk = [0xCDu8; CHUNK];
    let mut sink = [0u8; CHUNK];

    // Warm up
    for _ in 0..1000 {
        rb.push(&chunk);
        rb.pop(&mut sink);
    }

    let start = Instant::now();
    for _ in 0..ITERATIONS {
        rb.push(&chunk);
        rb.pop(&mut sink);
    }
    let duration = start.elapsed();

    let total_bytes = (ITERATIONS * CHUNK) as f64;
    let throughput = total_bytes / duration.as_secs_f64() / 1_000_000.0;
    println!("  push+pop cycle: {:?} total", duration);
    println!("  throughput:     {:.1} MB/s\n", throughput);
}

fn demo_spsc_threads() {
    println!("📊 SPSC Ring (producer/consumer threads)");
    println!("----------------------------------------");

    const TOTAL: usize = 8 * 1024 * 1024;

    let rb = SpscRing::with_capacity(4096).expect("allocation failed");
    let start = Instant::now();

    thread::scope(|scope| {
        scope.spawn(|| {
            let chunk = [0x5Au8; CHUNK];
            let mut sent = 0usize;
            while sent < TOTAL {
                let pushed = rb.push(&chunk[..CHUNK.min(TOTAL - sent)]);
                if pushed == 0 {
                    thread::yield_now();
                }
                sent += pushed;
            }
        });

        scope.spawn(|| {
            let mut buf = [0u8; CHUNK];
            let mut received = 0usize;
            while received < TOTAL {
                let popped = rb.pop(&mut buf);
                if popped == 0 {
                    thread::yield_now();
                }
                received += popped;
            }
        });
    });

    let duration = start.elapsed();
    let throughput = TOTAL as f64 / duration.as_secs_f64() / 1_000_000.0;
    println!("  {} MB across threads: {:?}", TOTAL / 1_000_000, duration);
    println!("  throughput: {:.1} MB/s", throughput);
}
