//! Concurrent Stress Test - Producer/Consumer Threads
//!
//! Pompa byte stream ber-tag sequence lewat kedua varian ring dan
//! verifikasi urutan serta totalnya.
//!
//! Usage:
//!   cargo test --release --test concurrent_stress -- --nocapture

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use ouro::{RingBuffer, SpscRing};

const TOTAL_BYTES: usize = 4 * 1024 * 1024;
const MAX_CHUNK: usize = 61; // deliberately not a divisor of capacity

/// Deterministic chunk-size jitter so writes keep crossing the boundary
/// at different offsets.
fn chunk_len(round: usize) -> usize {
    (round * 7 + 3) % MAX_CHUNK + 1
}

/// Byte at position `i` of the reference stream.
fn expected_byte(i: usize) -> u8 {
    (i % 251) as u8 // prime period, breaks alignment with capacity
}

#[test]
fn locked_ring_preserves_byte_order_across_threads() {
    let rb = Arc::new(RingBuffer::with_capacity(4099).unwrap());
    let produced = Arc::new(AtomicU64::new(0));
    let consumed = Arc::new(AtomicU64::new(0));

    let start = Instant::now();

    let producer = {
        let rb = Arc::clone(&rb);
        let produced = Arc::clone(&produced);
        thread::spawn(move || {
            let mut sent = 0usize;
            let mut round = 0usize;
            while sent < TOTAL_BYTES {
                let want = chunk_len(round).min(TOTAL_BYTES - sent);
                let chunk: Vec<u8> = (sent..sent + want).map(expected_byte).collect();
                let written = rb.write(&chunk);
                if written == 0 {
                    thread::yield_now();
                }
                sent += written;
                produced.fetch_add(written as u64, Ordering::Relaxed);
                round += 1;
            }
        })
    };

    let consumer = {
        let rb = Arc::clone(&rb);
        let consumed = Arc::clone(&consumed);
        thread::spawn(move || {
            let mut buf = [0u8; MAX_CHUNK];
            let mut received = 0usize;
            while received < TOTAL_BYTES {
                let read = rb.read(&mut buf);
                if read == 0 {
                    thread::yield_now();
                    continue;
                }
                for (offset, byte) in buf[..read].iter().enumerate() {
                    assert_eq!(
                        *byte,
                        expected_byte(received + offset),
                        "byte order broken at position {}",
                        received + offset
                    );
                }
                received += read;
                consumed.fetch_add(read as u64, Ordering::Relaxed);
            }
        })
    };

    producer.join().unwrap();
    consumer.join().unwrap();

    let elapsed = start.elapsed();
    println!(
        "locked ring: {} bytes in {:?} ({:.1} MB/s)",
        TOTAL_BYTES,
        elapsed,
        TOTAL_BYTES as f64 / elapsed.as_secs_f64() / 1_000_000.0
    );

    assert_eq!(produced.load(Ordering::Relaxed), TOTAL_BYTES as u64);
    assert_eq!(consumed.load(Ordering::Relaxed), TOTAL_BYTES as u64);
    assert!(rb.is_empty());
}

#[test]
fn spsc_ring_preserves_byte_order_across_threads() {
    let rb = Arc::new(SpscRing::with_capacity(4096).unwrap());
    let start = Instant::now();

    let producer = {
        let rb = Arc::clone(&rb);
        thread::spawn(move || {
            let mut sent = 0usize;
            let mut round = 0usize;
            while sent < TOTAL_BYTES {
                let want = chunk_len(round).min(TOTAL_BYTES - sent);
                let chunk: Vec<u8> = (sent..sent + want).map(expected_byte).collect();
                let pushed = rb.push(&chunk);
                if pushed == 0 {
                    thread::yield_now();
                }
                sent += pushed;
                round += 1;
            }
        })
    };

    let consumer = {
        let rb = Arc::clone(&rb);
        thread::spawn(move || {
            let mut buf = [0u8; MAX_CHUNK];
            let mut received = 0usize;
            while received < TOTAL_BYTES {
                let popped = rb.pop(&mut buf);
                if popped == 0 {
                    thread::yield_now();
                    continue;
                }
                for (offset, byte) in buf[..popped].iter().enumerate() {
                    assert_eq!(
                        *byte,
                        expected_byte(received + offset),
                        "byte order broken at position {}",
                        received + offset
                    );
                }
                received += popped;
            }
        })
    };

    producer.join().unwrap();
    consumer.join().unwrap();

    let elapsed = start.elapsed();
    println!(
        "spsc ring: {} bytes in {:?} ({:.1} MB/s)",
        TOTAL_BYTES,
        elapsed,
        TOTAL_BYTES as f64 / elapsed.as_secs_f64() / 1_000_000.0
    );

    assert!(rb.is_empty());
}

#[test]
fn locked_ring_two_producers_one_consumer() {
    // The locked variant has no SPSC restriction: two producers write
    // distinct marker bytes, the consumer tallies both.
    const PER_PRODUCER: u64 = 256 * 1024;

    let rb = Arc::new(RingBuffer::with_capacity(1024).unwrap());
    let counts = [Arc::new(AtomicU64::new(0)), Arc::new(AtomicU64::new(0))];

    let producers: Vec<_> = [0xAAu8, 0xBBu8]
        .into_iter()
        .map(|marker| {
            let rb = Arc::clone(&rb);
            thread::spawn(move || {
                let chunk = [marker; 17];
                let mut sent = 0u64;
                while sent < PER_PRODUCER {
                    let want = (PER_PRODUCER - sent).min(17) as usize;
                    let written = rb.write(&chunk[..want]);
                    if written == 0 {
                        thread::yield_now();
                    }
                    sent += written as u64;
                }
            })
        })
        .collect();

    let consumer = {
        let rb = Arc::clone(&rb);
        let counts = [Arc::clone(&counts[0]), Arc::clone(&counts[1])];
        thread::spawn(move || {
            let mut buf = [0u8; 64];
            let mut received = 0u64;
            while received < 2 * PER_PRODUCER {
                let read = rb.read(&mut buf);
                if read == 0 {
                    thread::yield_now();
                    continue;
                }
                for byte in &buf[..read] {
                    match *byte {
                        0xAA => counts[0].fetch_add(1, Ordering::Relaxed),
                        0xBB => counts[1].fetch_add(1, Ordering::Relaxed),
                        other => panic!("unexpected byte {other:#x} in stream"),
                    };
                }
                received += read as u64;
            }
        })
    };

    for producer in producers {
        producer.join().unwrap();
    }
    consumer.join().unwrap();

    assert_eq!(counts[0].load(Ordering::Relaxed), PER_PRODUCER);
    assert_eq!(counts[1].load(Ordering::Relaxed), PER_PRODUCER);
    assert!(rb.is_empty());
}
