//! Core module: byte ring buffer dengan dua varian sinkronisasi
//!
//! Prinsip desain:
//! - Fixed-Capacity: storage dialokasikan sekali saat konstruksi
//! - Best-Effort: write/read di-clamp, tidak pernah blocking
//! - Bounded: setiap operasi maksimal dua copy berukuran terbatas

mod error;
mod ring_buffer;
mod spsc;

pub use error::RingError;
pub use ring_buffer::RingBuffer;
pub use spsc::SpscRing;
