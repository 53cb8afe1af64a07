//! Ouro - Fixed-Capacity Concurrent Byte Ring Buffer
//!
//! Arsitektur:
//! - Fixed-Capacity: region byte contiguous, dialokasikan sekali
//! - Best-Effort: tidak ada blocking/backpressure, operasi selalu return
//!   langsung dengan jumlah byte yang ditransfer
//! - Dua varian: [`RingBuffer`] (Mutex, bebas jumlah thread) dan
//!   [`SpscRing`] (lock-free, tepat satu producer + satu consumer)
//!
//! # Contoh
//!
//! ```
//! use ouro::RingBuffer;
//!
//! let rb = RingBuffer::with_capacity(8)?;
//! assert_eq!(rb.write(b"ABCDE"), 5);
//!
//! let mut buf = [0u8; 3];
//! assert_eq!(rb.read(&mut buf), 3);
//! assert_eq!(&buf, b"ABC");
//! # Ok::<(), ouro::RingError>(())
//! ```

pub mod core;

pub use crate::core::{RingBuffer, RingError, SpscRing};
