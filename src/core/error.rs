//! Error types untuk konstruksi ring buffer.
//!
//! Hanya konstruksi yang bisa gagal. Operasi I/O (write/read/pop/push)
//! selalu best-effort dan mengembalikan jumlah byte yang benar-benar
//! ditransfer, tidak pernah error.

use std::collections::TryReserveError;
use thiserror::Error;

/// Error saat membuat ring buffer.
#[derive(Debug, Error)]
pub enum RingError {
    /// Kapasitas 0 tidak valid - buffer harus bisa menampung minimal 1 byte.
    #[error("capacity must be at least 1 byte")]
    ZeroCapacity,

    /// Alokasi storage gagal. Recoverable: caller bisa retry dengan
    /// kapasitas yang lebih kecil.
    #[error("storage allocation failed: {0}")]
    AllocationFailed(#[from] TryReserveError),

    /// [`SpscRing`](crate::core::SpscRing) membutuhkan kapasitas power of
    /// two untuk mask indexing.
    #[error("capacity must be a power of two, got {0}")]
    CapacityNotPowerOfTwo(usize),
}
