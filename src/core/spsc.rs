//! Lock-Free Single-Producer Single-Consumer (SPSC) Byte Ring
//!
//! Varian tanpa lock dari [`RingBuffer`](crate::core::RingBuffer), sebagai
//! trade-off terdokumentasi: implementasi Lamport queue dengan memory
//! ordering yang tepat. Tidak ada Mutex, tidak ada alokasi setelah
//! inisialisasi. Sebagai gantinya, kontrak pemakaian lebih ketat: tepat
//! satu thread producer memanggil `push`, tepat satu thread consumer
//! memanggil `pop`.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::RingError;

/// Padding untuk cache line isolation (64 bytes pada x86-64)
#[repr(C, align(64))]
struct CacheLinePadded<T> {
    value: T,
}

impl<T> CacheLinePadded<T> {
    const fn new(value: T) -> Self {
        Self { value }
    }
}

/// Lock-Free SPSC Byte Ring
///
/// Head dan tail adalah counter monotonic di cache line terpisah untuk
/// menghindari false sharing antara producer dan consumer; offset ke
/// storage diambil lewat mask (kapasitas harus power of 2).
///
/// Sama seperti varian locked, push dan pop best-effort: di-clamp ke
/// space/byte yang tersedia, tidak pernah blocking.
#[repr(C)]
pub struct SpscRing {
    // Producer side - cache line aligned
    head: CacheLinePadded<AtomicUsize>,
    // Consumer side - cache line aligned
    tail: CacheLinePadded<AtomicUsize>,
    // Pre-allocated buffer di heap - tidak ada alokasi setelah init
    storage: UnsafeCell<Box<[u8]>>,
    // Mask untuk operasi modulo yang cepat
    mask: usize,
}

// SAFETY: SpscRing aman untuk Send/Sync karena:
// - Hanya satu producer (menulis head, mengisi region [tail, head+len))
// - Hanya satu consumer (menulis tail, membaca region [tail, head))
// - Atomic Release/Acquire menjamin byte yang di-publish visible
unsafe impl Send for SpscRing {}
unsafe impl Sync for SpscRing {}

impl SpscRing {
    /// Membuat SPSC ring baru. Kapasitas HARUS power of 2.
    ///
    /// Alokasi hanya terjadi sekali di sini, fallible. Setelah itu tidak
    /// ada alokasi di hot path.
    ///
    /// # Errors
    /// - [`RingError::ZeroCapacity`] jika `capacity == 0`
    /// - [`RingError::CapacityNotPowerOfTwo`] jika bukan power of 2
    /// - [`RingError::AllocationFailed`] jika alokasi gagal
    pub fn with_capacity(capacity: usize) -> Result<Self, RingError> {
        if capacity == 0 {
            return Err(RingError::ZeroCapacity);
        }
        if !capacity.is_power_of_two() {
            return Err(RingError::CapacityNotPowerOfTwo(capacity));
        }

        let mut storage = Vec::new();
        storage.try_reserve_exact(capacity)?;
        storage.resize(capacity, 0u8);

        Ok(Self {
            head: CacheLinePadded::new(AtomicUsize::new(0)),
            tail: CacheLinePadded::new(AtomicUsize::new(0)),
            storage: UnsafeCell::new(storage.into_boxed_slice()),
            mask: capacity - 1,
        })
    }

    /// Tulis byte dari `src` ke ring (Producer side).
    ///
    /// Returns jumlah byte yang tertulis, di-clamp ke space tersisa.
    /// Zero-allocation, lock-free.
    #[inline(always)]
    pub fn push(&self, src: &[u8]) -> usize {
        if src.is_empty() {
            return 0;
        }

        let head = self.head.value.load(Ordering::Relaxed);
        let tail = self.tail.value.load(Ordering::Acquire);

        let capacity = self.mask + 1;
        let free = capacity - head.wrapping_sub(tail);
        if free == 0 {
            return 0;
        }

        let len = src.len().min(free);
        let start = head & self.mask;
        let right_space = capacity - start;

        // SAFETY: producer adalah satu-satunya penulis region free
        // [head, head+len); consumer tidak menyentuhnya sebelum head
        // di-publish di bawah.
        unsafe {
            let data = (*self.storage.get()).as_mut_ptr();
            if len <= right_space {
                std::ptr::copy_nonoverlapping(src.as_ptr(), data.add(start), len);
            } else {
                // Dua block: right block sampai boundary, sisanya wrap ke
                // awal region
                std::ptr::copy_nonoverlapping(src.as_ptr(), data.add(start), right_space);
                std::ptr::copy_nonoverlapping(
                    src.as_ptr().add(right_space),
                    data,
                    len - right_space,
                );
            }
        }

        // Release fence: pastikan copy di atas visible sebelum head di-update
        self.head
            .value
            .store(head.wrapping_add(len), Ordering::Release);

        len
    }

    /// Baca byte dari ring ke `dst` (Consumer side).
    ///
    /// Returns jumlah byte yang terbaca, di-clamp ke byte yang tersedia.
    /// Zero-allocation, lock-free.
    #[inline(always)]
    pub fn pop(&self, dst: &mut [u8]) -> usize {
        if dst.is_empty() {
            return 0;
        }

        let tail = self.tail.value.load(Ordering::Relaxed);
        let head = self.head.value.load(Ordering::Acquire);

        let filled = head.wrapping_sub(tail);
        if filled == 0 {
            return 0;
        }

        let len = dst.len().min(filled);
        let start = tail & self.mask;
        let capacity = self.mask + 1;
        let right_filled = capacity - start;

        // SAFETY: region [tail, tail+len) sudah di-publish producer lewat
        // Acquire load pada head, dan producer tidak menulisnya lagi
        // sebelum tail di-update di bawah.
        unsafe {
            let data = (*self.storage.get()).as_ptr();
            if len <= right_filled {
                std::ptr::copy_nonoverlapping(data.add(start), dst.as_mut_ptr(), len);
            } else {
                std::ptr::copy_nonoverlapping(data.add(start), dst.as_mut_ptr(), right_filled);
                std::ptr::copy_nonoverlapping(
                    data,
                    dst.as_mut_ptr().add(right_filled),
                    len - right_filled,
                );
            }
        }

        // Release fence: pastikan copy di atas selesai sebelum tail di-update
        self.tail
            .value
            .store(tail.wrapping_add(len), Ordering::Release);

        len
    }

    /// Jumlah byte dalam ring. Snapshot advisory di bawah concurrency.
    #[inline(always)]
    pub fn len(&self) -> usize {
        let head = self.head.value.load(Ordering::Acquire);
        let tail = self.tail.value.load(Ordering::Acquire);
        head.wrapping_sub(tail)
    }

    /// Cek apakah ring kosong
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cek apakah ring penuh
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Kapasitas ring dalam byte
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.mask + 1
    }
}
