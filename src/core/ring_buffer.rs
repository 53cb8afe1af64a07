//! Mutex-Guarded Byte Ring Buffer
//!
//! Circular byte buffer dengan kapasitas tetap untuk producer/consumer
//! yang berjalan di thread paralel. Semua mutasi lewat satu Mutex yang
//! di-hold selama durasi call, jadi write dan read selalu atomik satu
//! sama lain - tidak pernah ada cursor/size state yang torn.
//!
//! Tidak ada blocking menunggu space atau data: write dan read selalu
//! return langsung dengan jumlah byte yang berhasil ditransfer (bisa 0).

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::core::RingError;

/// Storage dan kedua cursor, dilindungi Mutex.
///
/// Layout region:
///
/// ```text
/// 0                    read              write       capacity
/// |                      |                 |              |
/// ▼                      ▼                 ▼              ▼
/// ---------------------------------------------------------
/// |<------ avail ------->|<---- filled --->|<--- avail -->|
/// ---------------------------------------------------------
/// ```
///
/// Saat `write == read` region bisa kosong total atau penuh total;
/// hanya fill counter yang membedakan, bukan posisi cursor.
struct Region {
    storage: Box<[u8]>,
    /// Offset byte berikutnya yang dibaca. Selalu `< capacity`.
    read: u16,
    /// Offset byte berikutnya yang ditulis. Selalu `< capacity`.
    write: u16,
}

impl Region {
    /// Hitung ulang fill level dari posisi cursor. Saat `write == read`
    /// hasilnya ambigu (kosong atau penuh), jadi `filled` dipakai sebagai
    /// disambiguator. Dipakai debug build untuk cross-check counter.
    fn recount(&self, filled: u16, capacity: u16) -> u16 {
        if self.write == self.read {
            if filled == capacity {
                capacity
            } else {
                0
            }
        } else if self.read < self.write {
            self.write - self.read
        } else {
            (capacity - self.read) + self.write
        }
    }
}

/// Byte ring buffer dengan kapasitas tetap, thread-safe via satu Mutex.
///
/// Kapasitas 1-65535 byte, dialokasikan sekali saat konstruksi. Write yang
/// melebihi space tersisa di-truncate (partial write), tidak pernah
/// menimpa byte yang belum dibaca.
///
/// # Accessor policy
///
/// Query (`bytes_filled`, `bytes_available`, `is_empty`, `is_full`) TIDAK
/// mengambil lock. Fill counter disimpan di `AtomicU16` yang di-update di
/// dalam critical section, jadi query data-race-free tapi hasilnya hanya
/// snapshot advisory: bisa langsung stale begitu thread lain mutasi.
pub struct RingBuffer {
    region: Mutex<Region>,
    /// Jumlah byte live (belum dibaca). Invariant: `0 <= filled <= capacity`.
    filled: AtomicU16,
    capacity: u16,
}

impl RingBuffer {
    /// Membuat ring buffer baru dengan kapasitas tetap.
    ///
    /// Storage dialokasikan sekali di sini, tidak pernah resize. Alokasi
    /// fallible: kegagalan dikembalikan sebagai [`RingError`], bukan abort.
    ///
    /// # Errors
    /// - [`RingError::ZeroCapacity`] jika `capacity == 0`
    /// - [`RingError::AllocationFailed`] jika alokasi gagal
    pub fn with_capacity(capacity: u16) -> Result<Self, RingError> {
        if capacity == 0 {
            return Err(RingError::ZeroCapacity);
        }

        let mut storage = Vec::new();
        storage.try_reserve_exact(capacity as usize)?;
        storage.resize(capacity as usize, 0u8);

        Ok(Self {
            region: Mutex::new(Region {
                storage: storage.into_boxed_slice(),
                read: 0,
                write: 0,
            }),
            filled: AtomicU16::new(0),
            capacity,
        })
    }

    /// Ambil lock. Poisoning di-absorb: critical section kita tidak pernah
    /// panic, jadi invariant tetap utuh meskipun guard sempat poisoned.
    fn lock(&self) -> MutexGuard<'_, Region> {
        self.region.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reset buffer ke kondisi fresh: storage di-zero, kedua cursor ke
    /// awal region, fill counter ke 0. Idempotent.
    pub fn reset(&self) {
        let mut region = self.lock();

        region.storage.fill(0);
        region.read = 0;
        region.write = 0;

        self.filled.store(0, Ordering::Relaxed);
    }

    /// Jumlah byte yang masih bisa ditulis. Snapshot advisory (lihat
    /// accessor policy pada dokumentasi type).
    #[inline(always)]
    pub fn bytes_available(&self) -> u16 {
        self.capacity - self.bytes_filled()
    }

    /// Jumlah byte live yang menunggu dibaca. Snapshot advisory.
    #[inline(always)]
    pub fn bytes_filled(&self) -> u16 {
        self.filled.load(Ordering::Relaxed)
    }

    /// Kapasitas tetap buffer, dalam byte.
    #[inline(always)]
    pub const fn capacity(&self) -> u16 {
        self.capacity
    }

    /// Cek apakah buffer kosong. Snapshot advisory.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bytes_filled() == 0
    }

    /// Cek apakah buffer penuh. Snapshot advisory.
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.bytes_filled() == self.capacity
    }

    /// Tulis byte dari `src` ke buffer (producer side).
    ///
    /// Best-effort: di-clamp ke space tersisa, kelebihannya di-drop tanpa
    /// error. Returns jumlah byte yang benar-benar tertulis (bisa 0 saat
    /// buffer penuh atau `src` kosong). Lock di-hold selama copy.
    pub fn write(&self, src: &[u8]) -> usize {
        if src.is_empty() {
            return 0;
        }

        let mut region = self.lock();

        let filled = self.filled.load(Ordering::Relaxed);
        let available = self.capacity - filled;
        if available == 0 {
            return 0;
        }

        let len = src.len().min(available as usize);
        let cap = self.capacity as usize;
        let w = region.write as usize;
        let r = region.read as usize;

        if w < r {
            // Region bebas contiguous: [write, read)
            region.storage[w..w + len].copy_from_slice(&src[..len]);
            region.write = wrap(w + len, cap);
        } else {
            // Region bebas terbelah: right block [write, capacity) lalu
            // left block [0, read)
            let right_space = cap - w;

            if len <= right_space {
                region.storage[w..w + len].copy_from_slice(&src[..len]);
                region.write = wrap(w + len, cap);
            } else {
                region.storage[w..cap].copy_from_slice(&src[..right_space]);

                let remaining = len - right_space;
                region.storage[..remaining].copy_from_slice(&src[right_space..len]);
                region.write = remaining as u16;
            }
        }

        let filled = filled + len as u16;
        self.filled.store(filled, Ordering::Relaxed);
        debug_assert_eq!(region.recount(filled, self.capacity), filled);

        len
    }

    /// Baca byte dari buffer ke `dst` (consumer side).
    ///
    /// Simetris dengan [`write`](Self::write): di-clamp ke jumlah byte
    /// live, returns jumlah byte yang benar-benar terbaca (bisa 0 saat
    /// buffer kosong atau `dst` kosong). Lock di-hold selama copy.
    pub fn read(&self, dst: &mut [u8]) -> usize {
        if dst.is_empty() {
            return 0;
        }

        let mut region = self.lock();

        let filled = self.filled.load(Ordering::Relaxed);
        if filled == 0 {
            return 0;
        }

        let len = dst.len().min(filled as usize);
        let cap = self.capacity as usize;
        let r = region.read as usize;
        let w = region.write as usize;

        if r < w {
            // Region terisi contiguous: [read, write)
            dst[..len].copy_from_slice(&region.storage[r..r + len]);
            region.read = wrap(r + len, cap);
        } else {
            // Region terisi terbelah: right block [read, capacity) lalu
            // left block [0, write)
            let right_filled = cap - r;

            if len <= right_filled {
                dst[..len].copy_from_slice(&region.storage[r..r + len]);
                region.read = wrap(r + len, cap);
            } else {
                dst[..right_filled].copy_from_slice(&region.storage[r..cap]);

                let remaining = len - right_filled;
                dst[right_filled..len].copy_from_slice(&region.storage[..remaining]);
                region.read = remaining as u16;
            }
        }

        let filled = filled - len as u16;
        self.filled.store(filled, Ordering::Relaxed);
        debug_assert_eq!(region.recount(filled, self.capacity), filled);

        len
    }
}

/// Wrap cursor ke awal region tepat saat menyentuh boundary, tidak pernah
/// melewatinya.
#[inline]
fn wrap(pos: usize, capacity: usize) -> u16 {
    debug_assert!(pos <= capacity);
    if pos == capacity {
        0
    } else {
        pos as u16
    }
}
