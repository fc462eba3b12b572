//! Scoped acquisition of the process-local floating-point environment.
//!
//! The conversion core requires round-to-nearest-even with denormals and
//! flush-to-zero disabled. [`FpEnvScope`] forces that state for the
//! duration of a single call and restores whatever was there before on
//! every exit path, including unwinding. [`FpEnvBatchGuard`] is the same
//! mechanism held for the duration of a loop of conversions, to avoid
//! repeatedly touching the FP control registers; nesting a per-call
//! [`FpEnvScope`] inside an outer [`FpEnvBatchGuard`] is safe because both
//! just save/restore whatever state they observe on entry.

/// Opaque saved FP control state, restored on drop.
#[derive(Clone, Copy)]
struct SavedState(Inner);

#[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
#[derive(Clone, Copy)]
struct Inner {
    mxcsr: u32,
}

#[cfg(all(
    target_arch = "x86",
    target_feature = "sse2"
))]
#[derive(Clone, Copy)]
struct Inner {
    mxcsr: u32,
}

#[cfg(target_arch = "aarch64")]
#[derive(Clone, Copy)]
struct Inner {
    fpcr: u64,
}

#[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "sse2"),
    all(target_arch = "x86", target_feature = "sse2"),
    target_arch = "aarch64"
)))]
#[derive(Clone, Copy)]
struct Inner;

#[cfg(any(
    all(target_arch = "x86_64", target_feature = "sse2"),
    all(target_arch = "x86", target_feature = "sse2")
))]
fn enter() -> SavedState {
    // Bits in MXCSR: flush-to-zero (15), denormals-are-zero (6), rounding
    // mode (bits 13-14, 00 == round-to-nearest).
    const FLUSH_TO_ZERO: u32 = 1 << 15;
    const DENORMALS_ARE_ZERO: u32 = 1 << 6;
    const ROUND_MASK: u32 = 0b11 << 13;

    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::{_mm_getcsr, _mm_setcsr};
    #[cfg(target_arch = "x86")]
    use std::arch::x86::{_mm_getcsr, _mm_setcsr};

    unsafe {
        let prev = _mm_getcsr();
        let mut cur = prev;
        cur &= !(FLUSH_TO_ZERO | DENORMALS_ARE_ZERO | ROUND_MASK);
        _mm_setcsr(cur);
        SavedState(Inner { mxcsr: prev })
    }
}

#[cfg(any(
    all(target_arch = "x86_64", target_feature = "sse2"),
    all(target_arch = "x86", target_feature = "sse2")
))]
fn exit(saved: SavedState) {
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::_mm_setcsr;
    #[cfg(target_arch = "x86")]
    use std::arch::x86::_mm_setcsr;

    unsafe {
        _mm_setcsr(saved.0.mxcsr);
    }
}

#[cfg(target_arch = "aarch64")]
fn enter() -> SavedState {
    // FPCR bits: AHP/FZ is bit 24 (flush-to-zero), rounding mode is bits
    // 22-23 (00 == round-to-nearest-even).
    const FLUSH_TO_ZERO: u64 = 1 << 24;
    const ROUND_MASK: u64 = 0b11 << 22;

    let prev: u64;
    unsafe {
        std::arch::asm!("mrs {0}, fpcr", out(reg) prev);
        let cur = prev & !(FLUSH_TO_ZERO | ROUND_MASK);
        std::arch::asm!("msr fpcr, {0}", in(reg) cur);
    }
    SavedState(Inner { fpcr: prev })
}

#[cfg(target_arch = "aarch64")]
fn exit(saved: SavedState) {
    unsafe {
        std::arch::asm!("msr fpcr, {0}", in(reg) saved.0.fpcr);
    }
}

#[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "sse2"),
    all(target_arch = "x86", target_feature = "sse2"),
    target_arch = "aarch64"
)))]
fn enter() -> SavedState {
    // No known way to touch the FP control state on this target; trust
    // the caller's ambient environment, per the concurrency contract.
    SavedState(Inner)
}

#[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "sse2"),
    all(target_arch = "x86", target_feature = "sse2"),
    target_arch = "aarch64"
)))]
fn exit(_saved: SavedState) {}

/// A scoped, per-call acquisition of the standard floating-point
/// environment. Construction forces round-to-nearest-even with
/// flush-to-zero/denormals-are-zero disabled; drop restores the prior
/// state verbatim.
pub struct FpEnvScope(SavedState);

impl FpEnvScope {
    #[inline]
    pub fn new() -> Self {
        FpEnvScope(enter())
    }
}

impl Default for FpEnvScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FpEnvScope {
    fn drop(&mut self) {
        exit(self.0);
    }
}

/// The same acquisition as [`FpEnvScope`], held for the duration of a batch
/// of conversions rather than a single call. Nesting an [`FpEnvScope`]
/// inside a held [`FpEnvBatchGuard`] is safe: the inner scope observes the
/// state the outer guard already set, and restores exactly that state on
/// its own exit, leaving the outer guard's invariant intact.
pub struct FpEnvBatchGuard(FpEnvScope);

impl FpEnvBatchGuard {
    #[inline]
    pub fn new() -> Self {
        FpEnvBatchGuard(FpEnvScope::new())
    }
}

impl Default for FpEnvBatchGuard {
    fn default() -> Self {
        Self::new()
    }
}
