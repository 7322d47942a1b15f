//! Stack growth for deeply nested expression trees.
//!
//! The lowerer, the constant materializer and the renderer all recurse once
//! per tree level. Front-ends can hand us arbitrarily deep trees (long
//! left-leaning operator chains are the usual case), so every recursive
//! entry point goes through [`ensure_sufficient_stack`].

/// If less than this much stack remains, grow it.
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
