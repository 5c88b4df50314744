//! Slot sizing: map a primary runtime to a fixed bucket.
//!
//! Convention: the smallest bucket whose span is >= the runtime
//! (closed-below/open-above), so a runtime of exactly 30 minutes sizes to
//! the 30-minute bucket. Runtimes past 240 minutes don't fit any bucket.

use cathode_common::{Error, Result, SlotSize};

/// Smallest bucket that holds `runtime_secs`, or `NoSizeFits` past 240 min.
pub fn slot_size(runtime_secs: u32) -> Result<SlotSize> {
    SlotSize::ALL
        .into_iter()
        .find(|size| runtime_secs <= size.secs())
        .ok_or(Error::NoSizeFits { runtime_secs })
}

/// Sizing for callers that must keep scheduling: long-form content clamps to
/// the largest bucket with a warning instead of failing the block.
pub fn slot_size_or_max(runtime_secs: u32) -> SlotSize {
    slot_size(runtime_secs).unwrap_or_else(|_| {
        tracing::warn!(runtime_secs, "runtime exceeds largest bucket, clamping to 240min");
        SlotSize::M240
    })
}
