//! # 容量与长度头部模块
//!
//! 在触碰任何像素之前校验消息：比特长度必须能放进 32 位头部，且头部加消息必须放得进图像。
//! 同时定义头部的位序：`bits_len` 以 MSB 优先的顺序占据比特流的前 32 个槽。

use crate::constants::{CHANNELS_PER_PIXEL, HEADER_BITS, MAX_PAYLOAD_BITS};
use crate::error::StegoError;
use crate::grid::PixelGrid;
use log::debug;

/// 网格可用的比特槽总数，即 `width * height * 3`。
pub fn capacity_of<G>(grid: &G) -> u64
where
    G: PixelGrid + ?Sized,
{
    u64::from(grid.width()) * u64::from(grid.height()) * CHANNELS_PER_PIXEL
}

/// 计算 `byte_len` 字节消息的比特长度，并确认它能用 `u32` 表示。
pub fn measure(byte_len: usize) -> Result<u32, StegoError> {
    let too_large = || StegoError::MessageTooLarge {
        bytes: byte_len,
        max_bits: MAX_PAYLOAD_BITS,
    };

    let bits = (byte_len as u64).checked_mul(8).ok_or_else(too_large)?;
    u32::try_from(bits).map_err(|_| too_large())
}

/// 确认 `HEADER_BITS + bits_len` 个比特能放进 `capacity` 个槽。
pub fn check_capacity(bits_len: u32, capacity: u64) -> Result<(), StegoError> {
    let required = HEADER_BITS + u64::from(bits_len);
    if required > capacity {
        return Err(StegoError::ImageTooSmall {
            required,
            available: capacity,
        });
    }
    Ok(())
}

/// 编码前的完整校验，成功时返回写入头部的 `bits_len`。
///
/// # Errors
///
/// * `MessageTooLarge` - 消息比特长度超过 `u32::MAX`，与图像大小无关。
/// * `ImageTooSmall` - 图像容量不足以容纳头部加消息。
pub fn validate_and_measure<G>(grid: &G, message: &[u8]) -> Result<u32, StegoError>
where
    G: PixelGrid + ?Sized,
{
    validate_len(grid, message.len())
}

/// 与 [`validate_and_measure`] 相同，但只需要消息的字节数。
/// 长度检查先于容量检查：过大的消息无论图像多大都返回 `MessageTooLarge`。
pub fn validate_len<G>(grid: &G, byte_len: usize) -> Result<u32, StegoError>
where
    G: PixelGrid + ?Sized,
{
    let bits_len = measure(byte_len)?;
    let capacity = capacity_of(grid);
    debug!(
        "Message needs {} bits plus {} header bits, image offers {} bits",
        bits_len, HEADER_BITS, capacity
    );
    check_capacity(bits_len, capacity)?;
    Ok(bits_len)
}

/// 头部的第 `i` 个比特 (`i < 32`)，MSB 优先。
pub fn header_bit(bits_len: u32, i: u32) -> bool {
    debug_assert!(u64::from(i) < HEADER_BITS);
    (bits_len >> (31 - i)) & 1 == 1
}

/// 按 MSB 优先的顺序逐比特重建头部中的 `bits_len`。
#[derive(Debug, Default)]
pub struct HeaderAccumulator {
    value: u32,
    read: u32,
}

impl HeaderAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个比特。已读满 32 位时返回 `false` 且不做任何改动。
    pub fn push(&mut self, bit: bool) -> bool {
        if self.is_complete() {
            return false;
        }
        self.value = (self.value << 1) | u32::from(bit);
        self.read += 1;
        true
    }

    pub fn is_complete(&self) -> bool {
        u64::from(self.read) == HEADER_BITS
    }

    /// 读满 32 位后返回 `bits_len`，否则返回 `None`。
    pub fn finish(&self) -> Option<u32> {
        self.is_complete().then_some(self.value)
    }
}

/// 消息的字节数。非 8 的倍数时多出的比特被忽略。
pub fn payload_bytes(bits_len: u32) -> usize {
    (bits_len / 8) as usize
}

/// 给定容量下能隐藏的最大消息字节数。
pub fn max_message_bytes(capacity: u64) -> u64 {
    (capacity.saturating_sub(HEADER_BITS) / 8).min(MAX_PAYLOAD_BITS / 8)
}
