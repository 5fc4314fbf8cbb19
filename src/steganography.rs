//! # LSB 嵌入与提取核心
//!
//! 比特流 = 32 位长度头部 (MSB 优先) + 消息字节 (每字节 MSB 优先)。
//! 按光栅顺序遍历：行从上到下，列从左到右，通道按 红 → 绿 → 蓝，每个通道的最低位承载一个比特。
//! 该遍历顺序就是“线上格式”，编码与解码必须完全一致。

use crate::capacity::{
    HeaderAccumulator, capacity_of, header_bit, payload_bytes, validate_and_measure,
};
use crate::constants::HEADER_BITS;
use crate::error::StegoError;
use crate::grid::{PixelGrid, PixelGridMut};
use log::debug;

/// 头部加消息的逻辑比特流。第 `i` 个比特是 `i` 的纯函数，不需要维护移位掩码。
#[derive(Debug, Clone, Copy)]
pub struct BitStream<'a> {
    bits_len: u32,
    payload: &'a [u8],
}

impl<'a> BitStream<'a> {
    /// 仅在 `bits_len == payload.len() * 8` 时构造，由 `validate_and_measure` 保证。
    fn new(bits_len: u32, payload: &'a [u8]) -> Self {
        debug_assert_eq!(u64::from(bits_len), payload.len() as u64 * 8);
        Self { bits_len, payload }
    }

    pub fn bits_len(&self) -> u32 {
        self.bits_len
    }

    /// 比特流总长度：`32 + bits_len`。
    pub fn total_bits(&self) -> u64 {
        HEADER_BITS + u64::from(self.bits_len)
    }

    /// 比特流中的第 `i` 个比特。
    pub fn bit(&self, i: u64) -> bool {
        if i < HEADER_BITS {
            return header_bit(self.bits_len, i as u32);
        }
        let p = i - HEADER_BITS;
        let byte = self.payload[(p / 8) as usize];
        (byte >> (7 - p % 8)) & 1 == 1
    }
}

/// 一次成功嵌入的统计信息。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedSummary {
    /// 写入头部的消息比特长度。
    pub bits_len: u32,
    /// 被改写的通道槽数量 (头部 + 消息)。
    pub slots_written: u64,
    /// 被提交过的像素数量。
    pub pixels_touched: u64,
}

/// 光栅顺序的像素坐标。
fn raster(width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
}

/// 光栅顺序下每个通道槽的最低位。
fn lsb_slots<G>(grid: &G) -> impl Iterator<Item = bool> + '_
where
    G: PixelGrid + ?Sized,
{
    raster(grid.width(), grid.height())
        .flat_map(move |(x, y)| grid.rgb(x, y))
        .map(|channel| channel & 1 == 1)
}

fn with_lsb(channel: u8, bit: bool) -> u8 {
    if bit { channel | 1 } else { channel & !1 }
}

/// 将 `payload` 嵌入到像素网格中。
///
/// 所有校验都在第一次写入前完成：失败时网格保持原样。
/// 成功时只改写前 `32 + bits_len` 个通道槽的最低位，之后的槽与像素不做任何修改。
/// 每个被访问的像素在其通道处理完后提交一次。
///
/// # Errors
///
/// * `MessageTooLarge` - 消息比特长度无法放进 32 位头部。
/// * `ImageTooSmall` - 图像容量不足。
pub fn embed<G>(grid: &mut G, payload: &[u8]) -> Result<EmbedSummary, StegoError>
where
    G: PixelGridMut + ?Sized,
{
    let bits_len = validate_and_measure(&*grid, payload)?;
    let stream = BitStream::new(bits_len, payload);
    let total = stream.total_bits();

    let mut i = 0u64;
    let mut pixels_touched = 0u64;
    for (x, y) in raster(grid.width(), grid.height()) {
        if i == total {
            break;
        }
        let mut rgb = grid.rgb(x, y);
        for channel in rgb.iter_mut() {
            if i == total {
                break;
            }
            *channel = with_lsb(*channel, stream.bit(i));
            i += 1;
        }
        grid.set_rgb(x, y, rgb);
        pixels_touched += 1;
    }
    // 容量由 width * height 推出，校验通过后扫描必然写完整个比特流
    debug_assert_eq!(i, total);

    debug!(
        "Embedded {} header bits and {} payload bits across {} pixels",
        HEADER_BITS, bits_len, pixels_touched
    );

    Ok(EmbedSummary {
        bits_len,
        slots_written: i,
        pixels_touched,
    })
}

/// 从像素网格中提取隐藏的字节。
///
/// 先读 32 个槽得到 `bits_len`，再紧接着读 `bits_len / 8` 个字节，绝不越过 `32 + bits_len` 个槽。
///
/// # Errors
///
/// * `ImageTooSmall` - 图像连 32 位头部都放不下。
/// * `CorruptHeader` - 头部声明的长度超过图像剩余容量，说明图像中没有有效消息。
pub fn extract<G>(grid: &G) -> Result<Vec<u8>, StegoError>
where
    G: PixelGrid + ?Sized,
{
    let capacity = capacity_of(grid);
    let mut slots = lsb_slots(grid);

    let mut header = HeaderAccumulator::new();
    for bit in slots.by_ref().take(HEADER_BITS as usize) {
        header.push(bit);
    }
    let bits_len = header.finish().ok_or(StegoError::ImageTooSmall {
        required: HEADER_BITS,
        available: capacity,
    })?;

    let len = payload_bytes(bits_len);
    let available = capacity.saturating_sub(HEADER_BITS);
    if len as u64 * 8 > available {
        return Err(StegoError::CorruptHeader {
            bits_len,
            available,
        });
    }
    debug!("Length header announces {} bits ({} bytes)", bits_len, len);

    let mut bytes = vec![0u8; len];
    for (k, bit) in slots.take(len * 8).enumerate() {
        if bit {
            bytes[k / 8] |= 0x80 >> (k % 8);
        }
    }
    Ok(bytes)
}

/// 将 UTF-8 文本嵌入到像素网格中。见 [`embed`]。
pub fn encode<G>(grid: &mut G, message: &str) -> Result<EmbedSummary, StegoError>
where
    G: PixelGridMut + ?Sized,
{
    embed(grid, message.as_bytes())
}

/// 提取隐藏的文本。
///
/// # Errors
///
/// 除 [`extract`] 的错误外，字节不是合法 UTF-8 时返回 `MalformedPayload`。
pub fn decode<G>(grid: &G) -> Result<String, StegoError>
where
    G: PixelGrid + ?Sized,
{
    Ok(String::from_utf8(extract(grid)?)?)
}
