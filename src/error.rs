//! # 错误类型模块
//!
//! 核心编解码逻辑返回的类型化错误。应用层 (`handler`) 再用 `anyhow` 为其补充上下文。

use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StegoError {
    /// 消息的比特长度无法用 32 位无符号整数表示。
    #[error("Message is too large: {bytes} bytes exceed the 32-bit length header (max {max_bits} bits)")]
    MessageTooLarge { bytes: usize, max_bits: u64 },

    /// 头部加消息所需的比特数超过了图像容量。
    #[error("Image too small to hold the entire message. \nRequired: {required} bits, Available: {available} bits")]
    ImageTooSmall { required: u64, available: u64 },

    /// 提取出的字节不是合法的 UTF-8 文本。
    #[error("Hidden payload is not valid UTF-8 text")]
    MalformedPayload(#[from] FromUtf8Error),

    /// 头部声明的长度超出了图像实际能承载的范围。
    #[error("Length header announces {bits_len} payload bits, but the image only holds {available} bits after the header")]
    CorruptHeader { bits_len: u32, available: u64 },
}
