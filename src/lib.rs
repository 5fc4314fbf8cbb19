//! # rgb_lsb 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：在 RGB 通道的最低有效位中嵌入带 32 位长度头部的 UTF-8 文本，并将其提取回来。

// 声明库包含的所有模块。

pub mod capacity;
pub mod cli;
pub mod constants;
pub mod error;
pub mod grid;
pub mod handler;
pub mod steganography;

pub use error::StegoError;
pub use grid::{PixelGrid, PixelGridMut};
pub use steganography::{EmbedSummary, decode, embed, encode, extract};
