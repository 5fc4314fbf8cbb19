//! # 命令处理逻辑模块
//!
//! 包含处理 `encode`、`decode` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::capacity::{capacity_of, max_message_bytes};
use crate::cli::{CapacityArgs, DecodeArgs, EncodeArgs};
use crate::constants::{DEFAULT_IMAGE_EXTENSION, DOCTORED_PREFIX};
use crate::grid::{PixelGrid, PixelGridMut};
use crate::steganography::{decode, encode};
use anyhow::{Context, Result};
use colored::Colorize;
use image::{ColorType, ImageResult, RgbImage, RgbaImage};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 解码后的载体图像。带 alpha 通道的图像保持 RGBA，其余统一为 8 位 RGB。
enum Carrier {
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

impl Carrier {
    fn open(path: &Path) -> Result<Self> {
        let img = image::open(path).with_context(|| {
            format!(
                "Unable to read image file: {}",
                path.to_string_lossy().red().bold()
            )
        })?;
        info!(
            "Loaded {} ({}x{}, {:?})",
            path.display(),
            img.width(),
            img.height(),
            img.color()
        );

        if !matches!(img.color(), ColorType::Rgb8 | ColorType::Rgba8) {
            warn!(
                "{} is {:?}; it will be converted to 8-bit RGB(A), so the output differs from the input in more than the lowest bits",
                path.display(),
                img.color()
            );
        }

        Ok(if img.color().has_alpha() {
            Carrier::Rgba(img.into_rgba8())
        } else {
            Carrier::Rgb(img.into_rgb8())
        })
    }

    fn grid(&self) -> &dyn PixelGrid {
        match self {
            Carrier::Rgb(img) => img,
            Carrier::Rgba(img) => img,
        }
    }

    fn grid_mut(&mut self) -> &mut dyn PixelGridMut {
        match self {
            Carrier::Rgb(img) => img,
            Carrier::Rgba(img) => img,
        }
    }

    fn save(&self, path: &Path) -> ImageResult<()> {
        match self {
            Carrier::Rgb(img) => img.save(path),
            Carrier::Rgba(img) => img.save(path),
        }
    }
}

/// 未指定输出路径时的默认隐写结果路径：输入图像旁的 `doctored_<name>.png`。
pub fn default_dest(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    image.with_file_name(format!("{DOCTORED_PREFIX}{stem}.{DEFAULT_IMAGE_EXTENSION}"))
}

/// 拒绝覆盖已存在的文件，除非指定了 `--force`。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {} \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 处理 'Encode' 命令的执行逻辑。
///
/// 负责读取图像与文本、调用核心函数嵌入消息，最后将结果写入目标图像文件。
/// 容量校验在修改任何像素之前完成。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文本文件，或文本不是合法的 UTF-8。
/// * 目标文件已存在且未指定 `--force`。
/// * 消息过大或图像空间不足。
/// * 无法写入到目标图像文件。
pub fn handle_encode(args: EncodeArgs) -> Result<()> {
    let dest = args.dest.unwrap_or_else(|| default_dest(&args.image));
    ensure_writable(&dest, args.force)?;

    let message = match (args.message, args.text) {
        (Some(message), _) => message,
        (None, Some(text)) => fs::read_to_string(&text).with_context(|| {
            format!(
                "Unable to read text file: {}",
                text.to_string_lossy().red().bold()
            )
        })?,
        (None, None) => anyhow::bail!("Either a message or a text file must be provided."),
    };

    let mut carrier = Carrier::open(&args.image)?;

    let summary = encode(carrier.grid_mut(), &message).with_context(|| {
        format!(
            "Not enough space or invalid message for image: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    info!(
        "Wrote {} bits into {} pixels",
        summary.slots_written, summary.pixels_touched
    );

    carrier.save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Decode' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用核心函数恢复文本，
/// 然后打印到标准输出，或写入 `--text` 指定的文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 图像中没有有效的隐藏消息，或消息不是合法的 UTF-8。
/// * 目标文本文件已存在且未指定 `--force`，或无法写入。
pub fn handle_decode(args: DecodeArgs) -> Result<()> {
    if let Some(text) = &args.text {
        ensure_writable(text, args.force)?;
    }

    let carrier = Carrier::open(&args.image)?;

    let message = decode(carrier.grid()).with_context(|| {
        format!(
            "Failed to recover a message from '{}'. \nThe image may not contain a hidden message or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    info!("Recovered {} bytes", message.len());

    match args.text {
        Some(text) => {
            fs::write(&text, &message).with_context(|| {
                format!(
                    "Unable to write to target text file: {}",
                    text.to_string_lossy().red().bold()
                )
            })?;
            println!(
                "The text has been successfully recovered and saved: {}",
                text.to_string_lossy().green().bold()
            );
        }
        None => println!("{message}"),
    }

    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑：报告图像的比特容量与可隐藏的最大字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let carrier = Carrier::open(&args.image)?;
    let grid = carrier.grid();
    let bits = capacity_of(grid);

    println!(
        "{}x{} pixels, {} bits available, up to {} bytes of text",
        grid.width(),
        grid.height(),
        bits.to_string().green().bold(),
        max_message_bytes(bits).to_string().green().bold()
    );

    Ok(())
}
