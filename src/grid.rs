//! # 像素网格适配模块
//!
//! 核心算法只依赖这里的两个 trait，而不关心图像来自哪种文件格式。
//! `image` crate 的 `RgbImage` 与 `RgbaImage` 已经实现了它们；RGBA 图像的 alpha 通道不参与隐写，始终保持原值。

use image::{Rgb, RgbImage, Rgba, RgbaImage};

/// 只读的像素网格：按 (x, y) 访问每个像素的红、绿、蓝通道。
pub trait PixelGrid {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// 返回 (x, y) 处像素的 `[red, green, blue]`。
    fn rgb(&self, x: u32, y: u32) -> [u8; 3];
}

/// 可写的像素网格。一次写入一个像素的全部三个通道。
pub trait PixelGridMut: PixelGrid {
    fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]);
}

impl PixelGrid for RgbImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        self.get_pixel(x, y).0
    }
}

impl PixelGridMut for RgbImage {
    fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        self.put_pixel(x, y, Rgb(rgb));
    }
}

impl PixelGrid for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let [r, g, b, _] = self.get_pixel(x, y).0;
        [r, g, b]
    }
}

impl PixelGridMut for RgbaImage {
    fn set_rgb(&mut self, x: u32, y: u32, [r, g, b]: [u8; 3]) {
        let alpha = self.get_pixel(x, y).0[3];
        self.put_pixel(x, y, Rgba([r, g, b, alpha]));
    }
}
