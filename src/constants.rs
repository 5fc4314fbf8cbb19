/// 长度头部占用的比特数。
/// 头部是一个大端序 (MSB 优先) 的 `u32`，表示消息的比特长度。
pub const HEADER_BITS: u64 = 32;

/// 头部能表示的最大消息比特数。
pub const MAX_PAYLOAD_BITS: u64 = u32::MAX as u64;

/// 每个像素可用于隐写的颜色通道数 (R, G, B)，每个通道存储 1 bit。
pub const CHANNELS_PER_PIXEL: u64 = 3;

/// 未指定输出路径时，隐写结果图像文件名的前缀。
pub const DOCTORED_PREFIX: &str = "doctored_";

/// 未指定输出路径时，隐写结果图像的扩展名 (必须是无损格式)。
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";
