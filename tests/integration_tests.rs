use image::{ImageBuffer, Rgb, RgbImage, Rgba, RgbaImage};
use rand::RngCore;
use rgb_lsb::{
    cli::{CapacityArgs, DecodeArgs, EncodeArgs},
    decode,
    handler::{handle_capacity, handle_decode, handle_encode},
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的 RGB 测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut raw_pixels = vec![0u8; (width * height * 3) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    let img_buf: RgbImage = ImageBuffer::from_raw(width, height, raw_pixels)
        .expect("Pixel buffer does not match the dimensions.");
    img_buf.save(path).expect("Failed to create test image.");
}

/// 一个辅助函数，用于创建一个带有随机像素和固定 alpha 的 RGBA 测试图像
fn create_test_rgba_image(path: &Path, width: u32, height: u32, alpha: u8) {
    let mut img_buf = RgbaImage::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 3) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(3))
        .for_each(|(pixel, chunk)| {
            *pixel = Rgba([chunk[0], chunk[1], chunk[2], alpha]);
        });

    img_buf.save(path).expect("Failed to create test image.");
}

fn encode_args(image: &Path, message: &str, dest: Option<&Path>, force: bool) -> EncodeArgs {
    EncodeArgs {
        image: image.to_path_buf(),
        message: Some(message.to_string()),
        text: None,
        dest: dest.map(Path::to_path_buf),
        force,
    }
}

/// 验证从隐藏到恢复的完整流程
#[test]
fn test_handle_encode_and_decode_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    let hidden_image_path = dir.path().join("hidden.png");
    let source_text_path = dir.path().join("source.txt");
    let recovered_text_path = dir.path().join("recovered.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "This is a test message for the handler! 这是一个给处理器的测试信息！";
    fs::write(&source_text_path, original_text)?;

    // 2. 测试 handle_encode (从文本文件读取消息)
    let encode_args = EncodeArgs {
        image: original_image_path.clone(),
        message: None,
        text: Some(source_text_path.clone()),
        dest: Some(hidden_image_path.clone()),
        force: false,
    };
    handle_encode(encode_args)?;
    assert!(
        hidden_image_path.exists(),
        "Hidden image should be created."
    );

    // 3. 测试 handle_decode
    let decode_args = DecodeArgs {
        image: hidden_image_path.clone(),
        text: Some(recovered_text_path.clone()),
        force: false,
    };
    handle_decode(decode_args)?;
    assert!(
        recovered_text_path.exists(),
        "Recovered text file should be created."
    );

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&recovered_text_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text must match the original."
    );

    Ok(())
}

/// 验证当用户不提供输出路径时，是否能正确生成默认路径并完成操作
#[test]
fn test_handle_encode_with_default_dest() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.bmp");
    create_test_image(&original_image_path, 100, 100);

    handle_encode(encode_args(&original_image_path, "Hi", None, false))?;

    let expected_hidden_path = dir.path().join("doctored_original.png");
    assert!(
        expected_hidden_path.exists(),
        "Default hidden image should be created at: {:?}",
        expected_hidden_path
    );

    let img = image::open(&expected_hidden_path)?.into_rgb8();
    assert_eq!(decode(&img)?, "Hi");

    // 不提供 --text 时打印到标准输出
    handle_decode(DecodeArgs {
        image: expected_hidden_path,
        text: None,
        force: false,
    })?;

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&image_path, 50, 50);

    // 2. 场景一：测试覆盖保护
    // 先创建一个同名的目标文件，模拟“文件已存在”的场景
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;
    assert!(dest_path.exists());

    let result = handle_encode(encode_args(&image_path, "some text", Some(&dest_path), false));
    assert!(
        result.is_err(),
        "Execution should fail without --force when file exists."
    );
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 3. 场景二：测试强制覆盖
    let result = handle_encode(encode_args(&image_path, "some text", Some(&dest_path), true));
    assert!(
        result.is_ok(),
        "Execution should succeed with --force when file exists."
    );

    let dummy_content = fs::read(&dest_path)?;
    assert_ne!(dummy_content, b"this is a dummy file to be overwritten");

    // 4. decode 同样遵守覆盖保护
    let text_path = dir.path().join("out.txt");
    fs::write(&text_path, "keep me")?;
    let result = handle_decode(DecodeArgs {
        image: dest_path.clone(),
        text: Some(text_path.clone()),
        force: false,
    });
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&text_path)?, "keep me");

    handle_decode(DecodeArgs {
        image: dest_path,
        text: Some(text_path.clone()),
        force: true,
    })?;
    assert_eq!(fs::read_to_string(&text_path)?, "some text");

    Ok(())
}

/// 验证空间不足时的错误处理，且不会产生输出文件
#[test]
fn test_handle_encode_not_enough_space() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("small.png");
    let dest_path = dir.path().join("dest.png");

    // 10 x 10 = 300 bit，最多 33 字节
    create_test_image(&image_path, 10, 10);
    let large_text = "a".repeat(5000);

    let result = handle_encode(encode_args(&image_path, &large_text, Some(&dest_path), false));

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(format!("{e:#}").contains("Image too small"));
    }
    assert!(!dest_path.exists(), "No output should be written on failure.");

    Ok(())
}

/// 验证 alpha 通道在隐写后保持不变
#[test]
fn test_rgba_image_keeps_alpha() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("rgba.png");
    let dest_path = dir.path().join("rgba_hidden.png");

    create_test_rgba_image(&image_path, 32, 32, 200);
    handle_encode(encode_args(&image_path, "translucent é", Some(&dest_path), false))?;

    let hidden = image::open(&dest_path)?;
    assert!(hidden.color().has_alpha());
    let hidden = hidden.into_rgba8();
    assert!(hidden.pixels().all(|p| p.0[3] == 200));
    assert_eq!(decode(&hidden)?, "translucent é");

    Ok(())
}

/// 验证对未隐藏消息的图像解码时给出错误而不是垃圾数据
#[test]
fn test_decode_plain_image_fails() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("plain.png");

    // 最低位全为 1 -> 头部声明 u32::MAX 比特
    RgbImage::from_pixel(8, 8, Rgb([255, 255, 255])).save(&image_path)?;

    let result = handle_decode(DecodeArgs {
        image: image_path,
        text: None,
        force: false,
    });
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(format!("{e:#}").contains("Length header announces"));
    }

    Ok(())
}

#[test]
fn test_handle_capacity() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("cap.png");
    create_test_image(&image_path, 20, 10);

    handle_capacity(CapacityArgs { image: image_path })?;

    let missing = handle_capacity(CapacityArgs {
        image: dir.path().join("missing.png"),
    });
    assert!(missing.is_err());

    Ok(())
}

/// 验证非 8 位 RGB(A) 的输入 (如灰度图) 会被转换为 RGB 后再隐写
#[test]
fn test_grayscale_input_is_converted_to_rgb() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("gray.png");
    let dest_path = dir.path().join("gray_hidden.png");

    image::GrayImage::from_fn(24, 24, |x, y| image::Luma([(x * 10 + y) as u8])).save(&image_path)?;
    handle_encode(encode_args(&image_path, "grey", Some(&dest_path), false))?;

    let hidden = image::open(&dest_path)?;
    assert_eq!(hidden.color(), image::ColorType::Rgb8);
    assert_eq!(decode(&hidden.into_rgb8())?, "grey");

    Ok(())
}
