// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video frame extraction.
//!
//! A video is read one frame at a time through a [`FrameSource`] and each
//! decoded frame is written as `{basename}_{index}.jpg`. Animated GIFs are
//! decoded with the `image` crate; other containers need the
//! `video-opencv` feature.

use anyhow::{Context, Result};
use image::RgbImage;
use std::path::Path;

/// Sequential frame decoder.
pub trait FrameSource {
    /// Decode the next frame. `Ok(None)` marks the end of the stream.
    fn read_frame(&mut self) -> Result<Option<RgbImage>>;
}

/// Frames of an animated GIF.
pub struct GifFrames {
    frames: image::Frames<'static>,
}

impl GifFrames {
    pub fn open(path: &Path) -> Result<Self> {
        use image::AnimationDecoder;

        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open video {}", path.display()))?;
        let decoder = image::codecs::gif::GifDecoder::new(std::io::BufReader::new(file))
            .with_context(|| format!("Failed to read GIF header of {}", path.display()))?;
        Ok(Self {
            frames: decoder.into_frames(),
        })
    }
}

impl FrameSource for GifFrames {
    fn read_frame(&mut self) -> Result<Option<RgbImage>> {
        match self.frames.next() {
            Some(frame) => {
                let buffer = frame?.into_buffer();
                Ok(Some(image::DynamicImage::ImageRgba8(buffer).to_rgb8()))
            }
            None => Ok(None),
        }
    }
}

#[cfg(feature = "video-opencv")]
pub use self::opencv_source::OpenCvCapture;

#[cfg(feature = "video-opencv")]
mod opencv_source {
    use super::FrameSource;
    use anyhow::{anyhow, Result};
    use image::RgbImage;
    use opencv::{core::Mat, imgproc, prelude::*, videoio};
    use std::path::Path;

    /// Frames decoded through OpenCV's `VideoCapture`.
    ///
    /// The capture is released when this value is dropped.
    pub struct OpenCvCapture {
        capture: videoio::VideoCapture,
    }

    impl OpenCvCapture {
        pub fn open(path: &Path) -> Result<Self> {
            let path_str = path
                .to_str()
                .ok_or_else(|| anyhow!("Video path is not valid UTF-8: {}", path.display()))?;
            let capture = videoio::VideoCapture::from_file(path_str, videoio::CAP_ANY)?;
            if !capture.is_opened()? {
                return Err(anyhow!("Failed to open video file: {}", path.display()));
            }
            log::info!(
                "Opened {} ({}x{} @ {:.2} fps)",
                path.display(),
                capture.get(videoio::CAP_PROP_FRAME_WIDTH)?,
                capture.get(videoio::CAP_PROP_FRAME_HEIGHT)?,
                capture.get(videoio::CAP_PROP_FPS)?
            );
            Ok(Self { capture })
        }
    }

    impl FrameSource for OpenCvCapture {
        fn read_frame(&mut self) -> Result<Option<RgbImage>> {
            let mut frame = Mat::default();
            if !self.capture.read(&mut frame)? || frame.empty() {
                return Ok(None);
            }

            let mut rgb = Mat::default();
            imgproc::cvt_color_def(&frame, &mut rgb, imgproc::COLOR_BGR2RGB)?;
            if !rgb.is_continuous() {
                return Err(anyhow!("Frame is not continuous"));
            }

            let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
            let bytes = rgb.data_bytes()?.to_vec();
            RgbImage::from_raw(width, height, bytes)
                .map(Some)
                .ok_or_else(|| anyhow!("Frame buffer does not match {}x{}", width, height))
        }
    }

    impl Drop for OpenCvCapture {
        fn drop(&mut self) {
            if let Err(e) = self.capture.release() {
                log::warn!("Failed to release video capture: {}", e);
            }
        }
    }
}

/// Open a video with the decoder that handles its container.
pub fn open_video(path: &Path) -> Result<Box<dyn FrameSource>> {
    if !path.is_file() {
        anyhow::bail!("Video file not found: {}", path.display());
    }

    let is_gif = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gif"));
    if is_gif {
        return Ok(Box::new(GifFrames::open(path)?));
    }

    #[cfg(feature = "video-opencv")]
    {
        Ok(Box::new(OpenCvCapture::open(path)?))
    }

    #[cfg(not(feature = "video-opencv"))]
    {
        anyhow::bail!(
            "Cannot decode {}: only GIF input is available, rebuild with --features video-opencv",
            path.display()
        )
    }
}

/// Create the output directory (and its parents) if it does not exist.
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create output directory {}", path.display()))?;
        log::info!("Created output directory {}", path.display());
    }
    Ok(())
}

/// File name of the video without its extension.
pub fn video_basename(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .with_context(|| format!("Video path has no file name: {}", path.display()))
}

/// Write every frame of `source` into `output_dir`, returning the count.
///
/// Frames are named `{basename}_{index}.jpg` with the index starting at 0.
/// Only successfully decoded frames are written. A read error ends the
/// stream the same way end-of-file does.
pub fn extract_frames(
    source: &mut dyn FrameSource,
    basename: &str,
    output_dir: &Path,
) -> Result<usize> {
    ensure_output_dir(output_dir)?;

    let mut count = 0;
    loop {
        let frame = match source.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                log::warn!("Stopping at frame {}: {:#}", count, e);
                break;
            }
        };

        let path = output_dir.join(format!("{}_{}.jpg", basename, count));
        frame
            .save(&path)
            .with_context(|| format!("Failed to write frame {}", path.display()))?;
        log::debug!("Wrote {}", path.display());
        count += 1;
    }

    log::info!("Extracted {} frames into {}", count, output_dir.display());
    Ok(count)
}

/// Extract all frames of the video at `video` into `output_dir`.
pub fn extract_video(video: &Path, output_dir: &Path) -> Result<usize> {
    let basename = video_basename(video)?;
    let mut source = open_video(video)?;
    extract_frames(source.as_mut(), &basename, output_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{codecs::gif::GifEncoder, Delay, Frame, Rgb, RgbaImage, Rgba};
    use std::collections::VecDeque;

    /// Frames handed out from memory; an optional error ends the stream.
    struct SyntheticVideo {
        frames: VecDeque<RgbImage>,
        fail_after: bool,
    }

    impl SyntheticVideo {
        fn new(count: u8) -> Self {
            let frames = (0..count)
                .map(|i| RgbImage::from_pixel(16, 12, Rgb([i * 20, 100, 200])))
                .collect();
            Self {
                frames,
                fail_after: false,
            }
        }
    }

    impl FrameSource for SyntheticVideo {
        fn read_frame(&mut self) -> Result<Option<RgbImage>> {
            match self.frames.pop_front() {
                Some(frame) => Ok(Some(frame)),
                None if self.fail_after => Err(anyhow::anyhow!("corrupt packet")),
                None => Ok(None),
            }
        }
    }

    fn write_gif(path: &Path, count: u8) {
        let file = std::fs::File::create(path).unwrap();
        let mut encoder = GifEncoder::new(file);
        for i in 0..count {
            let buffer = RgbaImage::from_pixel(10, 8, Rgba([i * 40, 0, 255 - i * 40, 255]));
            encoder
                .encode_frame(Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(100, 1)))
                .unwrap();
        }
    }

    fn sorted_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_extract_writes_one_file_per_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut video = SyntheticVideo::new(3);

        let count = extract_frames(&mut video, "clip", dir.path()).unwrap();

        assert_eq!(count, 3);
        assert_eq!(sorted_names(dir.path()), vec!["clip_0.jpg", "clip_1.jpg", "clip_2.jpg"]);
        for name in sorted_names(dir.path()) {
            let img = image::open(dir.path().join(name)).unwrap();
            assert_eq!((img.width(), img.height()), (16, 12));
        }
    }

    #[test]
    fn test_extract_creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("frames").join("run1");
        let mut video = SyntheticVideo::new(1);

        extract_frames(&mut video, "v", &out).unwrap();

        assert!(out.join("v_0.jpg").is_file());
    }

    #[test]
    fn test_read_error_ends_stream_successfully() {
        let dir = tempfile::tempdir().unwrap();
        let mut video = SyntheticVideo::new(2);
        video.fail_after = true;

        assert_eq!(extract_frames(&mut video, "v", dir.path()).unwrap(), 2);
        assert_eq!(sorted_names(dir.path()).len(), 2);
    }

    #[test]
    fn test_empty_video_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut video = SyntheticVideo::new(0);

        assert_eq!(extract_frames(&mut video, "v", dir.path()).unwrap(), 0);
        assert!(sorted_names(dir.path()).is_empty());
    }

    #[test]
    fn test_extract_video_from_gif() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("024_Above.gif");
        write_gif(&video, 4);
        let out = dir.path().join("video_conversion");

        let count = extract_video(&video, &out).unwrap();

        assert_eq!(count, 4);
        assert_eq!(
            sorted_names(&out),
            vec!["024_Above_0.jpg", "024_Above_1.jpg", "024_Above_2.jpg", "024_Above_3.jpg"]
        );
        assert!(image::open(out.join("024_Above_3.jpg")).is_ok());
    }

    #[test]
    fn test_missing_video_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("frames");

        assert!(extract_video(&dir.path().join("nope.gif"), &out).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_output_dir_blocked_by_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        assert!(ensure_output_dir(&blocker.join("frames")).is_err());
    }

    #[test]
    fn test_video_basename() {
        assert_eq!(video_basename(Path::new("videos/024_Above.mp4")).unwrap(), "024_Above");
        assert_eq!(video_basename(Path::new("clip")).unwrap(), "clip");
    }
}
