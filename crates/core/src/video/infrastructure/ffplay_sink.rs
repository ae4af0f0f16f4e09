use std::io::Write;
use std::process::{Child, Command, Stdio};

use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;
use crate::video::domain::frame_sink::FrameSink;

/// Displays frames live by piping raw RGB24 into an `ffplay` child
/// process.
///
/// Requires ffplay on PATH; no windowing toolkit or codec bindings are
/// linked into the binary. Close drops stdin so ffplay exits cleanly
/// when the stream ends.
pub struct FfplaySink {
    child: Option<Child>,
    frame_size: usize,
}

impl FfplaySink {
    pub fn new() -> Self {
        Self {
            child: None,
            frame_size: 0,
        }
    }
}

impl Default for FfplaySink {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSink for FfplaySink {
    fn open(&mut self, metadata: &StreamMetadata) -> Result<(), Box<dyn std::error::Error>> {
        let framerate = if metadata.fps > 0.0 {
            metadata.fps.round() as u32
        } else {
            30
        };
        let child = Command::new("ffplay")
            .args([
                "-f",
                "rawvideo",
                "-pixel_format",
                "rgb24",
                "-video_size",
                &format!("{}x{}", metadata.width, metadata.height),
                "-framerate",
                &framerate.to_string(),
                "-fflags",
                "nobuffer",
                "-flags",
                "low_delay",
                "-window_title",
                "agecam",
                "-",
            ])
            .stdin(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| format!("Failed to start ffplay (is it installed?): {e}"))?;

        self.frame_size = (metadata.width * metadata.height * 3) as usize;
        self.child = Some(child);
        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let child = self.child.as_mut().ok_or("Display sink is not open")?;
        if frame.data().len() != self.frame_size {
            return Err(format!(
                "Frame size {} does not match stream size {}",
                frame.data().len(),
                self.frame_size
            )
            .into());
        }
        if let Some(stdin) = child.stdin.as_mut() {
            stdin.write_all(frame.data())?;
            stdin.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(mut child) = self.child.take() {
            drop(child.stdin.take());
            child.wait()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_without_open_returns_error() {
        let mut sink = FfplaySink::new();
        let frame = Frame::new(vec![0u8; 4 * 4 * 3], 4, 4, 0);
        assert!(sink.write(&frame).is_err());
    }

    #[test]
    fn test_close_without_open_is_ok() {
        let mut sink = FfplaySink::new();
        assert!(sink.close().is_ok());
        assert!(sink.close().is_ok());
    }
}
