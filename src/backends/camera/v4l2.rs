// SPDX-License-Identifier: GPL-3.0-only

//! Direct V4L2 capture
//!
//! Opens the webcam with the v4l crate, negotiates packed YUYV at the
//! configured resolution and streams mmap buffers on a reader thread.

use super::FrameSource;
use super::types::{CameraFrame, PixelFormat};
use crate::backends::loop_thread::{LoopAction, LoopController};
use crate::errors::CameraError;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use v4l::buffer::Type;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;

/// Frames buffered between the reader thread and the tick loop. The tick
/// loop only ever wants the newest one.
const FRAME_QUEUE_DEPTH: usize = 4;

/// Number of mmap buffers requested from the driver
const MMAP_BUFFERS: u32 = 2;

/// Webcam streaming on a background thread
pub struct V4l2Camera {
    receiver: mpsc::Receiver<CameraFrame>,
    _reader: LoopController,
}

impl V4l2Camera {
    /// Open `device_path` and start streaming YUYV at `width`x`height`.
    ///
    /// Fails if the device cannot be opened or refuses the exact format.
    pub fn open(device_path: &str, width: u32, height: u32) -> Result<Self, CameraError> {
        info!(device_path, width, height, "Opening V4L2 device");

        let dev = Device::with_path(device_path).map_err(|e| CameraError::OpenFailed {
            path: device_path.to_string(),
            reason: e.to_string(),
        })?;

        let yuyv = v4l::FourCC::new(b"YUYV");
        let mut format = dev
            .format()
            .map_err(|e| CameraError::InvalidFormat(format!("query failed: {}", e)))?;
        format.width = width;
        format.height = height;
        format.fourcc = yuyv;

        let applied = dev
            .set_format(&format)
            .map_err(|e| CameraError::InvalidFormat(format!("set failed: {}", e)))?;
        if applied.fourcc != yuyv || applied.width != width || applied.height != height {
            return Err(CameraError::InvalidFormat(format!(
                "requested YUYV {}x{}, device gave {} {}x{}",
                width, height, applied.fourcc, applied.width, applied.height
            )));
        }
        let stride = applied.stride.max(width * 2);

        let (sender, receiver) = mpsc::channel(FRAME_QUEUE_DEPTH);
        let reader = LoopController::start_with_init(
            "v4l2-capture",
            move || {
                let stream = MmapStream::with_buffers(&dev, Type::VideoCapture, MMAP_BUFFERS)
                    .map_err(|e| CameraError::StreamFailed(e.to_string()).to_string())?;
                info!("V4L2 capture stream started");
                Ok((dev, stream))
            },
            move |(_dev, stream)| read_frame(stream, &sender, width, height, stride),
        );

        Ok(Self {
            receiver,
            _reader: reader,
        })
    }
}

fn read_frame(
    stream: &mut MmapStream<'static>,
    sender: &mpsc::Sender<CameraFrame>,
    width: u32,
    height: u32,
    stride: u32,
) -> LoopAction {
    match stream.next() {
        Ok((buf, meta)) => {
            if buf.is_empty() || meta.bytesused == 0 {
                debug!(sequence = meta.sequence, "Dropping empty buffer");
                return LoopAction::Continue;
            }
            let used = (meta.bytesused as usize).min(buf.len());
            let frame = CameraFrame {
                width,
                height,
                data: Arc::from(&buf[..used]),
                format: PixelFormat::YUYV,
                stride,
            };
            match sender.try_send(frame) {
                Ok(()) | Err(mpsc::error::TrySendError::Full(_)) => LoopAction::Continue,
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!("Frame receiver dropped, stopping capture");
                    LoopAction::Stop
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "V4L2 dequeue failed");
            LoopAction::Continue
        }
    }
}

impl FrameSource for V4l2Camera {
    fn latest_frame(&mut self) -> Option<CameraFrame> {
        let mut latest = None;
        while let Ok(frame) = self.receiver.try_recv() {
            latest = Some(frame);
        }
        latest
    }
}
