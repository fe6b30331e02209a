//! Thumbnail previews for accepted files.
//!
//! Loading is fire-and-forget: a worker thread decodes whatever it can and
//! streams results back over a channel. A preview that never materializes
//! leaves its entry on the placeholder glyph and has no effect on validation
//! or uploads.

use std::fs;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

use crate::files::{FileDescriptor, FileKey};

/// Decoded preview pixels, ready to be turned into an egui texture on the UI
/// thread. RGBA, 4 bytes per pixel.
#[derive(Debug, Clone)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// Capability for producing a displayable preview of a file. Trait-based so
/// tests can inject canned previews without touching the filesystem.
pub trait PreviewLoader: Send + Sync {
    fn load(&self, descriptor: &FileDescriptor) -> Option<PreviewImage>;
}

/// Production loader: decodes image files with the `image` crate, downscaled
/// to thumbnail size. Video files yield no pixels; the list renders a static
/// placeholder for them instead.
#[derive(Default)]
pub struct ImagePreviewLoader;

/// Longest edge of a decoded thumbnail, in pixels.
const THUMBNAIL_EDGE: u32 = 120;

impl PreviewLoader for ImagePreviewLoader {
    fn load(&self, descriptor: &FileDescriptor) -> Option<PreviewImage> {
        if !descriptor.is_image() {
            return None;
        }

        let bytes = match fs::read(&descriptor.path) {
            Ok(bytes) => bytes,
            Err(error) => {
                log::warn!("preview read failed for {}: {error}", descriptor.name);
                return None;
            }
        };
        let decoded = match image::load_from_memory(&bytes) {
            Ok(decoded) => decoded,
            Err(error) => {
                log::debug!("preview decode failed for {}: {error}", descriptor.name);
                return None;
            }
        };

        let thumbnail = decoded.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE);
        let rgba = thumbnail.to_rgba8();
        let (width, height) = rgba.dimensions();
        Some(PreviewImage {
            width: width as usize,
            height: height as usize,
            rgba: rgba.into_raw(),
        })
    }
}

/// Kicks off preview loading for a batch of newly added files. Results arrive
/// on the returned receiver as they finish; the thread dies with the channel
/// if the caller loses interest.
pub fn spawn_preview_loads(
    loader: Arc<dyn PreviewLoader>,
    files: Vec<FileDescriptor>,
) -> Receiver<(FileKey, PreviewImage)> {
    let (tx, rx) = channel();
    std::thread::spawn(move || {
        for file in files {
            if let Some(preview) = loader.load(&file) {
                if tx.send((file.key(), preview)).is_err() {
                    return;
                }
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::test_descriptor;

    struct CannedLoader;

    impl PreviewLoader for CannedLoader {
        fn load(&self, descriptor: &FileDescriptor) -> Option<PreviewImage> {
            descriptor.is_image().then(|| PreviewImage {
                width: 2,
                height: 2,
                rgba: vec![0u8; 2 * 2 * 4],
            })
        }
    }

    #[test]
    fn videos_get_no_decoded_preview() {
        let loader = ImagePreviewLoader;
        assert!(loader
            .load(&test_descriptor("clip.mp4", 10, "video/mp4"))
            .is_none());
    }

    #[test]
    fn unreadable_image_yields_none_instead_of_failing() {
        let loader = ImagePreviewLoader;
        // The descriptor's path does not exist on disk.
        assert!(loader
            .load(&test_descriptor("ghost.jpg", 10, "image/jpeg"))
            .is_none());
    }

    #[test]
    fn decodes_a_real_png() {
        use image::{ImageBuffer, Rgba};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        let pixel = ImageBuffer::from_pixel(1, 1, Rgba([255u8, 0, 0, 255]));
        pixel.save(&path).unwrap();

        let descriptor = FileDescriptor::from_path(&path).unwrap();
        let preview = ImagePreviewLoader.load(&descriptor).unwrap();
        assert_eq!((preview.width, preview.height), (1, 1));
        assert_eq!(preview.rgba.len(), 4);
    }

    #[test]
    fn spawned_loads_stream_only_loadable_files() {
        let files = vec![
            test_descriptor("a.jpg", 1, "image/jpeg"),
            test_descriptor("b.mp4", 2, "video/mp4"),
        ];
        let rx = spawn_preview_loads(Arc::new(CannedLoader), files);
        let received: Vec<(FileKey, PreviewImage)> = rx.iter().collect();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].0.name, "a.jpg");
    }
}
