//! Synchronous texture readback through a mapped staging buffer.

use std::sync::mpsc::{self, TryRecvError};
use std::time::Duration;

use web_time::Instant;

use crate::error::PolyviewError;

/// Give up on a mapping that has not completed after this long.
const MAP_TIMEOUT: Duration = Duration::from_secs(2);

/// Row pitch for copying `width` pixels of `bytes_per_pixel` each, rounded
/// up to wgpu's copy alignment.
#[must_use]
pub fn padded_bytes_per_row(width: u32, bytes_per_pixel: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (width * bytes_per_pixel).div_ceil(align) * align
}

/// Drop the per-row padding from a copied image.
#[must_use]
pub fn unpad_rows(data: &[u8], row_bytes: usize, padded: usize) -> Vec<u8> {
    data.chunks(padded)
        .flat_map(|row| &row[..row_bytes.min(row.len())])
        .copied()
        .collect()
}

/// Copy a `width x height` region at `origin` of `texture` to the CPU and
/// return it as tightly packed rows.
///
/// Submits its own command buffer and blocks until the mapping completes.
///
/// # Errors
///
/// [`PolyviewError::Readback`] when mapping fails or times out.
pub fn read_region(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    origin: (u32, u32),
    (width, height): (u32, u32),
    bytes_per_pixel: u32,
) -> Result<Vec<u8>, PolyviewError> {
    let padded = padded_bytes_per_row(width, bytes_per_pixel);
    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback Staging Buffer"),
        size: u64::from(padded) * u64::from(height),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder =
        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Readback Encoder"),
        });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d {
                x: origin.0,
                y: origin.1,
                z: 0,
            },
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    let _ = queue.submit(std::iter::once(encoder.finish()));

    let slice = staging.slice(..);
    let (tx, rx) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    wait_for_map(device, &rx)?;

    let data = slice.get_mapped_range();
    let pixels = unpad_rows(
        &data,
        (width * bytes_per_pixel) as usize,
        padded as usize,
    );
    drop(data);
    staging.unmap();
    Ok(pixels)
}

fn wait_for_map(
    device: &wgpu::Device,
    rx: &mpsc::Receiver<Result<(), wgpu::BufferAsyncError>>,
) -> Result<(), PolyviewError> {
    let start = Instant::now();
    loop {
        let _ = device.poll(wgpu::PollType::Poll);
        match rx.try_recv() {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(e)) => return Err(PolyviewError::Readback(e.to_string())),
            Err(TryRecvError::Disconnected) => {
                return Err(PolyviewError::Readback(
                    "mapping callback dropped".to_owned(),
                ));
            }
            Err(TryRecvError::Empty) => {
                if start.elapsed() > MAP_TIMEOUT {
                    return Err(PolyviewError::Readback(
                        "timed out waiting for buffer mapping".to_owned(),
                    ));
                }
                std::thread::yield_now();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_aligned_to_256_bytes() {
        assert_eq!(padded_bytes_per_row(1, 16), 256);
        assert_eq!(padded_bytes_per_row(64, 4), 256);
        assert_eq!(padded_bytes_per_row(65, 4), 512);
    }

    #[test]
    fn padding_is_stripped() {
        let mut data = vec![1, 2, 3, 0, 0];
        data.extend([4, 5, 6, 0, 0]);
        assert_eq!(unpad_rows(&data, 3, 5), [1, 2, 3, 4, 5, 6]);
    }
}
