//! GPU buffers that grow on demand.
//!
//! Uses a 2x growth strategy to minimize reallocations. A buffer never
//! shrinks (GPU buffers cannot be resized in place).

use wgpu::util::DeviceExt;

/// A GPU buffer that can grow dynamically.
#[derive(Debug)]
pub struct DynamicBuffer {
    buffer: wgpu::Buffer,
    capacity: usize, // Capacity in bytes
    len: usize,      // Current data length in bytes
    usage: wgpu::BufferUsages,
    label: String,
}

impl DynamicBuffer {
    /// Buffer with the given initial byte capacity.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        initial_capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity = initial_capacity.max(64); // Minimum 64 bytes

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            capacity,
            len: 0,
            usage,
            label: label.to_owned(),
        }
    }

    /// Buffer initialized from existing data (vertex and index data).
    #[must_use]
    pub fn new_with_data<T: bytemuck::Pod>(
        device: &wgpu::Device,
        label: &str,
        data: &[T],
        usage: wgpu::BufferUsages,
    ) -> Self {
        let data_bytes = bytemuck::cast_slice(data);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: data_bytes,
            usage: usage | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            buffer,
            capacity: data_bytes.len(),
            len: data_bytes.len(),
            usage,
            label: label.to_owned(),
        }
    }

    /// Write raw bytes to buffer, growing if necessary.
    ///
    /// Returns `true` if buffer was reallocated (bind groups need recreation).
    pub fn write_bytes(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[u8],
    ) -> bool {
        let needed = data.len();

        let reallocated = if needed > self.capacity {
            // 2x growth, minimum 1KB
            let new_capacity = (needed * 2).max(self.capacity + 1024);
            log::debug!(
                "growing {} buffer {} -> {} bytes",
                self.label,
                self.capacity,
                new_capacity
            );

            self.buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&self.label),
                size: new_capacity as u64,
                usage: self.usage | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            self.capacity = new_capacity;
            true
        } else {
            false
        };

        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, data);
        }
        self.len = needed;

        reallocated
    }

    /// The underlying buffer.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Bytes written by the last write.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Pack `blocks` at `stride`-byte intervals, as required for dynamic
/// uniform offsets.
#[must_use]
pub fn pack_strided<T: bytemuck::Pod>(blocks: &[T], stride: usize) -> Vec<u8> {
    let size = size_of::<T>();
    debug_assert!(stride >= size, "stride {stride} smaller than block {size}");
    let mut bytes = vec![0u8; blocks.len() * stride];
    for (i, block) in blocks.iter().enumerate() {
        let start = i * stride;
        bytes[start..start + size].copy_from_slice(bytemuck::bytes_of(block));
    }
    bytes
}

/// Round `size` up to a multiple of `alignment` (a power of two).
#[must_use]
pub fn align_to(size: usize, alignment: usize) -> usize {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_rounds_up() {
        assert_eq!(align_to(336, 256), 512);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(1, 0), 1);
    }

    #[test]
    fn blocks_land_on_stride_boundaries() {
        let blocks = [[1u32; 4], [2u32; 4]];
        let bytes = pack_strided(&blocks, 256);
        assert_eq!(bytes.len(), 512);
        assert_eq!(&bytes[256..260], &2u32.to_ne_bytes());
        assert!(bytes[16..256].iter().all(|&b| b == 0));
    }
}
