//! Dynamic GPU buffer management with automatic resizing
//!
//! Provides buffers that grow automatically when data exceeds capacity,
//! using a 2x growth strategy to minimize reallocations.

use std::marker::PhantomData;

use wgpu::util::DeviceExt;

/// Smallest allocation, in bytes.
const MIN_CAPACITY: usize = 64;

/// A GPU buffer that can grow dynamically
///
/// Uses a 2x growth strategy when capacity is exceeded.
/// Never shrinks (GPU buffers cannot be resized in place).
pub struct DynamicBuffer {
    buffer: wgpu::Buffer,
    capacity: usize, // bytes
    len: usize,      // bytes
    usage: wgpu::BufferUsages,
    label: String,
}

impl DynamicBuffer {
    /// Buffer initialized from existing data.
    pub fn new_with_data<T: bytemuck::Pod>(
        device: &wgpu::Device,
        label: &str,
        data: &[T],
        usage: wgpu::BufferUsages,
    ) -> Self {
        let data_bytes: &[u8] = bytemuck::cast_slice(data);
        let buffer = if data_bytes.is_empty() {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: MIN_CAPACITY as u64,
                usage: usage | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        } else {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: data_bytes,
                usage: usage | wgpu::BufferUsages::COPY_DST,
            })
        };

        Self {
            buffer,
            capacity: data_bytes.len().max(MIN_CAPACITY),
            len: data_bytes.len(),
            usage,
            label: label.to_owned(),
        }
    }

    /// Write data to buffer, growing if necessary
    ///
    /// Returns `true` if buffer was reallocated (bind groups need recreation)
    pub fn write<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let data_bytes: &[u8] = bytemuck::cast_slice(data);
        let needed = data_bytes.len();

        let reallocated = if needed > self.capacity {
            let new_capacity = (needed * 2).max(self.capacity + 1024);
            log::debug!(
                "growing {} from {} to {new_capacity} bytes",
                self.label,
                self.capacity
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
            queue.write_buffer(&self.buffer, 0, data_bytes);
        }
        self.len = needed;

        reallocated
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Bytes written by the last upload.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the last upload was empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Typed wrapper for [`DynamicBuffer`] that tracks item count rather than
/// byte length.
pub struct TypedBuffer<T> {
    inner: DynamicBuffer,
    count: usize,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> TypedBuffer<T> {
    /// Typed buffer initialized from existing data.
    pub fn new_with_data(
        device: &wgpu::Device,
        label: &str,
        data: &[T],
        usage: wgpu::BufferUsages,
    ) -> Self {
        Self {
            inner: DynamicBuffer::new_with_data(device, label, data, usage),
            count: data.len(),
            _marker: PhantomData,
        }
    }

    /// Write data to buffer, growing if necessary
    ///
    /// Returns `true` if buffer was reallocated (bind groups need recreation)
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        self.count = data.len();
        self.inner.write(device, queue, data)
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        self.inner.buffer()
    }

    /// Items written by the last upload.
    pub fn count(&self) -> usize {
        self.count
    }
}
