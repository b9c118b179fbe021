use std::fmt;

/// What went wrong while bringing up the window's GPU surface.
#[derive(Debug)]
pub enum GpuSetupError {
    /// The window handle could not back a surface.
    Surface(wgpu::CreateSurfaceError),
    /// No adapter can present to the surface.
    Adapter(wgpu::RequestAdapterError),
    /// The adapter refused a device with default limits.
    Device(wgpu::RequestDeviceError),
    /// The surface reports no texture formats for the adapter.
    NoSurfaceFormat,
}

impl fmt::Display for GpuSetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface(e) => write!(f, "cannot create window surface: {e}"),
            Self::Adapter(e) => write!(f, "no adapter can present to the window: {e}"),
            Self::Device(e) => write!(f, "device request failed: {e}"),
            Self::NoSurfaceFormat => f.write_str("surface has no usable texture format"),
        }
    }
}

impl std::error::Error for GpuSetupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            Self::Adapter(e) => Some(e),
            Self::Device(e) => Some(e),
            Self::NoSurfaceFormat => None,
        }
    }
}

/// Pick the presentation format. Scene colours are authored in linear
/// space, so an sRGB format is preferred when the surface offers one.
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(wgpu::TextureFormat::is_srgb)
        .or_else(|| formats.first().copied())
}

/// Surface extent for a window size; zero dimensions become one pixel.
const fn surface_extent(size: (u32, u32)) -> (u32, u32) {
    let width = if size.0 == 0 { 1 } else { size.0 };
    let height = if size.1 == 0 { 1 } else { size.1 };
    (width, height)
}

/// The window's device, queue and swapchain surface.
#[derive(Debug)]
pub struct RenderContext {
    /// Logical device every quad-view resource is created on.
    pub device: wgpu::Device,
    /// Queue frames and uniform uploads are submitted to.
    pub queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
}

impl RenderContext {
    /// Open a surface on `window` sized `initial_size` pixels and request
    /// a device that can present to it.
    ///
    /// # Errors
    ///
    /// Returns a [`GpuSetupError`] naming the step that failed.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
    ) -> Result<Self, GpuSetupError> {
        let (width, height) = surface_extent(initial_size);
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window).map_err(GpuSetupError::Surface)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                power_preference: wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            })
            .await
            .map_err(GpuSetupError::Adapter)?;
        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Quad View Device"),
                ..Default::default()
            })
            .await
            .map_err(GpuSetupError::Device)?;

        let caps = surface.get_capabilities(&adapter);
        let format = pick_surface_format(&caps.formats).ok_or(GpuSetupError::NoSurfaceFormat)?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        log::debug!("surface format {format:?}, {width}x{height}");

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: Vec::new(),
        };
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            surface,
            config,
        })
    }

    /// Texture format of the swapchain.
    #[must_use]
    pub const fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Swapchain size in pixels.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Spacing in bytes between per-draw uniform blocks.
    #[must_use]
    pub fn uniform_alignment(&self) -> usize {
        self.device.limits().min_uniform_buffer_offset_alignment as usize
    }

    /// Resize the swapchain to the window. Zero-sized dimensions are
    /// ignored so a minimised window keeps its last surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == self.size() {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
    }

    /// Re-apply the surface configuration after it was lost or outdated.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquire the next swapchain texture and a view to render into.
    ///
    /// # Errors
    ///
    /// Returns the [`wgpu::SurfaceError`] if no texture is available.
    pub fn acquire_frame(
        &self,
    ) -> Result<(wgpu::SurfaceTexture, wgpu::TextureView), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok((frame, view))
    }

    /// Encoder for one quad-view frame.
    #[must_use]
    pub fn frame_encoder(&self) -> wgpu::CommandEncoder {
        self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Quad View Encoder"),
        })
    }

    /// Submit the recorded frame and present it.
    pub fn finish_frame(&self, encoder: wgpu::CommandEncoder, frame: wgpu::SurfaceTexture) {
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_formats_are_preferred() {
        let formats = [wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Bgra8UnormSrgb];
        assert_eq!(pick_surface_format(&formats), Some(wgpu::TextureFormat::Bgra8UnormSrgb));
    }

    #[test]
    fn first_format_is_used_without_srgb() {
        let formats = [wgpu::TextureFormat::Rgba16Float, wgpu::TextureFormat::Bgra8Unorm];
        assert_eq!(pick_surface_format(&formats), Some(wgpu::TextureFormat::Rgba16Float));
        assert_eq!(pick_surface_format(&[]), None);
    }

    #[test]
    fn zero_window_sizes_map_to_one_pixel() {
        assert_eq!(surface_extent((0, 0)), (1, 1));
        assert_eq!(surface_extent((800, 0)), (800, 1));
        assert_eq!(surface_extent((800, 600)), (800, 600));
    }
}
