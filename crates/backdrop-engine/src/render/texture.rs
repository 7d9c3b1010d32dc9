//! Background image decoding and texture upload.

use std::path::Path;

use image::imageops::FilterType;
use image::RgbaImage;

use super::RenderCtx;
use crate::error::BootError;

/// Texture format of the background.
///
/// Images are decoded with an alpha channel so the upload buffer always
/// holds exactly four bytes per texel, whatever the source channel count.
pub const BACKGROUND_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

const BYTES_PER_TEXEL: u32 = 4;

/// Decodes `path` into tightly packed RGBA8 rows.
pub fn decode_image(path: &Path) -> Result<RgbaImage, BootError> {
    let decoded = image::open(path).map_err(|source| BootError::Image {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!(
        "decoded {} ({}x{}, {:?})",
        path.display(),
        decoded.width(),
        decoded.height(),
        decoded.color()
    );

    Ok(decoded.into_rgba8())
}

/// Number of levels in a full mip chain down to 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    let largest = width.max(height).max(1);
    u32::BITS - largest.leading_zeros()
}

/// Size of mip `level` for a base of `width` x `height`.
pub fn mip_extent(width: u32, height: u32, level: u32) -> (u32, u32) {
    ((width >> level).max(1), (height >> level).max(1))
}

/// The background texture with its view and sampler.
pub struct BackgroundTexture {
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    size: (u32, u32),
}

impl BackgroundTexture {
    /// Uploads `image` and its mip chain. The pixel memory is released on return.
    pub fn upload(ctx: &RenderCtx<'_>, image: RgbaImage) -> Result<Self, BootError> {
        let (width, height) = image.dimensions();
        check_dimensions(width, height, ctx.device.limits().max_texture_dimension_2d)?;

        let mip_levels = mip_level_count(width, height);

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("backdrop background texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: mip_levels,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: BACKGROUND_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        write_level(ctx, &texture, 0, &image);

        // Each level is filtered from the previous one.
        let mut previous = image;
        for level in 1..mip_levels {
            let (w, h) = mip_extent(width, height, level);
            let next = image::imageops::resize(&previous, w, h, FilterType::Triangle);
            write_level(ctx, &texture, level, &next);
            previous = next;
        }
        drop(previous);

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = ctx.device.create_sampler(&sampler_descriptor());

        log::info!("uploaded {width}x{height} background texture ({mip_levels} mip levels)");

        Ok(Self {
            texture,
            view,
            sampler,
            size: (width, height),
        })
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

/// Rejects images the device cannot hold as a single 2D texture.
pub fn check_dimensions(width: u32, height: u32, max: u32) -> Result<(), BootError> {
    if width == 0 || height == 0 {
        return Err(BootError::ImageEmpty { width, height });
    }
    if width > max || height > max {
        return Err(BootError::ImageTooLarge { width, height, max });
    }
    Ok(())
}

/// Bilinear sampling of the base level, clamped at the edges.
///
/// The mip chain is uploaded but the LOD is pinned to level 0.
fn sampler_descriptor() -> wgpu::SamplerDescriptor<'static> {
    wgpu::SamplerDescriptor {
        label: Some("backdrop background sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        lod_min_clamp: 0.0,
        lod_max_clamp: 0.0,
        ..Default::default()
    }
}

fn write_level(ctx: &RenderCtx<'_>, texture: &wgpu::Texture, level: u32, pixels: &RgbaImage) {
    let (w, h) = pixels.dimensions();
    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: level,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels.as_raw(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(w * BYTES_PER_TEXEL),
            rows_per_image: Some(h),
        },
        wgpu::Extent3d {
            width: w,
            height: h,
            depth_or_array_layers: 1,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    // ── mip math ──────────────────────────────────────────────────────────

    #[test]
    fn single_texel_has_one_level() {
        assert_eq!(mip_level_count(1, 1), 1);
    }

    #[test]
    fn level_count_follows_largest_side() {
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(800, 600), 10);
        assert_eq!(mip_level_count(1, 1024), 11);
        assert_eq!(mip_level_count(1023, 3), 10);
    }

    #[test]
    fn last_level_is_one_by_one() {
        let (w, h) = (800, 600);
        let last = mip_level_count(w, h) - 1;
        assert_eq!(mip_extent(w, h, last), (1, 1));
        assert_eq!(mip_extent(w, h, 1), (400, 300));
    }

    #[test]
    fn narrow_side_clamps_to_one() {
        assert_eq!(mip_extent(64, 2, 4), (4, 1));
    }

    // ── upload checks ─────────────────────────────────────────────────────

    #[test]
    fn empty_image_is_not_reported_as_too_large() {
        match check_dimensions(0, 5, 8192) {
            Err(BootError::ImageEmpty { width: 0, height: 5 }) => {}
            other => panic!("expected empty image error, got {other:?}"),
        }
    }

    #[test]
    fn oversized_image_reports_the_limit() {
        match check_dimensions(9000, 10, 8192) {
            Err(BootError::ImageTooLarge { max: 8192, .. }) => {}
            other => panic!("expected too-large error, got {other:?}"),
        }
        assert!(check_dimensions(8192, 8192, 8192).is_ok());
    }

    #[test]
    fn sampler_filters_linearly_from_the_base_level() {
        let desc = sampler_descriptor();
        assert_eq!(desc.min_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.mag_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.lod_max_clamp, 0.0);
        assert_eq!(desc.address_mode_u, wgpu::AddressMode::ClampToEdge);
    }

    // ── decoding ──────────────────────────────────────────────────────────

    #[test]
    fn rgb_png_decodes_to_opaque_rgba() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("background.png");
        RgbImage::from_pixel(2, 2, Rgb([255, 0, 0]))
            .save(&path)
            .expect("write png");

        let image = decode_image(&path).expect("decode");
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.as_raw().len(), 2 * 2 * 4);
        assert!(image.pixels().all(|p| p.0 == [255, 0, 0, 255]));
    }

    #[test]
    fn missing_file_is_an_image_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("background.png");

        match decode_image(&path) {
            Err(BootError::Image { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected image error, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_file_is_an_image_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("background.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\nnot really").expect("write");

        assert!(matches!(decode_image(&path), Err(BootError::Image { .. })));
    }
}
