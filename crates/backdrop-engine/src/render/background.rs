use std::fmt;

use image::RgbaImage;

use super::geometry::GeometryBuffers;
use super::shader::{self, LinkedProgram, ShaderSources, TEXTURE_GROUP};
use super::texture::BackgroundTexture;
use super::{RenderCtx, RenderTarget};
use crate::core::Scene;
use crate::device::GpuFrame;
use crate::error::BootError;

/// GPU object categories owned by a [`Background`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceKind {
    Texture,
    /// Bind group tying the texture + sampler to group 0.
    TextureBinding,
    VertexBuffer,
    IndexBuffer,
    /// The linked render pipeline.
    Program,
}

impl ResourceKind {
    /// Every category, in release order.
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Texture,
        ResourceKind::TextureBinding,
        ResourceKind::VertexBuffer,
        ResourceKind::IndexBuffer,
        ResourceKind::Program,
    ];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Texture => "texture",
            ResourceKind::TextureBinding => "texture binding",
            ResourceKind::VertexBuffer => "vertex buffer",
            ResourceKind::IndexBuffer => "index buffer",
            ResourceKind::Program => "shader program",
        };
        f.write_str(name)
    }
}

/// The full-screen background: one texture, one program, one quad.
pub struct Background {
    texture: BackgroundTexture,
    binding: wgpu::BindGroup,
    geometry: GeometryBuffers,
    program: LinkedProgram,
    clear_color: wgpu::Color,
}

impl Background {
    /// Uploads `image`, builds the program and the quad, then binds the
    /// texture to group 0.
    ///
    /// Anything created before a failure is dropped on the way out.
    pub fn new(
        ctx: &RenderCtx<'_>,
        image: RgbaImage,
        shaders: &ShaderSources,
        clear_color: wgpu::Color,
    ) -> Result<Self, BootError> {
        let texture = BackgroundTexture::upload(ctx, image)?;
        let program = shader::build_program(ctx, shaders)?;
        let geometry = GeometryBuffers::upload(ctx);

        let binding = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("backdrop texture binding"),
            layout: &program.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        Ok(Self {
            texture,
            binding,
            geometry,
            program,
            clear_color,
        })
    }

    pub fn texture_size(&self) -> (u32, u32) {
        self.texture.size()
    }

    /// Records one frame: clear, bind, one indexed draw.
    pub fn record(&self, target: &mut RenderTarget<'_>) {
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("backdrop pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.program.pipeline);
        rpass.set_bind_group(TEXTURE_GROUP, &self.binding, &[]);
        self.geometry.bind(&mut rpass);
        rpass.draw_indexed(0..self.geometry.index_count(), 0, 0..1);

        // Ending the pass clears every binding set above.
        drop(rpass);
    }

    /// Releases every GPU object and returns what was released, in order.
    pub fn release(self) -> Vec<ResourceKind> {
        let Background {
            texture,
            binding,
            geometry,
            program,
            ..
        } = self;
        let mut released = Vec::with_capacity(ResourceKind::ALL.len());

        texture.texture.destroy();
        drop(texture);
        released.push(ResourceKind::Texture);

        drop(binding);
        released.push(ResourceKind::TextureBinding);

        let GeometryBuffers {
            vertex_buffer,
            index_buffer,
            ..
        } = geometry;
        vertex_buffer.destroy();
        drop(vertex_buffer);
        released.push(ResourceKind::VertexBuffer);

        index_buffer.destroy();
        drop(index_buffer);
        released.push(ResourceKind::IndexBuffer);

        drop(program);
        released.push(ResourceKind::Program);

        for kind in &released {
            log::debug!("released {kind}");
        }
        released
    }
}

impl Scene<GpuFrame> for Background {
    fn draw(&mut self, frame: &mut GpuFrame) {
        let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
        self.record(&mut target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_order_starts_with_texture_and_ends_with_program() {
        assert_eq!(ResourceKind::ALL.first(), Some(&ResourceKind::Texture));
        assert_eq!(ResourceKind::ALL.last(), Some(&ResourceKind::Program));
    }

    #[test]
    fn resource_names_are_human_readable() {
        let names: Vec<String> = ResourceKind::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            ["texture", "texture binding", "vertex buffer", "index buffer", "shader program"]
        );
    }
}
