//! Shader compilation and program linking.
//!
//! The two stages are compiled as separate modules and then linked into one
//! render pipeline. Both steps run inside a validation error scope so a bad
//! shader or a mismatched vertex layout turns into a [`BootError`] instead of
//! wgpu's uncaptured-error panic.

use std::borrow::Cow;

use super::geometry::QuadVertex;
use super::RenderCtx;
use crate::error::{BootError, ShaderStage};

/// Upper bound on the diagnostic text kept from the compiler.
pub const INFO_LOG_LIMIT: usize = 512;

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Bind group index of the background texture ("texture unit 0").
pub const TEXTURE_GROUP: u32 = 0;

/// WGSL source for both stages.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: Cow<'static, str>,
    pub fragment: Cow<'static, str>,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self {
            vertex: Cow::Borrowed(include_str!("shaders/background_vs.wgsl")),
            fragment: Cow::Borrowed(include_str!("shaders/background_fs.wgsl")),
        }
    }
}

/// A linked program: the render pipeline and the layout of its texture binding.
pub struct LinkedProgram {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) texture_layout: wgpu::BindGroupLayout,
}

/// Compiles both stages and links them for `ctx.target_format`.
///
/// The stage modules are dropped once the pipeline exists.
pub fn build_program(
    ctx: &RenderCtx<'_>,
    sources: &ShaderSources,
) -> Result<LinkedProgram, BootError> {
    let vertex = compile(ctx.device, ShaderStage::Vertex, &sources.vertex)?;
    let fragment = compile(ctx.device, ShaderStage::Fragment, &sources.fragment)?;

    let program = link(ctx, &vertex, &fragment)?;

    drop(vertex);
    drop(fragment);
    log::debug!("shader program linked; stage modules released");

    Ok(program)
}

/// Compiles one WGSL stage.
pub fn compile(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, BootError> {
    let label = match stage {
        ShaderStage::Vertex => "backdrop vertex shader",
        ShaderStage::Fragment => "backdrop fragment shader",
    };

    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(Cow::Owned(source.to_owned())),
    });
    let error = pollster::block_on(scope.pop());

    let info = pollster::block_on(module.get_compilation_info());
    let mut diagnostics = Vec::new();
    for msg in &info.messages {
        let line = msg.location.as_ref().map_or(0, |l| l.line_number);
        match msg.message_type {
            wgpu::CompilationMessageType::Error => {
                diagnostics.push(msg.message.trim().to_owned());
            }
            wgpu::CompilationMessageType::Warning => {
                log::warn!("{stage} shader line {line}: {}", msg.message);
            }
            wgpu::CompilationMessageType::Info => {
                log::debug!("{stage} shader line {line}: {}", msg.message);
            }
        }
    }

    if error.is_none() && diagnostics.is_empty() {
        return Ok(module);
    }

    let log = match error {
        Some(err) if diagnostics.is_empty() => error_description(&err),
        _ => diagnostics.join("\n"),
    };
    Err(BootError::Compile {
        stage,
        log: info_log(&log),
    })
}

/// Links compiled stages into a pipeline drawing the quad into `ctx.target_format`.
///
/// Vertex attribute 0 feeds `position`, attribute 1 feeds `tex_coord`; a
/// shader expecting anything else fails here.
pub fn link(
    ctx: &RenderCtx<'_>,
    vertex: &wgpu::ShaderModule,
    fragment: &wgpu::ShaderModule,
) -> Result<LinkedProgram, BootError> {
    let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

    let texture_layout = ctx
        .device
        .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("backdrop texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

    let pipeline_layout = ctx
        .device
        .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("backdrop pipeline layout"),
            bind_group_layouts: &[&texture_layout],
            immediate_size: 0,
        });

    let pipeline = ctx
        .device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("backdrop pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: vertex,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: fragment,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

    if let Some(err) = pollster::block_on(scope.pop()) {
        return Err(BootError::Link {
            log: info_log(&error_description(&err)),
        });
    }

    Ok(LinkedProgram {
        pipeline,
        texture_layout,
    })
}

/// The full message carried by a scoped wgpu error.
///
/// `Display` on [`wgpu::Error`] only names the error class.
fn error_description(err: &wgpu::Error) -> String {
    match err {
        wgpu::Error::Validation { description, .. } | wgpu::Error::Internal { description, .. } => {
            description.clone()
        }
        other => other.to_string(),
    }
}

/// Cuts a diagnostic to [`INFO_LOG_LIMIT`] bytes without splitting a character.
pub fn info_log(text: &str) -> String {
    let text = text.trim();
    if text.len() <= INFO_LOG_LIMIT {
        return text.to_owned();
    }
    let mut end = INFO_LOG_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_logs_are_kept_whole() {
        assert_eq!(info_log("error: expected `;`\n"), "error: expected `;`");
    }

    #[test]
    fn long_logs_are_bounded() {
        let log = "x".repeat(4 * INFO_LOG_LIMIT);
        assert_eq!(info_log(&log).len(), INFO_LOG_LIMIT);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 'é' is two bytes; 511 ASCII bytes leave the limit inside it.
        let log = format!("{}é tail", "a".repeat(INFO_LOG_LIMIT - 1));
        let cut = info_log(&log);
        assert_eq!(cut.len(), INFO_LOG_LIMIT - 1);
        assert!(cut.chars().all(|c| c == 'a'));
    }

    #[test]
    fn default_sources_declare_the_expected_interface() {
        let sources = ShaderSources::default();
        assert!(sources.vertex.contains(VERTEX_ENTRY));
        assert!(sources.vertex.contains("@location(0) position: vec3<f32>"));
        assert!(sources.vertex.contains("@location(1) tex_coord: vec2<f32>"));
        assert!(sources.fragment.contains(FRAGMENT_ENTRY));
        assert!(sources.fragment.contains("var texture0: texture_2d<f32>"));
    }
}
