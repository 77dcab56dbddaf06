use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{
    Extent3d, TextureDimension, TextureFormat, TextureViewDescriptor, TextureViewDimension,
};
use half::f16;
use std::f32::consts::{PI, TAU};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EnvironmentMapError {
    #[error("environment image has no CPU-side pixel data")]
    MissingData,
    #[error("unsupported environment image format {0:?}")]
    UnsupportedFormat(TextureFormat),
    #[error("environment image is {width}x{height}, expected a non-empty 2:1 panorama")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Linear RGBA texels of an equirectangular panorama.
struct Panorama {
    width: u32,
    height: u32,
    texels: Vec<Vec4>,
}

impl Panorama {
    fn from_image(image: &Image) -> Result<Self, EnvironmentMapError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 || width < height {
            return Err(EnvironmentMapError::InvalidDimensions { width, height });
        }
        let data = image
            .data
            .as_deref()
            .ok_or(EnvironmentMapError::MissingData)?;

        let texels: Vec<Vec4> = match image.texture_descriptor.format {
            TextureFormat::Rgba32Float => data
                .chunks_exact(16)
                .map(|texel| {
                    let channel = |i: usize| {
                        f32::from_le_bytes([
                            texel[i * 4],
                            texel[i * 4 + 1],
                            texel[i * 4 + 2],
                            texel[i * 4 + 3],
                        ])
                    };
                    Vec4::new(channel(0), channel(1), channel(2), channel(3))
                })
                .collect(),
            TextureFormat::Rgba16Float => data
                .chunks_exact(8)
                .map(|texel| {
                    let channel =
                        |i: usize| f16::from_le_bytes([texel[i * 2], texel[i * 2 + 1]]).to_f32();
                    Vec4::new(channel(0), channel(1), channel(2), channel(3))
                })
                .collect(),
            format => return Err(EnvironmentMapError::UnsupportedFormat(format)),
        };

        if texels.len() != (width * height) as usize {
            return Err(EnvironmentMapError::MissingData);
        }

        Ok(Self {
            width,
            height,
            texels,
        })
    }

    fn texel(&self, x: i64, y: i64) -> Vec4 {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.texels[y * self.width as usize + x]
    }

    /// Bilinear lookup along a world direction. Longitude wraps, latitude clamps.
    fn sample(&self, direction: Vec3) -> Vec4 {
        let direction = direction.normalize();
        let u = direction.z.atan2(direction.x) / TAU + 0.5;
        let v = 0.5 - direction.y.clamp(-1.0, 1.0).asin() / PI;

        let x = u * self.width as f32 - 0.5;
        let y = v * self.height as f32 - 0.5;
        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = (x - x0, y - y0);
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = self.texel(x0, y0).lerp(self.texel(x0 + 1, y0), fx);
        let bottom = self.texel(x0, y0 + 1).lerp(self.texel(x0 + 1, y0 + 1), fx);
        top.lerp(bottom, fy)
    }
}

/// Direction through texel (`u`, `v`) in [-1, 1] of cube face `face`.
///
/// Faces follow the GPU layer order +X, -X, +Y, -Y, +Z, -Z with `v` pointing
/// down the face.
fn cube_face_direction(face: usize, u: f32, v: f32) -> Vec3 {
    match face {
        0 => Vec3::new(1.0, -v, -u),
        1 => Vec3::new(-1.0, -v, u),
        2 => Vec3::new(u, 1.0, v),
        3 => Vec3::new(u, -1.0, -v),
        4 => Vec3::new(u, -v, 1.0),
        _ => Vec3::new(-u, -v, -1.0),
    }
}

/// Resample an equirectangular HDR into a six-layer `Rgba16Float` cubemap
/// usable by both `Skybox` and `EnvironmentMapLight`.
pub fn equirect_to_cubemap(image: &Image, max_face_size: u32) -> Result<Image, EnvironmentMapError> {
    let panorama = Panorama::from_image(image)?;
    let face_size = (panorama.width / 4).clamp(1, max_face_size.max(1));

    let mut texels: Vec<f16> = Vec::with_capacity((face_size * face_size * 6 * 4) as usize);
    for face in 0..6 {
        for y in 0..face_size {
            for x in 0..face_size {
                let u = 2.0 * (x as f32 + 0.5) / face_size as f32 - 1.0;
                let v = 2.0 * (y as f32 + 0.5) / face_size as f32 - 1.0;
                // Cubemap lookups in Bevy negate z.
                let direction = cube_face_direction(face, u, v) * Vec3::new(1.0, 1.0, -1.0);
                let colour = panorama.sample(direction);
                texels.extend(colour.to_array().map(f16::from_f32));
            }
        }
    }

    let mut cubemap = Image::new(
        Extent3d {
            width: face_size,
            height: face_size,
            depth_or_array_layers: 6,
        },
        TextureDimension::D2,
        bytemuck::cast_slice(&texels).to_vec(),
        TextureFormat::Rgba16Float,
        RenderAssetUsages::default(),
    );
    cubemap.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });

    Ok(cubemap)
}
