use globeview_assets::{AssetError, TextureAsset};
use globeview_common::Rgba;
use globeview_scene::surface;

/// Apply the surface rule to every texel of a color map on the CPU.
///
/// The result is what the planet looks like with no filtering, the same
/// numbers the fragment stage writes.
pub fn shade_texture(texture: &TextureAsset) -> Result<TextureAsset, AssetError> {
    let mut pixels = Vec::with_capacity(texture.pixels().len());
    let mut ocean = 0usize;
    for texel in texture.texels() {
        if surface::is_ocean(Rgba::from_rgba8(texel)) {
            ocean += 1;
        }
        pixels.extend_from_slice(&surface::shade_rgba8(texel));
    }
    let total = (texture.width() as usize) * (texture.height() as usize);
    tracing::debug!(
        width = texture.width(),
        height = texture.height(),
        ocean_share = ocean as f64 / total.max(1) as f64,
        "surface preview shaded"
    );
    TextureAsset::from_rgba8(texture.width(), texture.height(), pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shades_each_texel() {
        let ocean = [10, 40, 120, 255];
        let land = [100, 80, 40, 255];
        let mut pixels = Vec::new();
        pixels.extend_from_slice(&ocean);
        pixels.extend_from_slice(&land);
        let texture = TextureAsset::from_rgba8(2, 1, pixels).unwrap();

        let shaded = shade_texture(&texture).unwrap();
        assert_eq!((shaded.width(), shaded.height()), (2, 1));
        assert_eq!(shaded.texel(0, 0), Some(surface::shade_rgba8(ocean)));
        assert_eq!(shaded.texel(1, 0), Some([140, 112, 56, 255]));
    }

    #[test]
    fn output_is_opaque() {
        let texture = TextureAsset::from_rgba8(1, 1, vec![0, 0, 255, 0]).unwrap();
        let shaded = shade_texture(&texture).unwrap();
        assert_eq!(shaded.texel(0, 0).unwrap()[3], 255);
    }
}
