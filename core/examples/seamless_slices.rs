// Builds the same noise volume with and without the seamless filter and writes
// a 2×2 tiling of one Z slice of each, so the seams (or their absence) are visible.

use image::{GrayImage, Luma};
use std::path::Path;
use volnoise::{NoiseParams, NoiseType, TextureConfig, VolumeTexture, build};

// Repeat one slice `tiles` times in each direction
fn tile_slice(texture: &VolumeTexture, z: usize, tiles: u32) -> GrayImage {
    let size = texture.size() as u32;
    let mut img = GrayImage::new(size * tiles, size * tiles);
    for py in 0..size * tiles {
        for px in 0..size * tiles {
            let v = texture
                .get((px % size) as usize, (py % size) as usize, z)
                .unwrap_or(0);
            img.put_pixel(px, py, Luma([v]));
        }
    }
    img
}

fn save(img: &GrayImage, filename: &str) {
    img.save(Path::new(filename)).unwrap();
    println!("Saved {}", filename);
}

fn main() {
    let size = 64;
    let mut noise = NoiseParams::with_type(NoiseType::Perlin);
    noise.frequency = 4.0;
    noise.octaves = 4;

    for (seamless, filename) in [(false, "tiled_plain.png"), (true, "tiled_seamless.png")] {
        let config = TextureConfig {
            noise: noise.clone(),
            grid_size: size,
            seamless,
            ..TextureConfig::default()
        };
        let texture = build(&config).unwrap();
        save(&tile_slice(&texture, size / 2, 2), filename);
    }

    // single slice of a cellular volume for comparison
    let mut cell = NoiseParams::with_type(NoiseType::Cell);
    cell.frequency = 8.0;
    let config = TextureConfig {
        noise: cell,
        grid_size: size,
        seamless: true,
        ..TextureConfig::default()
    };
    let texture = build(&config).unwrap();
    if let Some(slice) = texture.slice_image(0) {
        save(&slice, "cell_slice.png");
    }
}
