use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use image::imageops::{self, FilterType};
use log::debug;

use crate::error::AssetError;
use crate::image::PixelBuffer;

type SpriteKey = (String, usize, usize);

/// Resolves texture paths relative to an asset root and caches decoded sprites.
///
/// Sprites are cached per `(path, width, height)`; when the cache is full the
/// least recently used entry is evicted.
pub struct AssetLibrary {
    root: PathBuf,
    cache: HashMap<SpriteKey, Arc<PixelBuffer>>,
    last_used: HashMap<SpriteKey, u64>,
    tick: u64,
    max_cache_size: usize,
}

impl std::fmt::Debug for AssetLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLibrary")
            .field("root", &self.root)
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl AssetLibrary {
    pub const DEFAULT_CACHE_SIZE: usize = 64;

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_cache_size(root, Self::DEFAULT_CACHE_SIZE)
    }

    pub fn with_cache_size(root: impl Into<PathBuf>, max_cache_size: usize) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
            last_used: HashMap::new(),
            tick: 0,
            max_cache_size: max_cache_size.max(1),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a texture path to a file under the asset root.
    pub fn resolve(&self, texture: &str) -> Result<PathBuf, AssetError> {
        let relative = Path::new(texture);
        let is_plain = !texture.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        if !is_plain {
            return Err(AssetError::InvalidPath(texture.to_string()));
        }
        Ok(self.root.join(relative))
    }

    /// Loads `texture` scaled to `w`x`h`, going through the cache.
    pub fn load(&mut self, texture: &str, w: usize, h: usize) -> Result<Arc<PixelBuffer>, AssetError> {
        if w == 0 || h == 0 {
            return Err(AssetError::EmptySprite { w, h });
        }
        self.tick += 1;
        let key = (texture.to_string(), w, h);

        if let Some(sprite) = self.cache.get(&key) {
            self.last_used.insert(key, self.tick);
            return Ok(Arc::clone(sprite));
        }

        let path = self.resolve(texture)?;
        let decoded = image::open(&path)
            .map_err(|source| AssetError::Load {
                path: path.clone(),
                source,
            })?
            .to_rgba8();
        let (width, height) = match (u32::try_from(w), u32::try_from(h)) {
            (Ok(width), Ok(height)) => (width, height),
            _ => return Err(AssetError::EmptySprite { w, h }),
        };
        let scaled = if decoded.dimensions() == (width, height) {
            decoded
        } else {
            imageops::resize(&decoded, width, height, FilterType::Nearest)
        };
        debug!("Loaded sprite {} at {}x{}", path.display(), w, h);

        let sprite = Arc::new(PixelBuffer::from_rgba_image(&scaled));
        self.evict_if_full();
        self.cache.insert(key.clone(), Arc::clone(&sprite));
        self.last_used.insert(key, self.tick);
        Ok(sprite)
    }

    fn evict_if_full(&mut self) {
        while self.cache.len() >= self.max_cache_size {
            let oldest = self
                .last_used
                .iter()
                .min_by_key(|(_, tick)| **tick)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    self.cache.remove(&key);
                    self.last_used.remove(&key);
                }
                None => break,
            }
        }
    }

    /// Number of decoded sprites currently cached.
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.last_used.clear();
    }

    #[cfg(test)]
    fn is_cached(&self, texture: &str, w: usize, h: usize) -> bool {
        self.cache.contains_key(&(texture.to_string(), w, h))
    }
}
