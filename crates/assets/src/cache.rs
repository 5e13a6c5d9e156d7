use crate::{AssetId, TextureAsset, TextureSource};
use std::collections::BTreeMap;
use std::sync::Arc;

/// In-memory texture registry keyed by content hash.
///
/// Holders of an [`AssetId`] borrow the texture through the cache; the cache
/// owns the pixels for as long as the application runs.
#[derive(Debug, Default)]
pub struct TextureCache {
    textures: BTreeMap<AssetId, Arc<TextureAsset>>,
    sources: BTreeMap<String, AssetId>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture fetched from `source` and return its ID.
    ///
    /// Registering identical pixels twice keeps a single copy.
    pub fn insert(&mut self, source: &TextureSource, texture: TextureAsset) -> AssetId {
        let id = texture.id();
        self.textures
            .entry(id)
            .or_insert_with(|| Arc::new(texture));
        self.sources.insert(source.to_string(), id);
        id
    }

    pub fn get(&self, id: AssetId) -> Option<Arc<TextureAsset>> {
        self.textures.get(&id).cloned()
    }

    /// ID previously registered for `source`, if any.
    pub fn lookup(&self, source: &TextureSource) -> Option<AssetId> {
        self.sources.get(&source.to_string()).copied()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
