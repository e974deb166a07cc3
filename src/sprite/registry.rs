//! Sprite Registry: named sprites plus their back-to-front paint order.

use super::sprite::Sprite;
use crate::buffer::Rgb;
use crate::error::{CanvasError, Result};
use crate::layout::GridCell;
use std::collections::HashMap;

/// Name-keyed sprite storage with an explicit z-order.
///
/// Every name in `order` has exactly one entry in `sprites` and vice versa.
/// Index 0 of `order` is painted first; later sprites occlude earlier ones.
#[derive(Debug, Default)]
pub struct SpriteRegistry {
    sprites: HashMap<String, Sprite>,
    order: Vec<String>,
}

impl SpriteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new transparent sprite on top of the z-order.
    pub fn create(&mut self, name: &str, width: u16, height: u16, transparent: Rgb) -> Result<&mut Sprite> {
        if self.sprites.contains_key(name) {
            return Err(CanvasError::DuplicateSprite(name.to_string()));
        }
        let sprite = Sprite::new(name, width, height, transparent)?;
        self.order.push(name.to_string());
        Ok(self.sprites.entry(name.to_string()).or_insert(sprite))
    }

    /// Look up a sprite by name.
    pub fn get(&self, name: &str) -> Option<&Sprite> {
        self.sprites.get(name)
    }

    /// Look up a sprite by name for mutation.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Sprite> {
        self.sprites.get_mut(name)
    }

    /// Check if a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.sprites.contains_key(name)
    }

    /// Number of registered sprites.
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Names in paint order (back to front).
    pub fn z_order(&self) -> &[String] {
        &self.order
    }

    /// Iterate sprites in paint order.
    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.order.iter().filter_map(|name| self.sprites.get(name))
    }

    /// Remove one sprite.
    pub fn remove(&mut self, name: &str) -> Option<Sprite> {
        let sprite = self.sprites.remove(name)?;
        self.order.retain(|n| n != name);
        Some(sprite)
    }

    /// Move a sprite to the top of the z-order. Returns `false` if unknown.
    pub fn raise(&mut self, name: &str) -> bool {
        let Some(pos) = self.order.iter().position(|n| n == name) else {
            return false;
        };
        let entry = self.order.remove(pos);
        self.order.push(entry);
        true
    }

    /// Hide and drop every sprite.
    ///
    /// Returns the union of the cells they occupied, so the caller can
    /// dirty them and let the background reappear.
    pub fn dispose_all(&mut self) -> Vec<GridCell> {
        let mut cells: Vec<GridCell> = self.sprites.values_mut().flat_map(Sprite::hide).collect();
        cells.sort_unstable();
        cells.dedup();
        self.sprites.clear();
        self.order.clear();
        cells
    }

    /// Visible sprites covering any of `cells`, in z-order.
    pub fn overlapping<'a>(&'a self, cells: &'a [GridCell]) -> impl Iterator<Item = &'a Sprite> + 'a {
        self.iter().filter(move |s| s.occupies_any(cells))
    }
}
