//! Color-coded index picking.
//!
//! Structures rasterize their elements into an offscreen float target using
//! colors from [`encoding`]. The host reads back the pixel under the cursor,
//! decodes it, and resolves the global index through [`PickMap`] into a
//! [`Selection`].

/// Pick index ↔ color packing.
pub mod encoding;
mod pick_map;
mod state;

pub use encoding::{color_to_index, index_to_color, MAX_PICK_INDEX};
pub use pick_map::PickMap;
pub use state::{PickState, Selection};

use crate::structure::StructureId;

/// Decode a pick-target pixel and resolve it against `map`.
///
/// Background, a missing or zero-alpha pixel, and indices with no owning
/// range all resolve to `None`.
#[must_use]
pub fn resolve_pixel(
    map: &PickMap,
    pixel: Option<[f32; 4]>,
) -> Option<(StructureId, u64)> {
    let [r, g, b, a] = pixel?;
    if a <= 0.0 {
        return None;
    }
    map.resolve(color_to_index([r, g, b]))
}
