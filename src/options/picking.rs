use serde::{Deserialize, Serialize};

/// Pick evaluation toggles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct PickingOptions {
    /// Evaluate a pick under the cursor every iteration instead of only on
    /// click. The selection is reset at the start of each iteration.
    pub always_evaluate: bool,
    /// Show the pick buffer on screen in place of the shaded scene.
    pub debug_draw_pick_buffer: bool,
}
