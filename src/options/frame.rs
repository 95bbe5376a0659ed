use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Main-loop pacing and scene redraw policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FrameOptions {
    /// Iteration cap. Written as `0` in TOML when unbounded.
    #[serde(with = "fps_cap")]
    pub max_fps: Option<u32>,
    /// Re-rasterize the scene every iteration, not only on demand.
    pub always_redraw: bool,
    /// Scene clear color (RGBA).
    pub background_color: [f32; 4],
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            max_fps: Some(60),
            always_redraw: false,
            background_color: [1.0, 1.0, 1.0, 0.0],
        }
    }
}

/// `Option<u32>` ↔ `u32` with zero meaning "no cap".
mod fps_cap {
    use super::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub(super) fn serialize<S: Serializer>(
        cap: &Option<u32>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(cap.unwrap_or(0))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u32>, D::Error> {
        let n = u32::deserialize(deserializer)?;
        Ok((n > 0).then_some(n))
    }
}
