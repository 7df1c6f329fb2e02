//! Closed enumeration of the supported image-to-video animation providers.
//!
//! The model is selected by a validated enum rather than a free-form
//! string; the choice only affects which external endpoint is called,
//! not the shape of the stage-2 pipeline.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Supported animation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoModel {
    /// Google Veo 2 (via fal.ai).
    #[default]
    Veo2,
    /// Luma Dream Machine Ray 2 Flash (via fal.ai).
    #[serde(rename = "ray_flash_2")]
    RayFlash2,
}

impl VideoModel {
    /// Wire name accepted by the API and used in job snapshots.
    pub fn as_str(self) -> &'static str {
        match self {
            VideoModel::Veo2 => "veo2",
            VideoModel::RayFlash2 => "ray_flash_2",
        }
    }

    /// fal.ai queue endpoint path for this model.
    pub fn endpoint(self) -> &'static str {
        match self {
            VideoModel::Veo2 => "fal-ai/veo2/image-to-video",
            VideoModel::RayFlash2 => {
                "fal-ai/luma-dream-machine/ray-2-flash/image-to-video"
            }
        }
    }

    /// Parse a wire name. Accepts the short names and, for compatibility
    /// with older clients, the full fal.ai endpoint paths.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "veo2" | "fal-ai/veo2/image-to-video" => Ok(VideoModel::Veo2),
            "ray_flash_2" | "fal-ai/luma-dream-machine/ray-2-flash/image-to-video" => {
                Ok(VideoModel::RayFlash2)
            }
            other => Err(CoreError::Validation(format!(
                "Unknown video model '{other}'. Must be one of: veo2, ray_flash_2"
            ))),
        }
    }
}
