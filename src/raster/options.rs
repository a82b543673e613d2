/// Resampling filter used when reading the source image.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Nearest source pixel to the destination pixel center.
    NearestNeighbor,
    /// Unweighted 2x2 box average of sub-samples inside the destination pixel.
    #[default]
    Bilinear,
    /// Unweighted 4x4 box average of sub-samples inside the destination pixel.
    ///
    /// Despite the name this is a denser box filter, not a cubic kernel; output from
    /// existing callers depends on that shape. See [`Interpolation::CubicConvolution`].
    Bicubic,
    /// Catmull-Rom cubic convolution over a 4x4 source neighbourhood.
    CubicConvolution,
}

impl Interpolation {
    /// Sub-sample grid edge for the box-filter modes.
    pub fn window_length(self) -> Option<u32> {
        match self {
            Self::Bilinear => Some(2),
            Self::Bicubic => Some(4),
            Self::NearestNeighbor | Self::CubicConvolution => None,
        }
    }
}

/// Antialiasing preference, consulted when no interpolation is given.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AntialiasHint {
    On,
    Off,
}

/// Speed/quality trade-off, consulted last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityHint {
    Speed,
    Quality,
}

/// Caller preferences. `None` means "no preference" at that level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderingHints {
    pub interpolation: Option<Interpolation>,
    pub antialias: Option<AntialiasHint>,
    pub quality: Option<QualityHint>,
}

impl RenderingHints {
    /// Resolve to concrete options.
    ///
    /// Precedence: explicit interpolation, then antialiasing (`On` -> bilinear,
    /// `Off` -> nearest), then quality (`Quality` -> bicubic, `Speed` -> nearest),
    /// then bilinear.
    pub fn resolve(&self) -> RenderingOptions {
        let interpolation = self
            .interpolation
            .or(self.antialias.map(|a| match a {
                AntialiasHint::On => Interpolation::Bilinear,
                AntialiasHint::Off => Interpolation::NearestNeighbor,
            }))
            .or(self.quality.map(|q| match q {
                QualityHint::Quality => Interpolation::Bicubic,
                QualityHint::Speed => Interpolation::NearestNeighbor,
            }))
            .unwrap_or_default();
        RenderingOptions { interpolation }
    }
}

/// Options fixed for the duration of one warp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RenderingOptions {
    pub interpolation: Interpolation,
}

#[cfg(test)]
#[path = "../../tests/unit/raster/options.rs"]
mod tests;
