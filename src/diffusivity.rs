//! Penalizer derivatives (diffusivities) for the data and smoothness terms.
//!
//! Each variant maps a squared magnitude `s2 ≥ 0` and a contrast parameter
//! `eps > 0` to a weight. Charbonnier is the default for both terms.
//!
//! | Variant        | `Ψ'(s2)`                                   |
//! |----------------|--------------------------------------------|
//! | Homogeneous    | `1`                                        |
//! | PeronaMalik    | `eps² / (eps² + s2)`                       |
//! | Weickert       | `1 − exp(−3.31488 / (s2/eps²)⁴)`, `1` at 0 |
//! | Charbonnier    | `1 / sqrt(s2/eps² + 1)`                    |
//! | TotalVariation | `1 / sqrt(s2 + eps²)`                      |
//!
//! Homogeneous, PeronaMalik and Charbonnier stay in `(0, 1]`; Weickert may
//! underflow to `0` for large `s2`; TotalVariation peaks at `1/eps`.
use serde::{Deserialize, Serialize};

const WEICKERT_CM: f32 = 3.31488;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diffusivity {
    Homogeneous,
    PeronaMalik,
    Weickert,
    #[default]
    Charbonnier,
    TotalVariation,
}

impl Diffusivity {
    /// Weight for squared magnitude `s2` with contrast `eps`.
    #[inline]
    pub fn weight(self, s2: f32, eps: f32) -> f32 {
        let eps2 = eps * eps;
        match self {
            Self::Homogeneous => 1.0,
            Self::PeronaMalik => eps2 / (eps2 + s2),
            Self::Weickert => {
                if s2 == 0.0 {
                    1.0
                } else {
                    1.0 - (-WEICKERT_CM / (s2 / eps2).powi(4)).exp()
                }
            }
            Self::Charbonnier => 1.0 / (s2 / eps2 + 1.0).sqrt(),
            Self::TotalVariation => 1.0 / (s2 + eps2).sqrt(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Homogeneous => "Homogeneous",
            Self::PeronaMalik => "PM",
            Self::Weickert => "Weickert",
            Self::Charbonnier => "Charbonnier",
            Self::TotalVariation => "TV",
        }
    }
}
