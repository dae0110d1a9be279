mod catalog;
mod prompts;

pub use catalog::{CatalogEntry, catalog};
pub use prompts::prompt_for;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier used when a request does not name a transformation.
pub const DEFAULT_TRANSFORMATION: &str = "baby_blur";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformationType {
    BabyBlur,
    Avatar,
    AgeProgression,
    AgeRegression,
    PetGenerator,
    CoupleGenerator,
    StyleAnime,
    StylePainting,
    StyleCartoon,
}

impl TransformationType {
    /// All transformations, in catalog display order.
    pub const ALL: [TransformationType; 9] = [
        Self::BabyBlur,
        Self::Avatar,
        Self::AgeProgression,
        Self::AgeRegression,
        Self::PetGenerator,
        Self::CoupleGenerator,
        Self::StyleAnime,
        Self::StylePainting,
        Self::StyleCartoon,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::BabyBlur => "baby_blur",
            Self::Avatar => "avatar",
            Self::AgeProgression => "age_progression",
            Self::AgeRegression => "age_regression",
            Self::PetGenerator => "pet_generator",
            Self::CoupleGenerator => "couple_generator",
            Self::StyleAnime => "style_anime",
            Self::StylePainting => "style_painting",
            Self::StyleCartoon => "style_cartoon",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }
}

impl fmt::Display for TransformationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
