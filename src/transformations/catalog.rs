use super::TransformationType;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: TransformationType,
    #[serde(rename = "name")]
    pub display_name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: &'static str,
}

/// The published list of transformations, in display order.
pub fn catalog() -> Vec<CatalogEntry> {
    TransformationType::ALL.into_iter().map(entry).collect()
}

fn entry(id: TransformationType) -> CatalogEntry {
    let (display_name, description, icon, category) = match id {
        TransformationType::BabyBlur => (
            "Baby Generator",
            "See what your future baby could look like",
            "👶",
            "family",
        ),
        TransformationType::Avatar => (
            "AI Avatar",
            "Turn your photo into a stylized avatar",
            "🧑‍🎨",
            "portrait",
        ),
        TransformationType::AgeProgression => (
            "Age Progression",
            "See yourself decades from now",
            "👴",
            "age",
        ),
        TransformationType::AgeRegression => (
            "Age Regression",
            "See yourself as a child again",
            "🧒",
            "age",
        ),
        TransformationType::PetGenerator => (
            "Pet Generator",
            "Discover the pet that looks like you",
            "🐶",
            "fun",
        ),
        TransformationType::CoupleGenerator => (
            "Couple Portrait",
            "Create a portrait of the two of you together",
            "💑",
            "family",
        ),
        TransformationType::StyleAnime => (
            "Anime Style",
            "Redraw your photo as an anime character",
            "🎌",
            "style",
        ),
        TransformationType::StylePainting => (
            "Oil Painting",
            "Become a classical oil painting",
            "🎨",
            "style",
        ),
        TransformationType::StyleCartoon => (
            "Cartoon Style",
            "Become a 3D cartoon character",
            "🎬",
            "style",
        ),
    };

    CatalogEntry {
        id,
        display_name,
        description,
        icon,
        category,
    }
}
