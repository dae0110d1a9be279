use super::TransformationType;

/// Prompt for a transformation identifier. Unknown identifiers get the avatar prompt.
pub fn prompt_for(id: &str) -> &'static str {
    let transformation = TransformationType::from_id(id).unwrap_or(TransformationType::Avatar);
    prompt(transformation)
}

fn prompt(transformation: TransformationType) -> &'static str {
    match transformation {
        TransformationType::BabyBlur => {
            "A photorealistic portrait of an adorable newborn baby combining the facial \
             features of both parents, soft natural lighting, gentle pastel background, \
             shallow depth of field, warm and tender mood"
        }
        TransformationType::Avatar => {
            "A professional stylized digital avatar portrait, clean modern illustration, \
             expressive eyes, soft studio lighting, vibrant but balanced colors, centered \
             head and shoulders composition"
        }
        TransformationType::AgeProgression => {
            "A photorealistic portrait of the same person aged 30 years older, natural \
             wrinkles and gray hair, realistic skin texture, soft window light, dignified \
             and warm expression"
        }
        TransformationType::AgeRegression => {
            "A photorealistic portrait of the same person as a young child, rounder face, \
             bright curious eyes, natural skin, soft daylight, playful and innocent \
             expression"
        }
        TransformationType::PetGenerator => {
            "A charming photorealistic portrait of a pet animal that resembles the person, \
             matching hair color and expression, fluffy fur, cozy home background, warm \
             golden hour lighting"
        }
        TransformationType::CoupleGenerator => {
            "A romantic photorealistic portrait of a happy couple together, natural poses, \
             soft bokeh background, golden hour sunlight, genuine smiles, magazine quality \
             photography"
        }
        TransformationType::StyleAnime => {
            "An anime style character portrait, large expressive eyes, clean line art, cel \
             shading, vibrant colors, detailed hair, studio quality Japanese animation look"
        }
        TransformationType::StylePainting => {
            "A classical oil painting portrait in the style of the old masters, rich \
             textured brush strokes, dramatic chiaroscuro lighting, warm earthy palette, \
             museum quality canvas"
        }
        TransformationType::StyleCartoon => {
            "A fun 3D cartoon character portrait in a modern animated film style, \
             exaggerated friendly features, smooth shading, bright saturated colors, simple \
             background"
        }
    }
}
