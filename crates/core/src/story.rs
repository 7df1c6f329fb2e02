//! Prompt construction for the storyboard generator.
//!
//! Three prompts are built here: the storyboard request itself (with an
//! alternate wording when a seed image anchors the style), the
//! scene-extraction request that turns the generator's free text into
//! structured scene records, and the per-frame motion directive handed
//! to the animation provider in stage 2.

/// Build the storyboard prompt for a plain text-only request.
pub fn storyboard_prompt(description: &str, frame_count: u32) -> String {
    format!(
        "GENERATE (do not describe) a sequence of {frame_count} actual images.\n\
         Each image should be a frame in {description}\n\
         Each generated image should be a different scene.\n\n\
         IMPORTANT: For each image, please provide:\n\
         1. SCENE X: (where X is the scene number)\n\
         2. A detailed visual description of what's in the image\n\
         3. A caption that fits the scene\n\
         Please return actual generated images, not just text descriptions."
    )
}

/// Build the storyboard prompt when a seed image is attached.
///
/// The wording leans hard on visual consistency with the provided image;
/// the image itself travels alongside this prompt in the request.
pub fn storyboard_prompt_with_seed(description: &str, frame_count: u32) -> String {
    format!(
        "I'm providing an image as a starting point. GENERATE (do not describe) a sequence \
         of {frame_count} actual images that MUST use the style, colors, and visual elements \
         from this image.\n\n\
         Each image should be a frame in {description}\n\
         Each generated image should be a different scene, but MUST maintain visual \
         consistency with the provided image.\n\n\
         IMPORTANT:\n\
         - The generated images MUST look like they belong in the same visual universe as \
         the provided image\n\
         - Use similar color palette, artistic style, and visual elements as the provided image\n\
         - For each image, please provide:\n\
           1. SCENE X: (where X is the scene number)\n\
           2. A detailed visual description of what's in the image\n\
           3. A caption that fits the scene\n\n\
         Please return actual generated images, not just text descriptions."
    )
}

/// Build the extraction prompt that converts the generator's interleaved
/// text output into a JSON array of scene records.
pub fn scene_extraction_prompt(combined_text: &str) -> String {
    format!(
        "Below is text describing scenes from a short story video. For each scene, extract:\n\
         1. Scene number\n\
         2. Visual description\n\
         3. Caption\n\
         4. Speaker (infer who would be speaking the caption based on the scene description)\n\n\
         For the speaker field, provide details like gender, age, character type, or \
         emotional state.\n\
         Examples: \"Character 1 (man, nervous)\", \"Narrator (female, authoritative)\", \
         \"Mascot (cheerful)\"\n\n\
         Format the output as a JSON array where each object has the structure:\n\
         {{\n\
           \"scene_number\": (integer),\n\
           \"visual_description\": (string),\n\
           \"caption\": (string),\n\
           \"speaker\": (string)\n\
         }}\n\n\
         Only include the JSON in your response, nothing else.\n\n\
         TEXT TO PROCESS:\n{combined_text}"
    )
}

/// Build the short motion/style directive for animating one frame.
///
/// Derived locally from the scene record rather than via another LLM
/// round-trip; focuses the animator on the in-scene action.
pub fn motion_prompt(visual_description: &str, caption: &str) -> String {
    let description = visual_description.trim();
    if description.is_empty() {
        format!("Animate this scene: {}", caption.trim())
    } else {
        format!(
            "Animate this scene with subtle, natural motion. Scene: {description}. \
             Keep the camera steady and the mood consistent with: {}",
            caption.trim()
        )
    }
}
