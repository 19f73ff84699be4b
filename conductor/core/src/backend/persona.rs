//! Baron's persona and the cocktail response schema

use serde_json::{json, Value};

/// System instruction for every request
pub const SYSTEM_INSTRUCTION: &str = "\
You are Baron, head bartender of the Mood Bistro: a small black cat with amber \
eyes, a fitted waistcoat and a bow tie, lounging in the middle of a warm bar.

How you speak:
1. Short, a little philosophical; a low voice with a lot of warmth.
2. You brush the bar with your tail when you are paying attention.
3. Every line you say ends with \"meow\".
4. Stay elegant, unhurried, healing, with a light touch of cheer.
5. You are the listener. Comfort the guest gently when they are troubled; \
celebrate warmly when they share something happy.
6. Never deliver a lecture. Keep the rhythm of a conversation.

The room: light and shadow overlap, everything is warm and comfortable, \
upbeat jazz is playing, and the air smells of citrus, caramel, oak and sunshine.";

/// Extra instruction appended when mixing
pub const MIX_INSTRUCTION: &str =
    "You need to produce a specific cocktail recipe from the guest's mood.";

/// User prompt for the mix request
#[must_use]
pub fn mix_prompt(mood: &str) -> String {
    format!(
        "The guest's mood right now is: \"{mood}\". Mix a cocktail just for this mood. \
Make sure the words of `visual` agree exactly with the structured data in \
`visualStructure` (glass, garnish, colour, ice)."
    )
}

/// Response schema for the mix request, in the backend's OpenAPI subset
#[must_use]
pub fn cocktail_schema() -> Value {
    let text = |description: &str| json!({ "type": "STRING", "description": description });

    json!({
        "type": "OBJECT",
        "properties": {
            "name": text("A poetic, vivid name for the drink"),
            "recipe": {
                "type": "OBJECT",
                "properties": {
                    "base": text("Base spirit"),
                    "adjunct": text("Adjunct"),
                    "abstract": text("An abstract ingredient, the soul of the drink, e.g. 'a sigh in late autumn'"),
                },
                "required": ["base", "adjunct", "abstract"],
            },
            "visual": text("The drink's colour, sheen, glass and garnish. Must agree with visualStructure."),
            "visualStructure": {
                "type": "OBJECT",
                "properties": {
                    "glassType": {
                        "type": "STRING",
                        "enum": ["martini", "rocks", "highball", "flute", "coupe"],
                    },
                    "garnish": {
                        "type": "STRING",
                        "enum": ["orange_peel", "cherry", "mint", "lemon_slice", "olive", "flower", "none"],
                    },
                    "ice": {
                        "type": "STRING",
                        "enum": ["cubes", "sphere", "crushed", "none"],
                    },
                    "colorHex": text("HEX code of the liquid colour (e.g. #FF5733, #EA580C, #9333EA); should feel translucent"),
                },
                "required": ["glassType", "garnish", "ice", "colorHex"],
            },
            "taste": text("Top, middle and finish notes, and how the drink makes you feel"),
            "whisper": text("One line for the guest, wise or healing, ending in 'meow'"),
            "music": text("A specific jazz track to go with it (Artist - Song)"),
            "imageKeyword": text("One English keyword for a backdrop image (e.g. sunset, rain, city_night, jazz_bar, ocean)"),
        },
        "required": ["name", "recipe", "visual", "visualStructure", "taste", "whisper", "music", "imageKeyword"],
    })
}
