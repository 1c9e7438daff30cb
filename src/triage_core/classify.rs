use regex::Regex;
use std::sync::OnceLock;

static RULES: OnceLock<Vec<(Category, Regex)>> = OnceLock::new();

/// Destination category of a media file, derived from its filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    WhatsAppImages,
    WhatsAppVideos,
    Camera,
    Screenshot,
    Snapchat,
    Others,
}

impl Category {
    /// Every category, in its fixed folder order.
    pub const ALL: &[Category] = &[
        Category::WhatsAppImages,
        Category::WhatsAppVideos,
        Category::Camera,
        Category::Screenshot,
        Category::Snapchat,
        Category::Others,
    ];

    pub fn folder_name(&self) -> &'static str {
        match self {
            Category::WhatsAppImages => "WhatsApp Images",
            Category::WhatsAppVideos => "WhatsApp Videos",
            Category::Camera => "Camera",
            Category::Screenshot => "Screenshot",
            Category::Snapchat => "Snapchat",
            Category::Others => "Others",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.folder_name())
    }
}

fn rules() -> &'static [(Category, Regex)] {
    RULES.get_or_init(|| {
        // Ordered: the WhatsApp rules must run before the Camera rule,
        // since WhatsApp media also begins with IMG/VID.
        [
            (Category::WhatsAppImages, r"^IMG.*WA"),
            (Category::WhatsAppVideos, r"^VID.*WA"),
            (Category::Camera, r"^(IMG|VID|LMC|PXL)"),
            (Category::Screenshot, r"^(Screenshot|Screenrecorder)"),
            (Category::Snapchat, r"^Snapchat"),
        ]
        .into_iter()
        .map(|(category, pattern)| (category, Regex::new(pattern).unwrap()))
        .collect()
    })
}

/// Classify a filename into its destination category.
///
/// Rules are evaluated top to bottom; the first match wins and anything
/// unmatched lands in `Others`.
pub fn classify(filename: &str) -> Category {
    for (category, regex) in rules() {
        if regex.is_match(filename) {
            return *category;
        }
    }
    Category::Others
}
