use std::path::Path;
use synthtext_roi::files::find_fonts;
use synthtext_roi::text::{load_font, GlyphFont};

/// First parseable system font, if the machine has any.
pub fn system_font() -> Option<GlyphFont> {
    ["/usr/share/fonts", "/usr/local/share/fonts", "/System/Library/Fonts"]
        .iter()
        .filter_map(|dir| find_fonts(Path::new(dir)).ok())
        .flatten()
        .find_map(|path| load_font(&path, 32.0).ok())
}
