//! Data models shared across the pipeline (documents, palettes)

mod document;
mod palette;

pub use document::Document;
pub use palette::Palette;

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_palette_lookup_in_range() {
        let palette = Palette::from_rgba("duo", &[[0, 0, 0, 255], [255, 0, 0, 128]]);
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get(1), Some(Rgba([255, 0, 0, 128])));
    }

    #[test]
    fn test_palette_lookup_past_end() {
        let palette = Palette::from_rgba("duo", &[[0, 0, 0, 255], [255, 0, 0, 128]]);
        assert_eq!(palette.get(2), None);
        assert!(!palette.is_empty());
    }

    #[test]
    fn test_document_stem() {
        assert_eq!(Document::new("painting.tscn", "").stem(), "painting");
        assert_eq!(Document::new("a.b.tscn", "").stem(), "a.b");
        assert_eq!(Document::new("noext", "").stem(), "noext");
        assert_eq!(Document::new(".hidden", "").stem(), ".hidden");
    }

    #[test]
    fn test_document_read_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wall.tscn");
        std::fs::write(&path, "[gd_scene format=2]").unwrap();

        let doc = Document::read(&path).unwrap();
        assert_eq!(doc.name, "wall.tscn");
        assert_eq!(doc.text, "[gd_scene format=2]");
    }
}
