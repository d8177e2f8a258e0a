//! Tests for RGB array loading, saving, and directory listing

#[cfg(test)]
mod tests {
    use dermalens::io::image::{
        has_image_extension, list_image_files, load_rgb_array, save_rgb_array,
    };
    use ndarray::Array3;
    use std::path::Path;

    fn checker_array() -> Array3<u8> {
        Array3::from_shape_fn((4, 4, 3), |(row, col, channel)| {
            if (row + col) % 2 == 0 {
                200
            } else {
                u8::try_from(channel * 40).unwrap_or(0)
            }
        })
    }

    // Tests a saved array decodes back to identical pixels
    // Verified by perturbing one channel before the comparison
    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir failed: {e}"));
        let path = dir.path().join("check.png");

        let pixels = checker_array();
        assert!(save_rgb_array(&pixels, &path).is_ok());

        let reloaded = match load_rgb_array(&path) {
            Ok(array) => array,
            Err(e) => unreachable!("Expected a decodable image: {e}"),
        };
        assert_eq!(reloaded, pixels);
    }

    // Tests saving rejects arrays without exactly three channels
    #[test]
    fn test_save_rejects_non_rgb_shape() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir failed: {e}"));
        let four_channel = Array3::<u8>::zeros((2, 2, 4));
        assert!(save_rgb_array(&four_channel, dir.path().join("bad.png")).is_err());
    }

    // Tests listing filters by extension and sorts by file name
    // Verified by removing the sort call
    #[test]
    fn test_list_image_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir failed: {e}"));
        for name in ["b.jpg", "a.png", "c.jpeg", "notes.txt", "d.gif"] {
            let write = std::fs::write(dir.path().join(name), b"bytes");
            assert!(write.is_ok());
        }

        let files = match list_image_files(dir.path()) {
            Ok(files) => files,
            Err(e) => unreachable!("Expected a listable directory: {e}"),
        };
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["a.png", "b.jpg", "c.jpeg"]);
    }

    // Tests listing a missing directory is an error rather than empty output
    #[test]
    fn test_list_missing_directory_fails() {
        assert!(list_image_files(Path::new("definitely/not/here")).is_err());
    }

    // Tests extension matching is case-insensitive and rejects other types
    #[test]
    fn test_has_image_extension() {
        assert!(has_image_extension(Path::new("photo.JPG")));
        assert!(has_image_extension(Path::new("photo.jpeg")));
        assert!(!has_image_extension(Path::new("photo.gif")));
        assert!(!has_image_extension(Path::new("photo")));
    }
}
