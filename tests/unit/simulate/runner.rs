//! Tests for the directory conversion runner

#[cfg(test)]
mod tests {
    use dermalens::io::image::{load_rgb_array, save_rgb_array};
    use dermalens::simulate::runner::{ConvertConfig, ConvertRunner, target_directory};
    use dermalens::simulate::{Deficiency, SimulatorKind};
    use ndarray::Array3;
    use std::path::{Path, PathBuf};

    fn write_test_image(path: &Path) {
        // A 10x10 gradient with enough saturated red to move under protan
        let pixels = Array3::from_shape_fn((10, 10, 3), |(row, col, c)| match c {
            0 => 255 - (row * 20) as u8,
            1 => (col * 12) as u8,
            _ => 30,
        });
        assert!(save_rgb_array(&pixels, path).is_ok());
    }

    // Tests output directories concatenate source, simulator, type, severity
    // Verified by reordering the suffix segments
    #[test]
    fn test_target_directory_naming() {
        let target = target_directory(
            Path::new("./data/all_resized"),
            SimulatorKind::Brettel,
            Deficiency::Protan,
            1.0,
        );
        assert_eq!(target, PathBuf::from("./data/all_resized_brettel_protan_1"));

        let fractional = target_directory(
            Path::new("images"),
            SimulatorKind::Machado,
            Deficiency::Tritan,
            0.5,
        );
        assert_eq!(fractional, PathBuf::from("images_machado_tritan_0.5"));
    }

    // Tests the conversion scenario: a same-named output that differs from
    // the input for at least one pixel
    // Verified by writing the unsimulated array to the target
    #[test]
    fn test_convert_writes_transformed_copy() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir failed: {e}"));
        let source = dir.path().join("lesions");
        assert!(std::fs::create_dir(&source).is_ok());
        write_test_image(&source.join("sample.png"));

        let config = ConvertConfig {
            simulator: SimulatorKind::Brettel,
            deficiencies: vec![Deficiency::Protan],
            severity: 1.0,
            sources: vec![source.clone()],
        };
        let runner = match ConvertRunner::new(config, false) {
            Ok(runner) => runner,
            Err(e) => unreachable!("Expected a valid configuration: {e}"),
        };
        let summary = match runner.run() {
            Ok(summary) => summary,
            Err(e) => unreachable!("Expected conversion to succeed: {e}"),
        };
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.directories, 1);

        let converted_path = dir.path().join("lesions_brettel_protan_1/sample.png");
        assert!(converted_path.exists());

        let original = load_rgb_array(source.join("sample.png"));
        let converted = load_rgb_array(&converted_path);
        match (original, converted) {
            (Ok(a), Ok(b)) => {
                assert_eq!(a.dim(), b.dim());
                assert_ne!(a, b, "conversion left every pixel unchanged");
            }
            _ => unreachable!("Expected both images to decode"),
        }
    }

    // Tests rerunning into an existing output directory succeeds
    // Verified by creating the directory with create_dir_new semantics
    #[test]
    fn test_convert_is_idempotent_over_directories() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir failed: {e}"));
        let source = dir.path().join("lesions");
        assert!(std::fs::create_dir(&source).is_ok());
        write_test_image(&source.join("sample.png"));

        let config = ConvertConfig {
            simulator: SimulatorKind::Vienot,
            deficiencies: vec![Deficiency::Deutan],
            severity: 1.0,
            sources: vec![source],
        };
        for _ in 0..2 {
            let runner = match ConvertRunner::new(config.clone(), false) {
                Ok(runner) => runner,
                Err(e) => unreachable!("Expected a valid configuration: {e}"),
            };
            assert!(runner.run().is_ok());
        }
    }

    // Tests configuration validation happens before any work starts
    #[test]
    fn test_rejects_empty_configuration() {
        let no_deficiency = ConvertConfig {
            simulator: SimulatorKind::Brettel,
            deficiencies: vec![],
            severity: 1.0,
            sources: vec![PathBuf::from("anywhere")],
        };
        assert!(ConvertRunner::new(no_deficiency, false).is_err());

        let bad_severity = ConvertConfig {
            simulator: SimulatorKind::Brettel,
            deficiencies: vec![Deficiency::Protan],
            severity: 2.0,
            sources: vec![PathBuf::from("anywhere")],
        };
        assert!(ConvertRunner::new(bad_severity, false).is_err());
    }
}
