use super::*;
use crate::services::app::log_sink::{CollectingSink, SilentSink};
use crate::test_utils::{init_test_logging, png_bytes, rgba_png_bytes, FixtureSheet, XlsxBuilder};
use log::Level;
use tempfile::TempDir;

fn request_for(input: &Path, output: &Path) -> ExtractRequest {
    ExtractRequest {
        output_directory: Some(output.to_path_buf()),
        ..ExtractRequest::new(input)
    }
}

#[test]
fn test_request_defaults() {
    let request = ExtractRequest::default();
    assert_eq!(request.filename_prefix, "img_");
    assert_eq!(request.image_format, TargetFormat::Auto);
    assert!(request.include_filename);
    assert!(request.output_directory.is_none());
}

#[test]
fn test_request_deserializes_partial_json() {
    let request: ExtractRequest =
        serde_json::from_str(r#"{"input_directory": "/tmp/books", "image_format": "jpg"}"#).unwrap();
    assert_eq!(request.input_directory, PathBuf::from("/tmp/books"));
    assert_eq!(request.image_format, TargetFormat::Jpg);
    assert_eq!(request.filename_prefix, DEFAULT_PREFIX);
}

#[test]
fn test_blank_output_directory_is_derived() {
    let request = ExtractRequest {
        output_directory: Some(PathBuf::from("  ")),
        ..ExtractRequest::new("/data/in")
    };
    assert!(request.explicit_output_dir().is_none());

    let resolved = request.resolved_output_dir();
    let name = resolved.file_name().unwrap().to_string_lossy().to_string();
    assert!(resolved.starts_with("/data/in"));
    assert!(name.starts_with("image-"));
    assert_eq!(name.len(), "image-".len() + 8);
}

#[test]
fn test_counter_runs_across_files() {
    init_test_logging();
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    XlsxBuilder::new()
        .sheet(FixtureSheet::new("S").image("image1.png", png_bytes()))
        .write_to(&input.path().join("a.xlsx"));
    XlsxBuilder::new()
        .sheet(
            FixtureSheet::new("S")
                .image("image1.png", png_bytes())
                .image("image2.png", rgba_png_bytes()),
        )
        .write_to(&input.path().join("b.xlsx"));

    let outcome = execute(&request_for(input.path(), output.path()), &SilentSink);
    assert_eq!(outcome.images_extracted(), 3);

    for expected in ["img_a_1.png", "img_b_2.png", "img_b_3.png"] {
        assert!(output.path().join(expected).is_file(), "missing {expected}");
    }
}

#[test]
fn test_undecodable_image_is_skipped_without_reusing_numbers() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    XlsxBuilder::new()
        .sheet(
            FixtureSheet::new("S")
                .image("image1.png", png_bytes())
                .image("image2.emf", b"\x01\x00\x00\x00 not a raster".to_vec())
                .image("image3.png", png_bytes()),
        )
        .write_to(&input.path().join("book.xlsx"));

    let request = ExtractRequest {
        include_filename: false,
        ..request_for(input.path(), output.path())
    };
    let sink = CollectingSink::new();
    let outcome = execute(&request, &sink);

    match outcome {
        RunOutcome::Completed {
            images_extracted,
            images_skipped,
            ..
        } => {
            assert_eq!(images_extracted, 2);
            assert_eq!(images_skipped, 1);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(output.path().join("img_1.png").is_file());
    assert!(output.path().join("img_2.png").is_file());
    assert!(!sink.messages_at(Level::Error).is_empty());
}

#[test]
fn test_sink_receives_progress_lines() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    XlsxBuilder::new()
        .sheet(FixtureSheet::new("S").image("image1.png", png_bytes()))
        .write_to(&input.path().join("book.xlsx"));

    let sink = CollectingSink::new();
    run_extraction(&request_for(input.path(), output.path()), &sink);

    let info = sink.messages_at(Level::Info);
    assert!(info.iter().any(|m| m == "Processing file: book.xlsx"));
    assert!(info.iter().any(|m| m.contains("Saved image: img_book_1.png")));
    assert!(info.iter().any(|m| m.contains("extracted 1 images")));
}

#[test]
fn test_input_that_is_a_file_is_an_error() {
    let input = TempDir::new().unwrap();
    let file = input.path().join("book.xlsx");
    std::fs::write(&file, "x").unwrap();

    let text = run_extraction(&ExtractRequest::new(&file), &SilentSink);
    assert!(text.contains("ERROR"));
}

#[test]
fn test_empty_input_path_is_not_found() {
    let text = run_extraction(&ExtractRequest::default(), &SilentSink);
    assert!(text.starts_with("ERROR"));
}
