use excel_image_extractor_lib::cli::CliArgs;
use excel_image_extractor_lib::services::config::{load_settings, save_settings};
use excel_image_extractor_lib::services::images::TargetFormat;
use clap::Parser;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_file_then_flags() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("settings.json");
    fs::write(
        &config,
        r#"{ "output_directory": "/srv/images", "image_format": "png", "include_filename": false }"#,
    )
    .unwrap();

    let args = CliArgs::try_parse_from([
        "excel-image-extractor".to_string(),
        "/srv/books".to_string(),
        "--config".to_string(),
        config.display().to_string(),
        "--prefix".to_string(),
        "sheet_".to_string(),
    ])
    .unwrap();
    let request = load_settings(&args).unwrap().to_request();

    assert_eq!(request.input_directory.to_str(), Some("/srv/books"));
    assert_eq!(
        request.output_directory.as_deref().and_then(|p| p.to_str()),
        Some("/srv/images")
    );
    assert_eq!(request.filename_prefix, "sheet_");
    assert_eq!(request.image_format, TargetFormat::Png);
    assert!(!request.include_filename);
}

#[test]
fn test_saved_settings_load_back_through_config() {
    let dir = TempDir::new().unwrap();
    let saved = dir.path().join("saved.json");

    let args = CliArgs::try_parse_from([
        "excel-image-extractor".to_string(),
        "/srv/books".to_string(),
        "--format".to_string(),
        "gif".to_string(),
        "--no-filename".to_string(),
        "--save-config".to_string(),
        saved.display().to_string(),
    ])
    .unwrap();
    let settings = load_settings(&args).unwrap();
    save_settings(&settings, args.save_config.as_deref().unwrap()).unwrap();

    let reload = CliArgs::try_parse_from([
        "excel-image-extractor".to_string(),
        "--config".to_string(),
        saved.display().to_string(),
    ])
    .unwrap();
    let request = load_settings(&reload).unwrap().to_request();

    assert_eq!(request.input_directory.to_str(), Some("/srv/books"));
    assert_eq!(request.image_format, TargetFormat::Gif);
    assert!(!request.include_filename);
}
