pub mod naming;
pub mod transcode;

// Re-export public API
pub use naming::output_file_name;
pub use transcode::{
    decode, encode, flatten_onto_white, format_name, prepare_for_output, resolve_output_spec,
    ColorMode, DecodedImage, EncodeOptions, OutputSpec, TargetFormat,
    DEFAULT_AUTO_FORMAT,
};
