use sanitize_filename::{sanitize_with_options, Options};

/// Longest file name, in bytes, that common filesystems accept.
pub const MAX_NAME_BYTES: usize = 255;

/// Build the output file name for one extracted image:
/// `{prefix}{stem}_{counter}.{ext}`, or `{prefix}{counter}.{ext}` when the
/// source file name is left out.
///
/// The result is run through `sanitize-filename` so a prefix carrying path
/// separators or reserved characters can't escape the output directory.
/// Over-long names lose the end of the prefix/stem part; the counter and
/// extension are always kept so names stay unique within a run.
pub fn output_file_name(prefix: &str, stem: Option<&str>, counter: usize, extension: &str) -> String {
    let (head, tail) = match stem {
        Some(stem) => (format!("{prefix}{stem}"), format!("_{counter}.{extension}")),
        None => (prefix.to_string(), format!("{counter}.{extension}")),
    };

    let options = Options {
        truncate: false,
        windows: true,
        replacement: "",
    };
    let cleaned = sanitize_with_options(format!("{head}{tail}"), options);
    let Some(head) = cleaned.strip_suffix(tail.as_str()) else {
        return format!("{counter}.{extension}");
    };

    let mut cut = head.len().min(MAX_NAME_BYTES.saturating_sub(tail.len()));
    while !head.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}{tail}", &head[..cut])
}

#[cfg(test)]
#[path = "tests/naming_tests.rs"]
mod tests;
