use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

pub const DEFAULT_FILENAME: &str = "download.pdf";
const DEFAULT_EXTENSION: &str = "pdf";

static DISPOSITION_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|;)\s*filename\s*=\s*(?:"([^"]*)"|([^;]*))"#)
        .expect("filename pattern is valid")
});

/// Picks the object name for a download.
///
/// Order of preference: the `filename` parameter of `Content-Disposition`, the
/// last segment of the URL path, then [`DEFAULT_FILENAME`]. A name without an
/// extension gets one guessed from `Content-Type`, falling back to `.pdf`.
pub fn pick_filename(
    url: &str,
    content_disposition: Option<&str>,
    content_type: Option<&str>,
) -> String {
    let name = content_disposition
        .and_then(disposition_filename)
        .or_else(|| url_basename(url))
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

    if Path::new(&name).extension().is_some() {
        return name;
    }
    format!("{}.{}", name, guess_extension(content_type))
}

fn disposition_filename(header: &str) -> Option<String> {
    let captures = DISPOSITION_FILENAME.captures(header)?;
    let raw = captures.get(1).or_else(|| captures.get(2))?.as_str().trim();
    basename(raw)
}

fn url_basename(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    basename(parsed.path())
}

/// Strips any directory part, whether the server used `/` or `\`.
fn basename(path: &str) -> Option<String> {
    let name = path.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}

/// Canonical extensions for types whose `mime_guess` list does not lead with one.
const PREFERRED_EXTENSIONS: &[(&str, &str)] = &[
    ("application/pdf", "pdf"),
    ("application/octet-stream", "bin"),
    ("application/zip", "zip"),
    ("application/xml", "xml"),
    ("application/json", "json"),
    ("text/plain", "txt"),
    ("text/html", "html"),
    ("text/csv", "csv"),
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/tiff", "tiff"),
];

fn guess_extension(content_type: Option<&str>) -> &'static str {
    let Some(mime) = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|mime| mime.trim().to_ascii_lowercase())
    else {
        return DEFAULT_EXTENSION;
    };

    if let Some((_, ext)) = PREFERRED_EXTENSIONS.iter().find(|(known, _)| *known == mime) {
        return *ext;
    }

    // Lists are alphabetical, so an extension equal to the subtype is the best pick.
    let subtype = mime.rsplit('/').next().unwrap_or_default();
    mime_guess::get_mime_extensions_str(&mime)
        .and_then(|extensions| {
            extensions
                .iter()
                .find(|ext| **ext == subtype)
                .or_else(|| extensions.first())
                .copied()
        })
        .unwrap_or(DEFAULT_EXTENSION)
}
