use std::fmt;
use std::path::{Path, PathBuf};

/// Where a registry index lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    File(PathBuf),
    Url(String),
}

/// Serialization of an index document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    Toml,
    Json,
}

impl IndexSource {
    /// `http://` and `https://` are URLs; anything else is a path.
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            Self::Url(source.to_string())
        } else {
            Self::File(PathBuf::from(source))
        }
    }

    /// Format implied by the file extension, if any.
    pub fn format_hint(&self) -> Option<IndexFormat> {
        let path = match self {
            Self::File(path) => path.as_path(),
            Self::Url(url) => {
                let path = url.split(|c| c == '?' || c == '#').next().unwrap_or(url);
                Path::new(path)
            }
        };
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(IndexFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Some(IndexFormat::Toml),
            _ => None,
        }
    }
}

impl IndexFormat {
    /// Format implied by an HTTP `Content-Type` header.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type.split(';').next()?.trim();
        if mime.ends_with("json") {
            Some(Self::Json)
        } else if mime.ends_with("toml") {
            Some(Self::Toml)
        } else {
            None
        }
    }
}

impl fmt::Display for IndexSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}
