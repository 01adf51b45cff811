use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    #[error("invalid annotation record: {0}")]
    InvalidRecord(#[from] serde_json::Error),

    #[error("invalid color {color:?} for class {class:?}")]
    InvalidColor { class: String, color: String },

    #[error("failed to parse config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
