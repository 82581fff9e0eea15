use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("user config directory not found")]
    ConfigDirNotFound,

    #[error(
        "no deployment manifest found; checked:\n\
        - current directory: stack.kdl, stack.local.kdl, .stack.kdl, .stack.local.kdl\n\
        - ./.stackform/ directory\n\
        - ~/.config/stackform/stack.kdl\n\
        or set STACK_MANIFEST to a manifest path"
    )]
    ManifestNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
