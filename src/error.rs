use crate::SectionKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a valid motion file: missing `Vocaloid Motion Data 0002` signature")]
    InvalidFormat,

    #[error("motion file ends inside the {section:?} section")]
    Truncated { section: SectionKind },

    #[error("motion file has no camera keyframes")]
    EmptyCamera,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),
}
