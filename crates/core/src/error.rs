use notecraft_ids::SectionId;

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("section not found: {0}")]
    SectionNotFound(SectionId),
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write template file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read template file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to delete template file: {0}")]
    FileDelete(std::io::Error),
    #[error("failed to serialize YAML: {0}")]
    YamlSerialization(serde_yaml::Error),
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),

    #[error("library error: {0}")]
    Library(#[from] notecraft_library::LibraryError),
    #[error("invalid id: {0}")]
    Id(#[from] notecraft_ids::IdError),
}

pub type TemplateResult<T> = std::result::Result<T, TemplateError>;
