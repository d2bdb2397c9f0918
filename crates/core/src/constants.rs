//! Constants used throughout the Notecraft core crate.

/// Default directory for authored template files when none is configured.
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Extension of persisted template files.
pub const TEMPLATE_FILE_EXTENSION: &str = "yaml";

/// Suffix appended to the name of a duplicated section.
pub const COPY_SUFFIX: &str = " (Copy)";

/// Key prefix used when deriving template ids from library ids.
pub const LIBRARY_ID_PREFIX: &str = "library:";

/// Name used for a library template that carries no title, type or id.
pub const UNTITLED_TEMPLATE: &str = "Untitled template";

pub const STEP_ACCESS_SYSTEM_ID: &str = "access-record-system";
pub const STEP_ACCESS_SYSTEM_NAME: &str = "Access record system";
pub const STEP_OPEN_RECORD_ID: &str = "open-patient-record";
pub const STEP_OPEN_RECORD_NAME: &str = "Open patient record";
pub const STEP_SAVE_RECORD_ID: &str = "save-patient-record";
pub const STEP_SAVE_RECORD_NAME: &str = "Save patient record";
