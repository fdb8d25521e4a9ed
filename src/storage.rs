mod directory;
mod record;

pub use directory::{LoadError, load_database};
pub use record::{CourseRecord, RecordError};
