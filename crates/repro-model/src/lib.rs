pub mod category;
pub mod error;
pub mod ids;
pub mod records;

pub use category::{ErrorCategory, RULES, Rule, SUCCESS, TIMED_OUT, categorize};
pub use error::{ModelError, Result};
pub use ids::{Doi, ScriptId};
pub use records::{Condition, DatasetRecord, ScriptRecord};
