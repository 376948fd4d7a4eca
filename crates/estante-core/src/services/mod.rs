pub mod universe;

pub use universe::{AddOutcome, AddedAuthor, DEFAULT_DEADLINE, Notice, Universe};
