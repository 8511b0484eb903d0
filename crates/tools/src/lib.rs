pub mod autopilot;
pub mod chaos;
pub mod file_store;
pub mod journal_file;
pub mod layout_file;

pub use autopilot::{Autopilot, Policy, RunPlan, play_run};
pub use chaos::{Violation, check_invariants, random_action};
pub use file_store::JsonFileStore;
pub use journal_file::{
    JournalFileError, JournalWriter, SessionHeader, read_journal, replay_file, write_journal,
};
pub use layout_file::load_layout;
