pub mod combat;
pub mod content;
pub mod journal;
pub mod mapgen;
pub mod progression;
pub mod replay;
pub mod rng;
pub mod session;
pub mod types;

pub use combat::{Card, Combatant, Encounter, Enemy};
pub use journal::{ActionRecord, SessionJournal};
pub use mapgen::{Tree, TreeLayout, TreeNode};
pub use replay::*;
pub use session::{
    MemoryStore, PersistenceEffect, SaveRecord, SaveSlot, SaveStore, SessionAction,
    SessionController, SessionSnapshot, StoreError, SyncQueue,
};
pub use types::*;
