pub mod stream;
pub mod block;
pub mod model;
pub mod collab;
pub mod context;
pub mod dispatch;
pub mod reconcile;
pub mod loader;
pub mod error;

pub use stream::{Cursor, StreamError};
pub use block::BlockId;
pub use collab::Collaborators;
pub use collab::memory::MemoryConfig;
pub use context::LegacyContext;
pub use dispatch::read_setting;
pub use reconcile::apply_read_fallback_config;
pub use loader::{decode, load, load_file, load_or_default, LoadOptions, LoadReport, Loaded};
pub use error::{Result, SettingsError};
