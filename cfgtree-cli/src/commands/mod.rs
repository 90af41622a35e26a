//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `get`: Resolve a setting, with inheritance by default
//! - `keys`: List the keys of a namespace
//! - `register`: Register a new setting
//! - `set`: Update an existing or inherited setting
//! - `unregister`: Remove a setting and its comment
//! - `comment`: Show the comment of a setting
//! - `dump`: Print the whole document
//! - `import`: Import legacy `key=value` files
//! - `completions`: Generate shell completion scripts

pub mod comment;
pub mod completions;
pub mod dump;
pub mod get;
pub mod import;
pub mod keys;
pub mod register;
pub mod set;
pub mod unregister;

pub use comment::CommentCommand;
pub use completions::CompletionsCommand;
pub use dump::DumpCommand;
pub use get::GetCommand;
pub use import::ImportCommand;
pub use keys::KeysCommand;
pub use register::RegisterCommand;
pub use set::SetCommand;
pub use unregister::UnregisterCommand;
