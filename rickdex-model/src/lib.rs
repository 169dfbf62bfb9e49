//! Core data model definitions shared across rickdex crates.
#![allow(missing_docs)]

pub mod character;
pub mod error;
pub mod filter;
pub mod page;
pub mod query;

pub use character::{
    CharacterId, CharacterRecord, CharacterStatus, NamedResource,
};
pub use error::{ModelError, Result as ModelResult};
pub use filter::FilterField;
pub use page::{CharacterPage, PageIndex, PageInfo, PageResult};
pub use query::CharacterQuery;
