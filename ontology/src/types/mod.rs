pub mod ids;
pub mod schema;
pub mod term;

pub use ids::{IdParts, id_prefix, split_id};
pub use schema::{StanzaType, TagRule, ValueKind};
pub use term::{Tag, Term};
