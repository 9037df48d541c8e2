// Library root for the draft tracker core: pick ingestion, identity
// resolution, snake-order arithmetic and roster needs.

pub mod command;
pub mod draft;
pub mod error;
pub mod import;
pub mod needs;
pub mod players;
pub mod recommend;
pub mod session;
