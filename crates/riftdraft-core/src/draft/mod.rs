pub mod names;
pub mod role;
pub mod roster;

pub use names::SanitizedName;
pub use role::{Role, Side};
pub use roster::{ActiveSelection, Roster, RosterStore};
