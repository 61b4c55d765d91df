//! Combat resolver: engagements, armor, injury and boots.

mod engage;
mod foul;
mod injury;

pub use engage::{choose_face, dice_count, engage, BlockFace, Chooser};
pub use foul::boot;
pub use injury::injury_band;

pub(crate) use injury::knock_down;
