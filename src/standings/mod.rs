//! Season standings and the fantasy groups derived from them

pub mod composer;
pub mod fantasy;
pub mod history;

pub use composer::{compose_season_standings, races_in_season, seasons_present};
pub use fantasy::{attach_groups, make_fantasy_groups, open_group, star_group};
pub use history::build_history;
