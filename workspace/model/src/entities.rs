//! This file serves as the root for all SeaORM entity modules.
//! It defines the data model of the fantasy league: players, leagues, rosters,
//! the artists drafted onto them with their monthly statistics, and the game clock.

pub mod artist;
pub mod artist_stats;
pub mod game_settings;
pub mod league;
pub mod player;
pub mod roster;
pub mod roster_member;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::artist::Entity as Artist;
    pub use super::artist_stats::Entity as ArtistStats;
    pub use super::game_settings::Entity as GameSettings;
    pub use super::league::Entity as League;
    pub use super::player::Entity as Player;
    pub use super::roster::Entity as Roster;
    pub use super::roster_member::Entity as RosterMember;
}
