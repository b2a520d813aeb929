pub mod artists;
pub mod game;
pub mod health;
pub mod leagues;
pub mod players;
pub mod rosters;
