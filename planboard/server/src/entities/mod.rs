pub mod prelude;

pub mod board_column;
pub mod card;
pub mod project;
pub mod team_member;
