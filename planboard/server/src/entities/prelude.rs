pub use super::board_column::Entity as BoardColumn;
pub use super::card::Entity as Card;
pub use super::project::Entity as Project;
pub use super::team_member::Entity as TeamMember;
