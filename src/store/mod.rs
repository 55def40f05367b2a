pub mod favorites;
pub mod refresh;
pub mod users;
