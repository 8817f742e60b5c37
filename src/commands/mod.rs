pub mod inspect;
pub mod locate;
pub mod score;
