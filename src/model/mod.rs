pub mod comment;
pub mod post;
pub mod tag;
pub mod user;
pub mod validator;
