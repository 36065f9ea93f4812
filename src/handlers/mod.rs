pub mod elevated;
pub mod protected;
