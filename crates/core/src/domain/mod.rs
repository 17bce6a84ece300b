pub mod price;
pub mod product;
pub mod recommendation;
pub mod session;
