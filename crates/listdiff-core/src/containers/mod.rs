//! Shipped container implementations.

mod array_list;
mod vec_list;

pub use array_list::ArrayList;
pub use vec_list::VecList;
