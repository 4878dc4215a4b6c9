pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod common;
pub mod content;
pub mod customer;
pub mod dashboard;
pub mod loyalty;
pub mod order;
pub mod pagination;
pub mod product;
pub mod promotion;
pub mod voucher;

pub use account::*;
pub use cart::*;
pub use catalog::*;
pub use checkout::*;
pub use common::*;
pub use content::*;
pub use customer::*;
pub use dashboard::*;
pub use loyalty::*;
pub use order::*;
pub use pagination::*;
pub use product::*;
pub use promotion::*;
pub use voucher::*;
