pub mod code_generator;
pub mod jwt;
pub mod password;
pub mod slug;
pub mod upload;
pub mod validation;

pub use code_generator::{generate_short_suffix, generate_voucher_code};
pub use jwt::*;
pub use password::*;
pub use slug::{slugify, unique_slug};
pub use validation::*;
