pub mod currency;
pub mod digest;
pub mod document;
pub mod html;
