// Copyright @yucwang 2026

pub mod phong;

pub use self::phong::{shade, PhongParams};
