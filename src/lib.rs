// Copyright @yucwang 2021

pub extern crate nalgebra as na;

pub mod core;
pub mod math;
pub mod io;
pub mod integrators;
pub mod lighting;
pub mod preprocess;
pub mod renderers;
pub mod sensors;
pub mod transfer;
pub mod volumes;
