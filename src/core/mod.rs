// Copyright @yucwang 2021

pub mod compositing;
pub mod integrator;
pub mod sensor;
pub mod scene;
pub mod settings;
pub mod settings_loader;
pub mod volume;
