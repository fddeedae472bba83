// Copyright @yucwang 2026

pub mod piecewise;
pub mod preintegration;

pub use self::piecewise::{TransferFunction, TransferNode};
pub use self::preintegration::PreIntegrationTable;
