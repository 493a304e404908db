pub mod error;
pub mod consts;
pub mod frame;
pub mod source;
pub mod baseline;
pub mod preprocess;
pub mod mask;
pub mod grow;
pub mod tip;
pub mod calib;
pub mod config;
pub mod pipeline;
