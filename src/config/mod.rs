//! JSON configuration files for the command-line demos.

pub mod flow_demo;
