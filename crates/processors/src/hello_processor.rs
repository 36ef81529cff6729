//! Hello processor: greeting logic and its transform

pub mod hello;
pub mod hello_transform;
