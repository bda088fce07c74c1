#![allow(dead_code)]

pub mod fixtures;
pub mod fonts;
pub mod synthetic_image;
