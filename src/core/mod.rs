// Copyright @yucwang 2021

pub mod interaction;
pub mod shape;
