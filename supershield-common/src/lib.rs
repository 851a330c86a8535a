#![cfg(not(doctest))]

pub mod credentials;
pub mod email;
pub mod html;
pub mod models;
