// src/models/mod.rs

pub mod grade;
pub mod question;
