#![no_std]

pub mod implementations;
