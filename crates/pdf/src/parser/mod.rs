pub mod backend;
pub mod cleanup;
pub mod fragments;
