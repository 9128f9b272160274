//! board-storage - Storage library for board-service
//!
//! This crate provides the file system backend for the board state.

mod board_store;

pub use board_store::{FileSystemStorage, BOARD_FILE};
