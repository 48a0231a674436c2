// SPDX-License-Identifier: MIT

pub mod builder;
pub mod document;
pub mod graph;
pub mod loader;
pub mod types;
