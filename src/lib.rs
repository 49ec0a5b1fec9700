//! FahrplanPortal - transit schedule PDF catalog.
//!
//! Catalogs timetable PDFs into a searchable SQLite database. Line numbers,
//! validity periods and region metadata are derived from filenames and folder
//! structure; keyword tags are extracted from the PDF text for search
//! enrichment.

pub mod cli;
pub mod config;
pub mod models;
pub mod parser;
pub mod repository;
pub mod scan;
pub mod server;
pub mod tags;
