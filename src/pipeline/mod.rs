//! Pipeline stages behind the public entry points.
//!
//! The two pure algorithms sit at the bottom and depend on nothing:
//!
//! - [`pages`] turns `"1,3,5-7"` into a sorted, deduplicated page list
//! - [`dimensions`] fills in a missing width or height from the aspect ratio
//!
//! Each pipeline is a blocking function that takes an [`crate::Engines`]
//! bundle and an [`input::InputFile`]:
//!
//! ```text
//! render    PDF bytes ──▶ open ──▶ pages ──▶ render_page ──▶ encode ──▶ N artifacts
//! resize    image     ──▶ decode ──▶ dimensions ──▶ resample ──▶ encode ──▶ 1 artifact
//! compress  image     ──▶ decode ──▶ encode(quality, format) ──────────▶ 1 artifact
//! archive   N artifacts ──▶ bundle ───────────────────────────────────▶ 1 artifact
//! ```
//!
//! [`crate::convert`] and [`crate::stream`] run them on tokio's blocking pool.

pub mod archive;
pub mod compress;
pub mod dimensions;
pub mod input;
pub mod pages;
pub mod render;
pub mod resize;
