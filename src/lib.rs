//! MenuLens - menu item reconstruction from OCR output
//!
//! Takes the flat, unordered fragments an OCR provider returns for a photo
//! of a menu and recovers reading order, multi-line item names and prices.
//!
//! ```no_run
//! use menu_lens::{AppConfig, MenuPipeline};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let payload: serde_json::Value = serde_json::from_str(&std::fs::read_to_string("scan.json")?)?;
//! let pipeline = MenuPipeline::new(AppConfig::default())?;
//! for item in pipeline.process_payload(&payload)?.items {
//!     println!("{}: {:?}", item.text, item.price);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The OCR call itself, persistence and rendering all live outside this crate.

pub mod config;
pub mod error;
pub mod grouping;
pub mod ocr;

pub use config::AppConfig;
pub use error::{MenuLensError, Result};
pub use grouping::{group_text_blocks, GroupedMenuItem, MenuPipeline, MenuStructure, ScanResult};
pub use ocr::{BoundingBox, OcrResult, Provider, TextFragment};
