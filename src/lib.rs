//! quotr turns an interior design quotation into a downloadable PDF document.
//!
//! The crate is split around one central type, the `QuotationBundle`: the
//! `store` module assembles a bundle from the hosted backend, the `composer`
//! module lays it out as pages of text runs and serializes them through the
//! `pdf` module, and the `server` module exposes the whole pipeline as an
//! HTTP endpoint returning the finished bytes as an attachment.
//!
//! Rendering is deterministic: composing the same bundle twice yields
//! byte-identical PDF output, which keeps the documents reproducible and the
//! tests able to compare whole buffers.

/// The quotation data as fetched from the backend: the customer, the quote
/// and its items, with the selected items grouped by room in encounter order.
pub mod bundle;

/// The document composer. This is where the fixed structure of the quotation
/// document lives: the header, the customer details and the per-room item
/// listing, with all the vertical spacing the document uses.
pub mod composer;

/// Runtime configuration from the environment and the command line.
pub mod config;

/// The error types used throughout this crate, one enum per boundary.
pub mod error;

/// Metrics and encoding for the three Helvetica faces the document is set in.
///
/// The faces are PDF Base-14 fonts, so no font program is embedded in the
/// output; the advance widths are the standard Adobe metrics and text is
/// encoded as WinAnsi with `?` substituted for anything unmappable.
pub mod fonts;

/// Page geometry, the layout cursor and greedy word-wrapping. The composer
/// produces abstract `TextRun`s through this module and never talks to the
/// PDF layer directly, which keeps the layout testable without parsing PDFs.
pub mod layout;

/// A thin high-level interface over `lopdf` for building the output
/// document: pages of text operations, the document catalog and the trailer.
pub mod pdf;

/// The HTTP boundary of the service.
pub mod server;

/// The `QuoteRepository` port and its implementations.
pub mod store;
