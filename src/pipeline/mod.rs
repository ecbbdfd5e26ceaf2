//! Pipeline stages for PDF-to-image conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch rendering backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! validate ──▶ range ──▶ options ──▶ orchestrate ──▶ assemble
//! (header/EOF)  (clamp)   (spec)      (render fan-out) (stack | zip)
//!                                         │
//!                                      render + encode
//!                                  (pdfium, per-page temp staging)
//! ```
//!
//! 1. [`validate`]    — cheap structural checks before any rendering
//! 2. [`range`]       — clamp the requested interval against the page count
//! 3. [`options`]     — format token → concrete [`options::EncodingSpec`]
//! 4. [`orchestrate`] — bounded concurrent fan-out with per-page timeouts,
//!    fail-fast on the first page error
//! 5. [`render`]      — the [`render::PageRenderer`] capability and its
//!    pdfium default; runs in `spawn_blocking` because pdfium is not
//!    async-safe
//! 6. [`encode`]      — flatten, colour-handle, and encode one bitmap
//! 7. [`assemble`]    — vertical composite or zip archive

pub mod assemble;
pub mod encode;
pub mod options;
pub mod orchestrate;
pub mod range;
pub mod render;
pub mod validate;
