//! Configuration section definitions.
//!
//! Each module corresponds to a section in `threepen.toml`:
//!
//! | Module     | TOML Section   | Purpose                                  |
//! |------------|----------------|------------------------------------------|
//! | `serve`    | `[serve]`      | Development server (interface, ports)    |
//! | `preview`  | `[preview]`    | Sketch entry, debounce, document chrome  |
//! | `revision` | `[revision]`   | Release catalog and package CDN          |

mod preview;
mod revision;
mod serve;

pub use preview::PreviewConfig;
pub use revision::RevisionConfig;
pub use serve::ServeConfig;
