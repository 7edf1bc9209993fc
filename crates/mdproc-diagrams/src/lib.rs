//! Mermaid diagram extraction and PNG rendering.
//!
//! Diagrams are pulled out of Markdown fenced blocks and rendered with the
//! external Mermaid CLI (`mmdc`). Rendered images can be bundled into a zip
//! archive for download.
//!
//! # Example
//!
//! ```
//! use mdproc_diagrams::{diagram_filename, extract_mermaid};
//!
//! let diagrams = extract_mermaid("```mermaid\ngraph TD\n```\n");
//! assert_eq!(diagram_filename("doc", diagrams[0].index), "doc_diagram_1.png");
//! ```

mod archive;
mod consts;
mod error;
mod extract;
mod mmdc;

pub use archive::write_zip;
pub use consts::{
    DEFAULT_BACKGROUND, DEFAULT_PROBE_TIMEOUT, DEFAULT_PROGRAM, DEFAULT_SCALE, DEFAULT_TIMEOUT,
    DEFAULT_WIDTH,
};
pub use error::{ArchiveError, RenderError};
pub use extract::{MermaidDiagram, archive_filename, diagram_filename, extract_mermaid};
pub use mmdc::{DiagramFailure, MermaidCli, RenderReport};
