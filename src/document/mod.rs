/*!
 * Rich document model and .docx codec.
 */

pub mod docx;
pub mod model;

pub use docx::{read_paragraphs, write_document};
pub use model::{
    Alignment, DocumentProperties, Paragraph, ParagraphIndent, ParagraphSpacing, Run, RunContent, ScriptDocument,
};
