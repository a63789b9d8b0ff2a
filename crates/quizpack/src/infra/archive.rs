//! Package assembler: merges a generated content document into the template
//! archive and returns the finished package as an in-memory byte buffer.

use std::fs::File;
use std::io::{BufReader, Cursor, Write};
use std::path::PathBuf;

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::domain::errors::PipelineError;
use crate::domain::h5p::{
    CONTENT_JSON_PATH, ContentDocument, MANIFEST_PATH, PackageManifest, TITLE_IMAGE_PATH,
};

/// Assembles output packages from a read-only template archive. The template
/// is never mutated; every invocation produces a fresh archive.
#[derive(Debug, Clone)]
pub struct PackageAssembler {
    template_path: PathBuf,
}

impl PackageAssembler {
    pub fn new(template_path: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
        }
    }

    /// Produce the output archive: every template entry copied byte-for-byte,
    /// plus the serialized content document, the optional title image, and
    /// the freshly built manifest. Entries the assembler writes itself are
    /// skipped during the copy so each path occurs exactly once.
    ///
    /// Any failure aborts the whole assembly; a partial archive is never
    /// returned.
    pub fn assemble(
        &self,
        document: &ContentDocument,
        manifest: &PackageManifest,
        title_image: Option<&[u8]>,
    ) -> Result<Vec<u8>, PipelineError> {
        let file = File::open(&self.template_path)
            .map_err(|source| PipelineError::template_read(&self.template_path, source))?;
        let mut template = ZipArchive::new(BufReader::new(file))
            .map_err(|source| PipelineError::template_read(&self.template_path, source))?;

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for index in 0..template.len() {
            let entry = template.by_index_raw(index)?;
            if replaced_by_generator(entry.name(), title_image.is_some()) {
                continue;
            }
            writer.raw_copy_file(entry)?;
        }

        // UTF-8 as-is; the renderer expects unescaped non-Latin characters.
        let content_json =
            serde_json::to_string(document).map_err(|source| PipelineError::ContentBuild {
                what: "content document",
                source,
            })?;
        writer.start_file(CONTENT_JSON_PATH, SimpleFileOptions::default())?;
        writer.write_all(content_json.as_bytes())?;

        if let Some(image) = title_image {
            writer.start_file(TITLE_IMAGE_PATH, SimpleFileOptions::default())?;
            writer.write_all(image)?;
        }

        let manifest_json =
            serde_json::to_vec_pretty(manifest).map_err(|source| PipelineError::ContentBuild {
                what: "package manifest",
                source,
            })?;
        writer.start_file(MANIFEST_PATH, SimpleFileOptions::default())?;
        writer.write_all(&manifest_json)?;

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}

fn replaced_by_generator(name: &str, with_image: bool) -> bool {
    name == CONTENT_JSON_PATH || name == MANIFEST_PATH || (with_image && name == TITLE_IMAGE_PATH)
}
