//! Output-side H5P schema types.
//!
//! The consuming renderer tolerates no missing keys, so the structs here
//! serialize with exactly the field names and declaration order the H5P
//! format expects. Library-specific parameter payloads stay as raw
//! [`serde_json::Value`] built by the mappers and the document builder.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::model::MediaKind;

/// Archive path of the serialized content document.
pub const CONTENT_JSON_PATH: &str = "content/content.json";
/// Archive path of the package manifest.
pub const MANIFEST_PATH: &str = "h5p.json";
/// Archive path of the optional title image. The intro page references this
/// exact file name, so an uploaded image replaces the template's placeholder
/// without touching the content document.
pub const TITLE_IMAGE_PATH: &str = "content/images/file-_jmSDW4b9EawjImv.png";
/// The same image as referenced from inside `content/content.json`.
pub const TITLE_IMAGE_CONTENT_REF: &str = "images/file-_jmSDW4b9EawjImv.png";

/// Fresh universally-unique subcontent identifier in canonical textual form.
/// Pure randomness, no shared state; safe to call from anywhere.
pub fn new_subcontent_id() -> String {
    Uuid::new_v4().to_string()
}

/// One self-contained unit of interactive content: a library reference, the
/// parameters that library interprets, a unique identifier, and metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ContentNode {
    pub library: String,
    pub params: Value,
    #[serde(rename = "subContentId")]
    pub sub_content_id: String,
    pub metadata: NodeMetadata,
}

impl ContentNode {
    /// Build a node with a freshly generated identifier.
    pub fn new(library: impl Into<String>, params: Value, metadata: NodeMetadata) -> Self {
        Self {
            library: library.into(),
            params,
            sub_content_id: new_subcontent_id(),
            metadata,
        }
    }
}

/// Metadata block attached to every content node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeMetadata {
    #[serde(rename = "contentType")]
    pub content_type: String,
    pub license: String,
    pub title: String,
    pub authors: Vec<Value>,
    pub changes: Vec<Value>,
    #[serde(rename = "extraTitle", skip_serializing_if = "Option::is_none")]
    pub extra_title: Option<String>,
}

impl NodeMetadata {
    /// Metadata with the fixed "undisclosed" license marker and empty
    /// author/change lists.
    pub fn new(content_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            license: "U".to_owned(),
            title: title.into(),
            authors: Vec::new(),
            changes: Vec::new(),
            extra_title: None,
        }
    }

    pub fn with_extra_title(mut self, extra_title: impl Into<String>) -> Self {
        self.extra_title = Some(extra_title.into());
        self
    }
}

/// A content node positioned inside the top-level column, tagged to render
/// with an automatic visual separator.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnEntry {
    pub content: ContentNode,
    #[serde(rename = "useSeparator")]
    pub use_separator: String,
}

impl ColumnEntry {
    pub fn auto(content: ContentNode) -> Self {
        Self {
            content,
            use_separator: "auto".to_owned(),
        }
    }
}

/// The full interactive page: an ordered sequence of column entries. Order
/// is significant and defines presentation order.
#[derive(Debug, Clone, Serialize)]
pub struct ContentDocument {
    pub content: Vec<ColumnEntry>,
}

/// One preloaded-library declaration inside the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryDependency {
    #[serde(rename = "machineName")]
    pub machine_name: String,
    #[serde(rename = "majorVersion")]
    pub major_version: u32,
    #[serde(rename = "minorVersion")]
    pub minor_version: u32,
}

impl LibraryDependency {
    fn new(machine_name: &str, major_version: u32, minor_version: u32) -> Self {
        Self {
            machine_name: machine_name.to_owned(),
            major_version,
            minor_version,
        }
    }
}

/// Top-level package descriptor written as `h5p.json`. Field order matches
/// the format the target platform ships, and serialization is deterministic
/// (declaration order), which keeps generated packages reproducible.
#[derive(Debug, Clone, Serialize)]
pub struct PackageManifest {
    #[serde(rename = "embedTypes")]
    pub embed_types: Vec<String>,
    pub language: String,
    #[serde(rename = "defaultLanguage")]
    pub default_language: String,
    pub license: String,
    #[serde(rename = "extraTitle")]
    pub extra_title: String,
    pub title: String,
    #[serde(rename = "mainLibrary")]
    pub main_library: String,
    #[serde(rename = "preloadedDependencies")]
    pub preloaded_dependencies: Vec<LibraryDependency>,
}

impl PackageManifest {
    /// Manifest for a generated quiz package. The interface language is
    /// fixed to English, the default content language to German, matching
    /// the template the packages are derived from. The dependency list
    /// differs only in the audio player library.
    pub fn for_quiz(title: impl Into<String>, media_kind: MediaKind) -> Self {
        let title = title.into();
        Self {
            embed_types: vec!["iframe".to_owned()],
            language: "en".to_owned(),
            default_language: "de".to_owned(),
            license: "U".to_owned(),
            extra_title: title.clone(),
            title,
            main_library: "H5P.Column".to_owned(),
            preloaded_dependencies: dependencies_for(media_kind),
        }
    }
}

fn dependencies_for(media_kind: MediaKind) -> Vec<LibraryDependency> {
    let mut dependencies = vec![
        LibraryDependency::new("H5P.AdvancedText", 1, 1),
        LibraryDependency::new("H5P.Video", 1, 6),
    ];
    if media_kind == MediaKind::Audio {
        dependencies.push(LibraryDependency::new("H5P.Audio", 1, 5));
    }
    dependencies.extend([
        LibraryDependency::new("H5P.QuestionSet", 1, 20),
        LibraryDependency::new("FontAwesome", 4, 5),
        LibraryDependency::new("H5P.JoubelUI", 1, 3),
        LibraryDependency::new("H5P.Transition", 1, 0),
        LibraryDependency::new("H5P.FontIcons", 1, 0),
        LibraryDependency::new("H5P.MultiChoice", 1, 16),
        LibraryDependency::new("H5P.Question", 1, 5),
        LibraryDependency::new("H5P.TrueFalse", 1, 8),
        LibraryDependency::new("H5P.Column", 1, 18),
    ]);
    dependencies
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn subcontent_ids_are_unique() {
        let ids: HashSet<String> = (0..500).map(|_| new_subcontent_id()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn manifest_serializes_with_h5p_field_names() {
        let manifest = PackageManifest::for_quiz("Video Quiz", MediaKind::Video);
        let value = serde_json::to_value(&manifest).expect("serialize manifest");
        assert_eq!(value["embedTypes"], serde_json::json!(["iframe"]));
        assert_eq!(value["mainLibrary"], "H5P.Column");
        assert_eq!(value["defaultLanguage"], "de");
        assert_eq!(value["preloadedDependencies"][0]["machineName"], "H5P.AdvancedText");
    }

    #[test]
    fn audio_dependency_set_adds_the_audio_player() {
        let video = dependencies_for(MediaKind::Video);
        let audio = dependencies_for(MediaKind::Audio);

        assert_eq!(video.len(), 11);
        assert_eq!(audio.len(), 12);
        assert!(!video.iter().any(|dep| dep.machine_name == "H5P.Audio"));
        assert!(audio.iter().any(|dep| dep.machine_name == "H5P.Audio"));
        // Everything else is shared between the two sets.
        for dep in &video {
            assert!(audio.contains(dep));
        }
    }

    #[test]
    fn optional_extra_title_is_omitted_when_absent() {
        let metadata = NodeMetadata::new("Text", "Intro Text");
        let value = serde_json::to_value(&metadata).expect("serialize metadata");
        assert!(value.get("extraTitle").is_none());
        assert_eq!(value["license"], "U");
    }
}
