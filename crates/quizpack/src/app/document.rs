//! Content tree builder: assembles the ordered top-level document out of an
//! intro text node, a media node, and the question-set node.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Value, json};

use crate::domain::h5p::{
    ColumnEntry, ContentDocument, ContentNode, NodeMetadata, TITLE_IMAGE_CONTENT_REF,
};
use crate::domain::model::{MediaKind, MediaRef};

static YOUTUBE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"v=([A-Za-z0-9_-]{11})").expect("valid video id pattern"));

const VIDEO_INTRO: &str =
    "<p>Schauen Sie das Video und beantworten Sie die Verständnisfragen unterhalb des Videos</p>";
const AUDIO_INTRO: &str =
    "<p>Hören Sie die Audiodatei an und beantworten Sie die Verständnisfragen unterhalb des Players</p>";

/// Caller-supplied parameters for one document build.
#[derive(Debug, Clone)]
pub struct DocumentSpec {
    pub title: String,
    pub media: MediaRef,
    pub randomize: bool,
    pub pool_size: u32,
    pub pass_percentage: u32,
}

/// Assemble the full interactive page. The three nodes appear in fixed
/// order (intro, media, question set), each separated automatically.
///
/// `questions` is the already-mapped node list; pool size is passed through
/// untouched even when it exceeds the number of available questions — the
/// downstream renderer owns that boundary.
pub fn build_document(questions: Vec<Value>, spec: &DocumentSpec) -> ContentDocument {
    ContentDocument {
        content: vec![
            ColumnEntry::auto(intro_node(spec.media.kind)),
            ColumnEntry::auto(media_node(&spec.media)),
            ColumnEntry::auto(question_set_node(questions, spec)),
        ],
    }
}

/// Extract the 11-character video identifier from a watch URL. A URL without
/// a `v=` parameter yields `None`; the caller degrades to an empty source
/// path instead of failing the pipeline.
pub fn extract_video_id(url: &str) -> Option<&str> {
    YOUTUBE_ID
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
}

fn intro_node(kind: MediaKind) -> ContentNode {
    let text = match kind {
        MediaKind::Video => VIDEO_INTRO,
        MediaKind::Audio => AUDIO_INTRO,
    };
    ContentNode::new(
        "H5P.AdvancedText 1.1",
        json!({ "text": text }),
        NodeMetadata::new("Text", "Intro Text"),
    )
}

fn media_node(media: &MediaRef) -> ContentNode {
    match media.kind {
        MediaKind::Video => video_node(&media.url),
        MediaKind::Audio => audio_node(&media.url),
    }
}

fn video_node(url: &str) -> ContentNode {
    let source_path = extract_video_id(url)
        .map(|id| format!("https://www.youtube.com/watch?v={id}"))
        .unwrap_or_default();

    let params = json!({
        "visuals": { "fit": true, "controls": true },
        "playback": { "autoplay": false, "loop": false },
        "l10n": {
            "name": "Video",
            "loading": "Videoplayer lädt...",
            "noPlayers": "Keine Videoplayer gefunden, die das Videoformat unterstützen.",
            "noSources": "Es wurden für das Video keine Quellen angegeben.",
            "aborted": "Das Abspielen des Videos wurde abgebrochen.",
            "networkFailure": "Netzwerkfehler.",
            "cannotDecode": "Dekodierung des Mediums nicht möglich.",
            "formatNotSupported": "Videoformat wird nicht unterstützt.",
            "mediaEncrypted": "Medium verschlüsselt.",
            "unknownError": "Unbekannter Fehler.",
            "invalidYtId": "Ungültige YouTube-ID.",
            "unknownYtId": "Video mit dieser YouTube-ID konnte nicht gefunden werden.",
            "restrictedYt": "Der Besitzer dieses Videos erlaubt kein Einbetten."
        },
        "sources": [{
            "path": source_path,
            "mime": "video/YouTube",
            "copyright": { "license": "U" },
            "aspectRatio": "16:9"
        }]
    });

    let metadata =
        NodeMetadata::new("Video", "YouTube Video").with_extra_title("YouTube Video");
    ContentNode::new("H5P.Video 1.6", params, metadata)
}

fn audio_node(url: &str) -> ContentNode {
    let params = json!({
        "playerMode": "full",
        "fit": true,
        "controls": true,
        "autoplay": false,
        "playAudio": "Audio abspielen",
        "pauseAudio": "Audio pausieren",
        "contentName": "Audio",
        "audioNotSupported": "Dein Browser unterstützt diese Audiodatei nicht.",
        "files": [{
            "path": url,
            "mime": "audio/mpeg",
            "copyright": { "license": "U" }
        }]
    });

    let metadata = NodeMetadata::new("Audio", "Audio").with_extra_title("Audio");
    ContentNode::new("H5P.Audio 1.5", params, metadata)
}

fn question_set_node(questions: Vec<Value>, spec: &DocumentSpec) -> ContentNode {
    let subject = match spec.media.kind {
        MediaKind::Video => "Videoinhalt",
        MediaKind::Audio => "Audioinhalt",
    };
    let introduction = format!(
        "<p style='text-align:center'><strong>Starten Sie das Quiz zu diesem {}.</strong></p>\
         <p style='text-align:center'>Es werden zufällig {} Fragen angezeigt.</p>",
        subject, spec.pool_size
    );

    let params = json!({
        "introPage": {
            "showIntroPage": true,
            "startButtonText": "Quiz starten",
            "title": spec.title,
            "introduction": introduction,
            "backgroundImage": {
                "path": TITLE_IMAGE_CONTENT_REF,
                "mime": "image/png",
                "copyright": { "license": "U" },
                "width": 52,
                "height": 52
            }
        },
        "progressType": "textual",
        "passPercentage": spec.pass_percentage,
        "randomQuestions": spec.randomize,
        "poolSize": spec.pool_size,
        "questions": questions,
        "disableBackwardsNavigation": false,
        "texts": {
            "prevButton": "Zurück",
            "nextButton": "Weiter",
            "finishButton": "Beenden",
            "submitButton": "Absenden",
            "textualProgress": "Frage @current von @total",
            "jumpToQuestion": "Frage %d von %total",
            "questionLabel": "Frage",
            "readSpeakerProgress": "Frage @current von @total",
            "unansweredText": "Unbeantwortet",
            "answeredText": "Beantwortet",
            "currentQuestionText": "Aktuelle Frage",
            "navigationLabel": "Fragen"
        },
        "endGame": {
            "showResultPage": true,
            "showSolutionButton": false,
            "showRetryButton": false,
            "noResultMessage": "Quiz beendet",
            "message": "Dein Ergebnis:",
            "scoreBarLabel": "Du hast @score von @total Punkten erreicht.",
            "overallFeedback": [
                {
                    "from": 0,
                    "to": 50,
                    "feedback": "Das war leider noch nicht genug. Wiederholen Sie den Inhalt und versuchen Sie es erneut."
                },
                {
                    "from": 51,
                    "to": 75,
                    "feedback": "Schon ganz gut! Mit einem weiteren Durchgang schaffen Sie noch mehr."
                },
                {
                    "from": 76,
                    "to": 100,
                    "feedback": "Hervorragend! Sie haben den Inhalt verstanden."
                }
            ],
            "solutionButtonText": "Lösung anzeigen",
            "retryButtonText": "Wiederholen",
            "finishButtonText": "Beenden",
            "submitButtonText": "Absenden",
            "showAnimations": false,
            "skippable": false,
            "skipButtonText": "Überspringen"
        }
    });

    let metadata = NodeMetadata::new("Question Set", spec.title.clone());
    ContentNode::new("H5P.QuestionSet 1.20", params, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(media: MediaRef) -> DocumentSpec {
        DocumentSpec {
            title: "Video Quiz".to_owned(),
            media,
            randomize: true,
            pool_size: 7,
            pass_percentage: 75,
        }
    }

    #[test]
    fn document_has_three_nodes_in_fixed_order() {
        let spec = spec(MediaRef::video("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        let document = build_document(vec![json!({})], &spec);

        assert_eq!(document.content.len(), 3);
        assert_eq!(document.content[0].content.library, "H5P.AdvancedText 1.1");
        assert_eq!(document.content[1].content.library, "H5P.Video 1.6");
        assert_eq!(document.content[2].content.library, "H5P.QuestionSet 1.20");
        for entry in &document.content {
            assert_eq!(entry.use_separator, "auto");
        }
    }

    #[test]
    fn extracts_the_eleven_character_video_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(extract_video_id("https://example.com/clip.mp4"), None);
    }

    #[test]
    fn unmatched_video_url_degrades_to_empty_source() {
        let spec = spec(MediaRef::video("https://example.com/no-video-here"));
        let document = build_document(Vec::new(), &spec);
        let sources = &document.content[1].content.params["sources"];
        assert_eq!(sources[0]["path"], "");
        assert_eq!(sources[0]["mime"], "video/YouTube");
    }

    #[test]
    fn matched_video_url_rebuilds_the_watch_link() {
        let spec = spec(MediaRef::video("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"));
        let document = build_document(Vec::new(), &spec);
        let sources = &document.content[1].content.params["sources"];
        assert_eq!(
            sources[0]["path"],
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(sources[0]["aspectRatio"], "16:9");
    }

    #[test]
    fn audio_url_is_used_verbatim() {
        let spec = spec(MediaRef::audio("https://example.com/lecture.mp3"));
        let document = build_document(Vec::new(), &spec);

        let media = &document.content[1].content;
        assert_eq!(media.library, "H5P.Audio 1.5");
        assert_eq!(media.params["files"][0]["path"], "https://example.com/lecture.mp3");
        assert_eq!(media.params["playerMode"], "full");
        assert_eq!(media.params["autoplay"], json!(false));
    }

    #[test]
    fn intro_phrasing_follows_the_media_kind() {
        let video = build_document(Vec::new(), &spec(MediaRef::video("x")));
        let audio = build_document(Vec::new(), &spec(MediaRef::audio("x")));
        let video_text = video.content[0].content.params["text"].as_str().unwrap();
        let audio_text = audio.content[0].content.params["text"].as_str().unwrap();
        assert!(video_text.contains("Video"));
        assert!(audio_text.contains("Audiodatei"));
        assert_ne!(video_text, audio_text);
    }

    #[test]
    fn pool_size_and_pass_percentage_pass_through_untouched() {
        let mut spec = spec(MediaRef::video("x"));
        spec.pool_size = 7;
        spec.pass_percentage = 75;
        // Deliberately more than the single question supplied.
        let document = build_document(vec![json!({})], &spec);

        let params = &document.content[2].content.params;
        assert_eq!(params["poolSize"], json!(7));
        assert_eq!(params["passPercentage"], json!(75));
        assert_eq!(params["randomQuestions"], json!(true));
        assert_eq!(params["questions"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn question_set_carries_feedback_bands() {
        let document = build_document(Vec::new(), &spec(MediaRef::video("x")));
        let bands = document.content[2].content.params["endGame"]["overallFeedback"]
            .as_array()
            .expect("feedback bands")
            .clone();
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[0]["from"], json!(0));
        assert_eq!(bands[0]["to"], json!(50));
        assert_eq!(bands[1]["from"], json!(51));
        assert_eq!(bands[1]["to"], json!(75));
        assert_eq!(bands[2]["from"], json!(76));
        assert_eq!(bands[2]["to"], json!(100));
        // The three messages are distinct fixed strings.
        assert_ne!(bands[0]["feedback"], bands[1]["feedback"]);
        assert_ne!(bands[1]["feedback"], bands[2]["feedback"]);
    }
}
