use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Video {
    pub id: i64,
    #[serde(default)]
    pub youtube_id: String,
    pub title: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub duration_seconds: u32,
    #[serde(default)]
    pub duration_formatted: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub view_count_formatted: String,
    #[serde(default)]
    pub uploader_name: String,
    #[serde(default)]
    pub uploader_channel_id: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub published_at_formatted: String,
    #[serde(default)]
    pub youtube_url: String,
    #[serde(default)]
    pub youtube_embed_url: String,
    #[serde(default)]
    pub livers: Vec<Liver>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Liver {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub channel_url: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub video_count: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub per_page: u32,
}

impl PaginationInfo {
    /// The safe default the UI falls back to when the backend gives us
    /// nothing usable: one empty page.
    pub fn fallback(per_page: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_count: 0,
            per_page,
        }
    }
}

// Wire shapes as the backend sends them. `pagination` is missing from
// some backend builds, so it stays optional here and is resolved by the
// API client.
#[derive(Debug, Deserialize)]
pub struct VideosPayload {
    #[serde(default)]
    pub videos: Vec<Video>,
    #[serde(default)]
    pub pagination: Option<PaginationInfo>,
}

#[derive(Debug, Deserialize)]
pub struct VideoPayload {
    #[serde(default)]
    pub video: Option<Video>,
    #[serde(default)]
    pub related_videos: Option<Vec<Video>>,
}

/// One page of the catalog, ready to render.
#[derive(Debug, Clone)]
pub struct VideoListing {
    pub videos: Vec<Video>,
    pub pagination: PaginationInfo,
}

impl VideoListing {
    pub fn empty(per_page: u32) -> Self {
        Self {
            videos: Vec::new(),
            pagination: PaginationInfo::fallback(per_page),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VideoDetail {
    pub video: Video,
    pub related_videos: Vec<Video>,
}

/// Ephemeral comment echoed back to the detail page script. Never stored,
/// never read back; it lives only in the rendered page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Comment {
    pub id: i64,
    pub author: String,
    pub content: String,
    pub timestamp: String,
    pub likes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_pagination_is_one_empty_page() {
        let p = PaginationInfo::fallback(20);
        assert_eq!(p.current_page, 1);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.total_count, 0);
        assert_eq!(p.per_page, 20);
    }

    #[test]
    fn videos_payload_tolerates_missing_fields() {
        let raw = r#"{
            "videos": [
                {"id": 7, "title": "clip", "livers": [{"id": 1, "display_name": "Mito"}]}
            ]
        }"#;
        let payload: VideosPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.videos.len(), 1);
        assert!(payload.pagination.is_none());
        let video = &payload.videos[0];
        assert_eq!(video.id, 7);
        assert_eq!(video.title, "clip");
        assert!(video.thumbnail_url.is_empty());
        assert_eq!(video.livers[0].display_name, "Mito");
    }

    #[test]
    fn video_payload_without_video_deserializes_to_none() {
        let payload: VideoPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.video.is_none());
        assert!(payload.related_videos.is_none());
    }
}
