//! Client for the platform's REST backend. Every fetch collapses failure
//! into a safe default ("no data") instead of raising; callers render the
//! empty state and the diagnostics go to the log.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::models::{PaginationInfo, VideoDetail, VideoListing, VideoPayload, VideosPayload};

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

fn videos_path(page: u32, per_page: u32) -> String {
    format!("/api/v1/videos?page={}&per_page={}", page, per_page)
}

fn video_path(id: i64) -> String {
    format!("/api/v1/videos/{}", id)
}

fn comments_path(video_id: i64) -> String {
    format!("/api/videos/{}/comments", video_id)
}

fn clamp_paging(page: u32, per_page: u32) -> (u32, u32) {
    (page.max(1), per_page.max(1))
}

impl ApiClient {
    pub fn new(base_url: &str, request_timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, String> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.status().is_success() {
            return Err(format!("API returned {}", resp.status()));
        }
        resp.json::<T>().await.map_err(|e| e.to_string())
    }

    /// One page of the catalog. Transport failures, non-success statuses
    /// and undecodable bodies all come back as the empty listing; an
    /// empty catalog and a broken backend are indistinguishable here.
    pub async fn fetch_videos(&self, page: u32, per_page: u32) -> VideoListing {
        let (page, per_page) = clamp_paging(page, per_page);
        match self.get_json::<VideosPayload>(&videos_path(page, per_page)).await {
            Ok(payload) => VideoListing {
                videos: payload.videos,
                pagination: payload
                    .pagination
                    .unwrap_or_else(|| PaginationInfo::fallback(per_page)),
            },
            Err(e) => {
                log::warn!("Failed to fetch videos page {}: {}", page, e);
                VideoListing::empty(per_page)
            }
        }
    }

    /// A single video with its related list, or `None` when the backend
    /// has no such video (or cannot be reached).
    pub async fn fetch_video(&self, id: i64) -> Option<VideoDetail> {
        match self.get_json::<VideoPayload>(&video_path(id)).await {
            Ok(payload) => payload.video.map(|video| VideoDetail {
                video,
                related_videos: payload.related_videos.unwrap_or_default(),
            }),
            Err(e) => {
                log::info!("Video {} unavailable: {}", id, e);
                None
            }
        }
    }

    /// Fire-and-forget comment forward. Only the success flag survives;
    /// the backend's response body is dropped.
    pub async fn submit_comment(&self, video_id: i64, content: &str) -> bool {
        let url = format!("{}{}", self.base_url, comments_path(video_id));
        match self
            .client
            .post(&url)
            .json(&json!({ "content": content }))
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                log::info!(
                    "Comment POST for video {} returned {}",
                    video_id,
                    resp.status()
                );
                false
            }
            Err(e) => {
                log::info!("Comment POST for video {} failed: {}", video_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_match_the_backend_contract() {
        assert_eq!(videos_path(2, 20), "/api/v1/videos?page=2&per_page=20");
        assert_eq!(video_path(41), "/api/v1/videos/41");
        assert_eq!(comments_path(41), "/api/videos/41/comments");
    }

    #[test]
    fn paging_inputs_are_clamped_to_valid_ranges() {
        assert_eq!(clamp_paging(0, 0), (1, 1));
        assert_eq!(clamp_paging(3, 20), (3, 20));
    }

    #[test]
    fn trailing_slash_is_stripped_from_base_url() {
        let client = ApiClient::new("http://localhost:3000/", 30).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }
}
