//! Frontend: serves the gallery pages with data substituted by Rust.
//! Templates are in assets/html/frontend/, assets at /assets.

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use html_escape::encode_text;
use std::fs;

use crate::config::Config;
use crate::models::{Liver, PaginationInfo, Video, VideoListing};
use crate::pagination::{self, PageEntry};

fn base_url(req: &HttpRequest, config: &Config) -> String {
    if !config.server.main_url.is_empty() {
        return config.server.main_url.trim_end_matches('/').to_string();
    }
    let info = req.connection_info();
    let scheme = info.scheme();
    let host = info.host();
    format!("{}://{}", scheme, host.trim_end_matches('/'))
}

fn load_template(name: &str) -> String {
    let path = format!("assets/html/frontend/{}.html", name);
    fs::read_to_string(&path).unwrap_or_else(|_| format!("<!-- template {} not found -->", name))
}

fn h(s: &str) -> String {
    encode_text(s).to_string()
}

fn query_value(query: &str, key: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let mut parts = pair.split('=');
        if parts.next() == Some(key) {
            parts.next().map(|v| v.to_string())
        } else {
            None
        }
    })
}

fn video_url(main_url: &str, id: i64) -> String {
    format!("{}/video/{}", main_url.trim_end_matches('/'), id)
}

fn page_url(main_url: &str, page: u32) -> String {
    format!("{}/?page={}", main_url.trim_end_matches('/'), page)
}

// ---- Navbar (included in every page) ----
fn render_navbar(main_url: &str) -> String {
    let t = load_template("partials/navbar");
    t.replace("{{MAIN_URL}}", main_url)
}

fn render_liver_tags(livers: &[Liver], limit: usize) -> String {
    let mut tags = String::new();
    for liver in livers.iter().take(limit) {
        tags.push_str(&format!(
            r#"<span class="liver-tag"><img src="{}" alt="{}" class="liver-avatar">{}</span>"#,
            h(&liver.avatar_url),
            h(&liver.display_name),
            h(&liver.display_name)
        ));
    }
    if livers.len() > limit {
        tags.push_str(&format!(
            r#"<span class="liver-more">+{} more</span>"#,
            livers.len() - limit
        ));
    }
    tags
}

fn render_video_card(video: &Video, main_url: &str) -> String {
    let url = video_url(main_url, video.id);
    format!(
        r#"<div class="video-card">
  <a href="{}" class="video-thumb-link">
    <img src="{}" alt="{}" class="video-thumb" loading="lazy">
    <span class="video-duration">{}</span>
  </a>
  <div class="video-card-body">
    <h3 class="video-title"><a href="{}" title="{}">{}</a></h3>
    <p class="video-uploader">{}</p>
    <p class="video-meta">{} views &middot; {}</p>
    <div class="video-livers">{}</div>
  </div>
</div>"#,
        h(&url),
        h(&video.thumbnail_url),
        h(&video.title),
        h(&video.duration_formatted),
        h(&url),
        h(&video.title),
        h(&video.title),
        h(&video.uploader_name),
        h(&video.view_count_formatted),
        h(&video.published_at_formatted),
        render_liver_tags(&video.livers, 2)
    )
}

fn render_video_grid(videos: &[Video], main_url: &str) -> String {
    let mut cards = String::new();
    for video in videos {
        cards.push_str(&render_video_card(video, main_url));
    }
    format!(r#"<div class="video-grid">{}</div>"#, cards)
}

fn render_empty_state() -> String {
    r#"<div class="empty-state">
  <p class="empty-state-icon">🎬✨</p>
  <h2>まだ動画がないよ〜！</h2>
  <p>素敵なVTuber動画をお待ちください💫</p>
</div>"#
        .to_string()
}

// ---- Slideshow (featured carousel on the home page) ----
fn render_slideshow(videos: &[Video], main_url: &str) -> String {
    if videos.is_empty() {
        return String::new();
    }
    let mut slides = String::new();
    for (index, video) in videos.iter().enumerate() {
        let active = if index == 0 { " active" } else { "" };
        slides.push_str(&format!(
            r#"<div class="slide{}">
  <a href="{}">
    <img src="{}" alt="{}" class="slide-image">
    <div class="slide-caption">
      <h3>{}</h3>
      <p>{} &middot; {}</p>
    </div>
  </a>
</div>"#,
            active,
            h(&video_url(main_url, video.id)),
            h(&video.thumbnail_url),
            h(&video.title),
            h(&video.title),
            h(&video.uploader_name),
            h(&video.duration_formatted)
        ));
    }
    let mut dots = String::new();
    for index in 0..videos.len() {
        let active = if index == 0 { " active" } else { "" };
        dots.push_str(&format!(
            r#"<button class="slide-dot{}" data-slide="{}" aria-label="Slide {}"></button>"#,
            active,
            index,
            index + 1
        ));
    }
    format!(
        r#"<section class="slideshow" id="slideshow">
  <div class="slides">{}</div>
  <button class="slide-nav slide-prev" aria-label="Previous slide">&#8249;</button>
  <button class="slide-nav slide-next" aria-label="Next slide">&#8250;</button>
  <div class="slide-dots">{}</div>
</section>"#,
        slides, dots
    )
}

// ---- Pagination strip ----
fn render_pagination(info: &PaginationInfo, main_url: &str) -> String {
    if info.total_pages <= 1 {
        return String::new();
    }
    let (start, end) = pagination::item_range(info.current_page, info.per_page, info.total_count);
    let caption = format!(
        r#"<p class="pagination-caption">🎬 {}-{} / {}件の動画 ✨</p>"#,
        start, end, info.total_count
    );

    let mut strip = String::new();
    if info.current_page == 1 {
        strip.push_str(r#"<span class="page-nav disabled">&#8249;</span>"#);
    } else {
        strip.push_str(&format!(
            r#"<a class="page-nav" href="{}" aria-label="前のページ">&#8249;</a>"#,
            h(&page_url(main_url, info.current_page - 1))
        ));
    }
    for entry in pagination::visible_pages(info.current_page, info.total_pages, 2) {
        match entry {
            PageEntry::Dots => strip.push_str(r#"<span class="page-dots">...</span>"#),
            PageEntry::Page(page) if page == info.current_page => {
                strip.push_str(&format!(r#"<span class="page-number active">{}</span>"#, page))
            }
            PageEntry::Page(page) => strip.push_str(&format!(
                r#"<a class="page-number" href="{}">{}</a>"#,
                h(&page_url(main_url, page)),
                page
            )),
        }
    }
    if info.current_page == info.total_pages {
        strip.push_str(r#"<span class="page-nav disabled">&#8250;</span>"#);
    } else {
        strip.push_str(&format!(
            r#"<a class="page-nav" href="{}" aria-label="次のページ">&#8250;</a>"#,
            h(&page_url(main_url, info.current_page + 1))
        ));
    }

    format!(
        r#"<nav class="pagination">{}<div class="pagination-strip">{}</div></nav>"#,
        caption, strip
    )
}

// ---- Home page ----
pub async fn page_home(req: HttpRequest, data: web::Data<crate::AppState>) -> impl Responder {
    let config = &data.config;
    let main_url = base_url(&req, config);
    let page = pagination::parse_page(query_value(req.query_string(), "page").as_deref());

    let listing: VideoListing = data.api.fetch_videos(page, config.video.per_page).await;

    // Slideshow seeding is a deliberate two-step sequence: page 1 feeds it
    // from its own response, deeper pages fetch the latest videos again.
    let slideshow_count = config.video.slideshow_count;
    let slideshow: Vec<Video> = if page == 1 {
        listing
            .videos
            .iter()
            .take(slideshow_count as usize)
            .cloned()
            .collect()
    } else {
        data.api.fetch_videos(1, slideshow_count).await.videos
    };

    let main_content = if listing.videos.is_empty() && listing.pagination.total_count == 0 {
        render_empty_state()
    } else {
        render_video_grid(&listing.videos, &main_url)
    };

    let t = load_template("index");
    let html = t
        .replace("{{NAVBAR}}", &render_navbar(&main_url))
        .replace("{{SLIDESHOW}}", &render_slideshow(&slideshow, &main_url))
        .replace("{{MAIN_CONTENT}}", &main_content)
        .replace("{{PAGINATION}}", &render_pagination(&listing.pagination, &main_url))
        .replace("{{MAIN_URL}}", &main_url);

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

// ---- Video detail page ----
fn render_player(video: &Video) -> String {
    format!(
        r#"<div class="player">
  <iframe src="{}" title="{}" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture; web-share" allowfullscreen></iframe>
</div>"#,
        h(&video.youtube_embed_url),
        h(&video.title)
    )
}

fn render_video_info(video: &Video) -> String {
    let initial = video
        .uploader_name
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default();
    let livers = if video.livers.is_empty() {
        String::new()
    } else {
        format!(
            r#"<div class="info-livers"><h3>Featured Livers</h3>{}</div>"#,
            render_liver_tags(&video.livers, video.livers.len())
        )
    };
    format!(
        r#"<div class="video-info">
  <h1>{}</h1>
  <div class="info-row">
    <span class="uploader-badge">{}</span>
    <span class="uploader-name">{}</span>
    <span class="info-meta">{} views &middot; {} &middot; {}</span>
  </div>
  {}
  <a class="watch-link" href="{}" target="_blank" rel="noopener noreferrer">Watch on YouTube</a>
</div>"#,
        h(&video.title),
        h(&initial),
        h(&video.uploader_name),
        h(&video.view_count_formatted),
        h(&video.published_at_formatted),
        h(&video.duration_formatted),
        livers,
        h(&video.youtube_url)
    )
}

fn filter_related(related: &[Video], current_id: i64) -> Vec<Video> {
    related
        .iter()
        .filter(|v| v.id != current_id)
        .cloned()
        .collect()
}

fn render_related(related: &[Video], main_url: &str) -> String {
    if related.is_empty() {
        return r#"<p class="related-empty">No related videos found</p>"#.to_string();
    }
    let mut items = String::new();
    for video in related {
        let url = video_url(main_url, video.id);
        items.push_str(&format!(
            r#"<li class="related-item">
  <a href="{}">
    <span class="related-thumb-wrap">
      <img src="{}" alt="{}" class="related-thumb" loading="lazy">
      <span class="video-duration">{}</span>
    </span>
    <span class="related-body">
      <span class="related-title">{}</span>
      <span class="related-uploader">{}</span>
      <span class="related-meta">{} views &middot; {}</span>
    </span>
  </a>
</li>"#,
            h(&url),
            h(&video.thumbnail_url),
            h(&video.title),
            h(&video.duration_formatted),
            h(&video.title),
            h(&video.uploader_name),
            h(&video.view_count_formatted),
            h(&video.published_at_formatted)
        ));
    }
    format!(r#"<ul class="related-list">{}</ul>"#, items)
}

pub async fn page_video(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Data<crate::AppState>,
) -> impl Responder {
    let config = &data.config;
    let main_url = base_url(&req, config);

    let id: i64 = match path.into_inner().trim().parse() {
        Ok(id) => id,
        Err(_) => return not_found_response(&main_url),
    };

    let detail = match data.api.fetch_video(id).await {
        Some(detail) => detail,
        None => return not_found_response(&main_url),
    };

    let related = filter_related(&detail.related_videos, detail.video.id);

    let t = load_template("video");
    let html = t
        .replace("{{NAVBAR}}", &render_navbar(&main_url))
        .replace("{{TITLE}}", &h(&detail.video.title))
        .replace("{{PLAYER}}", &render_player(&detail.video))
        .replace("{{VIDEO_INFO}}", &render_video_info(&detail.video))
        .replace("{{RELATED}}", &render_related(&related, &main_url))
        .replace("{{VIDEO_ID}}", &detail.video.id.to_string())
        .replace("{{MAIN_URL}}", &main_url);

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

// ---- Not found ----
fn not_found_response(main_url: &str) -> HttpResponse {
    let t = load_template("not_found");
    let html = t
        .replace("{{NAVBAR}}", &render_navbar(main_url))
        .replace("{{MAIN_URL}}", main_url);
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

pub async fn page_not_found(req: HttpRequest, data: web::Data<crate::AppState>) -> impl Responder {
    let main_url = base_url(&req, &data.config);
    not_found_response(&main_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Liver, PaginationInfo};

    fn video(id: i64, title: &str) -> Video {
        Video {
            id,
            title: title.to_string(),
            uploader_name: "Uploader".to_string(),
            view_count_formatted: "1.2K".to_string(),
            published_at_formatted: "2024/01/01".to_string(),
            duration_formatted: "12:34".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn query_value_picks_the_right_pair() {
        assert_eq!(query_value("page=3&foo=bar", "page").as_deref(), Some("3"));
        assert_eq!(query_value("foo=bar", "page"), None);
        assert_eq!(query_value("", "page"), None);
    }

    #[test]
    fn grid_contains_a_card_per_video_with_escaped_titles() {
        let videos = vec![video(1, "normal"), video(2, "<script>alert(1)</script>")];
        let html = render_video_grid(&videos, "http://t");
        assert_eq!(html.matches(r#"<div class="video-card">"#).count(), 2);
        assert!(html.contains("http://t/video/1"));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn empty_state_shows_the_friendly_placeholder() {
        let html = render_empty_state();
        assert!(html.contains("まだ動画がないよ"));
    }

    #[test]
    fn slideshow_is_omitted_without_videos() {
        assert!(render_slideshow(&[], "http://t").is_empty());
        let html = render_slideshow(&[video(1, "a"), video(2, "b")], "http://t");
        assert_eq!(html.matches("data-slide=").count(), 2);
    }

    #[test]
    fn single_page_renders_no_pagination() {
        let info = PaginationInfo::fallback(20);
        assert!(render_pagination(&info, "http://t").is_empty());
    }

    #[test]
    fn pagination_links_skip_the_current_page() {
        let info = PaginationInfo {
            current_page: 2,
            total_pages: 3,
            total_count: 45,
            per_page: 20,
        };
        let html = render_pagination(&info, "http://t");
        assert!(html.contains("21-40 / 45"));
        assert!(html.contains("http://t/?page=1"));
        assert!(html.contains("http://t/?page=3"));
        assert!(html.contains(r#"<span class="page-number active">2</span>"#));
        assert!(!html.contains("/?page=2\""));
    }

    #[test]
    fn first_and_last_page_disable_their_nav_arrow() {
        let first = PaginationInfo {
            current_page: 1,
            total_pages: 3,
            total_count: 45,
            per_page: 20,
        };
        assert!(render_pagination(&first, "http://t").contains(r#"page-nav disabled"#));
        let last = PaginationInfo {
            current_page: 3,
            ..first
        };
        assert!(render_pagination(&last, "http://t").contains(r#"page-nav disabled"#));
    }

    #[test]
    fn related_filter_drops_the_current_video() {
        let related = vec![video(1, "self"), video(2, "other")];
        let filtered = filter_related(&related, 1);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 2);
    }

    #[test]
    fn related_list_has_a_placeholder_when_empty() {
        assert!(render_related(&[], "http://t").contains("No related videos found"));
    }

    #[test]
    fn liver_tags_cap_at_the_limit_with_an_overflow_marker() {
        let livers: Vec<Liver> = (1..=4)
            .map(|id| Liver {
                id,
                display_name: format!("liver{}", id),
                ..Default::default()
            })
            .collect();
        let html = render_liver_tags(&livers, 2);
        assert_eq!(html.matches("liver-tag").count(), 2);
        assert!(html.contains("+2 more"));
    }
}
