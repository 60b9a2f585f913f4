//! Server-rendered HTML for the browsing pages.
//!
//! Every value that comes from a user or the media API goes through
//! `html_escape` before it lands in markup. The first page of search results
//! is also embedded as JSON so a front-end can continue paging from it.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use serde::Serialize;

use crate::filters::{with_query, FilterState, HexColor, MinSize, Orientation, SUPPORTED_COLORS};
use crate::format::{format_number, to_title_case};
use crate::media_types::{MediaKind, MediaRecord, Photo, SearchPage, Video};
use crate::share::{share_text, social_links};

pub const SITE_NAME: &str = "Image Studios";
pub const CATEGORY_CHIPS: [&str; 6] = ["Nature", "Technology", "Travel", "Food", "Business", "Art"];
pub const EMPTY_RESULTS_MESSAGE: &str = "No matching search results";
const LICENSE_URL: &str = "https://www.pexels.com/license/";

/// Link through the local download proxy.
pub fn download_href(remote_url: &str) -> String {
    format!("/api/download?url={}", urlencoding::encode(remote_url))
}

/// Serializes for an inline `<script>` block; `</` cannot close the tag early.
pub fn embed_json<T: Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json.replace("</", "<\\/"),
        Err(e) => {
            log::error!("Failed to serialize initial page data: {}", e);
            "null".to_string()
        }
    }
}

/// Markup for one tile in a results grid.
pub trait Card: MediaRecord + Serialize {
    fn card_html(&self) -> String;
}

impl Card for Photo {
    fn card_html(&self) -> String {
        let download = self
            .downloads()
            .first()
            .map(|(_, url)| {
                format!(
                    r#"<a class="btn btn-sm" href="{}" aria-label="Download image">Download</a>"#,
                    attr(&download_href(url))
                )
            })
            .unwrap_or_default();

        format!(
            r#"<figure class="card" style="aspect-ratio: {w} / {h}; background-color: {bg}">
<a href="/photo/{id}"><img src="{src}" alt="{alt}" loading="lazy"></a>
{download}
<figcaption><a href="{author_url}" target="_blank" rel="noreferrer">{author}</a></figcaption>
</figure>"#,
            w = self.width,
            h = self.height,
            bg = attr(self.avg_color.as_deref().unwrap_or("transparent")),
            id = self.id,
            src = attr(self.display_src()),
            alt = attr(self.alt_text()),
            download = download,
            author_url = attr(&self.photographer_url),
            author = text(&self.photographer),
        )
    }
}

impl Card for Video {
    fn card_html(&self) -> String {
        let download = self
            .download_link()
            .map(|url| {
                format!(
                    r#"<a class="btn btn-sm" href="{}" aria-label="Download video">Download</a>"#,
                    attr(&download_href(url))
                )
            })
            .unwrap_or_default();

        format!(
            r#"<figure class="card" style="aspect-ratio: {w} / {h}">
<a href="/video/{id}"><img src="{poster}" alt="Video by {author_attr}" loading="lazy"><span class="badge">{duration}s</span></a>
{download}
<figcaption><a href="{author_url}" target="_blank" rel="noreferrer">{author}</a></figcaption>
</figure>"#,
            w = self.width,
            h = self.height,
            id = self.id,
            poster = attr(&self.image),
            author_attr = attr(&self.user.name),
            duration = self.duration,
            download = download,
            author_url = attr(&self.user.url),
            author = text(&self.user.name),
        )
    }
}

fn search_form(kind: MediaKind, query: &str) -> String {
    let selected = |k: MediaKind| if k == kind { " selected" } else { "" };
    format!(
        r#"<form class="search" action="/search" method="get">
<input type="text" name="q" value="{query}" placeholder="Search free stock photos &amp; videos..." autocomplete="off">
<select name="kind"><option value="photos"{photos}>Photos</option><option value="videos"{videos}>Videos</option></select>
<button type="submit">Search</button>
</form>"#,
        query = attr(query),
        photos = selected(MediaKind::Photos),
        videos = selected(MediaKind::Videos),
    )
}

pub fn layout(title: &str, kind: MediaKind, query: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
<header class="navbar"><a class="brand" href="/">{site}</a>
{search}
</header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = text(title),
        site = SITE_NAME,
        search = search_form(kind, query),
        body = body,
    )
}

pub fn render_home() -> String {
    let chips: String = CATEGORY_CHIPS
        .iter()
        .map(|name| {
            format!(
                r#"<a class="chip" href="/search/{}">{}</a>"#,
                urlencoding::encode(name),
                name
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"<section class="hero">
<h1>Discover Amazing Images</h1>
<p>Search millions of free stock photos and videos</p>
<nav class="categories">
{chips}
</nav>
</section>"#
    );

    layout(
        &format!("{} - Free Stock Photos & Videos", SITE_NAME),
        MediaKind::Photos,
        "",
        &body,
    )
}

fn filter_form(kind: MediaKind, action: &str, filters: &FilterState) -> String {
    let option = |value: &str, label: &str, current: Option<&str>| {
        format!(
            r#"<option value="{}"{}>{}</option>"#,
            value,
            if current == Some(value) { " selected" } else { "" },
            label
        )
    };

    let current_orientation = filters.orientation.map(|o| o.as_str());
    let mut orientations = option("", "All Orientations", current_orientation.or(Some("")));
    for orientation in Orientation::ALL {
        orientations.push_str(&option(
            orientation.as_str(),
            orientation.label(),
            current_orientation,
        ));
    }

    let current_size = filters.size.map(|s| s.as_str());
    let mut sizes = option("", "All Sizes", current_size.or(Some("")));
    for size in MinSize::ALL {
        sizes.push_str(&option(size.as_str(), size.label(), current_size));
    }

    let colors = if kind == MediaKind::Photos {
        let current = filters.color.as_ref().map(|c| c.css());
        let swatches: String = SUPPORTED_COLORS
            .iter()
            .map(|(name, hex)| {
                let with_color = FilterState {
                    color: HexColor::parse(hex),
                    ..filters.clone()
                };
                format!(
                    r#"<a class="swatch" href="{href}" title="{name}" style="background-color: {hex}"{pressed}></a>"#,
                    href = attr(&with_query(action, &with_color.to_query_string())),
                    name = name,
                    hex = hex,
                    pressed = if current.as_deref() == Some(*hex) {
                        r#" aria-current="true""#
                    } else {
                        ""
                    },
                )
            })
            .collect();
        format!(
            r##"<label>Color <input type="text" name="color" value="{}" placeholder="#RRGGBB"></label>
<div class="swatches">{}</div>"##,
            attr(&current.unwrap_or_default()),
            swatches
        )
    } else {
        String::new()
    };

    let applied = filters.applied_count();
    let badge = if applied > 0 {
        format!(r#" <span class="badge">{}</span>"#, applied)
    } else {
        String::new()
    };
    let clear = if applied > 0 {
        format!(r#"<a class="btn btn-ghost" href="{}">Clear All Filters</a>"#, attr(action))
    } else {
        String::new()
    };

    format!(
        r#"<form class="filters" action="{action}" method="get">
<span>Filters{badge}</span>
<select name="orientation">{orientations}</select>
{colors}
<select name="size">{sizes}</select>
<button type="submit">Apply</button>
{clear}
</form>"#,
        action = attr(action),
    )
}

/// Outcome of the first-page fetch behind a search page.
pub enum SearchOutcome<'a, T> {
    Loaded(&'a SearchPage<T>),
    Failed,
}

pub fn render_search<T: Card>(
    query: &str,
    filters: &FilterState,
    outcome: SearchOutcome<'_, T>,
) -> String {
    let kind = T::KIND;
    let action = format!("{}/{}", kind.search_path(), urlencoding::encode(query));
    let heading = format!("Free {} {}", to_title_case(query), kind.title());

    let (count, results) = match outcome {
        SearchOutcome::Failed => (
            String::new(),
            format!(
                r#"<div class="alert alert-error" role="alert">Failed to load {}. Please try again.</div>"#,
                kind.plural()
            ),
        ),
        SearchOutcome::Loaded(page) if page.items.is_empty() => (
            format_number(page.total_results),
            format!(
                r#"<div class="empty">
<p>{}</p>
<a class="btn" href="{}">Clear All Filters</a>
</div>"#,
                EMPTY_RESULTS_MESSAGE,
                attr(&action)
            ),
        ),
        SearchOutcome::Loaded(page) => {
            let cards: String = page.items.iter().map(Card::card_html).collect();
            let sentinel = match &page.next_page {
                Some(cursor) => format!(
                    r#"<div id="sentinel" data-next="{}"></div>"#,
                    attr(&format!(
                        "/api/{}/next?cursor={}",
                        kind.plural(),
                        urlencoding::encode(cursor)
                    ))
                ),
                None => String::new(),
            };
            (
                format_number(page.total_results),
                format!(
                    r#"<div class="grid">
{cards}
</div>
{sentinel}
<script id="initial-data" type="application/json">{data}</script>"#,
                    data = embed_json(page),
                ),
            )
        }
    };

    let body = format!(
        r#"<h1>{heading}</h1>
<div class="toolbar">
{filters}
<span class="btn">{title} <span class="badge badge-primary">{count}</span></span>
</div>
{results}"#,
        heading = text(&heading),
        filters = filter_form(kind, &action, filters),
        title = kind.title(),
    );

    layout(&format!("{} - {}", heading, SITE_NAME), kind, query, &body)
}

fn share_section(kind: MediaKind, page_url: &str, author: &str) -> String {
    let message = share_text(kind, author);
    let links: String = social_links(page_url, &message)
        .entries()
        .iter()
        .map(|(title, href)| {
            format!(
                r#"<a href="{}" target="_blank" rel="noreferrer" title="{title}">{title}</a>"#,
                attr(href)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<section class="share">
<h3>Share this {noun}</h3>
{links}
<p>Copy and share the link below</p>
<input type="text" readonly value="{url}">
</section>"#,
        noun = kind.label(),
        url = attr(page_url),
    )
}

pub fn render_photo(photo: &Photo, public_url: &str) -> String {
    let downloads: String = photo
        .downloads()
        .into_iter()
        .map(|(label, url)| {
            let dims = if label == "Original" {
                format!(r#" <span class="dims">{} × {}</span>"#, photo.width, photo.height)
            } else {
                String::new()
            };
            format!(
                r#"<li><a href="{}" aria-label="Download image">{}{}</a></li>"#,
                attr(&download_href(url)),
                label,
                dims
            )
        })
        .collect();

    let page_url = format!("{}/photo/{}", public_url.trim_end_matches('/'), photo.id);
    let body = format!(
        r#"<h3><a href="{author_url}" target="_blank">{author}</a></h3>
<div class="viewer" style="aspect-ratio: {w} / {h}; background-color: {bg}">
<img src="{src}" alt="{alt}">
</div>
<ul class="downloads">{downloads}</ul>
<a href="{license}" target="_blank">Free to use</a>
{share}"#,
        author_url = attr(&photo.photographer_url),
        author = text(&photo.photographer),
        w = photo.width,
        h = photo.height,
        bg = attr(photo.avg_color.as_deref().unwrap_or("transparent")),
        src = attr(photo.display_src()),
        alt = attr(photo.alt_text()),
        license = LICENSE_URL,
        share = share_section(MediaKind::Photos, &page_url, &photo.photographer),
    );

    let title = format!("Photo by {} - {}", photo.photographer, SITE_NAME);
    layout(&title, MediaKind::Photos, "", &body)
}

pub fn render_video(video: &Video, public_url: &str) -> String {
    let player = match video.best_file() {
        Some(file) => format!(
            r#"<video controls poster="{}" src="{}" type="{}"></video>
<a class="btn" href="{}" aria-label="Download video">Download</a>"#,
            attr(&video.image),
            attr(&file.link),
            attr(&file.file_type),
            attr(&download_href(&file.link)),
        ),
        None => format!(r#"<img src="{}" alt="Video preview">"#, attr(&video.image)),
    };

    let page_url = format!("{}/video/{}", public_url.trim_end_matches('/'), video.id);
    let body = format!(
        r#"<h3><a href="{author_url}" target="_blank">{author}</a></h3>
<div class="viewer" style="aspect-ratio: {w} / {h}">
{player}
</div>
<a href="{license}" target="_blank">Free to use</a>
{share}"#,
        author_url = attr(&video.user.url),
        author = text(&video.user.name),
        w = video.width,
        h = video.height,
        license = LICENSE_URL,
        share = share_section(MediaKind::Videos, &page_url, &video.user.name),
    );

    let title = format!("Video by {} - {}", video.user.name, SITE_NAME);
    layout(&title, MediaKind::Videos, "", &body)
}

/// Inline failure for a record page whose upstream fetch failed.
pub fn render_unavailable(kind: MediaKind) -> String {
    let body = format!(
        r#"<div class="alert alert-error" role="alert">Failed to load this {}. Please try again.</div>
<a class="btn" href="/">Back to home</a>"#,
        kind.singular()
    );
    layout(&format!("Unavailable - {}", SITE_NAME), kind, "", &body)
}

pub fn render_not_found() -> String {
    let body = r#"<section class="hero">
<h1>404</h1>
<h2>Oops! Page Not Found</h2>
<p>The page you are looking for was moved, removed, renamed or might never have existed.</p>
<a class="btn btn-primary" href="/">Discover free photos or videos</a>
</section>"#;
    layout(
        &format!("Page Not Found - {}", SITE_NAME),
        MediaKind::Photos,
        "",
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media_types::fixtures::{photo, photo_page, video};

    #[test]
    fn test_home_lists_category_chips() {
        let html = render_home();
        for chip in CATEGORY_CHIPS {
            assert!(html.contains(&format!(r#"href="/search/{}""#, chip)));
        }
    }

    #[test]
    fn test_search_page_title_count_and_cards() {
        let page = photo_page(0..3, Some("https://api.pexels.com/v1/search/?page=2"));
        let html = render_search("red cars", &FilterState::default(), SearchOutcome::Loaded(&page));

        assert!(html.contains("<h1>Free Red Cars Photos</h1>"));
        assert!(html.contains(r#"<span class="badge badge-primary">1K</span>"#));
        assert!(html.contains(r#"href="/photo/2""#));
        assert!(html.contains(
            "/api/download?url=https%3A%2F%2Fimages.pexels.com%2Fphotos%2F0%2Fpexels-photo-0.jpeg"
        ));
        assert!(html.contains(r#"data-next="/api/photos/next?cursor=https%3A%2F%2Fapi.pexels.com"#));
        assert!(html.contains(r#"<script id="initial-data" type="application/json">{"page":1"#));
        assert!(!html.contains(EMPTY_RESULTS_MESSAGE));
    }

    #[test]
    fn test_empty_results_state() {
        let page: SearchPage<Photo> = SearchPage::empty();
        let filters = FilterState {
            orientation: Some(Orientation::Portrait),
            ..FilterState::default()
        };
        let html = render_search("zzz", &filters, SearchOutcome::Loaded(&page));

        assert!(html.contains(EMPTY_RESULTS_MESSAGE));
        assert!(html.contains(r#"<a class="btn" href="/search/zzz">Clear All Filters</a>"#));
        assert!(html.contains(r#"<option value="portrait" selected>"#));
    }

    #[test]
    fn test_failed_search_renders_inline_error() {
        let html = render_search::<Video>("ocean", &FilterState::default(), SearchOutcome::Failed);
        assert!(html.contains("Failed to load videos. Please try again."));
        assert!(html.contains("<h1>Free Ocean Videos</h1>"));
    }

    #[test]
    fn test_video_filter_form_has_no_color() {
        let page = SearchPage {
            items: vec![video(5)],
            ..SearchPage::empty()
        };
        let filters = FilterState {
            color: HexColor::parse("FF0000"),
            ..FilterState::default()
        };
        let html = render_search("ocean", &filters, SearchOutcome::Loaded(&page));
        assert!(!html.contains(r#"name="color""#));
        assert!(html.contains("/search/videos/ocean"));
    }

    #[test]
    fn test_user_content_is_escaped() {
        let mut evil = photo(1);
        evil.photographer = "<script>alert(1)</script>".to_string();
        evil.alt = Some("\"><img onerror=x>".to_string());

        let html = render_photo(&evil, "http://localhost:3000");
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("\"><img onerror"));

        let page = SearchPage {
            items: vec![evil],
            ..SearchPage::empty()
        };
        let html = render_search("q", &FilterState::default(), SearchOutcome::Loaded(&page));
        assert!(!html.contains("alert(1)</script>"));
        assert!(html.contains(r#"<\/script>"#));
    }

    #[test]
    fn test_photo_page_downloads_and_share_links() {
        let html = render_photo(&photo(9), "http://localhost:3000/");
        for label in ["Original", "Large", "Medium", "Small"] {
            assert!(html.contains(label));
        }
        assert!(html.contains("4000 × 3000"));
        assert!(html.contains("Share this Photo"));
        assert!(html.contains("https://x.com/intent/tweet?url=http%3A%2F%2Flocalhost%3A3000%2Fphoto%2F9"));
        assert!(html.contains("Photo%20by%20Jane%20Doe%20on%20Image%20Studios"));
    }

    #[test]
    fn test_video_page_plays_best_file() {
        let html = render_video(&video(4), "http://localhost:3000");
        assert!(html.contains(r#"src="https://videos.pexels.com/4/hd.mp4""#));
        assert!(html.contains("Video by John Roe - Image Studios"));
    }

    #[test]
    fn test_embed_json_cannot_close_script() {
        assert_eq!(embed_json(&"</script>"), r#""<\/script>""#);
    }
}
