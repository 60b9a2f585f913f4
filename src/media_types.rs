use serde::{Deserialize, Serialize};

/// Which half of the catalogue a page or record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photos,
    Videos,
}

impl MediaKind {
    pub fn singular(self) -> &'static str {
        match self {
            MediaKind::Photos => "photo",
            MediaKind::Videos => "video",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            MediaKind::Photos => "photos",
            MediaKind::Videos => "videos",
        }
    }

    /// Capitalised singular, as used in headings for one record.
    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Photos => "Photo",
            MediaKind::Videos => "Video",
        }
    }

    /// Capitalised plural, as shown in page titles and badges.
    pub fn title(self) -> &'static str {
        match self {
            MediaKind::Photos => "Photos",
            MediaKind::Videos => "Videos",
        }
    }

    /// Route prefix of the search results page for this kind.
    pub fn search_path(self) -> &'static str {
        match self {
            MediaKind::Photos => "/search",
            MediaKind::Videos => "/search/videos",
        }
    }
}

/// A single record that can appear in a results grid.
pub trait MediaRecord: Clone + Send + Sync + 'static {
    const KIND: MediaKind;

    fn id(&self) -> u64;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoSrc {
    pub original: String,
    #[serde(default)]
    pub large2x: String,
    #[serde(default)]
    pub large: String,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub small: String,
    #[serde(default)]
    pub portrait: String,
    #[serde(default)]
    pub landscape: String,
    #[serde(default)]
    pub tiny: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub url: String,
    pub photographer: String,
    #[serde(default)]
    pub photographer_url: String,
    #[serde(default)]
    pub photographer_id: u64,
    #[serde(default)]
    pub avg_color: Option<String>,
    pub src: PhotoSrc,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub liked: bool,
}

impl Photo {
    /// Best rendition for grid display: large2x, then large, then medium.
    pub fn display_src(&self) -> &str {
        [&self.src.large2x, &self.src.large, &self.src.medium]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or(&self.src.original)
    }

    pub fn alt_text(&self) -> &str {
        self.alt
            .as_deref()
            .filter(|alt| !alt.trim().is_empty())
            .unwrap_or("Image")
    }

    /// Download choices offered on the photo view, largest first.
    pub fn downloads(&self) -> Vec<(&'static str, &str)> {
        [
            ("Original", self.src.original.as_str()),
            ("Large", self.src.large.as_str()),
            ("Medium", self.src.medium.as_str()),
            ("Small", self.src.small.as_str()),
        ]
        .into_iter()
        .filter(|(_, url)| !url.is_empty())
        .collect()
    }
}

impl MediaRecord for Photo {
    const KIND: MediaKind = MediaKind::Photos;

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoFile {
    pub id: u64,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoPicture {
    pub id: u64,
    pub picture: String,
    pub nr: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoUser {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub duration: u32,
    pub user: VideoUser,
    #[serde(default)]
    pub video_files: Vec<VideoFile>,
    #[serde(default)]
    pub video_pictures: Vec<VideoPicture>,
}

impl Video {
    /// Prefers an HD rendition, then SD, then whatever is listed first.
    pub fn best_file(&self) -> Option<&VideoFile> {
        let with_quality = |quality: &str| {
            self.video_files
                .iter()
                .find(|file| file.quality.as_deref() == Some(quality))
        };

        with_quality("hd")
            .or_else(|| with_quality("sd"))
            .or_else(|| self.video_files.first())
    }

    pub fn download_link(&self) -> Option<&str> {
        self.best_file().map(|file| file.link.as_str())
    }
}

impl MediaRecord for Video {
    const KIND: MediaKind = MediaKind::Videos;

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoSearchResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub next_page: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSearchResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub videos: Vec<Video>,
    #[serde(default)]
    pub next_page: Option<String>,
}

/// One page of search results, independent of the upstream field naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage<T> {
    pub page: u32,
    pub per_page: u32,
    pub total_results: u64,
    pub items: Vec<T>,
    pub next_page: Option<String>,
}

impl<T> SearchPage<T> {
    pub fn empty() -> Self {
        Self {
            page: 1,
            per_page: 0,
            total_results: 0,
            items: Vec::new(),
            next_page: None,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next_page.is_some()
    }
}

impl From<PhotoSearchResponse> for SearchPage<Photo> {
    fn from(response: PhotoSearchResponse) -> Self {
        Self {
            page: response.page,
            per_page: response.per_page,
            total_results: response.total_results,
            items: response.photos,
            next_page: response.next_page.filter(|url| !url.is_empty()),
        }
    }
}

impl From<VideoSearchResponse> for SearchPage<Video> {
    fn from(response: VideoSearchResponse) -> Self {
        Self {
            page: response.page,
            per_page: response.per_page,
            total_results: response.total_results,
            items: response.videos,
            next_page: response.next_page.filter(|url| !url.is_empty()),
        }
    }
}

/// Autocomplete candidate returned by the word-suggestion API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSuggestion {
    pub word: String,
    #[serde(default)]
    pub score: u64,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_search_response_deserializes_upstream_shape() {
        let body = r##"{
            "page": 1,
            "per_page": 2,
            "total_results": 8000,
            "next_page": "https://api.pexels.com/v1/search/?page=2&per_page=2&query=nature",
            "photos": [{
                "id": 15286,
                "width": 2500,
                "height": 1667,
                "url": "https://www.pexels.com/photo/person-walking-15286/",
                "photographer": "Luis del Rio",
                "photographer_url": "https://www.pexels.com/@luisdelrio",
                "photographer_id": 1081,
                "avg_color": "#283419",
                "src": {
                    "original": "https://images.pexels.com/photos/15286/pexels-photo.jpg",
                    "large2x": "https://images.pexels.com/photos/15286/pexels-photo.jpg?w=1880",
                    "large": "https://images.pexels.com/photos/15286/pexels-photo.jpg?h=650",
                    "medium": "https://images.pexels.com/photos/15286/pexels-photo.jpg?h=350",
                    "small": "https://images.pexels.com/photos/15286/pexels-photo.jpg?h=130",
                    "portrait": "https://images.pexels.com/photos/15286/p.jpg",
                    "landscape": "https://images.pexels.com/photos/15286/l.jpg",
                    "tiny": "https://images.pexels.com/photos/15286/t.jpg"
                },
                "liked": false,
                "alt": "Person walking in forest"
            }]
        }"##;

        let response: PhotoSearchResponse = serde_json::from_str(body).unwrap();
        let page: SearchPage<Photo> = response.into();

        assert_eq!(page.total_results, 8000);
        assert_eq!(page.items.len(), 1);
        assert!(page.has_next());
        assert_eq!(page.items[0].photographer, "Luis del Rio");
        assert_eq!(page.items[0].id(), 15286);
    }

    #[test]
    fn test_last_page_has_no_cursor() {
        let body = r#"{"page": 9, "per_page": 15, "total_results": 130, "photos": []}"#;
        let page: SearchPage<Photo> = serde_json::from_str::<PhotoSearchResponse>(body)
            .unwrap()
            .into();
        assert!(!page.has_next());

        let body = r#"{"page": 9, "per_page": 15, "total_results": 130, "videos": [], "next_page": ""}"#;
        let page: SearchPage<Video> = serde_json::from_str::<VideoSearchResponse>(body)
            .unwrap()
            .into();
        assert!(!page.has_next());
    }

    #[test]
    fn test_display_src_falls_back() {
        let mut photo = fixtures::photo(1);
        assert!(photo.display_src().ends_with("large2x.jpeg"));

        photo.src.large2x.clear();
        assert!(photo.display_src().ends_with("large.jpeg"));

        photo.src.large.clear();
        assert!(photo.display_src().ends_with("medium.jpeg"));
    }

    #[test]
    fn test_photo_alt_text_default() {
        let mut photo = fixtures::photo(1);
        photo.alt = Some("  ".to_string());
        assert_eq!(photo.alt_text(), "Image");
        photo.alt = None;
        assert_eq!(photo.alt_text(), "Image");
    }

    #[test]
    fn test_photo_downloads_skip_missing_renditions() {
        let mut photo = fixtures::photo(1);
        photo.src.small.clear();

        let labels: Vec<&str> = photo.downloads().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Original", "Large", "Medium"]);
    }

    #[test]
    fn test_video_best_file_prefers_hd() {
        let video = fixtures::video(5);
        assert_eq!(video.best_file().unwrap().quality.as_deref(), Some("hd"));

        let mut sd_only = video.clone();
        sd_only.video_files.retain(|f| f.quality.as_deref() == Some("sd"));
        assert!(sd_only.download_link().unwrap().ends_with("sd.mp4"));

        let mut unknown = video.clone();
        for file in &mut unknown.video_files {
            file.quality = None;
        }
        assert!(unknown.download_link().unwrap().ends_with("sd.mp4"));

        let mut none = video;
        none.video_files.clear();
        assert!(none.best_file().is_none());
    }

    #[test]
    fn test_media_kind_nouns() {
        assert_eq!(MediaKind::Photos.singular(), "photo");
        assert_eq!(MediaKind::Videos.plural(), "videos");
        assert_eq!(MediaKind::Videos.search_path(), "/search/videos");
    }
}
