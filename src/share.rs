use serde::Serialize;

use crate::media_types::MediaKind;

/// "Photo by Jane on Image Studios"
pub fn share_text(kind: MediaKind, photographer: &str) -> String {
    format!("{} by {} on Image Studios", kind.label(), photographer)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLinks {
    pub x: String,
    pub pinterest: String,
    pub linkedin: String,
    pub facebook: String,
}

impl SocialLinks {
    /// (title, href) pairs in display order.
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            ("X", &self.x),
            ("Pinterest", &self.pinterest),
            ("LinkedIn", &self.linkedin),
            ("Facebook", &self.facebook),
        ]
    }
}

pub fn social_links(page_url: &str, text: &str) -> SocialLinks {
    let url = urlencoding::encode(page_url);
    let text = urlencoding::encode(text);

    SocialLinks {
        x: format!("https://x.com/intent/tweet?url={}&text={}", url, text),
        pinterest: format!("https://www.pinterest.com/pin/create/link?url={}", url),
        linkedin: format!("https://www.linkedin.com/shareArticle?url={}", url),
        facebook: format!("https://www.facebook.com/sharer/sharer.php?u={}&t={}", url, text),
    }
}
