//! Public URL construction for posts.

use crate::config::BlogConfig;
use crate::domain::SiteUrl;

/// Collapse every run of `/` into a single one.
pub(crate) fn squeeze_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;
    for ch in path.chars() {
        let is_slash = ch == '/';
        if !(is_slash && previous_slash) {
            out.push(ch);
        }
        previous_slash = is_slash;
    }
    out
}

/// Build `site.url(relative) + /{public_blog_path}/{year}/{month}/{slug}`.
pub fn build_url(
    site: &dyn SiteUrl,
    config: &BlogConfig,
    year: i32,
    month: u32,
    slug: &str,
    relative: bool,
) -> String {
    let path = squeeze_slashes(&format!(
        "/{}/{}/{}/{}",
        config.public_blog_path, year, month, slug
    ));
    format!("{}{}", site.url(relative), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSite(&'static str);

    impl SiteUrl for FixedSite {
        fn url(&self, relative: bool) -> String {
            if relative { String::new() } else { self.0.to_string() }
        }
    }

    #[test]
    fn test_absolute_url() {
        let url = build_url(
            &FixedSite("https://ex.com"),
            &BlogConfig::new("blog"),
            2024,
            3,
            "post",
            false,
        );
        assert_eq!(url, "https://ex.com/blog/2024/3/post");
    }

    #[test]
    fn test_relative_url() {
        let url = build_url(
            &FixedSite("https://ex.com"),
            &BlogConfig::new("blog"),
            2024,
            3,
            "post",
            true,
        );
        assert_eq!(url, "/blog/2024/3/post");
    }

    #[test]
    fn test_configured_path_slashes_are_squeezed() {
        let url = build_url(
            &FixedSite("https://ex.com"),
            &BlogConfig::new("/news//archive/"),
            2024,
            11,
            "post",
            false,
        );
        assert_eq!(url, "https://ex.com/news/archive/2024/11/post");
    }

    #[test]
    fn test_empty_blog_path() {
        let url = build_url(
            &FixedSite("https://ex.com"),
            &BlogConfig::new(""),
            2024,
            3,
            "post",
            false,
        );
        assert_eq!(url, "https://ex.com/2024/3/post");
    }

    #[test]
    fn test_squeeze_slashes() {
        assert_eq!(squeeze_slashes("//a///b/"), "/a/b/");
        assert_eq!(squeeze_slashes(""), "");
    }
}
