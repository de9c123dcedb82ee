//! Card image URLs and the fallback chain used when one fails to load.

use crate::config::LookupConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    /// Card id when the card exists but has no hosted image.
    pub missing_id: Option<u64>,
}

impl Placeholder {
    pub fn lookup_failed(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            missing_id: None,
        }
    }

    pub fn diagnostic(&self) -> Option<String> {
        self.missing_id.map(|id| format!("Missing: {id}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageStep {
    Try(String),
    Placeholder(Placeholder),
}

/// Candidate URLs for one card, one per configured extension.
#[derive(Debug, Clone)]
pub struct ImageFallback {
    name: String,
    id: u64,
    urls: Vec<String>,
    attempt: usize,
}

impl ImageFallback {
    pub fn new(config: &LookupConfig, name: &str, id: u64) -> Self {
        let urls = config
            .image_extensions
            .iter()
            .map(|ext| image_url(config, id, ext))
            .collect();
        Self {
            name: name.to_owned(),
            id,
            urls,
            attempt: 0,
        }
    }

    pub fn first(&self) -> ImageStep {
        match self.urls.first() {
            Some(url) => ImageStep::Try(url.clone()),
            None => ImageStep::Placeholder(self.placeholder()),
        }
    }

    /// The current candidate failed; move to the next or give up.
    pub fn on_error(&mut self) -> ImageStep {
        self.attempt += 1;
        match self.urls.get(self.attempt) {
            Some(url) => ImageStep::Try(url.clone()),
            None => ImageStep::Placeholder(self.placeholder()),
        }
    }

    fn placeholder(&self) -> Placeholder {
        Placeholder {
            name: self.name.clone(),
            missing_id: Some(self.id),
        }
    }
}

pub fn image_url(config: &LookupConfig, id: u64, extension: &str) -> String {
    format!("{}/{id}{extension}", config.image_base_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_then_jpg_then_placeholder() {
        let config = LookupConfig::default();
        let mut fallback = ImageFallback::new(&config, "Dark Magician", 46986414);

        assert_eq!(
            fallback.first(),
            ImageStep::Try(format!("{}/46986414.png", config.image_base_url))
        );
        assert_eq!(
            fallback.on_error(),
            ImageStep::Try(format!("{}/46986414.jpg", config.image_base_url))
        );
        match fallback.on_error() {
            ImageStep::Placeholder(placeholder) => {
                assert_eq!(placeholder.name, "Dark Magician");
                assert_eq!(placeholder.diagnostic().as_deref(), Some("Missing: 46986414"));
            }
            other => panic!("expected placeholder, got {other:?}"),
        }
    }

    #[test]
    fn failed_lookup_placeholder_has_no_diagnostic() {
        assert_eq!(Placeholder::lookup_failed("Nope").diagnostic(), None);
    }
}
