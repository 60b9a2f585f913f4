use crate::filters::{is_filter_param, with_query, FilterState, HexColor, MinSize, Orientation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Orientation,
    Color,
    Size,
}

/// Raw control values as the user sees them; empty means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    pub orientation: String,
    pub color: String,
    pub size: String,
}

impl FilterForm {
    fn from_filters(filters: &FilterState) -> Self {
        Self {
            orientation: filters
                .orientation
                .map(|o| o.as_str().to_string())
                .unwrap_or_default(),
            color: filters.color.as_ref().map(HexColor::css).unwrap_or_default(),
            size: filters
                .size
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
        }
    }

    pub fn applied_count(&self) -> usize {
        [&self.orientation, &self.color, &self.size]
            .into_iter()
            .filter(|value| !value.is_empty())
            .count()
    }
}

/// Navigation that replaces the current history entry instead of pushing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceUrl(pub String);

/// Keeps the filter controls and the page URL in step with each other.
#[derive(Debug, Clone)]
pub struct FilterBar {
    path: String,
    form: FilterForm,
    filters: FilterState,
    extra_params: Vec<(String, String)>,
}

impl FilterBar {
    pub fn new(path: impl Into<String>, query: &str) -> Self {
        let mut bar = Self {
            path: path.into(),
            form: FilterForm::default(),
            filters: FilterState::default(),
            extra_params: Vec::new(),
        };
        bar.sync_from_url(query);
        bar
    }

    pub fn form(&self) -> &FilterForm {
        &self.form
    }

    /// Filters currently encoded in the URL.
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn applied_count(&self) -> usize {
        self.form.applied_count()
    }

    pub fn current_url(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        serializer.extend_pairs(self.filters.to_query_pairs());
        serializer.extend_pairs(self.extra_params.iter());
        with_query(&self.path, &serializer.finish())
    }

    /// Re-derives the controls from the URL, e.g. after back navigation.
    pub fn sync_from_url(&mut self, query: &str) {
        let pairs: Vec<(String, String)> =
            url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
                .into_owned()
                .collect();

        self.filters = FilterState::from_query_pairs(pairs.iter().map(|(k, v)| (k, v)));
        self.extra_params = pairs
            .into_iter()
            .filter(|(key, _)| !is_filter_param(key))
            .collect();
        self.form = FilterForm::from_filters(&self.filters);
    }

    /// Applies one control change. Values that fail validation update the
    /// control but leave the URL's existing value alone.
    pub fn on_change(&mut self, field: FilterField, value: &str) -> ReplaceUrl {
        let value = value.trim();

        match field {
            FilterField::Orientation => {
                self.form.orientation = value.to_string();
                if value.is_empty() {
                    self.filters.orientation = None;
                } else if let Ok(orientation) = value.parse::<Orientation>() {
                    self.filters.orientation = Some(orientation);
                }
            }
            FilterField::Color => {
                self.form.color = value.to_string();
                if value.is_empty() {
                    self.filters.color = None;
                } else if let Some(color) = HexColor::parse(value) {
                    self.filters.color = Some(color);
                } else {
                    log::debug!("Ignoring invalid color filter {:?}", value);
                }
            }
            FilterField::Size => {
                self.form.size = value.to_string();
                if value.is_empty() {
                    self.filters.size = None;
                } else if let Ok(size) = value.parse::<MinSize>() {
                    self.filters.size = Some(size);
                }
            }
        }

        ReplaceUrl(self.current_url())
    }

    pub fn select_swatch(&mut self, hex: &str) -> ReplaceUrl {
        self.on_change(FilterField::Color, hex)
    }

    /// Drops every query parameter, filters and otherwise.
    pub fn clear_all(&mut self) -> ReplaceUrl {
        self.sync_from_url("");
        ReplaceUrl(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filters_leave_url_bare() {
        let bar = FilterBar::new("/search/nature", "");
        assert_eq!(bar.current_url(), "/search/nature");
        assert_eq!(bar.applied_count(), 0);
    }

    #[test]
    fn test_orientation_and_color_scenario() {
        let mut bar = FilterBar::new("/search/nature", "");
        bar.on_change(FilterField::Orientation, "landscape");
        let ReplaceUrl(url) = bar.on_change(FilterField::Color, "#ff0000");

        assert_eq!(url, "/search/nature?orientation=landscape&color=FF0000");
        assert_eq!(bar.applied_count(), 2);
    }

    #[test]
    fn test_empty_value_removes_parameter() {
        let mut bar = FilterBar::new("/search/cats", "orientation=portrait&size=large");
        let ReplaceUrl(url) = bar.on_change(FilterField::Orientation, "");
        assert_eq!(url, "/search/cats?size=large");
        assert_eq!(bar.form().orientation, "");
    }

    #[test]
    fn test_invalid_color_keeps_previous_url_value() {
        let mut bar = FilterBar::new("/search/cats", "color=00FF00");
        let ReplaceUrl(url) = bar.on_change(FilterField::Color, "#12");

        assert_eq!(url, "/search/cats?color=00FF00");
        assert_eq!(bar.form().color, "#12");
        assert_eq!(bar.filters().color.as_ref().unwrap().as_str(), "00FF00");
    }

    #[test]
    fn test_sync_from_url_rederives_form() {
        let mut bar = FilterBar::new("/search/cats", "");
        bar.on_change(FilterField::Size, "small");

        bar.sync_from_url("?orientation=square&color=abcdef");
        assert_eq!(
            bar.form(),
            &FilterForm {
                orientation: "square".to_string(),
                color: "#ABCDEF".to_string(),
                size: String::new(),
            }
        );
    }

    #[test]
    fn test_applying_same_change_twice_is_idempotent() {
        let mut bar = FilterBar::new("/search/cats", "");
        let first = bar.select_swatch("#EF4444");
        let second = bar.select_swatch("#EF4444");
        assert_eq!(first, second);
    }

    #[test]
    fn test_unrelated_parameters_are_preserved() {
        let mut bar = FilterBar::new("/search/cats", "ref=home&orientation=portrait");
        let ReplaceUrl(url) = bar.on_change(FilterField::Size, "medium");
        assert_eq!(url, "/search/cats?orientation=portrait&size=medium&ref=home");

        let ReplaceUrl(url) = bar.clear_all();
        assert_eq!(url, "/search/cats");
        assert_eq!(bar.current_url(), "/search/cats");
    }
}
