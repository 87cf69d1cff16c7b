use crate::prelude::*;
use super::queries::{CountryDetails, CountrySummary, DetailRequest};


/// The observable state of one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum QueryState<T> {
    Loading,
    Error(String),
    Ready(T),
}

impl<T> From<Result<T, String>> for QueryState<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(v) => Self::Ready(v),
            Err(msg) => Self::Error(msg),
        }
    }
}

/// State of the country browser: the listing, the selection and the details
/// of the selected country.
#[derive(Debug)]
pub(crate) struct Browser {
    countries: QueryState<Vec<CountrySummary>>,

    /// Never `Some("")`.
    selection: Option<String>,

    /// Tagged with the name the query was issued for. Only `Some` while
    /// something is selected, and then always for the current selection.
    details: Option<(String, QueryState<CountryDetails>)>,
}

/// What should be shown for a [`Browser`].
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum View<'a> {
    LoadingCountries,
    CountriesError(&'a str),
    Browse {
        countries: &'a [CountrySummary],
        selection: Option<&'a str>,
        /// `None` means the card grid of all countries is shown.
        details: Option<&'a QueryState<CountryDetails>>,
    },
}

impl Browser {
    pub(crate) fn new() -> Self {
        Self {
            countries: QueryState::Loading,
            selection: None,
            details: None,
        }
    }

    pub(crate) fn countries_loaded(&mut self, result: Result<Vec<CountrySummary>, String>) {
        self.countries = result.into();
    }

    /// Selects a country and returns the detail query to issue. The name is
    /// not checked against the listing. Selecting the empty name clears the
    /// selection.
    pub(crate) fn select(&mut self, name: &str) -> Option<DetailRequest> {
        if name.is_empty() {
            self.clear();
            return None;
        }

        self.selection = Some(name.to_owned());
        self.details = Some((name.to_owned(), QueryState::Loading));
        self.detail_request()
    }

    /// The detail query that still has to be answered. `None` while nothing
    /// is selected, i.e. the query is skipped.
    pub(crate) fn detail_request(&self) -> Option<DetailRequest> {
        match &self.details {
            Some((name, QueryState::Loading)) => Some(DetailRequest { name: name.clone() }),
            _ => None,
        }
    }

    /// Applies the result of a detail query issued for `name`. Results for
    /// anything but the current selection are outdated and dropped.
    pub(crate) fn details_loaded(&mut self, name: &str, result: Result<CountryDetails, String>) {
        match &mut self.details {
            Some((current, state)) if current == name => *state = result.into(),
            _ => trace!("Ignoring details for '{name}' as the selection changed"),
        }
    }

    /// Resets the selection (and with it the select control) to empty.
    pub(crate) fn clear(&mut self) {
        self.selection = None;
        self.details = None;
    }

    pub(crate) fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub(crate) fn view(&self) -> View<'_> {
        match &self.countries {
            QueryState::Loading => View::LoadingCountries,
            QueryState::Error(msg) => View::CountriesError(msg),
            QueryState::Ready(countries) => View::Browse {
                countries,
                selection: self.selection(),
                details: self.details.as_ref().map(|(_, state)| state),
            },
        }
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::frontend::queries::{CountryDetails, CountrySummary, DetailRequest};
    use super::{Browser, QueryState, View};

    fn summaries(names: &[&str]) -> Vec<CountrySummary> {
        names.iter()
            .map(|name| serde_json::from_value(json!({ "name": name })).unwrap())
            .collect()
    }

    fn details(name: &str) -> CountryDetails {
        serde_json::from_value(json!({ "name": name })).unwrap()
    }

    #[test]
    fn listing_states() {
        let mut browser = Browser::new();
        assert_eq!(browser.view(), View::LoadingCountries);

        browser.countries_loaded(Err("Upstream failure: boom".into()));
        assert_eq!(browser.view(), View::CountriesError("Upstream failure: boom"));

        let countries = summaries(&["France", "Japan"]);
        browser.countries_loaded(Ok(countries.clone()));
        assert_eq!(browser.view(), View::Browse {
            countries: &countries,
            selection: None,
            details: None,
        });
    }

    #[test]
    fn detail_query_is_skipped_without_selection() {
        let mut browser = Browser::new();
        assert_eq!(browser.detail_request(), None);
        assert_eq!(browser.select(""), None);
        assert_eq!(browser.selection(), None);
        assert_eq!(browser.detail_request(), None);
    }

    #[test]
    fn select_and_load_details() {
        let mut browser = Browser::new();
        browser.countries_loaded(Ok(summaries(&["France"])));

        let request = browser.select("France");
        assert_eq!(request, Some(DetailRequest { name: "France".into() }));
        assert_eq!(browser.detail_request(), request);
        assert!(matches!(
            browser.view(),
            View::Browse { selection: Some("France"), details: Some(QueryState::Loading), .. },
        ));

        browser.details_loaded("France", Ok(details("France")));
        assert_eq!(browser.detail_request(), None);
        match browser.view() {
            View::Browse { details: Some(QueryState::Ready(d)), .. } => assert_eq!(d.name(), "France"),
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn selecting_unlisted_name_still_queries() {
        let mut browser = Browser::new();
        browser.countries_loaded(Ok(summaries(&["France"])));

        let request = browser.select("Atlantis");
        assert_eq!(request, Some(DetailRequest { name: "Atlantis".into() }));

        browser.details_loaded("Atlantis", Err("Not found: No data found for country: Atlantis".into()));
        assert!(matches!(
            browser.view(),
            View::Browse { details: Some(QueryState::Error(msg)), .. }
                if msg == "Not found: No data found for country: Atlantis",
        ));
    }

    #[test]
    fn superseded_details_are_ignored() {
        let mut browser = Browser::new();
        browser.countries_loaded(Ok(summaries(&["France", "Japan"])));

        browser.select("France");
        browser.select("Japan");
        browser.details_loaded("France", Ok(details("France")));
        assert!(matches!(
            browser.view(),
            View::Browse { selection: Some("Japan"), details: Some(QueryState::Loading), .. },
        ));

        browser.details_loaded("Japan", Ok(details("Japan")));
        match browser.view() {
            View::Browse { details: Some(QueryState::Ready(d)), .. } => assert_eq!(d.name(), "Japan"),
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn clear_resets_selection() {
        let mut browser = Browser::new();
        let countries = summaries(&["France"]);
        browser.countries_loaded(Ok(countries.clone()));
        browser.select("France");

        browser.clear();
        assert_eq!(browser.selection(), None);
        assert_eq!(browser.detail_request(), None);
        assert_eq!(browser.view(), View::Browse {
            countries: &countries,
            selection: None,
            details: None,
        });

        // A late result for the old selection changes nothing.
        browser.details_loaded("France", Ok(details("France")));
        assert_eq!(browser.selection(), None);
        assert!(matches!(browser.view(), View::Browse { details: None, .. }));
    }
}
