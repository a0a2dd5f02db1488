use std::io::{BufRead, Write};

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::config::ConfigStore;
use crate::domain::{Location, Reading};
use crate::errors::{SkycastError, SkycastResult};
use crate::fetch::PageSource;
use crate::providers::{
    absolutize, element_text, print_candidates, resolve_location, select_index, Selection,
    WeatherSource,
};

pub const PROVIDER_ID: &str = "accu";
pub const PROVIDER_TITLE: &str = "AccuWeather";

const DEFAULT_LOCATION_NAME: &str = "Дніпро";
const DEFAULT_LOCATION_URL: &str =
    "https://www.accuweather.com/uk/ua/dnipro/322722/weather-forecast/322722";
const BROWSE_LOCATIONS: &str = "https://www.accuweather.com/uk/browse-locations";

pub struct AccuWeather {
    location: Location,
}

impl AccuWeather {
    pub fn new(store: &ConfigStore) -> Self {
        let location = resolve_location(store, PROVIDER_ID, default_location());
        Self { location }
    }

    /// Candidate (name, url) pairs on a browse-locations page.
    fn locations(&self, pages: &dyn PageSource, url: &str) -> SkycastResult<Vec<(String, String)>> {
        let html = pages.page(url)?;
        let document = Html::parse_document(&html);

        let item_selector = Selector::parse("li.drilldown").unwrap();
        let link_selector = Selector::parse("a").unwrap();
        let name_selector = Selector::parse("em").unwrap();

        let mut locations = Vec::new();
        for item in document.select(&item_selector) {
            let href = item
                .select(&link_selector)
                .next()
                .and_then(|a| a.value().attr("href"));
            let name = item.select(&name_selector).next().map(element_text);

            if let (Some(href), Some(name)) = (href, name) {
                if let Some(target) = absolutize(url, href) {
                    locations.push((name, target));
                }
            }
        }

        Ok(locations)
    }

    /// The city page links to a "current day" detail page holding the
    /// actual conditions.
    fn current_day_url(&self, document: &Html) -> Option<String> {
        let item_selector = Selector::parse("li").unwrap();
        let link_selector = Selector::parse("a").unwrap();
        let current = Regex::new(r"(day|night) current first").unwrap();

        document
            .select(&item_selector)
            .find(|item| {
                item.value()
                    .attr("class")
                    .is_some_and(|class| current.is_match(class))
            })
            .and_then(|item| item.select(&link_selector).next())
            .and_then(|link| link.value().attr("href"))
            .and_then(|href| absolutize(&self.location.url, href))
    }

    fn detail_text(details: ElementRef<'_>, selector: &str) -> Option<String> {
        let selector = Selector::parse(selector).unwrap();
        details
            .select(&selector)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty())
    }
}

fn default_location() -> Location {
    Location::new(DEFAULT_LOCATION_NAME, DEFAULT_LOCATION_URL)
}

pub fn build(store: &ConfigStore) -> Box<dyn WeatherSource> {
    Box::new(AccuWeather::new(store))
}

impl WeatherSource for AccuWeather {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn title(&self) -> &'static str {
        PROVIDER_TITLE
    }

    fn default_location(&self) -> Location {
        default_location()
    }

    fn location(&self) -> &Location {
        &self.location
    }

    fn extract(&self, html: &str, pages: &dyn PageSource) -> Reading {
        let mut reading = Reading::default();

        let document = Html::parse_document(html);
        let Some(day_url) = self.current_day_url(&document) else {
            return reading;
        };

        // A failed detail fetch is an extraction miss, not a command error
        let day_html = match pages.page(&day_url) {
            Ok(html) => html,
            Err(error) => {
                log::debug!("current day page unavailable: {error}");
                return reading;
            }
        };

        let day_page = Html::parse_document(&day_html);
        let details_selector = Selector::parse("div#detail-now").unwrap();
        let Some(details) = day_page.select(&details_selector).next() else {
            return reading;
        };

        reading.condition = Self::detail_text(details, "span.cond");
        reading.temperature = Self::detail_text(details, "span.large-temp");
        reading.feels_like = Self::detail_text(details, "span.small-temp")
            .map(|text| text.replace("RealFeel® ", ""));

        let wind_selector = Selector::parse("li.wind").unwrap();
        let wind: Vec<String> = details.select(&wind_selector).map(element_text).collect();
        if !wind.is_empty() {
            reading.wind = Some(wind.join(" "));
        }

        reading
    }

    fn configure(
        &self,
        pages: &dyn PageSource,
        store: &mut ConfigStore,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
    ) -> SkycastResult<()> {
        let mut picked: Option<(String, String)> = None;
        let mut candidates = self.locations(pages, BROWSE_LOCATIONS)?;

        // Descend until a pick yields no further drill-down list
        while !candidates.is_empty() {
            print_candidates(&candidates, output)?;

            match select_index("Please select location: ", candidates.len(), input, output)? {
                Selection::Picked(index) => {
                    let choice = candidates[index].clone();
                    candidates = self.locations(pages, &choice.1)?;
                    picked = Some(choice);
                }
                Selection::Aborted => {
                    writeln!(output, "Attempts have been exhausted, the program will be closed.")?;
                    return Err(SkycastError::ConfigurationAborted);
                }
            }
        }

        let (name, url) = picked.ok_or_else(|| {
            SkycastError::InvalidInput("the location list is empty".to_string())
        })?;

        store.save_location(PROVIDER_ID, &name, &url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockPageSource;
    use std::io::Cursor;
    use tempfile::TempDir;

    const BROWSE_PAGE: &str = r#"<html><body><ul>
        <li class="drilldown cl"><a href="https://www.accuweather.com/uk/browse-locations/eur"><em>Європа</em></a></li>
        <li class="drilldown cl"><a href="https://www.accuweather.com/uk/browse-locations/asi"><em>Азія</em></a></li>
    </ul></body></html>"#;

    const REGION_PAGE: &str = r#"<html><body><ul>
        <li class="drilldown cl"><a href="https://www.accuweather.com/uk/ua/dnipro/322722/weather-forecast/322722"><em>Дніпро</em></a></li>
    </ul></body></html>"#;

    const LEAF_PAGE: &str = "<html><body><p>No further drill-down here.</p></body></html>";

    const CITY_PAGE: &str = r#"<html><body><ul>
        <li class="night current first cl">
            <a href="https://www.accuweather.com/uk/ua/dnipro/322722/current-weather/322722">Current</a>
        </li>
    </ul></body></html>"#;

    const DAY_PAGE: &str = r#"<html><body><div id="detail-now">
        <span class="cond">Хмарно</span>
        <span class="large-temp">4°</span>
        <span class="small-temp">RealFeel® 1°</span>
        <ul>
            <li class="wind">ПдЗх</li>
            <li class="wind">15 км/год</li>
        </ul>
    </div></body></html>"#;

    const DAY_PAGE_NO_TEMP: &str = r#"<html><body><div id="detail-now">
        <span class="cond">Хмарно</span>
    </div></body></html>"#;

    const DAY_URL: &str = "https://www.accuweather.com/uk/ua/dnipro/322722/current-weather/322722";

    fn provider_in(dir: &TempDir) -> (AccuWeather, ConfigStore) {
        let store = ConfigStore::open(dir.path().join("locations.toml")).unwrap();
        (AccuWeather::new(&store), store)
    }

    #[test]
    fn test_default_location_used_without_configuration() {
        let dir = TempDir::new().unwrap();
        let (provider, _store) = provider_in(&dir);

        assert_eq!(provider.location().name, DEFAULT_LOCATION_NAME);
        assert_eq!(provider.location().url, DEFAULT_LOCATION_URL);
    }

    #[test]
    fn test_locations_parsed_from_browse_page() {
        let dir = TempDir::new().unwrap();
        let (provider, _store) = provider_in(&dir);

        let mut pages = MockPageSource::new();
        pages
            .expect_page()
            .returning(|_| Ok(BROWSE_PAGE.to_string()));

        let locations = provider.locations(&pages, BROWSE_LOCATIONS).unwrap();

        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].0, "Європа");
        assert_eq!(
            locations[0].1,
            "https://www.accuweather.com/uk/browse-locations/eur"
        );
    }

    #[test]
    fn test_extract_reads_current_day_details() {
        let dir = TempDir::new().unwrap();
        let (provider, _store) = provider_in(&dir);

        let mut pages = MockPageSource::new();
        pages.expect_page().returning(|url| {
            assert_eq!(url, DAY_URL);
            Ok(DAY_PAGE.to_string())
        });

        let reading = provider.extract(CITY_PAGE, &pages);

        assert_eq!(reading.condition.as_deref(), Some("Хмарно"));
        assert_eq!(reading.temperature.as_deref(), Some("4°"));
        assert_eq!(reading.feels_like.as_deref(), Some("1°"));
        assert_eq!(reading.wind.as_deref(), Some("ПдЗх 15 км/год"));
    }

    #[test]
    fn test_extract_tolerates_missing_temperature() {
        let dir = TempDir::new().unwrap();
        let (provider, _store) = provider_in(&dir);

        let mut pages = MockPageSource::new();
        pages
            .expect_page()
            .returning(|_| Ok(DAY_PAGE_NO_TEMP.to_string()));

        let reading = provider.extract(CITY_PAGE, &pages);

        assert!(reading.temperature.is_none());
        assert_eq!(reading.condition.as_deref(), Some("Хмарно"));
    }

    #[test]
    fn test_extract_without_current_day_section_is_empty() {
        let dir = TempDir::new().unwrap();
        let (provider, _store) = provider_in(&dir);

        let pages = MockPageSource::new();
        let reading = provider.extract(LEAF_PAGE, &pages);

        assert!(reading.is_empty());
    }

    #[test]
    fn test_configure_descends_until_list_is_exhausted() {
        let dir = TempDir::new().unwrap();
        let (provider, mut store) = provider_in(&dir);

        let mut pages = MockPageSource::new();
        pages.expect_page().returning(|url| {
            Ok(match url {
                BROWSE_LOCATIONS => BROWSE_PAGE,
                "https://www.accuweather.com/uk/browse-locations/asi" => REGION_PAGE,
                _ => LEAF_PAGE,
            }
            .to_string())
        });

        let mut input = Cursor::new("2\n1\n");
        let mut output = Vec::new();

        provider
            .configure(&pages, &mut store, &mut input, &mut output)
            .unwrap();

        let saved = store.location_for(PROVIDER_ID).unwrap();
        assert_eq!(saved.name, "Дніпро");
        assert_eq!(
            saved.url,
            "https://www.accuweather.com/uk/ua/dnipro/322722/weather-forecast/322722"
        );
    }

    #[test]
    fn test_configure_aborts_after_three_bad_entries() {
        let dir = TempDir::new().unwrap();
        let (provider, mut store) = provider_in(&dir);

        let mut pages = MockPageSource::new();
        pages
            .expect_page()
            .returning(|_| Ok(BROWSE_PAGE.to_string()));

        let mut input = Cursor::new("x\nseven\n99\n");
        let mut output = Vec::new();

        let result = provider.configure(&pages, &mut store, &mut input, &mut output);

        assert!(matches!(result, Err(SkycastError::ConfigurationAborted)));
        // Nothing was persisted: the config file was never created
        assert!(!store.path().exists());
        assert!(store.location_for(PROVIDER_ID).is_none());
    }
}
