use std::io::{BufRead, Write};

use scraper::{ElementRef, Html, Selector};

use crate::config::ConfigStore;
use crate::domain::{Location, Reading};
use crate::errors::{SkycastError, SkycastResult};
use crate::fetch::PageSource;
use crate::providers::{
    absolutize, element_text, print_candidates, resolve_location, select_index, Selection,
    WeatherSource,
};

pub const PROVIDER_ID: &str = "rp5";
pub const PROVIDER_TITLE: &str = "rp5.ua";

const SITE_URL: &str = "http://rp5.ua/";
const DEFAULT_LOCATION_NAME: &str = "Київ";
const DEFAULT_LOCATION_URL: &str =
    "http://rp5.ua/%D0%9F%D0%BE%D0%B3%D0%BE%D0%B4%D0%B0_%D0%B2_%D0%9A%D0%B8%D1%94%D0%B2%D1%96";
const BROWSE_LOCATIONS: &str =
    "http://rp5.ua/%D0%9F%D0%BE%D0%B3%D0%BE%D0%B4%D0%B0_%D0%B2_%D1%81%D0%B2%D1%96%D1%82%D1%96";

pub struct Rp5 {
    location: Location,
}

impl Rp5 {
    pub fn new(store: &ConfigStore) -> Self {
        let location = resolve_location(store, PROVIDER_ID, default_location());
        Self { location }
    }

    /// Country links on the world browse page.
    fn countries(&self, pages: &dyn PageSource, url: &str) -> SkycastResult<Vec<(String, String)>> {
        let html = pages.page(url)?;
        let document = Html::parse_document(&html);

        let country_selector = Selector::parse("div.country_map_links").unwrap();
        let link_selector = Selector::parse("a").unwrap();

        let mut countries = Vec::new();
        for country in document.select(&country_selector) {
            if let Some(link) = country.select(&link_selector).next() {
                if let Some(target) = link
                    .value()
                    .attr("href")
                    .and_then(|href| absolutize(SITE_URL, href))
                {
                    countries.push((element_text(link), target));
                }
            }
        }

        Ok(countries)
    }

    /// City links on a country page.
    fn cities(&self, pages: &dyn PageSource, url: &str) -> SkycastResult<Vec<(String, String)>> {
        let html = pages.page(url)?;
        let document = Html::parse_document(&html);

        let map_selector = Selector::parse("div.countryMap").unwrap();
        let city_selector = Selector::parse("h3").unwrap();
        let link_selector = Selector::parse("a").unwrap();

        let mut cities = Vec::new();
        if let Some(map) = document.select(&map_selector).next() {
            for city in map.select(&city_selector) {
                if let Some(link) = city.select(&link_selector).next() {
                    if let Some(target) = link
                        .value()
                        .attr("href")
                        .and_then(|href| absolutize(SITE_URL, href))
                    {
                        cities.push((element_text(link), target));
                    }
                }
            }
        }

        Ok(cities)
    }

    fn section_text(section: ElementRef<'_>, selector: &str) -> Option<String> {
        let selector = Selector::parse(selector).unwrap();
        section
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
    Box::new(Rp5::new(store))
}

impl WeatherSource for Rp5 {
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

    fn extract(&self, html: &str, _pages: &dyn PageSource) -> Reading {
        let mut reading = Reading::default();

        let document = Html::parse_document(html);
        let section_selector = Selector::parse("div#archiveString").unwrap();
        let Some(section) = document.select(&section_selector).next() else {
            return reading;
        };

        // The archive summary is one comma-separated sentence; the
        // condition and the wind direction sit at fixed token positions
        let summary = Self::section_text(section, "div.ArchiveInfo").unwrap_or_default();
        let tokens: Vec<&str> = summary.split(", ").collect();

        reading.condition = tokens
            .get(1)
            .map(|token| token.to_string())
            .filter(|token| !token.is_empty());
        reading.temperature = Self::section_text(section, "span.t_0");
        reading.feels_like = Self::section_text(section, "div.TempStr");

        let velocity = Self::section_text(section, "span.wv_1")
            .map(|text| text.trim_matches(['(', ')']).to_string());
        let direction = tokens.get(4).map(|token| token.to_string());
        if let (Some(velocity), Some(direction)) = (velocity, direction) {
            reading.wind = Some(format!("Вітер {velocity}, {direction}"));
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
        let countries = self.countries(pages, BROWSE_LOCATIONS)?;
        if countries.is_empty() {
            return Err(SkycastError::InvalidInput(
                "the country list is empty".to_string(),
            ));
        }

        print_candidates(&countries, output)?;
        let country = match select_index("Please select location: ", countries.len(), input, output)? {
            Selection::Picked(index) => &countries[index],
            Selection::Aborted => {
                writeln!(output, "Attempts have been exhausted, the program will be closed.")?;
                return Err(SkycastError::ConfigurationAborted);
            }
        };

        let cities = self.cities(pages, &country.1)?;
        if cities.is_empty() {
            return Err(SkycastError::InvalidInput(
                "the city list is empty".to_string(),
            ));
        }

        print_candidates(&cities, output)?;
        let city = match select_index("Please select city: ", cities.len(), input, output)? {
            Selection::Picked(index) => &cities[index],
            Selection::Aborted => {
                writeln!(output, "Attempts have been exhausted, the program will be closed.")?;
                return Err(SkycastError::ConfigurationAborted);
            }
        };

        store.save_location(PROVIDER_ID, &city.0, &city.1)
    }
}
