/// One parsed weather page. Every field is optional: a missing source
/// element omits the field instead of failing the extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reading {
    pub condition: Option<String>,
    pub temperature: Option<String>,
    pub feels_like: Option<String>,
    pub wind: Option<String>,
}

impl Reading {
    /// Present fields in canonical order (condition, temperature,
    /// feels like, wind), independent of how they were filled in.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = Vec::new();
        if let Some(v) = self.condition.as_deref() {
            fields.push(("condition", v));
        }
        if let Some(v) = self.temperature.as_deref() {
            fields.push(("temperature", v));
        }
        if let Some(v) = self.feels_like.as_deref() {
            fields.push(("feels like", v));
        }
        if let Some(v) = self.wind.as_deref() {
            fields.push(("wind", v));
        }
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_keep_canonical_order() {
        let reading = Reading {
            wind: Some("5 m/s".to_string()),
            condition: Some("cloudy".to_string()),
            temperature: None,
            feels_like: Some("+3".to_string()),
        };

        let keys: Vec<&str> = reading.fields().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["condition", "feels like", "wind"]);
    }

    #[test]
    fn test_empty_reading() {
        let reading = Reading::default();
        assert!(reading.is_empty());
        assert!(reading.fields().is_empty());
    }
}
