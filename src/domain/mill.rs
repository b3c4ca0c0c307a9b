// Mill domain model
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MillInfo {
    pub id: String,
    pub display_name: String,
    pub section: String,
    pub nominal_feed_rate: f64,
}

impl MillInfo {
    pub fn new(
        id: String,
        display_name: Option<String>,
        section: String,
        nominal_feed_rate: f64,
    ) -> Self {
        let display_name = display_name.unwrap_or_else(|| Self::format_name(&id));
        Self {
            id,
            display_name,
            section,
            nominal_feed_rate,
        }
    }

    fn format_name(id: &str) -> String {
        // Convert "mill_07" to "Mill 07"
        id.trim_matches('_')
            .split('_')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_name() {
        let mill = MillInfo::new("mill_07".to_string(), None, "A".to_string(), 160.0);
        assert_eq!(mill.display_name, "Mill 07");

        let mill = MillInfo::new("ball_mill_2_".to_string(), None, "B".to_string(), 160.0);
        assert_eq!(mill.display_name, "Ball Mill 2");
    }

    #[test]
    fn test_explicit_display_name_wins() {
        let mill = MillInfo::new(
            "mill_01".to_string(),
            Some("Primary SAG".to_string()),
            "A".to_string(),
            180.0,
        );
        assert_eq!(mill.display_name, "Primary SAG");
    }
}
